/// Every user-facing message of the application.
///
/// Text lives in the `Display` implementation in `display.rs`; call sites
/// only pick a variant and its parameters.
#[derive(Debug, Clone)]
pub enum Message {
    // === SESSION MESSAGES ===
    SessionStarted,
    SessionStopped,
    DailyLimitExceeded { hours: u64, minutes: u64 },
    MonthChanged,
    TrackerWarning(String),

    // === SESSION LIST MESSAGES ===
    SessionsHeader(String), // date
    NoSessionsForDate(String),
    SessionsTotal(String), // formatted duration

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigNotFound,
    ConfigModuleTracker,
    ConfigModuleExport,
    DailyLimitMissing,
    InvalidIdleThresholds { idle: u64, resume: u64 },

    // === PROMPTS ===
    PromptSelectModules,
    PromptIdleThreshold,
    PromptResumeThreshold,
    PromptPollInterval,
    PromptDailyLimitMinutes,
    PromptExcelPath,
    PromptSheetName,
    PromptCell(&'static str), // column name
    PromptDateBased,

    // === WATCH MESSAGES ===
    WatcherStarted,
    WatcherStopped,
    WatchHelp,
    UnknownWatchCommand(String),
    WatcherReceivedSigterm,
    WatcherReceivedSigint,
    WatcherReceivedCtrlC,
    WatcherCtrlCListenFailed(String),
    WatcherSignalHandlingNotSupported,
    SignalHandlerFailed(String),
    LockMonitorSpawnFailed(String),

    // === EXPORT MESSAGES ===
    ExportCompleted { rows: usize, path: String },
    NothingToExport,
    InvalidCellReference(String),
    ExportPathMissing,
    ExportTargetExists(String),
    ConfirmOverwrite(String),
    ExportCancelled,

    // === RESET MESSAGES ===
    ConfirmReset(usize),
    ResetCompleted(usize),
    ResetCancelled,
    NothingToReset,

    // === DATABASE MESSAGES ===
    RunningMigration(u32, String),
    MigrationFailed(u32, String),
    DatabaseInitialized(u32),

    // === GENERIC ===
    InvalidDate(String),
}
