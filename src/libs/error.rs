//! Error taxonomy of the session tracking engine.
//!
//! Every failure coming from a collaborator (OS idle query, session
//! notifications, the session store, configuration) is converted into one of
//! these variants before it reaches the event loop. Nothing here is allowed
//! to crash the owning context: handlers log the error, report it through the
//! notification sink where the user has to know, and carry on.

use thiserror::Error;

/// Errors raised by the session store adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("invalid timestamp '{0}' in session store")]
    Timestamp(String),

    #[error("{0}")]
    Unavailable(String),
}

/// Engine-level error taxonomy.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Idle query or lock registration failure. Degrades that monitor only.
    #[error("signal source failure: {0}")]
    SignalSource(String),

    /// Session store failure. The state transition still completes.
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),

    /// Missing or invalid configuration. Fatal to starting a session.
    #[error("configuration error: {0}")]
    Configuration(String),
}
