mod common;

#[cfg(test)]
mod tests {
    use super::common::at;
    use chrono::NaiveDate;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};
    use worklog::db::db::{Db, DB_FILE_NAME};
    use worklog::db::migrations::{get_db_version, needs_migration, MigrationManager};
    use worklog::db::sessions::Sessions;
    use worklog::libs::session::SessionStore;

    struct StoreTestContext {
        _temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl StoreTestContext {
        fn open(&self) -> Sessions {
            Sessions::from_db(Db::open(&self.db_path).unwrap())
        }
    }

    impl TestContext for StoreTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join(DB_FILE_NAME);
            StoreTestContext {
                _temp_dir: temp_dir,
                db_path,
            }
        }
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_schema_is_current_after_open(ctx: &mut StoreTestContext) {
        let db = Db::open(&ctx.db_path).unwrap();

        assert_eq!(get_db_version(&db.conn).unwrap(), MigrationManager::new().latest_version());
        assert!(!needs_migration(&db.conn).unwrap());

        // Reopening must not re-run anything
        let again = Db::open(&ctx.db_path).unwrap();
        assert_eq!(get_db_version(&again.conn).unwrap(), 1);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_query_by_date_filters_and_orders(ctx: &mut StoreTestContext) {
        let mut sessions = ctx.open();
        sessions.append(at(2024, 5, 6, 13, 0, 0), at(2024, 5, 6, 14, 0, 0), 3600).unwrap();
        sessions.append(at(2024, 5, 6, 9, 0, 0), at(2024, 5, 6, 9, 30, 0), 1800).unwrap();
        sessions.append(at(2024, 5, 7, 9, 0, 0), at(2024, 5, 7, 10, 0, 0), 3600).unwrap();

        let day = sessions.query_by_date(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()).unwrap();

        assert_eq!(day.len(), 2);
        assert_eq!(day[0].start_time, at(2024, 5, 6, 9, 0, 0));
        assert_eq!(day[0].duration_seconds, 1800);
        assert_eq!(day[1].end_time, at(2024, 5, 6, 14, 0, 0));
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_most_recent_is_last_appended(ctx: &mut StoreTestContext) {
        let mut sessions = ctx.open();
        assert!(sessions.most_recent().unwrap().is_none());

        sessions.append(at(2024, 5, 6, 9, 0, 0), at(2024, 5, 6, 10, 0, 0), 3600).unwrap();
        sessions.append(at(2024, 4, 30, 9, 0, 0), at(2024, 4, 30, 9, 0, 10), 10).unwrap();

        let last = sessions.most_recent().unwrap().unwrap();
        assert_eq!(last.start_time, at(2024, 4, 30, 9, 0, 0));
        assert_eq!(last.duration_seconds, 10);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_daily_totals(ctx: &mut StoreTestContext) {
        let mut sessions = ctx.open();
        sessions.append(at(2024, 5, 1, 9, 0, 0), at(2024, 5, 1, 10, 0, 0), 3600).unwrap();
        sessions.append(at(2024, 5, 1, 11, 0, 0), at(2024, 5, 1, 11, 20, 0), 1200).unwrap();
        sessions.append(at(2024, 5, 3, 9, 0, 0), at(2024, 5, 3, 9, 1, 0), 60).unwrap();
        sessions.append(at(2024, 5, 4, 9, 0, 0), at(2024, 5, 4, 9, 1, 0), 60).unwrap();

        assert_eq!(sessions.total_seconds_on(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()).unwrap(), 4800);
        assert_eq!(sessions.total_seconds_on(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()).unwrap(), 0);

        assert_eq!(sessions.fetch_all().unwrap().len(), 4);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_sessions_survive_reopen(ctx: &mut StoreTestContext) {
        {
            let mut sessions = ctx.open();
            sessions.append(at(2024, 5, 6, 9, 0, 0), at(2024, 5, 6, 9, 45, 0), 2700).unwrap();
        }

        let mut reopened = ctx.open();
        assert_eq!(reopened.count().unwrap(), 1);
        assert_eq!(reopened.fetch_all().unwrap()[0].duration_seconds, 2700);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_delete_all_empties_the_store(ctx: &mut StoreTestContext) {
        let mut sessions = ctx.open();
        sessions.append(at(2024, 5, 6, 9, 0, 0), at(2024, 5, 6, 10, 0, 0), 3600).unwrap();
        sessions.append(at(2024, 5, 6, 11, 0, 0), at(2024, 5, 6, 12, 0, 0), 3600).unwrap();

        assert_eq!(sessions.delete_all().unwrap(), 2);
        assert_eq!(sessions.count().unwrap(), 0);
        assert!(sessions.most_recent().unwrap().is_none());
    }

    #[test]
    fn test_negative_duration_is_rejected() {
        let mut sessions = Sessions::from_db(Db::open_in_memory().unwrap());
        let result = sessions.append(at(2024, 5, 6, 9, 0, 0), at(2024, 5, 6, 9, 0, 0), -1);
        assert!(result.is_err());
    }
}
