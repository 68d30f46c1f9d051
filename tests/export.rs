mod common;

#[cfg(test)]
mod tests {
    use super::common::at;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};
    use worklog::libs::config::ExportConfig;
    use worklog::libs::export::{date_based_rows, flat_rows, ExportFormat, Exporter};
    use worklog::libs::session::Session;

    struct ExportTestContext {
        temp_dir: TempDir,
        sessions: Vec<Session>,
    }

    impl TestContext for ExportTestContext {
        fn setup() -> Self {
            ExportTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
                sessions: vec![
                    Session::complete(at(2024, 5, 6, 9, 0, 0), at(2024, 5, 6, 12, 15, 0)),
                    Session::complete(at(2024, 5, 6, 13, 0, 0), at(2024, 5, 6, 17, 0, 5)),
                    Session::complete(at(2024, 5, 7, 8, 30, 0), at(2024, 5, 7, 9, 0, 0)),
                ],
            }
        }
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_csv_export_writes_header_and_rows(ctx: &mut ExportTestContext) {
        let path = ctx.temp_dir.path().join("sessions.csv");
        let rows = flat_rows(&ctx.sessions);

        let count = Exporter::new(ExportFormat::Csv, path.clone())
            .export(&rows, &ExportConfig::default())
            .unwrap();
        assert_eq!(count, 3);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["Date", "Start", "End", "Duration"]);

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 3);
        assert_eq!(&records[1][0], "2024-05-06");
        assert_eq!(&records[1][1], "13:00:00");
        assert_eq!(&records[1][3], "04:00:05");
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_csv_export_date_based(ctx: &mut ExportTestContext) {
        let path = ctx.temp_dir.path().join("days.csv");
        let rows = date_based_rows(&ctx.sessions);

        Exporter::new(ExportFormat::Csv, path.clone())
            .export(&rows, &ExportConfig::default())
            .unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][1], "09:00:00");
        assert_eq!(&records[0][2], "17:00:05");
        assert_eq!(&records[0][3], "07:15:05");
        assert_eq!(&records[1][0], "2024-05-07");
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_excel_export_creates_workbook(ctx: &mut ExportTestContext) {
        let path = ctx.temp_dir.path().join("hours.xlsx");
        let config = ExportConfig {
            sheet: "May".to_string(),
            date_cell: "A7".to_string(),
            start_cell: String::new(),
            ..ExportConfig::default()
        };

        let count = Exporter::new(ExportFormat::Excel, path.clone())
            .export(&date_based_rows(&ctx.sessions), &config)
            .unwrap();

        assert_eq!(count, 2);
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_excel_export_rejects_bad_cell(ctx: &mut ExportTestContext) {
        let path = ctx.temp_dir.path().join("broken.xlsx");
        let config = ExportConfig {
            end_cell: "7C".to_string(),
            ..ExportConfig::default()
        };

        let result = Exporter::new(ExportFormat::Excel, path.clone()).export(&flat_rows(&ctx.sessions), &config);

        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_existing_workbook_is_not_replaced(ctx: &mut ExportTestContext) {
        let path = ctx.temp_dir.path().join("timesheet.xlsx");
        std::fs::write(&path, b"user timesheet").unwrap();

        let result =
            Exporter::new(ExportFormat::Excel, path.clone()).export(&date_based_rows(&ctx.sessions), &ExportConfig::default());

        let error = result.unwrap_err().to_string();
        assert!(error.contains("already exists"));
        assert_eq!(std::fs::read(&path).unwrap(), b"user timesheet");
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_overwrite_replaces_existing_file(ctx: &mut ExportTestContext) {
        let path = ctx.temp_dir.path().join("sessions.csv");
        std::fs::write(&path, "old content\n").unwrap();

        let count = Exporter::new(ExportFormat::Csv, path.clone())
            .overwrite(true)
            .export(&flat_rows(&ctx.sessions), &ExportConfig::default())
            .unwrap();

        assert_eq!(count, 3);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Date,Start,End,Duration"));
    }
}
