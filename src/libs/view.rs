use super::formatter::{format_duration, format_time, FormattedSession};
use super::session::Session;
use anyhow::Result;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn sessions(sessions: &[Session]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["#", "START", "END", "DURATION"]);
        for session in Self::format_sessions(sessions) {
            table.add_row(row![session.id, session.start, session.end, session.duration]);
        }
        table.printstd();

        Ok(())
    }

    pub fn format_sessions(sessions: &[Session]) -> Vec<FormattedSession> {
        sessions
            .iter()
            .enumerate()
            .map(|(index, session)| FormattedSession {
                id: index + 1,
                start: format_time(&session.start_time),
                end: format_time(&session.end_time),
                duration: format_duration(session.duration_seconds),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn rows_are_numbered_from_one() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let sessions = vec![
            Session::complete(day.and_hms_opt(9, 0, 0).unwrap(), day.and_hms_opt(10, 30, 0).unwrap()),
            Session::complete(day.and_hms_opt(11, 0, 0).unwrap(), day.and_hms_opt(11, 0, 45).unwrap()),
        ];

        let rows = View::format_sessions(&sessions);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].duration, "01:30:00");
        assert_eq!(rows[1].id, 2);
        assert_eq!(rows[1].start, "11:00:00");
        assert_eq!(rows[1].duration, "00:00:45");
    }
}
