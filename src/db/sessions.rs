//! SQLite-backed session store.
//!
//! Sessions are only ever inserted; the one destructive operation,
//! [`Sessions::delete_all`], exists for the explicit `reset` command and is
//! never called by the tracking engine.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use worklog::db::sessions::Sessions;
//! use worklog::libs::session::SessionStore;
//! use chrono::Local;
//!
//! let mut sessions = Sessions::new()?;
//! let today = sessions.query_by_date(Local::now().date_naive())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::db::db::Db;
use crate::libs::error::StoreError;
use crate::libs::session::{Session, SessionStore};
use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

const INSERT_SESSION: &str = "INSERT INTO sessions (start_time, end_time, duration) VALUES (?1, ?2, ?3)";
const SELECT_BY_DATE: &str =
    "SELECT start_time, end_time, duration FROM sessions WHERE date(start_time) = ?1 ORDER BY start_time, id";
const SELECT_ALL: &str = "SELECT start_time, end_time, duration FROM sessions ORDER BY start_time, id";
const SELECT_LAST: &str = "SELECT start_time, end_time, duration FROM sessions ORDER BY id DESC LIMIT 1";
const SUM_BY_DATE: &str = "SELECT COALESCE(SUM(duration), 0) FROM sessions WHERE date(start_time) = ?1";
const COUNT_ALL: &str = "SELECT COUNT(*) FROM sessions";
const DELETE_ALL: &str = "DELETE FROM sessions";

type RawSession = (String, String, i64);

pub struct Sessions {
    conn: Connection,
}

impl Sessions {
    /// Opens the session store in the platform data directory.
    pub fn new() -> Result<Self> {
        Ok(Self::from_db(Db::new()?))
    }

    pub fn from_db(db: Db) -> Self {
        Sessions { conn: db.conn }
    }

    /// All sessions, oldest first.
    pub fn fetch_all(&mut self) -> Result<Vec<Session>, StoreError> {
        self.fetch(SELECT_ALL, [])
    }

    pub fn count(&mut self) -> Result<usize, StoreError> {
        let count: i64 = self.conn.query_row(COUNT_ALL, [], |row| row.get(0))?;
        Ok(count.max(0) as usize)
    }

    /// Removes every stored session. Returns the number of deleted rows.
    pub fn delete_all(&mut self) -> Result<usize, StoreError> {
        Ok(self.conn.execute(DELETE_ALL, [])?)
    }

    fn fetch<P: rusqlite::Params>(&mut self, sql: &str, params: P) -> Result<Vec<Session>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
            .collect::<Result<Vec<RawSession>, _>>()?;
        rows.into_iter().map(parse_session).collect()
    }
}

impl SessionStore for Sessions {
    fn append(&mut self, start: NaiveDateTime, end: NaiveDateTime, duration_seconds: i64) -> Result<(), StoreError> {
        self.conn.execute(
            INSERT_SESSION,
            params![
                start.format(TIMESTAMP_FORMAT).to_string(),
                end.format(TIMESTAMP_FORMAT).to_string(),
                duration_seconds
            ],
        )?;
        Ok(())
    }

    fn query_by_date(&mut self, date: NaiveDate) -> Result<Vec<Session>, StoreError> {
        let date_str = date.format(DATE_FORMAT).to_string();
        self.fetch(SELECT_BY_DATE, [date_str])
    }

    fn total_seconds_on(&mut self, date: NaiveDate) -> Result<u64, StoreError> {
        let date_str = date.format(DATE_FORMAT).to_string();
        let total: i64 = self.conn.query_row(SUM_BY_DATE, [date_str], |row| row.get(0))?;
        Ok(total.max(0) as u64)
    }

    fn most_recent(&mut self) -> Result<Option<Session>, StoreError> {
        let raw: Option<RawSession> = self
            .conn
            .query_row(SELECT_LAST, [], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .optional()?;
        raw.map(parse_session).transpose()
    }
}

fn parse_session((start, end, duration): RawSession) -> Result<Session, StoreError> {
    Ok(Session {
        start_time: parse_timestamp(&start)?,
        end_time: parse_timestamp(&end)?,
        duration_seconds: duration,
    })
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime, StoreError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|_| StoreError::Timestamp(value.to_string()))
}
