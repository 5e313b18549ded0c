//! Data access layer for the stop log.
//!
//! Every operation opens a fresh `SQLite` connection and drops it before
//! returning, on success and failure alike. There is no pooling, retrying or
//! statement caching.

pub mod frame;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, Connection, OpenFlags};
use tracing::{debug, error, info};

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::present::Notice;
use crate::query::Query;
use crate::stop::NewStop;

pub use frame::{time_component, Cell, Frame};

/// Handle on the stop log.
///
/// Holds configuration only; connections live for a single call.
#[derive(Debug, Clone)]
pub struct Store {
    /// Path to the database file.
    path: PathBuf,
    /// Create the file and table on first use.
    create_if_missing: bool,
}

impl Store {
    /// Create a store handle from configuration. Nothing is opened yet.
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            path: config.database_path(),
            create_if_missing: config.create_if_missing,
        }
    }

    /// Create a store handle for an explicit database path.
    #[must_use]
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            create_if_missing: true,
        }
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a connection for one operation.
    ///
    /// With `create_if_missing`, parent directories, the file and the
    /// `traffic_stops` table are created when absent. Otherwise a missing
    /// file is an error.
    fn connect(&self) -> Result<Connection> {
        debug!("Opening connection to {}", self.path.display());

        let conn = if self.create_if_missing {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                        path: parent.to_path_buf(),
                        source,
                    })?;
                }
            }
            let conn = Connection::open(&self.path).map_err(|source| Error::DatabaseOpen {
                path: self.path.clone(),
                source,
            })?;
            for statement in schema::SCHEMA_STATEMENTS {
                conn.execute(statement, [])?;
            }
            conn
        } else {
            Connection::open_with_flags(
                &self.path,
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .map_err(|source| Error::DatabaseOpen {
                path: self.path.clone(),
                source,
            })?
        };

        Ok(conn)
    }

    /// Run a query and materialize every row with its column names.
    ///
    /// A query matching no rows yields [`Frame::empty`] (no columns either).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be opened or the statement
    /// fails.
    pub fn try_fetch(&self, query: &Query) -> Result<Frame> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(query.sql())?;
        let columns: Vec<String> = stmt
            .column_names()
            .iter()
            .map(ToString::to_string)
            .collect();
        let width = columns.len();

        let rows = stmt
            .query_map(params_from_iter(query.params().iter()), |row| {
                (0..width)
                    .map(|i| row.get::<_, rusqlite::types::Value>(i).map(Cell::from))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        drop(stmt);
        drop(conn);
        debug!("Fetched {} rows, connection closed", rows.len());

        if rows.is_empty() {
            return Ok(Frame::empty());
        }
        Ok(Frame::new(columns, rows))
    }

    /// Run a query, reporting failures as a notice instead of an error.
    ///
    /// On any failure an error notice is pushed to `notices` and an empty
    /// frame is returned. Open failures read "Connection Error", statement
    /// failures "Query Error". Callers must check the notices to tell a
    /// failure apart from an empty result.
    pub fn fetch(&self, query: &Query, notices: &mut Vec<Notice>) -> Frame {
        match self.try_fetch(query) {
            Ok(frame) => frame,
            Err(e) => {
                error!(error = %e, "Query against {} failed", self.path.display());
                let label = if e.is_connection_error() {
                    "Connection Error"
                } else {
                    "Query Error"
                };
                notices.push(Notice::Error(format!("{label}: {e}")));
                Frame::empty()
            }
        }
    }

    /// Append one stop record.
    ///
    /// The search type is stored in normalized form (blank becomes
    /// `"No Search"`). No other checks are applied here.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be opened or the insert fails.
    pub fn insert(&self, stop: &NewStop) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            schema::INSERT_STOP,
            params![
                stop.vehicle_number,
                stop.driver_age,
                stop.driver_gender.as_str(),
                stop.driver_race,
                stop.violation,
                stop.country_name,
                stop.stop_date_text(),
                stop.stop_time_text(),
                stop.normalized_search_type(),
                stop.stop_outcome.as_str(),
                stop.stop_duration.as_str(),
                stop.drugs_related_stop,
            ],
        )?;
        info!(
            vehicle = %stop.vehicle_number,
            violation = %stop.violation,
            "Inserted stop record"
        );
        Ok(())
    }

    /// Get store statistics for the Home page.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be opened or the query fails.
    pub fn stats(&self) -> Result<StoreStats> {
        let conn = self.connect()?;
        let (total_stops, first, last): (i64, Option<String>, Option<String>) = conn
            .query_row(schema::STATS_QUERY, [], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?;
        drop(conn);

        let parse = |s: Option<String>| {
            s.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
        };

        Ok(StoreStats {
            total_stops,
            first_stop: parse(first),
            last_stop: parse(last),
            db_size_bytes: std::fs::metadata(&self.path).map_or(0, |m| m.len()),
        })
    }
}

/// Statistics about the stop log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    /// Total number of stop records.
    pub total_stops: i64,
    /// Earliest stop date.
    pub first_stop: Option<NaiveDate>,
    /// Latest stop date.
    pub last_stop: Option<NaiveDate>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
