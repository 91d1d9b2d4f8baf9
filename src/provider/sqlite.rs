//! SQLite-backed network provider.
//!
//! Reads issuing-network records from a SQLite table on every call, so edits
//! to the table are picked up by the next validation.
//!
//! # Feature
//!
//! Requires the `networks-sqlite` feature.
//!
//! # Database Schema
//!
//! ```sql
//! CREATE TABLE issuing_networks (
//!     id INTEGER PRIMARY KEY,
//!     name TEXT NOT NULL,
//!     starts_with_numbers TEXT,
//!     in_range TEXT,
//!     allowed_lengths TEXT NOT NULL
//! );
//! ```
//!
//! Rows are tried in ascending `id` order.

use super::{NetworkProvider, ProviderError};
use crate::network::{parse_records, IssuingNetworkRecord, NetworkDefinition};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const DEFAULT_TABLE: &str = "issuing_networks";

/// SQLite-backed network provider.
///
/// # Thread Safety
///
/// The connection is wrapped in a Mutex to allow sharing across threads.
pub struct SqliteNetworkProvider {
    conn: Mutex<Connection>,
    table_name: String,
}

impl SqliteNetworkProvider {
    /// Opens an existing database read-only.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use cc_network::provider::SqliteNetworkProvider;
    ///
    /// let provider = SqliteNetworkProvider::open("networks.db")?;
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ProviderError> {
        Self::open_with_table(path, DEFAULT_TABLE)
    }

    /// Opens an existing database read-only with a custom table name.
    ///
    /// The table name must consist of ASCII letters, digits and underscores.
    pub fn open_with_table<P: AsRef<Path>>(path: P, table: &str) -> Result<Self, ProviderError> {
        let table_name = checked_table_name(table)?;
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| ProviderError::IoError(std::io::Error::other(e.to_string())))?;

        Ok(Self {
            conn: Mutex::new(conn),
            table_name,
        })
    }

    /// Opens or creates a writable database file.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, ProviderError> {
        let conn = Connection::open(path)
            .map_err(|e| ProviderError::IoError(std::io::Error::other(e.to_string())))?;

        let provider = Self {
            conn: Mutex::new(conn),
            table_name: DEFAULT_TABLE.to_string(),
        };
        provider.create_schema()?;
        Ok(provider)
    }

    /// Opens an in-memory SQLite database.
    ///
    /// Useful for testing. Call [`create_schema`](Self::create_schema) before
    /// inserting.
    pub fn open_in_memory() -> Result<Self, ProviderError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| ProviderError::IoError(std::io::Error::other(e.to_string())))?;

        Ok(Self {
            conn: Mutex::new(conn),
            table_name: DEFAULT_TABLE.to_string(),
        })
    }

    /// Creates the network table if it does not exist.
    pub fn create_schema(&self) -> Result<(), ProviderError> {
        let conn = self.lock()?;
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                starts_with_numbers TEXT,
                in_range TEXT,
                allowed_lengths TEXT NOT NULL
            );",
            self.table_name
        ))
        .map_err(|e| ProviderError::InvalidDatabase(e.to_string()))?;

        Ok(())
    }

    /// Appends a record; it is tried after all existing rows.
    pub fn insert(&self, record: &IssuingNetworkRecord) -> Result<(), ProviderError> {
        let conn = self.lock()?;
        conn.execute(
            &self.insert_sql(),
            rusqlite::params![
                record.name,
                record.starts_with_numbers,
                record.in_range,
                record.allowed_lengths,
            ],
        )
        .map_err(|e| ProviderError::InvalidDatabase(e.to_string()))?;

        Ok(())
    }

    /// Appends many records in one transaction, keeping their order.
    pub fn insert_many(&self, records: &[IssuingNetworkRecord]) -> Result<(), ProviderError> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| ProviderError::InvalidDatabase(e.to_string()))?;

        {
            let mut stmt = tx
                .prepare(&self.insert_sql())
                .map_err(|e| ProviderError::InvalidDatabase(e.to_string()))?;

            for record in records {
                stmt.execute(rusqlite::params![
                    record.name,
                    record.starts_with_numbers,
                    record.in_range,
                    record.allowed_lengths,
                ])
                .map_err(|e| ProviderError::InvalidDatabase(e.to_string()))?;
            }
        }

        tx.commit()
            .map_err(|e| ProviderError::InvalidDatabase(e.to_string()))?;

        Ok(())
    }

    /// Reads all rows as textual records, in `id` order.
    pub fn records(&self) -> Result<Vec<IssuingNetworkRecord>, ProviderError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare_cached(&format!(
                "SELECT name, starts_with_numbers, in_range, allowed_lengths
                 FROM {} ORDER BY id",
                self.table_name
            ))
            .map_err(|e| ProviderError::InvalidDatabase(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(IssuingNetworkRecord {
                    name: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                    starts_with_numbers: row.get(1)?,
                    in_range: row.get(2)?,
                    allowed_lengths: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                })
            })
            .map_err(|e| ProviderError::InvalidDatabase(e.to_string()))?;

        let records = rows
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ProviderError::InvalidDatabase(e.to_string()))?;

        Ok(records)
    }

    fn insert_sql(&self) -> String {
        format!(
            "INSERT INTO {} (name, starts_with_numbers, in_range, allowed_lengths)
             VALUES (?1, ?2, ?3, ?4)",
            self.table_name
        )
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, ProviderError> {
        self.conn
            .lock()
            .map_err(|_| ProviderError::InvalidDatabase("connection lock poisoned".to_string()))
    }
}

impl NetworkProvider for SqliteNetworkProvider {
    fn networks(&self) -> Result<Vec<NetworkDefinition>, ProviderError> {
        let records = self.records()?;
        Ok(parse_records(&records)?)
    }

    fn len(&self) -> Result<usize, ProviderError> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(
                &format!("SELECT COUNT(*) FROM {}", self.table_name),
                [],
                |row| row.get(0),
            )
            .map_err(|e| ProviderError::InvalidDatabase(e.to_string()))?;

        Ok(usize::try_from(count).unwrap_or(0))
    }
}

impl std::fmt::Debug for SqliteNetworkProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteNetworkProvider")
            .field("table_name", &self.table_name)
            .finish_non_exhaustive()
    }
}

fn checked_table_name(table: &str) -> Result<String, ProviderError> {
    let valid = !table.is_empty()
        && !table.starts_with(|c: char| c.is_ascii_digit())
        && table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(table.to_string())
    } else {
        Err(ProviderError::InvalidDatabase(format!(
            "invalid table name '{}'",
            table
        )))
    }
}
