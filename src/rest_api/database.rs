//! # Database Facade
//!
//! One SQLite connection per process behind a mutex. The dispatcher holds
//! the lock for a whole request and hands endpoints a [`Storage`] view of
//! the connection, so requests are serialised at the storage boundary.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rusqlite::types::{ToSql, ValueRef};
use rusqlite::{Connection, Row, Statement};
use serde_json::{Map, Value};

use super::errors::{ApiResult, ServerError};
use super::query_builder::BoundParams;
use super::schema;

/// Owner of the process-wide connection
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (creating if needed) the database file and apply the schema
    pub fn open(path: &Path) -> rusqlite::Result<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Private in-memory database with the schema applied
    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> rusqlite::Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        schema::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Take exclusive use of the connection.
    ///
    /// A handler that panicked while holding the lock poisons it. The
    /// connection itself is still consistent (an open transaction rolls back
    /// on drop), so the poison is cleared and only that request fails.
    pub fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("storage connection lock was poisoned by a panicked request");
            self.conn.clear_poison();
            poisoned.into_inner()
        })
    }

    /// Load the sample conference dataset
    pub fn seed_sample(&self) -> Result<(), ServerError> {
        let conn = self.lock();
        schema::seed_sample(&conn)?;
        Ok(())
    }
}

/// Statement execution over a borrowed connection
#[derive(Clone, Copy)]
pub struct Storage<'c> {
    conn: &'c Connection,
}

impl<'c> Storage<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Run a query and return each row as a JSON object keyed by column name
    pub fn execute_sql(&self, sql: &str, params: &BoundParams) -> rusqlite::Result<Vec<Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let named = params.to_named();
        let bindings = used_bindings(&stmt, &named);

        let rows = stmt.query_map(bindings.as_slice(), |row| row_to_json(row, &columns))?;
        let values = rows.collect::<rusqlite::Result<Vec<Value>>>()?;
        Ok(values)
    }

    /// Run a statement, returning the number of affected rows
    pub fn execute(&self, sql: &str, params: &BoundParams) -> rusqlite::Result<usize> {
        let mut stmt = self.conn.prepare(sql)?;
        let named = params.to_named();
        let bindings = used_bindings(&stmt, &named);

        stmt.execute(bindings.as_slice())
    }

    /// Rowid of the most recent successful insert on this connection
    pub fn last_insert_rowid(&self) -> i64 {
        self.conn.last_insert_rowid()
    }

    /// True when the query yields at least one row
    pub fn exists(&self, sql: &str, params: &BoundParams) -> rusqlite::Result<bool> {
        Ok(!self.execute_sql(sql, params)?.is_empty())
    }

    /// Run `f` inside a transaction, committing only if it succeeds
    pub fn transaction<T>(&self, f: impl FnOnce(&Storage<'_>) -> ApiResult<T>) -> ApiResult<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(&Storage::new(&tx))?;
        tx.commit()?;
        Ok(value)
    }
}

/// Bindings whose placeholder appears in `stmt`. Callers may share one
/// parameter set across several statements.
fn used_bindings<'p>(
    stmt: &Statement<'_>,
    named: &'p [(String, &'p dyn ToSql)],
) -> Vec<(&'p str, &'p dyn ToSql)> {
    named
        .iter()
        .filter(|(name, _)| matches!(stmt.parameter_index(name), Ok(Some(_))))
        .map(|(name, value)| (name.as_str(), *value))
        .collect()
}

fn row_to_json(row: &Row<'_>, columns: &[String]) -> rusqlite::Result<Value> {
    let mut object = Map::with_capacity(columns.len());

    for (index, column) in columns.iter().enumerate() {
        let value = match row.get_ref(index)? {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(value) => Value::from(value),
            ValueRef::Real(value) => Value::from(value),
            ValueRef::Text(text) => Value::String(String::from_utf8_lossy(text).into_owned()),
            ValueRef::Blob(blob) => Value::String(STANDARD.encode(blob)),
        };
        object.insert(column.clone(), value);
    }

    Ok(Value::Object(object))
}
