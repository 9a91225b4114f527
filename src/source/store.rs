//! Persistent redirect store backed by redb.
//!
//! # Layout
//! A single table named `paths`, raw key bytes (request path) to raw
//! value bytes (destination URL).
//!
//! # Design Decisions
//! - The server only ever opens read transactions
//! - Writes happen offline through `import` (operator CLI)
//! - A missing `paths` table reads as an empty store

use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};
use thiserror::Error;

use crate::source::record::PathRecord;

/// Name of the table holding path rules.
pub const PATHS_TABLE_NAME: &str = "paths";

pub const PATHS_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new(PATHS_TABLE_NAME);

/// Errors raised by store access.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open store: {0}")]
    Open(#[from] redb::DatabaseError),

    #[error("store transaction failed: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("store table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("store read failed: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("store commit failed: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("stored value for {path:?} is not valid UTF-8")]
    InvalidValue { path: String },
}

/// Open an existing store file.
pub fn open(path: &Path) -> Result<Database, StoreError> {
    Ok(Database::open(path)?)
}

/// Open a store file, creating it when missing.
pub fn create(path: &Path) -> Result<Database, StoreError> {
    Ok(Database::create(path)?)
}

/// Look up the URL stored for `path` in one read transaction.
///
/// Returns `Ok(None)` when the key is absent, the value is empty, or the
/// `paths` table has never been written.
pub fn lookup(db: &Database, path: &str) -> Result<Option<String>, StoreError> {
    let txn = db.begin_read()?;
    let table = match txn.open_table(PATHS_TABLE) {
        Ok(table) => table,
        Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let Some(value) = table.get(path.as_bytes())? else {
        return Ok(None);
    };
    let bytes = value.value();
    if bytes.is_empty() {
        return Ok(None);
    }

    match std::str::from_utf8(bytes) {
        Ok(url) => Ok(Some(url.to_string())),
        Err(_) => Err(StoreError::InvalidValue {
            path: path.to_string(),
        }),
    }
}

/// Write records into the `paths` table in a single write transaction.
///
/// Returns the number of records written. Later duplicates overwrite
/// earlier ones.
pub fn import(db: &Database, records: &[PathRecord]) -> Result<usize, StoreError> {
    let txn = db.begin_write()?;
    {
        let mut table = txn.open_table(PATHS_TABLE)?;
        for record in records {
            table.insert(record.path.as_bytes(), record.url.as_bytes())?;
        }
    }
    txn.commit()?;
    Ok(records.len())
}

/// Read every rule in key order. Entries that are empty or not UTF-8 are skipped.
pub fn export(db: &Database) -> Result<Vec<PathRecord>, StoreError> {
    let txn = db.begin_read()?;
    let table = match txn.open_table(PATHS_TABLE) {
        Ok(table) => table,
        Err(redb::TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut records = Vec::new();
    for entry in table.iter()? {
        let (key, value) = entry?;
        let (Ok(path), Ok(url)) = (
            std::str::from_utf8(key.value()),
            std::str::from_utf8(value.value()),
        ) else {
            tracing::warn!("Skipping non UTF-8 store entry");
            continue;
        };
        if url.is_empty() {
            continue;
        }
        records.push(PathRecord::new(path, url));
    }
    Ok(records)
}
