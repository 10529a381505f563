// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded trait store backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `traits_primary`: token number → serialized TraitRecord
//! - `traits_utility`: token number → serialized TraitRecord
//!
//! The two collections are independent record sets that share a shape but
//! never cross-reference. Upserts are last-write-wins within redb's
//! single-writer transaction model, so a token number can never hold two
//! rows.

use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::models::{Collection, TraitRecord};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary collection: token number → serialized TraitRecord (JSON bytes).
const PRIMARY_TRAITS: TableDefinition<u64, &[u8]> = TableDefinition::new("traits_primary");

/// Utility collection: token number → serialized TraitRecord (JSON bytes).
const UTILITY_TRAITS: TableDefinition<u64, &[u8]> = TableDefinition::new("traits_utility");

fn table_for(collection: Collection) -> TableDefinition<'static, u64, &'static [u8]> {
    match collection {
        Collection::Primary => PRIMARY_TRAITS,
        Collection::Utility => UTILITY_TRAITS,
    }
}

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// TraitStore
// =============================================================================

/// Embedded ACID store for per-token trait multipliers.
pub struct TraitStore {
    db: Database,
}

impl TraitStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create both tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PRIMARY_TRAITS)?;
            let _ = write_txn.open_table(UTILITY_TRAITS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Insert or overwrite the record for a token number.
    ///
    /// Stamps `updated_at` and returns the stored record.
    pub fn upsert(&self, collection: Collection, no: u64, value: &str) -> StoreResult<TraitRecord> {
        let record = TraitRecord {
            no,
            value: value.to_string(),
            updated_at: Utc::now(),
        };
        let bytes = serde_json::to_vec(&record)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(table_for(collection))?;
            table.insert(no, bytes.as_slice())?;
        }
        write_txn.commit()?;

        Ok(record)
    }

    /// Fetch the records for the given token numbers; only found entries
    /// appear in the result.
    pub fn get_many(
        &self,
        collection: Collection,
        nos: &[u64],
    ) -> StoreResult<HashMap<u64, TraitRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table_for(collection))?;

        let mut found = HashMap::with_capacity(nos.len());
        for &no in nos {
            if let Some(guard) = table.get(no)? {
                let record: TraitRecord = serde_json::from_slice(guard.value())?;
                found.insert(no, record);
            }
        }

        Ok(found)
    }

    /// List every record in a collection, newest first.
    pub fn list(&self, collection: Collection) -> StoreResult<Vec<TraitRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table_for(collection))?;

        let mut records = Vec::new();
        for entry in table.iter()? {
            let (_, guard) = entry?;
            records.push(serde_json::from_slice::<TraitRecord>(guard.value())?);
        }
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        Ok(records)
    }

    /// Delete the record for a token number, returning it.
    pub fn delete_one(&self, collection: Collection, no: u64) -> StoreResult<TraitRecord> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(table_for(collection))?;
            let removed = match table.remove(no)? {
                Some(guard) => Some(serde_json::from_slice::<TraitRecord>(guard.value())?),
                None => None,
            };
            removed
        };
        write_txn.commit()?;

        removed.ok_or_else(|| StoreError::NotFound(format!("trait {no} in {collection}")))
    }

    /// Delete every record in a collection, returning how many were removed.
    pub fn delete_all(&self, collection: Collection) -> StoreResult<usize> {
        let write_txn = self.db.begin_write()?;
        let deleted = {
            let mut table = write_txn.open_table(table_for(collection))?;
            let nos: Vec<u64> = table
                .iter()?
                .map(|entry| entry.map(|(key, _)| key.value()))
                .collect::<Result<_, _>>()?;
            for no in &nos {
                table.remove(*no)?;
            }
            nos.len()
        };
        write_txn.commit()?;

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (TraitStore, TempDir) {
        let dir = TempDir::new().expect("tempdir");
        let store = TraitStore::open(&dir.path().join("traits.redb")).expect("open store");
        (store, dir)
    }

    #[test]
    fn upsert_and_get_round_trip() {
        let (store, _dir) = test_store();

        let stored = store.upsert(Collection::Primary, 3, "1.5").unwrap();
        assert_eq!(stored.no, 3);
        assert_eq!(stored.value, "1.5");

        let found = store.get_many(Collection::Primary, &[3, 7]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[&3].value, "1.5");
        assert!(!found.contains_key(&7));
    }

    #[test]
    fn upsert_overwrites_without_duplicates() {
        let (store, _dir) = test_store();

        store.upsert(Collection::Primary, 3, "1.5").unwrap();
        store.upsert(Collection::Primary, 3, "2.25").unwrap();

        let records = store.list(Collection::Primary).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, "2.25");
    }

    #[test]
    fn collections_are_isolated() {
        let (store, _dir) = test_store();

        store.upsert(Collection::Primary, 1, "1.0").unwrap();
        store.upsert(Collection::Utility, 1, "3.0").unwrap();

        let primary = store.get_many(Collection::Primary, &[1]).unwrap();
        let utility = store.get_many(Collection::Utility, &[1]).unwrap();
        assert_eq!(primary[&1].value, "1.0");
        assert_eq!(utility[&1].value, "3.0");

        store.delete_all(Collection::Primary).unwrap();
        assert!(store.list(Collection::Primary).unwrap().is_empty());
        assert_eq!(store.list(Collection::Utility).unwrap().len(), 1);
    }

    #[test]
    fn delete_one_returns_record_or_not_found() {
        let (store, _dir) = test_store();

        store.upsert(Collection::Utility, 9, "0.5").unwrap();

        let removed = store.delete_one(Collection::Utility, 9).unwrap();
        assert_eq!(removed.no, 9);
        assert_eq!(removed.value, "0.5");

        let missing = store.delete_one(Collection::Utility, 9);
        assert!(matches!(missing, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn delete_all_reports_count() {
        let (store, _dir) = test_store();

        for no in 0..4 {
            store.upsert(Collection::Primary, no, "1.0").unwrap();
        }

        assert_eq!(store.delete_all(Collection::Primary).unwrap(), 4);
        assert_eq!(store.delete_all(Collection::Primary).unwrap(), 0);
    }
}
