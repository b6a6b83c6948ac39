//! Rule persistence backends
//!
//! The registry writes through a [`RuleStore`]. Each store call is one
//! atomic write of one rule row.

use crate::domain::Rule;
use crate::error::StoreError;
use fs2::FileExt;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tempfile::NamedTempFile;

/// Persistence collaborator for rule rows
///
/// Implementations must make every call atomic: a failed call leaves the
/// stored table as it was. `insert` fails with `Conflict` when the id is
/// already stored; `update` and `delete` fail with `Missing` when it is not.
pub trait RuleStore: Send + Sync {
    /// Load every stored rule
    fn load(&self) -> Result<Vec<Rule>, StoreError>;

    /// Insert a new row
    fn insert(&self, rule: &Rule) -> Result<(), StoreError>;

    /// Replace the row with the same id
    fn update(&self, rule: &Rule) -> Result<(), StoreError>;

    /// Remove the row with this id
    fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Backend name for diagnostics
    fn name(&self) -> &str;
}

/// Non-durable store kept in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<BTreeMap<String, Rule>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl RuleStore for MemoryStore {
    fn load(&self) -> Result<Vec<Rule>, StoreError> {
        let rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(rows.values().cloned().collect())
    }

    fn insert(&self, rule: &Rule) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        insert_row(&mut rows, rule)
    }

    fn update(&self, rule: &Rule) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        update_row(&mut rows, rule)
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        delete_row(&mut rows, id)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Durable store holding the rule table in a JSON file
///
/// Several processes may share one file. Every write takes an exclusive
/// lock on a sibling `.lock` file, re-reads the table, applies the change
/// and writes the result to a uniquely named temp file that is renamed
/// over the table. Readers never observe a partial write and no writer
/// works from a stale copy.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl JsonFileStore {
    /// Open a store file, creating an empty table if it does not exist
    ///
    /// An existing table is validated: every row must be complete and ids
    /// must be unique.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = parent_dir(&path) {
            fs::create_dir_all(parent)?;
        }

        let mut lock_path = path.as_os_str().to_owned();
        lock_path.push(".lock");
        let store = Self {
            path,
            lock_path: PathBuf::from(lock_path),
        };

        let lock = store.lock()?;
        if store.path.exists() {
            let rows = store.read_table()?;
            log::debug!("Opened rule store {} ({} rows)", store.path.display(), rows.len());
        } else {
            store.write_table(&BTreeMap::new())?;
            log::info!("Created rule store at {}", store.path.display());
        }
        drop(lock);

        Ok(store)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Hold the cross-process write lock until the returned file is dropped
    fn lock(&self) -> Result<File, StoreError> {
        let file = File::create(&self.lock_path)?;
        file.lock_exclusive()?;
        Ok(file)
    }

    fn read_table(&self) -> Result<BTreeMap<String, Rule>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let rules: Vec<Rule> = serde_json::from_str(&content)?;
        table_from_rows(rules)
    }

    fn write_table(&self, rows: &BTreeMap<String, Rule>) -> Result<(), StoreError> {
        let rules: Vec<&Rule> = rows.values().collect();
        let content = serde_json::to_string_pretty(&rules)?;

        let dir = parent_dir(&self.path).unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Re-read the table under the lock, apply a change and persist it
    fn write_with<F>(&self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut BTreeMap<String, Rule>) -> Result<(), StoreError>,
    {
        let _lock = self.lock()?;
        let mut rows = self.read_table()?;
        change(&mut rows)?;
        self.write_table(&rows)
    }
}

impl RuleStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Rule>, StoreError> {
        Ok(self.read_table()?.into_values().collect())
    }

    fn insert(&self, rule: &Rule) -> Result<(), StoreError> {
        self.write_with(|rows| insert_row(rows, rule))
    }

    fn update(&self, rule: &Rule) -> Result<(), StoreError> {
        self.write_with(|rows| update_row(rows, rule))
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.write_with(|rows| delete_row(rows, id))
    }

    fn name(&self) -> &str {
        "json-file"
    }
}

fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

fn table_from_rows(rules: Vec<Rule>) -> Result<BTreeMap<String, Rule>, StoreError> {
    let mut rows = BTreeMap::new();
    for rule in rules {
        if let Err(e) = rule.validate() {
            return Err(StoreError::InvalidRecord(format!("'{}': {}", rule.id, e)));
        }
        if rows.contains_key(&rule.id) {
            return Err(StoreError::InvalidRecord(format!("duplicate id '{}'", rule.id)));
        }
        rows.insert(rule.id.clone(), rule);
    }
    Ok(rows)
}

fn insert_row(rows: &mut BTreeMap<String, Rule>, rule: &Rule) -> Result<(), StoreError> {
    if rows.contains_key(&rule.id) {
        return Err(StoreError::Conflict(rule.id.clone()));
    }
    rows.insert(rule.id.clone(), rule.clone());
    Ok(())
}

fn update_row(rows: &mut BTreeMap<String, Rule>, rule: &Rule) -> Result<(), StoreError> {
    match rows.get_mut(&rule.id) {
        Some(row) => {
            *row = rule.clone();
            Ok(())
        }
        None => Err(StoreError::Missing(rule.id.clone())),
    }
}

fn delete_row(rows: &mut BTreeMap<String, Rule>, id: &str) -> Result<(), StoreError> {
    match rows.remove(id) {
        Some(_) => Ok(()),
        None => Err(StoreError::Missing(id.to_string())),
    }
}
