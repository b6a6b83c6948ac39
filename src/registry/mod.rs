//! Rule registry
//!
//! Concurrency-safe store of [`Rule`]s. Reads are served from an in-memory
//! index ordered by id; writes go through the [`RuleStore`] first and only
//! touch the index once the store accepted them. Both happen under the
//! index write lock, so no reader sees a half-applied change.

pub mod store;

pub use store::{JsonFileStore, MemoryStore, RuleStore};

use crate::domain::Rule;
use crate::error::{RegistryError, StoreError};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Registry of condition/action rules
pub struct RuleRegistry {
    store: Box<dyn RuleStore>,
    rules: RwLock<BTreeMap<String, Rule>>,
}

impl RuleRegistry {
    /// Open a registry over a store, loading the rules it holds
    pub fn open(store: Box<dyn RuleStore>) -> Result<Self, RegistryError> {
        let rules = store
            .load()?
            .into_iter()
            .map(|r| (r.id.clone(), r))
            .collect::<BTreeMap<_, _>>();

        log::debug!("Loaded {} rule(s) from {} store", rules.len(), store.name());

        Ok(Self {
            store,
            rules: RwLock::new(rules),
        })
    }

    /// Create an empty registry backed by process memory
    pub fn in_memory() -> Self {
        Self {
            store: Box::new(MemoryStore::new()),
            rules: RwLock::new(BTreeMap::new()),
        }
    }

    /// Add a new rule
    ///
    /// Fails with `DuplicateId` if a rule with the same id exists.
    pub fn add(&self, rule: Rule) -> Result<(), RegistryError> {
        rule.validate()?;

        let mut rules = self.write();
        if rules.contains_key(&rule.id) {
            return Err(RegistryError::DuplicateId(rule.id));
        }

        self.store.insert(&rule).map_err(store_error)?;
        log::info!("Rule created: {}", rule);
        rules.insert(rule.id.clone(), rule);
        Ok(())
    }

    /// All rules, ordered by id
    pub fn list(&self) -> Vec<Rule> {
        self.read().values().cloned().collect()
    }

    /// Look up a rule by id
    pub fn get_by_id(&self, id: &str) -> Option<Rule> {
        self.read().get(id).cloned()
    }

    /// Replace the condition and action of an existing rule
    pub fn update(&self, rule: Rule) -> Result<(), RegistryError> {
        rule.validate()?;

        let mut rules = self.write();
        if !rules.contains_key(&rule.id) {
            return Err(RegistryError::NotFound(rule.id));
        }

        self.store.update(&rule).map_err(store_error)?;
        log::info!("Rule updated: {}", rule);
        rules.insert(rule.id.clone(), rule);
        Ok(())
    }

    /// Remove a rule by id
    pub fn delete(&self, id: &str) -> Result<(), RegistryError> {
        let mut rules = self.write();
        if !rules.contains_key(id) {
            return Err(RegistryError::NotFound(id.to_string()));
        }

        self.store.delete(id).map_err(store_error)?;
        log::info!("Rule deleted: {}", id);
        rules.remove(id);
        Ok(())
    }

    /// Number of registered rules
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the registry holds no rules
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Name of the backing store
    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, Rule>> {
        self.rules.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Rule>> {
        self.rules.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Row conflicts found by the store mean another writer got there first
fn store_error(err: StoreError) -> RegistryError {
    match err {
        StoreError::Conflict(id) => RegistryError::DuplicateId(id),
        StoreError::Missing(id) => RegistryError::NotFound(id),
        other => RegistryError::Persistence(other),
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("store", &self.store.name())
            .field("rules", &self.len())
            .finish()
    }
}
