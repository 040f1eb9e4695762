/*!
 * Registry Store
 * Instance-wide hierarchical key namespace, seeded once at startup
 */

use ahash::RandomState;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::key::RegistryKey;
use super::path::{self, MACHINE_HIVE, USER_HIVE};
use super::seed::RegistrySeed;
use super::types::*;
use super::value::RegistryValue;

/// Values owned by one key, by exact name
#[derive(Debug, Clone, Default)]
struct KeyEntry {
    values: HashMap<String, RegistryValue, RandomState>,
}

/// Read-side registry namespace
///
/// Keys and values only enter through [`RegistryStoreBuilder`]. After
/// `build` the store is immutable, so it is shared between processes as
/// `Arc<RegistryStore>` without a lock.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    hives: Vec<PathBuf>,
    keys: HashMap<PathBuf, KeyEntry, RandomState>,
}

impl RegistryStore {
    pub fn builder() -> RegistryStoreBuilder {
        RegistryStoreBuilder::new()
    }

    /// Store containing only the default hive roots
    pub fn empty() -> Self {
        let mut store = Self {
            hives: Vec::new(),
            keys: HashMap::default(),
        };
        for hive in [MACHINE_HIVE, USER_HIVE] {
            store.add_hive(Path::new(hive));
        }
        store
    }

    pub fn from_seed(seed: &RegistrySeed) -> RegistryResult<Self> {
        RegistryStoreBuilder::new().seed(seed).build()
    }

    /// Resolve an NT-namespace name to an existing key
    ///
    /// Separator and case variants are tolerated. Win32 root aliases are a
    /// seeding convenience only and do not resolve here.
    pub fn get_key(&self, raw: impl AsRef<Path>) -> Option<RegistryKey> {
        let canonical = path::normalize(&raw.as_ref().to_string_lossy());
        if !self.keys.contains_key(&canonical) {
            return None;
        }
        let (hive, path) = path::split_hive(&canonical, &self.hives)?;
        Some(RegistryKey::new(hive, path))
    }

    /// Exact-name value lookup; the empty name is the key's default value
    pub fn get_value(&self, key: &RegistryKey, name: &str) -> Option<RegistryValue> {
        self.keys
            .get(&key.full_path())
            .and_then(|entry| entry.values.get(name))
            .cloned()
    }

    pub fn contains_key(&self, raw: impl AsRef<Path>) -> bool {
        self.keys.contains_key(&path::normalize(&raw.as_ref().to_string_lossy()))
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub fn hives(&self) -> &[PathBuf] {
        &self.hives
    }

    fn add_hive(&mut self, raw: &Path) {
        let canonical = path::canonicalize(raw);
        if !self.hives.contains(&canonical) {
            self.keys.entry(canonical.clone()).or_default();
            self.hives.push(canonical);
        }
    }

    /// Insert a key and every ancestor up to its hive root
    fn add_key(&mut self, raw: &str) -> RegistryResult<PathBuf> {
        if raw.trim_matches(['\\', '/']).is_empty() {
            return Err(RegistryError::EmptyPath);
        }

        let canonical = path::canonicalize(raw);
        let (hive, _) = path::split_hive(&canonical, &self.hives).ok_or_else(|| {
            RegistryError::UnknownHive {
                path: raw.to_string(),
            }
        })?;

        for ancestor in canonical.ancestors() {
            self.keys.entry(ancestor.to_path_buf()).or_default();
            if ancestor == hive {
                break;
            }
        }
        Ok(canonical)
    }

    fn add_value(&mut self, raw_key: &str, value: RegistryValue) -> RegistryResult<()> {
        let canonical = self.add_key(raw_key)?;
        if let Some(entry) = self.keys.get_mut(&canonical) {
            entry.values.insert(value.name.clone(), value);
        }
        Ok(())
    }
}

impl Default for RegistryStore {
    fn default() -> Self {
        Self::empty()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Accumulates keys and values; the first failure is reported by `build`
#[derive(Debug)]
pub struct RegistryStoreBuilder {
    store: RegistryStore,
    error: Option<RegistryError>,
}

impl RegistryStoreBuilder {
    pub fn new() -> Self {
        Self {
            store: RegistryStore::empty(),
            error: None,
        }
    }

    fn record(&mut self, result: RegistryResult<()>) {
        if let Err(err) = result {
            self.error.get_or_insert(err);
        }
    }

    /// Register an additional hive root
    pub fn hive(mut self, root: impl AsRef<Path>) -> Self {
        self.store.add_hive(root.as_ref());
        self
    }

    /// Seed a key (and its ancestors) with no values
    pub fn key(mut self, path: &str) -> Self {
        let result = self.store.add_key(path).map(|_| ());
        self.record(result);
        self
    }

    /// Seed a value, creating its key if needed
    pub fn value(mut self, key: &str, value: RegistryValue) -> Self {
        let result = self.store.add_value(key, value);
        self.record(result);
        self
    }

    /// Apply every key and value of a seed document
    pub fn seed(mut self, seed: &RegistrySeed) -> Self {
        for key in &seed.keys {
            self = self.key(&key.path);
            for value in &key.values {
                match value.to_value() {
                    Ok(value) => self = self.value(&key.path, value),
                    Err(err) => self.record(Err(err)),
                }
            }
        }
        self
    }

    pub fn build(self) -> RegistryResult<RegistryStore> {
        match self.error {
            Some(err) => Err(err),
            None => {
                debug!(keys = self.store.key_count(), "registry store seeded");
                Ok(self.store)
            }
        }
    }
}

impl Default for RegistryStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
