/*!
 * Registry Key References
 * Hive plus path identity of an open key
 */

use std::fmt;
use std::path::PathBuf;

use super::path;

/// Identity of a registry key as held by a handle
///
/// Holds a copy of the key's location, never a reference into the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistryKey {
    pub hive: PathBuf,
    pub path: PathBuf,
}

impl RegistryKey {
    pub fn new(hive: impl Into<PathBuf>, path: impl Into<PathBuf>) -> Self {
        Self {
            hive: hive.into(),
            path: path.into(),
        }
    }

    /// Canonical store identity: `hive` joined with `path`
    pub fn full_path(&self) -> PathBuf {
        if self.path.as_os_str().is_empty() {
            self.hive.clone()
        } else {
            self.hive.join(&self.path)
        }
    }

    /// Canonical identity of `relative` opened beneath this key
    ///
    /// The result always lies beneath this key; `..` is not a way up.
    pub fn join(&self, relative: &str) -> PathBuf {
        path::join(&self.full_path(), relative)
    }

    /// Name reported by `KeyNameInformation`
    pub fn nt_name(&self) -> String {
        path::nt_name(&self.full_path())
    }

    #[inline]
    pub fn is_hive_root(&self) -> bool {
        self.path.as_os_str().is_empty()
    }
}

impl fmt::Display for RegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&path::nt_name(&self.full_path()))
    }
}
