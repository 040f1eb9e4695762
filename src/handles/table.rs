/*!
 * Handle Table
 * Per-process map from handle values to emulated kernel objects
 */

use ahash::RandomState;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::object::{Event, KernelObject};
use super::types::*;
use crate::core::id::{Handle, HandleGenerator, IdGenerator, HANDLE_STRIDE};
use crate::registry::RegistryKey;

/// Default first handle value, matching the lowest user handle NT hands out
pub const DEFAULT_FIRST_HANDLE: u64 = 0x4;

/// Handle table owned by one emulated process
///
/// All mutation goes through one coarse lock. Lookups hand out `Arc`
/// clones so a handler may keep using an object while another thread
/// closes its handle.
pub struct HandleTable {
    entries: RwLock<HashMap<Handle, Arc<KernelObject>, RandomState>>,
    generator: HandleGenerator,
}

impl HandleTable {
    pub fn new() -> Self {
        Self::with_first_handle(DEFAULT_FIRST_HANDLE)
    }

    /// Table whose first issued handle is `first_handle`
    ///
    /// Starts that are zero or off the stride round up to the next
    /// non-zero multiple of [`HANDLE_STRIDE`].
    pub fn with_first_handle(first_handle: u64) -> Self {
        let start = first_handle
            .max(HANDLE_STRIDE)
            .checked_next_multiple_of(HANDLE_STRIDE)
            .unwrap_or(HANDLE_STRIDE);
        Self {
            entries: RwLock::new(HashMap::default()),
            generator: HandleGenerator::new(start, HANDLE_STRIDE),
        }
    }

    /// Take ownership of `object` and return a fresh handle for it
    pub fn store(&self, object: impl Into<KernelObject>) -> Handle {
        let object = Arc::new(object.into());
        let mut entries = self.entries.write();
        loop {
            let handle = self.generator.next();
            // Skip NULL and anything still live (only possible after wrapping)
            if handle.is_null() || entries.contains_key(&handle) {
                continue;
            }
            entries.insert(handle, object);
            return handle;
        }
    }

    pub fn get(&self, handle: Handle) -> Option<Arc<KernelObject>> {
        self.entries.read().get(&handle).cloned()
    }

    /// Look up a handle that must refer to a registry key
    pub fn get_registry_key(&self, handle: Handle) -> HandleResult<RegistryKey> {
        let object = self.get(handle).ok_or(HandleError::NotFound(handle))?;
        match object.as_registry_key() {
            Some(key) => Ok(key.clone()),
            None => Err(HandleError::KindMismatch {
                handle,
                expected: ObjectKind::RegistryKey,
                found: object.kind(),
            }),
        }
    }

    /// Look up a handle that must refer to an event
    pub fn get_event(&self, handle: Handle) -> HandleResult<Arc<Event>> {
        let object = self.get(handle).ok_or(HandleError::NotFound(handle))?;
        match &*object {
            KernelObject::Event(event) => Ok(Arc::clone(event)),
            other => Err(HandleError::KindMismatch {
                handle,
                expected: ObjectKind::Event,
                found: other.kind(),
            }),
        }
    }

    /// Release a handle; its value becomes eligible for reuse
    pub fn remove(&self, handle: Handle) -> Option<Arc<KernelObject>> {
        let removed = self.entries.write().remove(&handle);
        if removed.is_some() {
            self.generator.recycle(handle);
        }
        removed
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.entries.read().contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for HandleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HandleTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandleTable")
            .field("live", &self.len())
            .field("next", &self.generator.current())
            .finish()
    }
}
