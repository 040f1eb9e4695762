/*!
 * Kernel Objects
 * The closed set of objects a handle can refer to
 */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::types::ObjectKind;
use crate::registry::RegistryKey;

/// NT `EVENT_TYPE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Manual reset: stays signaled until reset
    Notification,
    /// Auto reset: releases one waiter, then clears
    Synchronization,
}

impl EventType {
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(EventType::Notification),
            1 => Some(EventType::Synchronization),
            _ => None,
        }
    }
}

/// Emulated event object
///
/// Waiting is not modeled; only the signaled flag is tracked.
#[derive(Debug)]
pub struct Event {
    event_type: EventType,
    signaled: AtomicBool,
}

impl Event {
    pub fn new(event_type: EventType, initial_state: bool) -> Self {
        Self {
            event_type,
            signaled: AtomicBool::new(initial_state),
        }
    }

    #[inline]
    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    #[inline]
    pub fn is_signaled(&self) -> bool {
        self.signaled.load(Ordering::Acquire)
    }

    /// Signal the event, returning the previous state
    pub fn set(&self) -> bool {
        self.signaled.swap(true, Ordering::AcqRel)
    }

    /// Clear the event, returning the previous state
    pub fn reset(&self) -> bool {
        self.signaled.swap(false, Ordering::AcqRel)
    }
}

/// Object stored behind a handle
#[derive(Debug)]
pub enum KernelObject {
    RegistryKey(RegistryKey),
    Event(Arc<Event>),
}

impl KernelObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            KernelObject::RegistryKey(_) => ObjectKind::RegistryKey,
            KernelObject::Event(_) => ObjectKind::Event,
        }
    }

    pub fn as_registry_key(&self) -> Option<&RegistryKey> {
        match self {
            KernelObject::RegistryKey(key) => Some(key),
            _ => None,
        }
    }

    pub fn as_event(&self) -> Option<&Event> {
        match self {
            KernelObject::Event(event) => Some(event.as_ref()),
            _ => None,
        }
    }
}

impl From<RegistryKey> for KernelObject {
    fn from(key: RegistryKey) -> Self {
        KernelObject::RegistryKey(key)
    }
}

impl From<Event> for KernelObject {
    fn from(event: Event) -> Self {
        KernelObject::Event(Arc::new(event))
    }
}
