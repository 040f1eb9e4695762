/*!
 * Handle Types
 * Object kinds and lookup errors for the handle table
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::core::id::Handle;

/// Handle table result
pub type HandleResult<T> = Result<T, HandleError>;

/// Tag for each emulated kernel object kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    RegistryKey,
    Event,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::RegistryKey => write!(f, "registry key"),
            ObjectKind::Event => write!(f, "event"),
        }
    }
}

/// Handle lookup failures
///
/// Both variants map to `STATUS_INVALID_HANDLE` at the syscall boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum HandleError {
    #[error("Handle {0} not found")]
    #[diagnostic(code(handles::not_found))]
    NotFound(Handle),

    #[error("Handle {handle} refers to a {found}, expected a {expected}")]
    #[diagnostic(code(handles::kind_mismatch))]
    KindMismatch {
        handle: Handle,
        expected: ObjectKind,
        found: ObjectKind,
    },
}

impl HandleError {
    pub fn handle(&self) -> Handle {
        match self {
            HandleError::NotFound(handle) | HandleError::KindMismatch { handle, .. } => *handle,
        }
    }
}
