/*!
 * Handle Management
 * Opaque per-process references to emulated kernel objects
 */

pub mod object;
pub mod table;
pub mod types;

pub use object::{Event, EventType, KernelObject};
pub use table::{HandleTable, DEFAULT_FIRST_HANDLE};
pub use types::{HandleError, HandleResult, ObjectKind};
