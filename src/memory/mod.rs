/*!
 * Memory Marshaling
 * Typed access to the guest address space through the CPU engine
 *
 * Pure address-space I/O: fixed-layout structures, counted UTF-16 strings
 * and raw byte ranges. Nothing here interprets NT semantics.
 */

pub mod layout;
pub mod object;
pub mod sparse;
pub mod strings;
pub mod traits;
pub mod types;

pub use layout::{GuestStruct, ObjectAttributes, UnicodeString};
pub use object::GuestPtr;
pub use sparse::{SparseMemory, PAGE_SIZE};
pub use strings::{decode_utf16, read_unicode_string, read_utf16, utf16_bytes, write_unicode_string};
pub use traits::GuestMemory;
pub use types::{MemoryError, MemoryResult};
