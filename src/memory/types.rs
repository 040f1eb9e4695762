/*!
 * Memory Types
 * Common types for guest memory access
 */

use miette::Diagnostic;
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Guest memory errors
///
/// Every variant is fatal to the emulation: a guest that hands the kernel an
/// unmapped pointer is corrupt, and there is no status to fabricate for it.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum MemoryError {
    #[error("Unmapped guest memory at 0x{address:x} ({size} bytes)")]
    #[diagnostic(
        code(memory::unmapped),
        help("The guest passed a pointer outside its mapped address space.")
    )]
    Unmapped { address: u64, size: usize },

    #[error("Guest address range wraps: 0x{address:x} + {size} bytes")]
    #[diagnostic(code(memory::address_overflow))]
    AddressOverflow { address: u64, size: usize },

    #[error("String of {length} bytes does not fit a UNICODE_STRING at 0x{address:x}")]
    #[diagnostic(
        code(memory::string_too_long),
        help("Counted strings hold at most 65532 bytes plus a terminator.")
    )]
    StringTooLong { address: u64, length: usize },
}

impl MemoryError {
    /// Guest address the failing access started at
    pub fn address(&self) -> u64 {
        match self {
            MemoryError::Unmapped { address, .. }
            | MemoryError::AddressOverflow { address, .. }
            | MemoryError::StringTooLong { address, .. } => *address,
        }
    }
}
