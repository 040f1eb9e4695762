/*!
 * Emulation Faults
 * Unrecoverable outcomes that stop the emulated CPU
 */

use miette::Diagnostic;
use thiserror::Error;

use super::status::NtStatus;
use crate::core::types::SyscallNumber;
use crate::memory::MemoryError;

/// Something the emulator has no model for
///
/// Handlers return these instead of guessing a plausible status; the run
/// loop stops the CPU and hands the fault to its caller.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum EmulationFault {
    #[error("Unknown syscall number 0x{number:x}")]
    #[diagnostic(
        code(syscalls::unknown),
        help("The number is not in the syscall numbering; check the ntdll exports it was built from.")
    )]
    UnknownSyscall { number: SyscallNumber },

    #[error("Syscall {name} (0x{number:x}) is not implemented")]
    #[diagnostic(code(syscalls::unimplemented))]
    UnimplementedSyscall { number: SyscallNumber, name: String },

    #[error("{syscall}: unsupported information class {class}")]
    #[diagnostic(
        code(syscalls::unsupported_class),
        help("The guest asked for an output shape that is not modeled.")
    )]
    UnsupportedInformationClass { syscall: &'static str, class: u32 },

    #[error("Guest memory fault: {0}")]
    #[diagnostic(transparent)]
    Memory(#[from] MemoryError),
}

impl EmulationFault {
    /// Status left in RAX for the guest before the fault surfaces
    pub fn guest_status(&self) -> Option<NtStatus> {
        match self {
            EmulationFault::UnsupportedInformationClass { .. } => Some(NtStatus::NOT_SUPPORTED),
            _ => None,
        }
    }
}
