/*!
 * Syscall Types
 * Status codes, information classes, output layouts and faults
 */

pub mod classes;
pub mod errors;
pub mod layouts;
pub mod status;

pub use classes::{KeyInformationClass, KeyValueInformationClass};
pub use errors::EmulationFault;
pub use layouts::{
    KeyHandleTagsInformation, KeyNameInformation, KeyValueBasicInformation, KeyValueFullInformation,
    KeyValuePartialInformation,
};
pub use status::NtStatus;

/// What every handler returns: a guest-visible status or a fault
pub type SyscallOutcome = Result<NtStatus, EmulationFault>;
