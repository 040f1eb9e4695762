/*!
 * Syscalls Module
 * NT system call interception: numbering, dispatch and handlers
 */

pub mod args;
pub mod context;
pub mod dispatcher;
pub mod handler;
pub mod handlers;
pub mod numbering;
pub mod types;

// Re-export public API
pub use args::{In, SyscallArg};
pub use context::SyscallContext;
pub use dispatcher::{read_arguments, syscall_number, Dispatcher};
pub use handler::{HandlerDescriptor, SyscallHandlerFn, SyscallTable};
pub use numbering::SyscallNumbering;
pub use types::{
    EmulationFault, KeyInformationClass, KeyValueInformationClass, NtStatus, SyscallOutcome,
};
