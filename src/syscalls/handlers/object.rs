/*!
 * Object Syscalls
 * Handle lifetime operations common to every object kind
 */

use tracing::trace;

use crate::core::id::Handle;
use crate::syscalls::context::SyscallContext;
use crate::syscalls::types::*;

pub fn nt_close(ctx: &mut SyscallContext<'_>, handle: Handle) -> SyscallOutcome {
    match ctx.handles.remove(handle) {
        Some(object) => {
            trace!(%handle, kind = %object.kind(), "closed handle");
            Ok(NtStatus::SUCCESS)
        }
        None => Ok(NtStatus::INVALID_HANDLE),
    }
}
