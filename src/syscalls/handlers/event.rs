/*!
 * Event Syscalls
 * Create and signal emulated event objects
 */

use crate::core::id::Handle;
use crate::handles::{Event, EventType};
use crate::memory::{GuestPtr, ObjectAttributes};
use crate::syscalls::context::SyscallContext;
use crate::syscalls::types::*;

/// Named events are not modeled; `object_attributes` is accepted and ignored
pub fn nt_create_event(
    ctx: &mut SyscallContext<'_>,
    event_handle: GuestPtr<Handle>,
    _desired_access: u32,
    _object_attributes: GuestPtr<ObjectAttributes>,
    event_type: u32,
    initial_state: bool,
) -> SyscallOutcome {
    let Some(event_type) = EventType::from_raw(event_type) else {
        return Ok(NtStatus::INVALID_PARAMETER);
    };

    let handle = ctx.handles.store(Event::new(event_type, initial_state));
    if let Err(fault) = ctx.write(event_handle, &handle) {
        ctx.handles.remove(handle);
        return Err(fault);
    }
    Ok(NtStatus::SUCCESS)
}

pub fn nt_set_event(
    ctx: &mut SyscallContext<'_>,
    event_handle: Handle,
    previous_state: GuestPtr<u32>,
) -> SyscallOutcome {
    let Ok(event) = ctx.handles.get_event(event_handle) else {
        return Ok(NtStatus::INVALID_HANDLE);
    };
    let previous = event.set();
    ctx.write_optional(previous_state, &u32::from(previous))?;
    Ok(NtStatus::SUCCESS)
}

pub fn nt_reset_event(
    ctx: &mut SyscallContext<'_>,
    event_handle: Handle,
    previous_state: GuestPtr<u32>,
) -> SyscallOutcome {
    let Ok(event) = ctx.handles.get_event(event_handle) else {
        return Ok(NtStatus::INVALID_HANDLE);
    };
    let previous = event.reset();
    ctx.write_optional(previous_state, &u32::from(previous))?;
    Ok(NtStatus::SUCCESS)
}

pub fn nt_clear_event(ctx: &mut SyscallContext<'_>, event_handle: Handle) -> SyscallOutcome {
    match ctx.handles.get_event(event_handle) {
        Ok(event) => {
            event.reset();
            Ok(NtStatus::SUCCESS)
        }
        Err(_) => Ok(NtStatus::INVALID_HANDLE),
    }
}
