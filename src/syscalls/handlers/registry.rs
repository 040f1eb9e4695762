/*!
 * Registry Syscalls
 * Open and query handlers over the registry store
 *
 * Every information-class query follows the same size negotiation: the
 * required size is always written to `result_length`, then the payload is
 * written only as far as the caller's buffer allows.
 */

use bytes::BytesMut;
use tracing::{debug, warn};

use crate::core::id::Handle;
use crate::core::types::GuestAddress;
use crate::memory::{utf16_bytes, GuestPtr, GuestStruct, ObjectAttributes, UnicodeString};
use crate::registry::{self, RegistryKey};
use crate::syscalls::args::In;
use crate::syscalls::context::SyscallContext;
use crate::syscalls::types::*;

/// Resolve a key handle; any lookup failure is `STATUS_INVALID_HANDLE`
fn key_for(ctx: &SyscallContext<'_>, handle: Handle) -> Option<RegistryKey> {
    ctx.handles.get_registry_key(handle).ok()
}

// ============================================================================
// Open
// ============================================================================

pub fn nt_open_key(
    ctx: &mut SyscallContext<'_>,
    key_handle: GuestPtr<Handle>,
    _desired_access: u32,
    object_attributes: In<ObjectAttributes>,
) -> SyscallOutcome {
    open_key(ctx, key_handle, object_attributes)
}

pub fn nt_open_key_ex(
    ctx: &mut SyscallContext<'_>,
    key_handle: GuestPtr<Handle>,
    _desired_access: u32,
    object_attributes: In<ObjectAttributes>,
    _open_options: u32,
) -> SyscallOutcome {
    open_key(ctx, key_handle, object_attributes)
}

fn open_key(
    ctx: &mut SyscallContext<'_>,
    key_handle: GuestPtr<Handle>,
    object_attributes: In<ObjectAttributes>,
) -> SyscallOutcome {
    let Some(attributes) = object_attributes.into_inner() else {
        return Ok(NtStatus::INVALID_PARAMETER);
    };
    let name = ctx.read_unicode_string(attributes.object_name)?;

    let target = if attributes.root_directory.is_null() {
        registry::normalize(&name)
    } else {
        match key_for(ctx, attributes.root_directory) {
            Some(parent) => parent.join(&name),
            None => return Ok(NtStatus::INVALID_HANDLE),
        }
    };

    debug!(key = %target.display(), "opening registry key");

    let Some(key) = ctx.registry.get_key(&target) else {
        return Ok(NtStatus::OBJECT_NAME_NOT_FOUND);
    };

    let handle = ctx.handles.store(key);
    if let Err(fault) = ctx.write(key_handle, &handle) {
        ctx.handles.remove(handle);
        return Err(fault);
    }
    Ok(NtStatus::SUCCESS)
}

// ============================================================================
// Key information
// ============================================================================

pub fn nt_query_key(
    ctx: &mut SyscallContext<'_>,
    key_handle: Handle,
    class: u32,
    information: GuestAddress,
    length: u32,
    result_length: GuestPtr<u32>,
) -> SyscallOutcome {
    let Some(key) = key_for(ctx, key_handle) else {
        return Ok(NtStatus::INVALID_HANDLE);
    };
    let length = length as usize;

    match KeyInformationClass::from_raw(class) {
        Some(KeyInformationClass::Name) => {
            let name = utf16_bytes(&key.nt_name());
            let required = KeyNameInformation::required_size(name.len());
            ctx.write(result_length, &(required as u32))?;
            if required > length {
                return Ok(NtStatus::BUFFER_TOO_SMALL);
            }

            let header = KeyNameInformation {
                name_length: name.len() as u32,
            };
            let base = GuestPtr::<KeyNameInformation>::new(information);
            ctx.write(base, &header)?;
            ctx.write_bytes(base.byte_offset(KeyNameInformation::NAME_OFFSET), &name)?;
            Ok(NtStatus::SUCCESS)
        }
        Some(KeyInformationClass::HandleTags) => {
            let required = KeyHandleTagsInformation::SIZE;
            ctx.write(result_length, &(required as u32))?;
            if required > length {
                return Ok(NtStatus::BUFFER_TOO_SMALL);
            }

            // Placeholder: tags are not tracked per handle
            let info = KeyHandleTagsInformation { handle_tags: 0 };
            ctx.write(GuestPtr::new(information), &info)?;
            Ok(NtStatus::SUCCESS)
        }
        Some(KeyInformationClass::Full) => Ok(NtStatus::NOT_SUPPORTED),
        _ => {
            warn!(class, key = %key, "unsupported registry key information class");
            Err(EmulationFault::UnsupportedInformationClass {
                syscall: "NtQueryKey",
                class,
            })
        }
    }
}

// ============================================================================
// Value information
// ============================================================================

pub fn nt_query_value_key(
    ctx: &mut SyscallContext<'_>,
    key_handle: Handle,
    value_name: GuestPtr<UnicodeString>,
    class: u32,
    information: GuestAddress,
    length: u32,
    result_length: GuestPtr<u32>,
) -> SyscallOutcome {
    let Some(key) = key_for(ctx, key_handle) else {
        return Ok(NtStatus::INVALID_HANDLE);
    };
    let name = ctx.read_unicode_string(value_name)?;
    let Some(value) = ctx.registry.get_value(&key, &name) else {
        return Ok(NtStatus::OBJECT_NAME_NOT_FOUND);
    };

    let name_bytes = utf16_bytes(&value.name);
    let value_type = value.value_type.as_raw();

    let (header, trailing): (BytesMut, Vec<u8>) = match KeyValueInformationClass::from_raw(class) {
        Some(KeyValueInformationClass::Basic) => {
            let header = KeyValueBasicInformation {
                title_index: 0,
                value_type,
                name_length: name_bytes.len() as u32,
            };
            (header.to_guest_bytes(), name_bytes)
        }
        Some(KeyValueInformationClass::Partial) => {
            let header = KeyValuePartialInformation {
                title_index: 0,
                value_type,
                data_length: value.data_len() as u32,
            };
            (header.to_guest_bytes(), value.data.to_vec())
        }
        Some(KeyValueInformationClass::Full) => {
            let header = KeyValueFullInformation {
                title_index: 0,
                value_type,
                data_offset: (KeyValueFullInformation::SIZE + name_bytes.len()) as u32,
                data_length: value.data_len() as u32,
                name_length: name_bytes.len() as u32,
            };
            let mut trailing = name_bytes;
            trailing.extend_from_slice(&value.data);
            (header.to_guest_bytes(), trailing)
        }
        _ => {
            warn!(class, key = %key, value = %name, "unsupported registry value information class");
            return Err(EmulationFault::UnsupportedInformationClass {
                syscall: "NtQueryValueKey",
                class,
            });
        }
    };

    let length = length as usize;
    let required = header.len() + trailing.len();
    ctx.write(result_length, &(required as u32))?;

    // The header goes out whenever it fits, even if the payload does not
    if header.len() <= length {
        ctx.write_bytes(information, &header)?;
    }
    if required > length {
        return Ok(NtStatus::BUFFER_OVERFLOW);
    }

    ctx.write_bytes(information + header.len() as u64, &trailing)?;
    Ok(NtStatus::SUCCESS)
}

// ============================================================================
// Unsupported mutations and notifications
// ============================================================================

pub fn nt_create_key(_ctx: &mut SyscallContext<'_>) -> SyscallOutcome {
    Ok(NtStatus::NOT_SUPPORTED)
}

pub fn nt_set_information_key(_ctx: &mut SyscallContext<'_>) -> SyscallOutcome {
    Ok(NtStatus::NOT_SUPPORTED)
}

pub fn nt_enumerate_key(_ctx: &mut SyscallContext<'_>) -> SyscallOutcome {
    Ok(NtStatus::NOT_SUPPORTED)
}

/// Change notification is not modeled; the guest is told the watch is armed
pub fn nt_notify_change_key(_ctx: &mut SyscallContext<'_>) -> SyscallOutcome {
    Ok(NtStatus::SUCCESS)
}
