/*!
 * NtQueryKey Tests
 * Name and handle-tag classes with size negotiation
 */

use crate::fixture::*;
use ntemu_kernel::core::id::Handle;
use ntemu_kernel::cpu::{CpuRegisters, Register};
use ntemu_kernel::handles::{Event, EventType};
use ntemu_kernel::syscalls::{EmulationFault, KeyInformationClass, NtStatus};
use pretty_assertions::assert_eq;

const VENDOR_NT_NAME: &str = r"\REGISTRY\MACHINE\SOFTWARE\VENDOR";

/// `8 + byte length of the name - 1`
fn name_required(name: &str) -> u32 {
    (8 + wide(name).len() - 1) as u32
}

fn query_key(guest: &mut Guest, handle: Handle, class: u32, length: u32) -> (NtStatus, u64, u64) {
    let information = guest.alloc(u64::from(length.max(8)) + 16);
    let result_length = guest.alloc(4);
    let status = guest
        .syscall(
            NT_QUERY_KEY,
            &[handle.value(), u64::from(class), information, u64::from(length), result_length],
        )
        .unwrap();
    (status, information, result_length)
}

#[test]
fn test_key_name_information() {
    let mut guest = Guest::vendor();
    let (_, key) = guest.open_key(Handle::NULL, r"\Registry\Machine\Software\Vendor");

    let (status, information, result_length) =
        query_key(&mut guest, key, KeyInformationClass::Name as u32, 256);

    assert_eq!(status, NtStatus::SUCCESS);
    let name = wide(VENDOR_NT_NAME);
    assert_eq!(guest.read_u32(result_length), name_required(VENDOR_NT_NAME));
    assert_eq!(guest.read_u32(information), name.len() as u32);
    assert_eq!(guest.read_bytes(information + 4, name.len()), name);
}

#[test]
fn test_key_name_is_normalized_regardless_of_open_spelling() {
    let mut guest = Guest::vendor();
    let (_, key) = guest.open_key(Handle::NULL, r"hklm/software\VENDOR\");

    let (status, information, _) = query_key(&mut guest, key, KeyInformationClass::Name as u32, 256);

    assert_eq!(status, NtStatus::SUCCESS);
    let name = wide(VENDOR_NT_NAME);
    assert_eq!(guest.read_bytes(information + 4, name.len()), name);
}

#[test]
fn test_key_name_too_small_reports_required_size() {
    let mut guest = Guest::vendor();
    let (_, key) = guest.open_key(Handle::NULL, r"\Registry\Machine\Software\Vendor");
    let required = name_required(VENDOR_NT_NAME);

    let (status, information, result_length) =
        query_key(&mut guest, key, KeyInformationClass::Name as u32, required - 1);

    assert_eq!(status, NtStatus::BUFFER_TOO_SMALL);
    assert_eq!(guest.read_u32(result_length), required);
    // Nothing is written to the buffer
    assert_eq!(guest.read_u32(information), 0);
}

#[test]
fn test_key_name_zero_length_reports_size() {
    let mut guest = Guest::vendor();
    let (_, key) = guest.open_key(Handle::NULL, r"\Registry\Machine");

    let (status, _, result_length) = query_key(&mut guest, key, KeyInformationClass::Name as u32, 0);

    assert_eq!(status, NtStatus::BUFFER_TOO_SMALL);
    assert_eq!(guest.read_u32(result_length), name_required(r"\REGISTRY\MACHINE"));
}

#[test]
fn test_key_name_exact_fit() {
    let mut guest = Guest::vendor();
    let (_, key) = guest.open_key(Handle::NULL, r"\Registry\Machine\Software\Vendor");
    let required = name_required(VENDOR_NT_NAME);

    let (status, _, result_length) = query_key(&mut guest, key, KeyInformationClass::Name as u32, required);

    assert_eq!(status, NtStatus::SUCCESS);
    assert_eq!(guest.read_u32(result_length), required);
}

#[test]
fn test_handle_tags_placeholder() {
    let mut guest = Guest::vendor();
    let (_, key) = guest.open_key(Handle::NULL, r"\Registry\Machine\Software\Vendor");

    let (status, information, result_length) =
        query_key(&mut guest, key, KeyInformationClass::HandleTags as u32, 4);
    assert_eq!(status, NtStatus::SUCCESS);
    assert_eq!(guest.read_u32(result_length), 4);
    assert_eq!(guest.read_u32(information), 0);

    let (status, _, result_length) = query_key(&mut guest, key, KeyInformationClass::HandleTags as u32, 2);
    assert_eq!(status, NtStatus::BUFFER_TOO_SMALL);
    assert_eq!(guest.read_u32(result_length), 4);
}

#[test]
fn test_full_information_not_supported() {
    let mut guest = Guest::vendor();
    let (_, key) = guest.open_key(Handle::NULL, r"\Registry\Machine\Software\Vendor");

    let (status, _, _) = query_key(&mut guest, key, KeyInformationClass::Full as u32, 256);

    assert_eq!(status, NtStatus::NOT_SUPPORTED);
}

#[test]
fn test_unsupported_class_faults_with_not_supported_in_rax() {
    let mut guest = Guest::vendor();
    let (_, key) = guest.open_key(Handle::NULL, r"\Registry\Machine\Software\Vendor");
    let information = guest.alloc(64);
    let result_length = guest.alloc(4);

    let outcome = guest.syscall(
        NT_QUERY_KEY,
        &[key.value(), KeyInformationClass::Basic as u64, information, 64, result_length],
    );

    assert_eq!(
        outcome,
        Err(EmulationFault::UnsupportedInformationClass {
            syscall: "NtQueryKey",
            class: KeyInformationClass::Basic as u32,
        })
    );
    assert_eq!(
        guest.cpu.read_register(Register::Rax),
        NtStatus::NOT_SUPPORTED.to_register()
    );
}

#[test]
fn test_query_unknown_handle_is_invalid_handle() {
    let mut guest = Guest::vendor();

    let (status, _, result_length) =
        query_key(&mut guest, Handle(0x40), KeyInformationClass::Name as u32, 256);

    assert_eq!(status, NtStatus::INVALID_HANDLE);
    assert_eq!(guest.read_u32(result_length), 0);
}

#[test]
fn test_query_event_handle_is_invalid_handle() {
    let mut guest = Guest::vendor();
    let event = guest
        .handles
        .store(Event::new(EventType::Synchronization, true));

    let (status, _, _) = query_key(&mut guest, event, KeyInformationClass::Name as u32, 256);

    assert_eq!(status, NtStatus::INVALID_HANDLE);
}

#[test]
fn test_query_after_close_is_invalid_handle() {
    let mut guest = Guest::vendor();
    let (_, key) = guest.open_key(Handle::NULL, r"\Registry\Machine\Software\Vendor");

    let status = guest.syscall(NT_CLOSE, &[key.value()]).unwrap();
    assert_eq!(status, NtStatus::SUCCESS);

    let (status, _, _) = query_key(&mut guest, key, KeyInformationClass::Name as u32, 256);
    assert_eq!(status, NtStatus::INVALID_HANDLE);
}
