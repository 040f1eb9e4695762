/*!
 * NtQueryValueKey Tests
 * Basic, partial and full value classes; overflow and lookup failures
 */

use crate::fixture::*;
use ntemu_kernel::core::id::Handle;
use ntemu_kernel::cpu::{CpuRegisters, Register};
use ntemu_kernel::registry::ValueType;
use ntemu_kernel::syscalls::{EmulationFault, KeyValueInformationClass, NtStatus};
use pretty_assertions::assert_eq;

struct Query {
    status: NtStatus,
    information: u64,
    result_length: u32,
}

fn query_value(guest: &mut Guest, key: Handle, name: &str, class: KeyValueInformationClass, length: u32) -> Query {
    let value_name = guest.unicode_string(name);
    let information = guest.alloc(u64::from(length.max(8)) + 16);
    let result_length = guest.alloc(4);
    let status = guest
        .syscall(
            NT_QUERY_VALUE_KEY,
            &[
                key.value(),
                value_name.address(),
                class as u64,
                information,
                u64::from(length),
                result_length,
            ],
        )
        .unwrap();
    Query {
        status,
        information,
        result_length: guest.read_u32(result_length),
    }
}

fn open_vendor(guest: &mut Guest) -> Handle {
    let (status, key) = guest.open_key(Handle::NULL, r"\Registry\Machine\Software\Vendor");
    assert_eq!(status, NtStatus::SUCCESS);
    key
}

#[test]
fn test_partial_information_returns_raw_data() {
    let mut guest = Guest::vendor();
    let key = open_vendor(&mut guest);

    let query = query_value(&mut guest, key, "Version", KeyValueInformationClass::Partial, 64);

    assert_eq!(query.status, NtStatus::SUCCESS);
    assert_eq!(query.result_length, 12 + 6);
    assert_eq!(guest.read_u32(query.information), 0);
    assert_eq!(guest.read_u32(query.information + 4), ValueType::String.as_raw());
    assert_eq!(guest.read_u32(query.information + 8), 6);
    assert_eq!(guest.read_bytes(query.information + 12, 6), wide("1.0"));
}

#[test]
fn test_basic_information_returns_name() {
    let mut guest = Guest::vendor();
    let key = open_vendor(&mut guest);

    let query = query_value(&mut guest, key, "Version", KeyValueInformationClass::Basic, 64);

    assert_eq!(query.status, NtStatus::SUCCESS);
    assert_eq!(query.result_length, 12 + 14);
    assert_eq!(guest.read_u32(query.information + 4), ValueType::String.as_raw());
    assert_eq!(guest.read_u32(query.information + 8), 14);
    assert_eq!(guest.read_bytes(query.information + 12, 14), wide("Version"));
}

#[test]
fn test_full_information_returns_name_then_data() {
    let mut guest = Guest::vendor();
    let key = open_vendor(&mut guest);

    let query = query_value(&mut guest, key, "Build", KeyValueInformationClass::Full, 64);

    assert_eq!(query.status, NtStatus::SUCCESS);
    let name_len = wide("Build").len() as u32;
    let data_offset = 20 + name_len;
    assert_eq!(query.result_length, data_offset + 4);

    let info = query.information;
    assert_eq!(guest.read_u32(info + 4), ValueType::Dword.as_raw());
    assert_eq!(guest.read_u32(info + 8), data_offset);
    assert_eq!(guest.read_u32(info + 12), 4);
    assert_eq!(guest.read_u32(info + 16), name_len);
    assert_eq!(guest.read_bytes(info + 20, name_len as usize), wide("Build"));
    assert_eq!(guest.read_u32(info + u64::from(data_offset)), 7);
}

#[test]
fn test_overflow_writes_header_only() {
    let mut guest = Guest::vendor();
    let key = open_vendor(&mut guest);

    let query = query_value(&mut guest, key, "Version", KeyValueInformationClass::Partial, 12);

    assert_eq!(query.status, NtStatus::BUFFER_OVERFLOW);
    assert!(query.status.is_warning());
    assert_eq!(query.result_length, 18);
    assert_eq!(guest.read_u32(query.information + 8), 6);
    assert_eq!(guest.read_bytes(query.information + 12, 6), vec![0; 6]);
}

#[test]
fn test_overflow_smaller_than_header_writes_nothing() {
    let mut guest = Guest::vendor();
    let key = open_vendor(&mut guest);

    let query = query_value(&mut guest, key, "Version", KeyValueInformationClass::Partial, 8);

    assert_eq!(query.status, NtStatus::BUFFER_OVERFLOW);
    assert_eq!(query.result_length, 18);
    assert_eq!(guest.read_bytes(query.information, 12), vec![0; 12]);
}

#[test]
fn test_zero_length_reports_required_size() {
    let mut guest = Guest::vendor();
    let key = open_vendor(&mut guest);

    for (class, required) in [
        (KeyValueInformationClass::Basic, 12 + 14),
        (KeyValueInformationClass::Partial, 12 + 6),
        (KeyValueInformationClass::Full, 20 + 14 + 6),
    ] {
        let query = query_value(&mut guest, key, "Version", class, 0);
        assert_eq!(query.status, NtStatus::BUFFER_OVERFLOW, "{class:?}");
        assert_eq!(query.result_length, required, "{class:?}");
    }
}

#[test]
fn test_default_value_by_empty_name() {
    let mut guest = Guest::vendor();
    let key = open_vendor(&mut guest);

    let query = query_value(&mut guest, key, "", KeyValueInformationClass::Partial, 64);

    assert_eq!(query.status, NtStatus::SUCCESS);
    assert_eq!(guest.read_bytes(query.information + 12, 14), wide("default"));
}

#[test]
fn test_missing_value_is_not_found() {
    let mut guest = Guest::vendor();
    let key = open_vendor(&mut guest);

    for class in [
        KeyValueInformationClass::Basic,
        KeyValueInformationClass::Partial,
        KeyValueInformationClass::Full,
        KeyValueInformationClass::PartialAlign64,
    ] {
        let query = query_value(&mut guest, key, "Missing", class, 64);

        assert_eq!(query.status, NtStatus::OBJECT_NAME_NOT_FOUND, "{class:?}");
        assert_eq!(query.result_length, 0, "{class:?}");
    }
}

#[test]
fn test_value_names_match_exactly() {
    let mut guest = Guest::vendor();
    let key = open_vendor(&mut guest);

    let query = query_value(&mut guest, key, "version", KeyValueInformationClass::Partial, 64);

    assert_eq!(query.status, NtStatus::OBJECT_NAME_NOT_FOUND);
}

#[test]
fn test_values_belong_to_their_own_key() {
    let mut guest = Guest::vendor();
    let (_, plugins) = guest.open_key(Handle::NULL, r"\Registry\Machine\Software\Vendor\Plugins");

    let query = query_value(&mut guest, plugins, "Version", KeyValueInformationClass::Partial, 64);
    assert_eq!(query.status, NtStatus::OBJECT_NAME_NOT_FOUND);

    let query = query_value(&mut guest, plugins, "Blob", KeyValueInformationClass::Partial, 64);
    assert_eq!(query.status, NtStatus::SUCCESS);
    assert_eq!(guest.read_u32(query.information + 4), ValueType::Binary.as_raw());
    assert_eq!(guest.read_bytes(query.information + 12, 2), vec![0xde, 0xad]);
}

#[test]
fn test_unknown_key_handle_is_invalid_handle() {
    let mut guest = Guest::vendor();

    let query = query_value(&mut guest, Handle(0x44), "Version", KeyValueInformationClass::Partial, 64);

    assert_eq!(query.status, NtStatus::INVALID_HANDLE);
}

#[test]
fn test_unsupported_value_class_is_a_fault() {
    let mut guest = Guest::vendor();
    let key = open_vendor(&mut guest);
    let value_name = guest.unicode_string("Version");
    let information = guest.alloc(64);
    let result_length = guest.alloc(4);

    let outcome = guest.syscall(
        NT_QUERY_VALUE_KEY,
        &[
            key.value(),
            value_name.address(),
            KeyValueInformationClass::PartialAlign64 as u64,
            information,
            64,
            result_length,
        ],
    );

    assert_eq!(
        outcome,
        Err(EmulationFault::UnsupportedInformationClass {
            syscall: "NtQueryValueKey",
            class: KeyValueInformationClass::PartialAlign64 as u32,
        })
    );
    assert_eq!(
        guest.cpu.read_register(Register::Rax),
        NtStatus::NOT_SUPPORTED.to_register()
    );
}

#[test]
fn test_unmapped_value_name_is_a_fault() {
    let mut guest = Guest::vendor();
    let key = open_vendor(&mut guest);
    let information = guest.alloc(64);
    let result_length = guest.alloc(4);

    let outcome = guest.syscall(
        NT_QUERY_VALUE_KEY,
        &[
            key.value(),
            0xdead_0000,
            KeyValueInformationClass::Partial as u64,
            information,
            64,
            result_length,
        ],
    );

    assert!(matches!(outcome, Err(EmulationFault::Memory(_))));
}

#[test]
fn test_sizing_then_exact_length_succeeds() {
    let mut guest = Guest::vendor();
    let key = open_vendor(&mut guest);

    for class in [
        KeyValueInformationClass::Basic,
        KeyValueInformationClass::Partial,
        KeyValueInformationClass::Full,
    ] {
        let sizing = query_value(&mut guest, key, "Version", class, 0);
        let query = query_value(&mut guest, key, "Version", class, sizing.result_length);

        assert_eq!(query.status, NtStatus::SUCCESS, "{class:?}");
        assert_eq!(query.result_length, sizing.result_length, "{class:?}");

        let info = query.information;
        let name = wide("Version");
        let data = wide("1.0");
        match class {
            KeyValueInformationClass::Basic => {
                assert_eq!(guest.read_u32(info + 8), name.len() as u32);
                assert_eq!(guest.read_bytes(info + 12, name.len()), name);
                assert_eq!(query.result_length as usize, 12 + name.len());
            }
            KeyValueInformationClass::Full => {
                let data_offset = guest.read_u32(info + 8);
                let data_length = guest.read_u32(info + 12);
                let name_length = guest.read_u32(info + 16);
                assert_eq!(name_length as usize, name.len());
                assert_eq!(data_length as usize, data.len());
                assert_eq!(data_offset as usize, 20 + name.len());
                assert_eq!(guest.read_bytes(info + 20, name.len()), name);
                assert_eq!(guest.read_bytes(info + u64::from(data_offset), data.len()), data);
                assert_eq!(query.result_length, data_offset + data_length);
            }
            _ => {
                assert_eq!(guest.read_u32(info + 8), data.len() as u32);
                assert_eq!(guest.read_bytes(info + 12, data.len()), data);
            }
        }
    }
}
