/*!
 * Registry Seed Tests
 * Loading seed documents and resolving seeded keys from guest code
 */

use crate::fixture::*;
use ntemu_kernel::core::id::Handle;
use ntemu_kernel::registry::{RegistryError, RegistrySeed, RegistryStore, RegistryValue, ValueType};
use ntemu_kernel::syscalls::NtStatus;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

const SEED: &str = r#"{
    "keys": [
        {
            "path": "HKLM\\Software\\Vendor",
            "values": [
                { "name": "Version", "data": { "string": "1.0" } },
                { "name": "Paths", "data": { "multi_string": ["a", "b"] } },
                { "name": "Stamp", "data": { "qword": 1099511627776 } }
            ]
        },
        { "path": "HKCU\\Software\\App" },
        { "path": "\\Registry\\Machine\\System\\CurrentControlSet\\Control" }
    ]
}"#;

#[test]
fn test_seed_creates_keys_and_ancestors() {
    let store = RegistryStore::from_seed(&RegistrySeed::from_json_str(SEED).unwrap()).unwrap();

    assert!(store.contains_key(r"\Registry\Machine\Software\Vendor"));
    assert!(store.contains_key(r"\Registry\Machine\Software"));
    assert!(store.contains_key(r"\Registry\Machine\System\CurrentControlSet"));
    assert!(store.contains_key(r"\Registry\User\.Default\Software\App"));
    assert!(!store.contains_key(r"\Registry\Machine\Software\App"));
}

#[test]
fn test_seeded_values_are_typed() {
    let store = RegistryStore::from_seed(&RegistrySeed::from_json_str(SEED).unwrap()).unwrap();
    let key = store.get_key(r"\Registry\Machine\Software\Vendor").unwrap();

    assert_eq!(
        store.get_value(&key, "Version"),
        Some(RegistryValue::string("Version", "1.0"))
    );

    let paths = store.get_value(&key, "Paths").unwrap();
    assert_eq!(paths.value_type, ValueType::MultiString);
    let mut expected = wide("a");
    expected.extend_from_slice(&[0, 0]);
    expected.extend(wide("b"));
    expected.extend_from_slice(&[0, 0, 0, 0]);
    assert_eq!(paths.data.as_ref(), expected.as_slice());

    let stamp = store.get_value(&key, "Stamp").unwrap();
    assert_eq!(stamp.value_type, ValueType::Qword);
    assert_eq!(stamp.data.as_ref(), &(1u64 << 40).to_le_bytes());
}

#[test]
fn test_seed_file_drives_guest_opens() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SEED.as_bytes()).unwrap();

    let seed = RegistrySeed::from_json_file(file.path()).unwrap();
    let mut guest = Guest::new(RegistryStore::from_seed(&seed).unwrap());

    let (status, _) = guest.open_key(Handle::NULL, r"\Registry\User\.DEFAULT\Software\App");
    assert_eq!(status, NtStatus::SUCCESS);

    let (status, _) = guest.open_key(Handle::NULL, r"HKCU\Software\App");
    assert_eq!(status, NtStatus::OBJECT_NAME_NOT_FOUND);

    let (status, _) = guest.open_key(Handle::NULL, r"\Registry\Machine\Software\Other");
    assert_eq!(status, NtStatus::OBJECT_NAME_NOT_FOUND);
}

#[test]
fn test_seed_outside_any_hive_is_rejected() {
    let seed = RegistrySeed::from_json_str(r#"{ "keys": [ { "path": "\\Software\\Vendor" } ] }"#).unwrap();

    assert!(matches!(
        RegistryStore::from_seed(&seed),
        Err(RegistryError::UnknownHive { .. })
    ));
}

#[test]
fn test_missing_seed_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");

    assert!(matches!(
        RegistrySeed::from_json_file(&missing),
        Err(RegistryError::Io { path, .. }) if path == missing
    ));
}

#[test]
fn test_builder_reports_first_error() {
    let result = RegistryStore::builder()
        .key("")
        .key(r"\Nowhere\Key")
        .build();

    assert!(matches!(result, Err(RegistryError::EmptyPath)));
}
