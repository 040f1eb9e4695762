/*!
 * Registry Values
 * Named, typed byte payloads held by a key
 */

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::memory::utf16_bytes;

/// NT registry value type tag (`REG_*`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum ValueType {
    None = 0,
    String = 1,
    ExpandString = 2,
    Binary = 3,
    Dword = 4,
    DwordBigEndian = 5,
    Link = 6,
    MultiString = 7,
    ResourceList = 8,
    FullResourceDescriptor = 9,
    ResourceRequirementsList = 10,
    Qword = 11,
}

impl ValueType {
    #[inline]
    pub const fn as_raw(self) -> u32 {
        self as u32
    }

    pub fn from_raw(raw: u32) -> Option<Self> {
        Some(match raw {
            0 => ValueType::None,
            1 => ValueType::String,
            2 => ValueType::ExpandString,
            3 => ValueType::Binary,
            4 => ValueType::Dword,
            5 => ValueType::DwordBigEndian,
            6 => ValueType::Link,
            7 => ValueType::MultiString,
            8 => ValueType::ResourceList,
            9 => ValueType::FullResourceDescriptor,
            10 => ValueType::ResourceRequirementsList,
            11 => ValueType::Qword,
            _ => return None,
        })
    }
}

/// One value under a registry key
///
/// `data` is exactly what a query returns; string encodings are chosen by
/// the constructor and never re-derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryValue {
    pub name: String,
    pub value_type: ValueType,
    pub data: Bytes,
}

impl RegistryValue {
    pub fn new(name: impl Into<String>, value_type: ValueType, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            value_type,
            data: data.into(),
        }
    }

    /// `REG_SZ` holding exactly the UTF-16 characters of `value`
    pub fn string(name: impl Into<String>, value: &str) -> Self {
        Self::new(name, ValueType::String, utf16_bytes(value))
    }

    /// `REG_SZ` with a terminating NUL counted in the data
    pub fn string_with_nul(name: impl Into<String>, value: &str) -> Self {
        let mut data = utf16_bytes(value);
        data.extend_from_slice(&[0, 0]);
        Self::new(name, ValueType::String, data)
    }

    pub fn expand_string(name: impl Into<String>, value: &str) -> Self {
        Self::new(name, ValueType::ExpandString, utf16_bytes(value))
    }

    /// `REG_MULTI_SZ`: each string NUL terminated, then a final NUL
    pub fn multi_string<S: AsRef<str>>(name: impl Into<String>, values: &[S]) -> Self {
        let mut data = Vec::new();
        for value in values {
            data.extend(utf16_bytes(value.as_ref()));
            data.extend_from_slice(&[0, 0]);
        }
        data.extend_from_slice(&[0, 0]);
        Self::new(name, ValueType::MultiString, data)
    }

    pub fn dword(name: impl Into<String>, value: u32) -> Self {
        Self::new(name, ValueType::Dword, value.to_le_bytes().to_vec())
    }

    pub fn qword(name: impl Into<String>, value: u64) -> Self {
        Self::new(name, ValueType::Qword, value.to_le_bytes().to_vec())
    }

    pub fn binary(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self::new(name, ValueType::Binary, data)
    }

    #[inline]
    pub fn data_len(&self) -> usize {
        self.data.len()
    }
}
