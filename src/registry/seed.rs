/*!
 * Registry Seed Files
 * JSON description of the keys and values present at emulator start
 */

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::types::*;
use super::value::{RegistryValue, ValueType};

/// Top-level seed document
///
/// ```json
/// { "keys": [ { "path": "HKLM\\Software\\Vendor",
///               "values": [ { "name": "Version", "data": { "string": "1.0" } } ] } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySeed {
    #[serde(default)]
    pub keys: Vec<SeedKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedKey {
    pub path: String,
    #[serde(default)]
    pub values: Vec<SeedValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedValue {
    pub name: String,
    /// Overrides the tag implied by `data`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueType>,
    pub data: SeedData,
}

/// Value payload, tagged by encoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedData {
    String(String),
    ExpandString(String),
    MultiString(Vec<String>),
    Dword(u32),
    Qword(u64),
    Binary(Vec<u8>),
}

impl SeedValue {
    /// Build the stored value
    pub fn to_value(&self) -> RegistryResult<RegistryValue> {
        let value = match &self.data {
            SeedData::String(text) => RegistryValue::string(&self.name, text),
            SeedData::ExpandString(text) => RegistryValue::expand_string(&self.name, text),
            SeedData::MultiString(items) => RegistryValue::multi_string(&self.name, items),
            SeedData::Dword(number) => RegistryValue::dword(&self.name, *number),
            SeedData::Qword(number) => RegistryValue::qword(&self.name, *number),
            SeedData::Binary(bytes) => RegistryValue::binary(&self.name, Bytes::from(bytes.clone())),
        };

        match self.value_type {
            Some(ValueType::Dword) if value.data_len() != 4 => Err(RegistryError::InvalidValueData {
                name: self.name.clone(),
                reason: format!("REG_DWORD needs 4 bytes, got {}", value.data_len()),
            }),
            Some(ValueType::Qword) if value.data_len() != 8 => Err(RegistryError::InvalidValueData {
                name: self.name.clone(),
                reason: format!("REG_QWORD needs 8 bytes, got {}", value.data_len()),
            }),
            Some(value_type) => Ok(RegistryValue {
                value_type,
                ..value
            }),
            None => Ok(value),
        }
    }
}

impl RegistrySeed {
    pub fn from_json_str(json: &str) -> RegistryResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}
