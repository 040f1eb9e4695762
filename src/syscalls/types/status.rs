/*!
 * NT Status Codes
 * The closed status vocabulary handlers return to guest code
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// `NTSTATUS` value as written to the guest's RAX
///
/// A value, never an error: guest code branches on every one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NtStatus(pub u32);

impl NtStatus {
    pub const SUCCESS: NtStatus = NtStatus(0x0000_0000);
    pub const BUFFER_OVERFLOW: NtStatus = NtStatus(0x8000_0005);
    pub const INVALID_HANDLE: NtStatus = NtStatus(0xC000_0008);
    pub const INVALID_PARAMETER: NtStatus = NtStatus(0xC000_000D);
    pub const BUFFER_TOO_SMALL: NtStatus = NtStatus(0xC000_0023);
    pub const OBJECT_NAME_NOT_FOUND: NtStatus = NtStatus(0xC000_0034);
    pub const NOT_SUPPORTED: NtStatus = NtStatus(0xC000_00BB);

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Severity success or informational (`NT_SUCCESS`)
    #[inline]
    pub const fn is_success(self) -> bool {
        (self.0 as i32) >= 0
    }

    #[inline]
    pub const fn is_warning(self) -> bool {
        self.0 >> 30 == 0b10
    }

    #[inline]
    pub const fn is_error(self) -> bool {
        self.0 >> 30 == 0b11
    }

    /// Zero-extended register image
    #[inline]
    pub const fn to_register(self) -> u64 {
        self.0 as u64
    }

    pub const fn name(self) -> Option<&'static str> {
        match self {
            NtStatus::SUCCESS => Some("STATUS_SUCCESS"),
            NtStatus::BUFFER_OVERFLOW => Some("STATUS_BUFFER_OVERFLOW"),
            NtStatus::INVALID_HANDLE => Some("STATUS_INVALID_HANDLE"),
            NtStatus::INVALID_PARAMETER => Some("STATUS_INVALID_PARAMETER"),
            NtStatus::BUFFER_TOO_SMALL => Some("STATUS_BUFFER_TOO_SMALL"),
            NtStatus::OBJECT_NAME_NOT_FOUND => Some("STATUS_OBJECT_NAME_NOT_FOUND"),
            NtStatus::NOT_SUPPORTED => Some("STATUS_NOT_SUPPORTED"),
            _ => None,
        }
    }
}

impl fmt::Display for NtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} (0x{:08x})", self.0),
            None => write!(f, "0x{:08x}", self.0),
        }
    }
}
