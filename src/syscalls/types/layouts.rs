/*!
 * Query Output Layouts
 * Fixed headers of the key and value information structures
 *
 * Each header is followed in guest memory by variable-length trailing
 * data (a UTF-16 name, raw value data, or both) at the documented offset.
 */

use bytes::{Buf, BufMut};

use crate::memory::GuestStruct;

/// `KEY_NAME_INFORMATION` header
///
/// ```text
/// 0x00 ULONG NameLength
/// 0x04 WCHAR Name[1]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyNameInformation {
    pub name_length: u32,
}

impl KeyNameInformation {
    /// `sizeof(KEY_NAME_INFORMATION)`, including the placeholder character and padding
    pub const STRUCT_SIZE: usize = 8;
    /// `offsetof(KEY_NAME_INFORMATION, Name)`
    pub const NAME_OFFSET: u64 = 4;

    /// Bytes a caller must supply for a name of `name_bytes` UTF-16 bytes
    pub const fn required_size(name_bytes: usize) -> usize {
        Self::STRUCT_SIZE + name_bytes - 1
    }
}

impl GuestStruct for KeyNameInformation {
    const SIZE: usize = 4;

    fn decode(buf: &mut impl Buf) -> Self {
        Self {
            name_length: buf.get_u32_le(),
        }
    }

    fn encode(&self, buf: &mut impl BufMut) {
        buf.put_u32_le(self.name_length);
    }
}

/// `KEY_HANDLE_TAGS_INFORMATION`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyHandleTagsInformation {
    pub handle_tags: u32,
}

impl GuestStruct for KeyHandleTagsInformation {
    const SIZE: usize = 4;

    fn decode(buf: &mut impl Buf) -> Self {
        Self {
            handle_tags: buf.get_u32_le(),
        }
    }

    fn encode(&self, buf: &mut impl BufMut) {
        buf.put_u32_le(self.handle_tags);
    }
}

/// `KEY_VALUE_BASIC_INFORMATION` header, name at 0x0C
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyValueBasicInformation {
    pub title_index: u32,
    pub value_type: u32,
    pub name_length: u32,
}

impl GuestStruct for KeyValueBasicInformation {
    const SIZE: usize = 12;

    fn decode(buf: &mut impl Buf) -> Self {
        Self {
            title_index: buf.get_u32_le(),
            value_type: buf.get_u32_le(),
            name_length: buf.get_u32_le(),
        }
    }

    fn encode(&self, buf: &mut impl BufMut) {
        buf.put_u32_le(self.title_index);
        buf.put_u32_le(self.value_type);
        buf.put_u32_le(self.name_length);
    }
}

/// `KEY_VALUE_PARTIAL_INFORMATION` header, data at 0x0C
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyValuePartialInformation {
    pub title_index: u32,
    pub value_type: u32,
    pub data_length: u32,
}

impl GuestStruct for KeyValuePartialInformation {
    const SIZE: usize = 12;

    fn decode(buf: &mut impl Buf) -> Self {
        Self {
            title_index: buf.get_u32_le(),
            value_type: buf.get_u32_le(),
            data_length: buf.get_u32_le(),
        }
    }

    fn encode(&self, buf: &mut impl BufMut) {
        buf.put_u32_le(self.title_index);
        buf.put_u32_le(self.value_type);
        buf.put_u32_le(self.data_length);
    }
}

/// `KEY_VALUE_FULL_INFORMATION` header
///
/// ```text
/// 0x00 ULONG TitleIndex
/// 0x04 ULONG Type
/// 0x08 ULONG DataOffset   (from the start of the structure)
/// 0x0C ULONG DataLength
/// 0x10 ULONG NameLength
/// 0x14 WCHAR Name[]       followed directly by the data
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyValueFullInformation {
    pub title_index: u32,
    pub value_type: u32,
    pub data_offset: u32,
    pub data_length: u32,
    pub name_length: u32,
}

impl GuestStruct for KeyValueFullInformation {
    const SIZE: usize = 20;

    fn decode(buf: &mut impl Buf) -> Self {
        Self {
            title_index: buf.get_u32_le(),
            value_type: buf.get_u32_le(),
            data_offset: buf.get_u32_le(),
            data_length: buf.get_u32_le(),
            name_length: buf.get_u32_le(),
        }
    }

    fn encode(&self, buf: &mut impl BufMut) {
        buf.put_u32_le(self.title_index);
        buf.put_u32_le(self.value_type);
        buf.put_u32_le(self.data_offset);
        buf.put_u32_le(self.data_length);
        buf.put_u32_le(self.name_length);
    }
}
