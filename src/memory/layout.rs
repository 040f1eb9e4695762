/*!
 * Guest Structure Layouts
 * Byte-exact x64 ABI encodings of structures exchanged with guest code
 *
 * Every structure is encoded field by field at its ABI offset, little-endian,
 * with explicit zero padding. Host `repr` layout never reaches the guest.
 */

use bytes::{Buf, BufMut, BytesMut};

use super::object::GuestPtr;
use crate::core::id::Handle;

/// A value with a fixed guest-side encoding of exactly `SIZE` bytes
pub trait GuestStruct: Sized {
    /// Encoded size in bytes
    const SIZE: usize;

    /// Decode from a buffer holding at least `SIZE` bytes
    fn decode(buf: &mut impl Buf) -> Self;

    /// Encode exactly `SIZE` bytes
    fn encode(&self, buf: &mut impl BufMut);

    fn from_guest_bytes(bytes: &[u8]) -> Self {
        let mut cursor = bytes;
        Self::decode(&mut cursor)
    }

    fn to_guest_bytes(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(Self::SIZE);
        self.encode(&mut buf);
        debug_assert_eq!(buf.len(), Self::SIZE);
        buf
    }
}

impl GuestStruct for u16 {
    const SIZE: usize = 2;

    fn decode(buf: &mut impl Buf) -> Self {
        buf.get_u16_le()
    }

    fn encode(&self, buf: &mut impl BufMut) {
        buf.put_u16_le(*self);
    }
}

impl GuestStruct for u32 {
    const SIZE: usize = 4;

    fn decode(buf: &mut impl Buf) -> Self {
        buf.get_u32_le()
    }

    fn encode(&self, buf: &mut impl BufMut) {
        buf.put_u32_le(*self);
    }
}

impl GuestStruct for u64 {
    const SIZE: usize = 8;

    fn decode(buf: &mut impl Buf) -> Self {
        buf.get_u64_le()
    }

    fn encode(&self, buf: &mut impl BufMut) {
        buf.put_u64_le(*self);
    }
}

impl GuestStruct for Handle {
    const SIZE: usize = 8;

    fn decode(buf: &mut impl Buf) -> Self {
        Handle(buf.get_u64_le())
    }

    fn encode(&self, buf: &mut impl BufMut) {
        buf.put_u64_le(self.0);
    }
}

// ============================================================================
// UNICODE_STRING
// ============================================================================

/// Counted UTF-16 string descriptor
///
/// ```text
/// 0x00 USHORT Length          (bytes, no terminator)
/// 0x02 USHORT MaximumLength
/// 0x08 PWSTR  Buffer
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnicodeString {
    pub length: u16,
    pub maximum_length: u16,
    pub buffer: u64,
}

impl GuestStruct for UnicodeString {
    const SIZE: usize = 16;

    fn decode(buf: &mut impl Buf) -> Self {
        let length = buf.get_u16_le();
        let maximum_length = buf.get_u16_le();
        buf.advance(4);
        let buffer = buf.get_u64_le();
        Self {
            length,
            maximum_length,
            buffer,
        }
    }

    fn encode(&self, buf: &mut impl BufMut) {
        buf.put_u16_le(self.length);
        buf.put_u16_le(self.maximum_length);
        buf.put_bytes(0, 4);
        buf.put_u64_le(self.buffer);
    }
}

// ============================================================================
// OBJECT_ATTRIBUTES
// ============================================================================

/// Object attributes passed to every open/create syscall
///
/// ```text
/// 0x00 ULONG           Length
/// 0x08 HANDLE          RootDirectory
/// 0x10 PUNICODE_STRING ObjectName
/// 0x18 ULONG           Attributes
/// 0x20 PVOID           SecurityDescriptor
/// 0x28 PVOID           SecurityQualityOfService
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectAttributes {
    pub length: u32,
    pub root_directory: Handle,
    pub object_name: GuestPtr<UnicodeString>,
    pub attributes: u32,
    pub security_descriptor: u64,
    pub security_quality_of_service: u64,
}

impl ObjectAttributes {
    /// Attributes naming `object_name`, optionally relative to `root_directory`
    pub fn new(root_directory: Handle, object_name: GuestPtr<UnicodeString>) -> Self {
        Self {
            length: Self::SIZE as u32,
            root_directory,
            object_name,
            attributes: 0,
            security_descriptor: 0,
            security_quality_of_service: 0,
        }
    }
}

impl GuestStruct for ObjectAttributes {
    const SIZE: usize = 48;

    fn decode(buf: &mut impl Buf) -> Self {
        let length = buf.get_u32_le();
        buf.advance(4);
        let root_directory = Handle(buf.get_u64_le());
        let object_name = GuestPtr::new(buf.get_u64_le());
        let attributes = buf.get_u32_le();
        buf.advance(4);
        let security_descriptor = buf.get_u64_le();
        let security_quality_of_service = buf.get_u64_le();
        Self {
            length,
            root_directory,
            object_name,
            attributes,
            security_descriptor,
            security_quality_of_service,
        }
    }

    fn encode(&self, buf: &mut impl BufMut) {
        buf.put_u32_le(self.length);
        buf.put_bytes(0, 4);
        buf.put_u64_le(self.root_directory.0);
        buf.put_u64_le(self.object_name.address());
        buf.put_u32_le(self.attributes);
        buf.put_bytes(0, 4);
        buf.put_u64_le(self.security_descriptor);
        buf.put_u64_le(self.security_quality_of_service);
    }
}
