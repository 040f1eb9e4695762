/*!
 * Guest Strings
 * Counted UTF-16 strings read through their descriptor, then their buffer
 */

use super::layout::UnicodeString;
use super::object::GuestPtr;
use super::traits::GuestMemory;
use super::types::*;
use crate::core::types::GuestAddress;

/// Encode a host string as UTF-16LE bytes without a terminator
pub fn utf16_bytes(value: &str) -> Vec<u8> {
    value.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// Decode UTF-16LE bytes, replacing unpaired surrogates
///
/// A trailing odd byte is ignored, matching how NT treats `Length / 2`
/// characters.
pub fn decode_utf16(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

/// Read `byte_len` bytes of UTF-16 text at `address`
pub fn read_utf16<M: GuestMemory + ?Sized>(
    memory: &M,
    address: GuestAddress,
    byte_len: usize,
) -> MemoryResult<String> {
    if byte_len == 0 {
        return Ok(String::new());
    }
    let bytes = memory.read_bytes(address, byte_len)?;
    Ok(decode_utf16(&bytes))
}

/// Read a `UNICODE_STRING`: the descriptor first, then `Length` bytes of its buffer
pub fn read_unicode_string<M: GuestMemory + ?Sized>(
    memory: &M,
    descriptor: GuestPtr<UnicodeString>,
) -> MemoryResult<String> {
    let header = descriptor.read(memory)?;
    read_utf16(memory, header.buffer, usize::from(header.length))
}

/// Write `value` plus a terminator at `buffer`, then a descriptor for it
///
/// Returns the descriptor that was written. Text longer than 65532 bytes
/// cannot be described together with its terminator and is rejected before
/// anything is written.
pub fn write_unicode_string<M: GuestMemory + ?Sized>(
    memory: &mut M,
    descriptor: GuestPtr<UnicodeString>,
    buffer: GuestAddress,
    value: &str,
) -> MemoryResult<UnicodeString> {
    let mut bytes = utf16_bytes(value);
    let too_long = || MemoryError::StringTooLong {
        address: buffer,
        length: bytes.len(),
    };
    let length = u16::try_from(bytes.len()).map_err(|_| too_long())?;
    let maximum_length = length.checked_add(2).ok_or_else(too_long)?;

    bytes.extend_from_slice(&[0, 0]);
    memory.write_memory(buffer, &bytes)?;

    let header = UnicodeString {
        length,
        maximum_length,
        buffer,
    };
    descriptor.write(memory, &header)?;
    Ok(header)
}
