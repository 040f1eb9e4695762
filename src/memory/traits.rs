/*!
 * Memory Traits
 * Guest address-space access as exposed by the CPU emulation engine
 */

use super::types::*;
use crate::core::types::GuestAddress;

/// Byte-level view of the guest's virtual address space
///
/// Implementations must fail the whole access when any byte of the range is
/// unmapped; a failed write leaves guest memory untouched.
pub trait GuestMemory {
    /// Fill `buf` from guest memory starting at `address`
    fn read_memory(&self, address: GuestAddress, buf: &mut [u8]) -> MemoryResult<()>;

    /// Copy `data` into guest memory starting at `address`
    fn write_memory(&mut self, address: GuestAddress, data: &[u8]) -> MemoryResult<()>;

    /// Read `len` raw bytes
    fn read_bytes(&self, address: GuestAddress, len: usize) -> MemoryResult<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read_memory(address, &mut buf)?;
        Ok(buf)
    }

    fn read_u32(&self, address: GuestAddress) -> MemoryResult<u32> {
        let mut buf = [0u8; 4];
        self.read_memory(address, &mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    fn read_u64(&self, address: GuestAddress) -> MemoryResult<u64> {
        let mut buf = [0u8; 8];
        self.read_memory(address, &mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    fn write_u32(&mut self, address: GuestAddress, value: u32) -> MemoryResult<()> {
        self.write_memory(address, &value.to_le_bytes())
    }

    fn write_u64(&mut self, address: GuestAddress, value: u64) -> MemoryResult<()> {
        self.write_memory(address, &value.to_le_bytes())
    }
}
