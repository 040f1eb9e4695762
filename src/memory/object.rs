/*!
 * Typed Guest Pointers
 * A guest address tagged with the structure it points at
 */

use std::fmt;
use std::marker::PhantomData;

use super::layout::GuestStruct;
use super::traits::GuestMemory;
use super::types::*;
use crate::core::types::GuestAddress;

/// Pointer into guest memory to a `T`
///
/// Holding a `GuestPtr` reads nothing; access happens through [`read`] and
/// [`write`], which marshal exactly `T::SIZE` bytes.
///
/// [`read`]: GuestPtr::read
/// [`write`]: GuestPtr::write
pub struct GuestPtr<T> {
    address: GuestAddress,
    _marker: PhantomData<fn() -> T>,
}

impl<T> GuestPtr<T> {
    #[inline]
    pub const fn new(address: GuestAddress) -> Self {
        Self {
            address,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn null() -> Self {
        Self::new(0)
    }

    #[inline]
    pub const fn address(&self) -> GuestAddress {
        self.address
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        self.address == 0
    }

    /// Address `offset` bytes past the pointee start
    #[inline]
    pub const fn byte_offset(&self, offset: u64) -> GuestAddress {
        self.address.wrapping_add(offset)
    }

    /// Reinterpret as a pointer to another type at the same address
    #[inline]
    pub const fn cast<U>(self) -> GuestPtr<U> {
        GuestPtr::new(self.address)
    }
}

impl<T: GuestStruct> GuestPtr<T> {
    /// Read and decode the pointee
    pub fn read<M: GuestMemory + ?Sized>(&self, memory: &M) -> MemoryResult<T> {
        let bytes = memory.read_bytes(self.address, T::SIZE)?;
        Ok(T::from_guest_bytes(&bytes))
    }

    /// Encode and write `value` over the pointee
    pub fn write<M: GuestMemory + ?Sized>(&self, memory: &mut M, value: &T) -> MemoryResult<()> {
        memory.write_memory(self.address, &value.to_guest_bytes())
    }
}

impl<T> Clone for GuestPtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for GuestPtr<T> {}

impl<T> PartialEq for GuestPtr<T> {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl<T> Eq for GuestPtr<T> {}

impl<T> Default for GuestPtr<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> fmt::Debug for GuestPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GuestPtr(0x{:x})", self.address)
    }
}

impl<T> From<GuestAddress> for GuestPtr<T> {
    fn from(address: GuestAddress) -> Self {
        Self::new(address)
    }
}
