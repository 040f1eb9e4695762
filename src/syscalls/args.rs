/*!
 * Syscall Arguments
 * Typed extraction of handler parameters from raw argument slots
 */

use crate::core::id::Handle;
use crate::memory::{GuestMemory, GuestPtr, GuestStruct, MemoryResult};

/// A handler parameter type the dispatcher can produce from one 64-bit slot
pub trait SyscallArg: Sized {
    fn extract<M: GuestMemory + ?Sized>(memory: &M, raw: u64) -> MemoryResult<Self>;
}

impl SyscallArg for u64 {
    #[inline]
    fn extract<M: GuestMemory + ?Sized>(_memory: &M, raw: u64) -> MemoryResult<Self> {
        Ok(raw)
    }
}

/// `ULONG`: low 32 bits, upper half of the register is ignored
impl SyscallArg for u32 {
    #[inline]
    fn extract<M: GuestMemory + ?Sized>(_memory: &M, raw: u64) -> MemoryResult<Self> {
        Ok(raw as u32)
    }
}

/// `BOOLEAN`: low byte
impl SyscallArg for bool {
    #[inline]
    fn extract<M: GuestMemory + ?Sized>(_memory: &M, raw: u64) -> MemoryResult<Self> {
        Ok(raw & 0xff != 0)
    }
}

impl SyscallArg for Handle {
    #[inline]
    fn extract<M: GuestMemory + ?Sized>(_memory: &M, raw: u64) -> MemoryResult<Self> {
        Ok(Handle(raw))
    }
}

/// Pointer passed through untouched; the handler decides when to access it
impl<T> SyscallArg for GuestPtr<T> {
    #[inline]
    fn extract<M: GuestMemory + ?Sized>(_memory: &M, raw: u64) -> MemoryResult<Self> {
        Ok(GuestPtr::new(raw))
    }
}

/// Input structure read by the dispatcher before the handler runs
///
/// A null pointer yields an empty `In`; an unmapped one is a memory fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct In<T> {
    ptr: GuestPtr<T>,
    value: Option<T>,
}

impl<T> In<T> {
    #[inline]
    pub fn ptr(&self) -> GuestPtr<T> {
        self.ptr
    }

    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    #[inline]
    pub fn into_inner(self) -> Option<T> {
        self.value
    }
}

impl<T: GuestStruct> SyscallArg for In<T> {
    fn extract<M: GuestMemory + ?Sized>(memory: &M, raw: u64) -> MemoryResult<Self> {
        let ptr = GuestPtr::new(raw);
        let value = if ptr.is_null() { None } else { Some(ptr.read(memory)?) };
        Ok(In { ptr, value })
    }
}
