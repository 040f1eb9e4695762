/*!
 * Syscall Context
 * Per-call view of the CPU, the process handle table and the registry
 */

use crate::core::types::GuestAddress;
use crate::cpu::Cpu;
use crate::handles::HandleTable;
use crate::memory::{self, GuestMemory, GuestPtr, GuestStruct, UnicodeString};
use crate::registry::RegistryStore;

use super::types::EmulationFault;

/// Everything a handler may touch while servicing one syscall
///
/// Built fresh by the dispatcher for every trap and dropped when the
/// handler returns.
pub struct SyscallContext<'a> {
    pub cpu: &'a mut dyn Cpu,
    pub handles: &'a HandleTable,
    pub registry: &'a RegistryStore,
}

impl<'a> SyscallContext<'a> {
    pub fn new(cpu: &'a mut dyn Cpu, handles: &'a HandleTable, registry: &'a RegistryStore) -> Self {
        Self {
            cpu,
            handles,
            registry,
        }
    }

    pub fn read<T: GuestStruct>(&self, ptr: GuestPtr<T>) -> Result<T, EmulationFault> {
        Ok(ptr.read(&*self.cpu)?)
    }

    pub fn write<T: GuestStruct>(&mut self, ptr: GuestPtr<T>, value: &T) -> Result<(), EmulationFault> {
        Ok(ptr.write(&mut *self.cpu, value)?)
    }

    /// Write to an optional output pointer; null is skipped
    pub fn write_optional<T: GuestStruct>(
        &mut self,
        ptr: GuestPtr<T>,
        value: &T,
    ) -> Result<(), EmulationFault> {
        if ptr.is_null() {
            return Ok(());
        }
        self.write(ptr, value)
    }

    pub fn write_bytes(&mut self, address: GuestAddress, data: &[u8]) -> Result<(), EmulationFault> {
        Ok(self.cpu.write_memory(address, data)?)
    }

    /// Read a `UNICODE_STRING`; a null descriptor reads as the empty string
    pub fn read_unicode_string(&self, ptr: GuestPtr<UnicodeString>) -> Result<String, EmulationFault> {
        if ptr.is_null() {
            return Ok(String::new());
        }
        Ok(memory::read_unicode_string(&*self.cpu, ptr)?)
    }
}
