/*!
 * Syscall Dispatcher
 * Routes a trapped syscall to its handler and writes the status back
 *
 * x64 NT calling convention for `syscall`: the number is in EAX, the first
 * four arguments in R10, RDX, R8, R9 and the rest on the stack above the
 * return address and the 0x20-byte home area.
 */

use ahash::RandomState;
use std::collections::HashMap;
use std::sync::Arc;

use super::context::SyscallContext;
use super::handler::{HandlerDescriptor, SyscallTable};
use super::numbering::SyscallNumbering;
use super::types::*;
use crate::core::types::SyscallNumber;
use crate::cpu::{Cpu, CpuRegisters, Register};
use crate::handles::HandleTable;
use crate::memory::{GuestMemory, MemoryResult};
use crate::registry::RegistryStore;

/// Registers holding the first four syscall arguments
pub const ARGUMENT_REGISTERS: [Register; 4] = [Register::R10, Register::Rdx, Register::R8, Register::R9];

/// Offset from RSP of the fifth argument
pub const STACK_ARGUMENT_OFFSET: u64 = 0x28;

#[derive(Debug, Clone)]
enum Route {
    Handler(Arc<HandlerDescriptor>),
    Unimplemented(String),
}

/// Number-keyed routing table, resolved once at construction
#[derive(Debug, Clone)]
pub struct Dispatcher {
    routes: HashMap<SyscallNumber, Route, RandomState>,
}

impl Dispatcher {
    pub fn new(numbering: &SyscallNumbering, table: &SyscallTable) -> Self {
        let routes = numbering
            .iter()
            .map(|(number, name)| {
                let route = match table.get(name) {
                    Some(descriptor) => Route::Handler(descriptor),
                    None => Route::Unimplemented(name.to_string()),
                };
                (number, route)
            })
            .collect();
        Self { routes }
    }

    /// Name of the syscall with `number`, implemented or not
    pub fn name(&self, number: SyscallNumber) -> Option<&str> {
        self.routes.get(&number).map(|route| match route {
            Route::Handler(descriptor) => descriptor.name(),
            Route::Unimplemented(name) => name.as_str(),
        })
    }

    /// Number of syscalls that resolve to a handler
    pub fn implemented_count(&self) -> usize {
        self.routes
            .values()
            .filter(|route| matches!(route, Route::Handler(_)))
            .count()
    }

    /// Service the syscall whose request is in `cpu`'s registers
    ///
    /// The returned status has already been written to RAX. Faults leave RAX
    /// untouched, except an unsupported information class which leaves
    /// `STATUS_NOT_SUPPORTED` for the guest to see.
    pub fn dispatch(
        &self,
        cpu: &mut dyn Cpu,
        handles: &HandleTable,
        registry: &RegistryStore,
    ) -> SyscallOutcome {
        let number = syscall_number(&*cpu);
        let descriptor = match self.routes.get(&number) {
            Some(Route::Handler(descriptor)) => descriptor,
            Some(Route::Unimplemented(name)) => {
                return Err(EmulationFault::UnimplementedSyscall {
                    number,
                    name: name.clone(),
                })
            }
            None => return Err(EmulationFault::UnknownSyscall { number }),
        };

        let raw = read_arguments(&*cpu, descriptor.arity())?;
        let outcome = {
            let mut ctx = SyscallContext::new(&mut *cpu, handles, registry);
            descriptor.invoke(&mut ctx, &raw)
        };

        match &outcome {
            Ok(status) => cpu.write_register(Register::Rax, status.to_register()),
            Err(fault) => {
                if let Some(status) = fault.guest_status() {
                    cpu.write_register(Register::Rax, status.to_register());
                }
            }
        }
        outcome
    }
}

/// Syscall number from EAX
pub fn syscall_number(cpu: &dyn Cpu) -> SyscallNumber {
    cpu.read_register(Register::Rax) as SyscallNumber
}

/// Collect `count` raw argument slots per the syscall calling convention
pub fn read_arguments(cpu: &dyn Cpu, count: usize) -> MemoryResult<Vec<u64>> {
    let mut raw = Vec::with_capacity(count);
    for index in 0..count {
        let value = match ARGUMENT_REGISTERS.get(index) {
            Some(register) => cpu.read_register(*register),
            None => {
                let slot = (index - ARGUMENT_REGISTERS.len()) as u64;
                let rsp = cpu.read_register(Register::Rsp);
                cpu.read_u64(rsp.wrapping_add(STACK_ARGUMENT_OFFSET + 8 * slot))?
            }
        };
        raw.push(value);
    }
    Ok(raw)
}
