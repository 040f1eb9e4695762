/*!
 * Scripted Software CPU
 * Register file plus sparse memory that replays a queue of syscall traps
 */

use std::collections::VecDeque;

use super::{CpuEngine, CpuEvent, CpuRegisters, Register};
use crate::core::types::{GuestAddress, SyscallNumber};
use crate::memory::{GuestMemory, MemoryResult, SparseMemory};

/// Base of the stack region mapped by [`SoftCpu::new`]
pub const STACK_BASE: GuestAddress = 0x7ff0_0000;
/// Size of the stack region mapped by [`SoftCpu::new`]
pub const STACK_SIZE: u64 = 0x10000;

/// Offset from RSP of the fifth syscall argument (return address + home space)
pub const STACK_ARGS_OFFSET: u64 = 0x28;

/// A pending `syscall` instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedTrap {
    pub number: SyscallNumber,
    pub args: Vec<u64>,
}

/// Minimal engine: no instruction decoding, only queued syscall traps
///
/// Each call to [`CpuEngine::run_until_event`] loads the next trap into the
/// registers the way an ntdll stub would (`EAX`, `R10`, `RDX`, `R8`, `R9`,
/// stack) and reports [`CpuEvent::Syscall`]. The status left in `RAX` by
/// the previous trap is collected first.
#[derive(Debug, Clone)]
pub struct SoftCpu {
    registers: [u64; Register::COUNT],
    memory: SparseMemory,
    traps: VecDeque<ScriptedTrap>,
    completed: Vec<u64>,
    in_trap: bool,
    stopped: bool,
}

impl SoftCpu {
    pub fn new() -> Self {
        let mut memory = SparseMemory::new();
        memory.map(STACK_BASE, STACK_SIZE);

        let mut cpu = Self {
            registers: [0; Register::COUNT],
            memory,
            traps: VecDeque::new(),
            completed: Vec::new(),
            in_trap: false,
            stopped: false,
        };
        cpu.write_register(Register::Rsp, STACK_BASE + STACK_SIZE / 2);
        cpu
    }

    pub fn memory(&self) -> &SparseMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut SparseMemory {
        &mut self.memory
    }

    /// Queue a syscall trap for a later `run_until_event`
    pub fn queue_syscall(&mut self, number: SyscallNumber, args: &[u64]) {
        self.traps.push_back(ScriptedTrap {
            number,
            args: args.to_vec(),
        });
    }

    /// Statuses left in RAX by each completed trap, in order
    pub fn completed_statuses(&self) -> &[u64] {
        &self.completed
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Load a syscall request into registers and the stack
    pub fn load_syscall(&mut self, number: SyscallNumber, args: &[u64]) -> MemoryResult<()> {
        const REGISTER_ARGS: [Register; 4] = [Register::R10, Register::Rdx, Register::R8, Register::R9];

        self.write_register(Register::Rax, u64::from(number));
        for (register, value) in REGISTER_ARGS.iter().zip(args) {
            self.write_register(*register, *value);
        }

        let rsp = self.read_register(Register::Rsp);
        for (i, value) in args.iter().enumerate().skip(REGISTER_ARGS.len()) {
            let slot = rsp + STACK_ARGS_OFFSET + 8 * (i - REGISTER_ARGS.len()) as u64;
            self.memory.write_u64(slot, *value)?;
        }
        Ok(())
    }

    fn finish_trap(&mut self) {
        if self.in_trap {
            self.completed.push(self.read_register(Register::Rax));
            self.in_trap = false;
        }
    }
}

impl Default for SoftCpu {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuRegisters for SoftCpu {
    #[inline]
    fn read_register(&self, register: Register) -> u64 {
        self.registers[register.index()]
    }

    #[inline]
    fn write_register(&mut self, register: Register, value: u64) {
        self.registers[register.index()] = value;
    }
}

impl GuestMemory for SoftCpu {
    #[inline]
    fn read_memory(&self, address: GuestAddress, buf: &mut [u8]) -> MemoryResult<()> {
        self.memory.read_memory(address, buf)
    }

    #[inline]
    fn write_memory(&mut self, address: GuestAddress, data: &[u8]) -> MemoryResult<()> {
        self.memory.write_memory(address, data)
    }
}

impl CpuEngine for SoftCpu {
    fn run_until_event(&mut self) -> CpuEvent {
        self.finish_trap();
        if self.stopped {
            return CpuEvent::Halted;
        }

        let Some(trap) = self.traps.pop_front() else {
            return CpuEvent::Halted;
        };
        if self.load_syscall(trap.number, &trap.args).is_err() {
            self.stopped = true;
            return CpuEvent::Halted;
        }
        self.in_trap = true;
        CpuEvent::Syscall
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}
