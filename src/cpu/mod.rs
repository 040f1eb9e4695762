/*!
 * CPU Engine Contract
 * The narrow register and memory interface consumed from the CPU emulator
 */

pub mod context;
pub mod soft;

use crate::memory::GuestMemory;

pub use context::{Context64, CONTEXT_AMD64, CONTEXT_CONTROL, CONTEXT_FULL, CONTEXT_INTEGER, CONTEXT_SEGMENTS};
pub use soft::SoftCpu;

/// x64 registers visible to the syscall layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    Rax,
    Rbx,
    Rcx,
    Rdx,
    Rsi,
    Rdi,
    Rbp,
    Rsp,
    R8,
    R9,
    R10,
    R11,
    R12,
    R13,
    R14,
    R15,
    Rip,
    Rflags,
    Cs,
    Ds,
    Es,
    Fs,
    Gs,
    Ss,
}

impl Register {
    pub const COUNT: usize = 24;

    pub const ALL: [Register; Register::COUNT] = [
        Register::Rax,
        Register::Rbx,
        Register::Rcx,
        Register::Rdx,
        Register::Rsi,
        Register::Rdi,
        Register::Rbp,
        Register::Rsp,
        Register::R8,
        Register::R9,
        Register::R10,
        Register::R11,
        Register::R12,
        Register::R13,
        Register::R14,
        Register::R15,
        Register::Rip,
        Register::Rflags,
        Register::Cs,
        Register::Ds,
        Register::Es,
        Register::Fs,
        Register::Gs,
        Register::Ss,
    ];

    /// Dense index into a register file
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Register file access
pub trait CpuRegisters {
    fn read_register(&self, register: Register) -> u64;
    fn write_register(&mut self, register: Register, value: u64);
}

/// Everything a syscall handler may touch on the guest CPU
pub trait Cpu: GuestMemory + CpuRegisters {}

impl<T: GuestMemory + CpuRegisters> Cpu for T {}

/// Why the engine handed control back to the emulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuEvent {
    /// The guest executed `syscall`; registers hold the request
    Syscall,
    /// Execution finished or was stopped
    Halted,
}

/// An instruction-emulation engine the emulator can drive
pub trait CpuEngine: Cpu {
    /// Execute guest code until the next syscall trap or halt
    fn run_until_event(&mut self) -> CpuEvent;

    /// Stop execution; later calls to `run_until_event` report `Halted`
    fn stop(&mut self);
}
