/*!
 * NT Kernel Emulation Library
 * Syscall interception and kernel-object emulation for a guest Windows process
 *
 * A CPU emulation engine traps `syscall`; the [`Dispatcher`] routes the
 * request to a handler, which answers with an NT status from emulated
 * state (the process [`HandleTable`] and the instance-wide
 * [`RegistryStore`]).
 */

pub mod config;
pub mod core;
pub mod cpu;
pub mod emulator;
pub mod handles;
pub mod memory;
pub mod monitoring;
pub mod registry;
pub mod syscalls;

// Re-exports
pub use crate::config::{ConfigError, EmulatorConfig, TracingConfig};
pub use crate::core::{EmulatorError, Handle, Result};
pub use crate::cpu::{Cpu, CpuEngine, CpuEvent, CpuRegisters, Register, SoftCpu};
pub use crate::emulator::{Emulator, Process, RunOutcome};
pub use crate::handles::{HandleError, HandleTable, KernelObject};
pub use crate::memory::{GuestMemory, GuestPtr, MemoryError, SparseMemory};
pub use crate::monitoring::init_tracing;
pub use crate::registry::{RegistryError, RegistryKey, RegistrySeed, RegistryStore, RegistryValue, ValueType};
pub use crate::syscalls::{Dispatcher, EmulationFault, NtStatus, SyscallNumbering, SyscallTable};
