/*!
 * Core Types
 * Common types used across the emulator
 */

/// Address in the guest's virtual address space
pub type GuestAddress = u64;

/// Syscall number as loaded into EAX by the guest's ntdll stub
pub type SyscallNumber = u32;

/// Identity of one emulator instance, used for trace correlation
pub type InstanceId = uuid::Uuid;

/// Common result type for emulator operations
pub type EmulatorResult<T> = Result<T, super::errors::EmulatorError>;
