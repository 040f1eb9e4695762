/*!
 * Emulator Run Loop Tests
 * Scripted guests driven through `Emulator::run`
 */

use crate::fixture::*;
use ntemu_kernel::core::id::Handle;
use ntemu_kernel::cpu::{CpuRegisters, Register};
use ntemu_kernel::syscalls::{EmulationFault, KeyValueInformationClass, NtStatus};
use ntemu_kernel::{Emulator, EmulatorConfig, RunOutcome};
use pretty_assertions::assert_eq;
use std::sync::Arc;

/// First handle a fresh process issues
const FIRST_KEY: u64 = 0x4;

fn vendor_emulator() -> Emulator {
    Emulator::with_registry(EmulatorConfig::default(), &numbering(), Arc::new(vendor_registry()))
}

#[test]
fn test_open_then_query_version() {
    let emulator = vendor_emulator();
    let mut guest = Guest::vendor();

    let handle_out = guest.alloc(8);
    let attributes = guest.object_attributes(Handle::NULL, r"\Registry\Machine\Software\Vendor");
    let value_name = guest.unicode_string("Version");
    let information = guest.alloc(64);
    let result_length = guest.alloc(4);

    guest.cpu.queue_syscall(NT_OPEN_KEY, &[handle_out, 0x20019, attributes]);
    guest.cpu.queue_syscall(
        NT_QUERY_VALUE_KEY,
        &[
            FIRST_KEY,
            value_name.address(),
            KeyValueInformationClass::Partial as u64,
            information,
            64,
            result_length,
        ],
    );
    guest.cpu.queue_syscall(NT_CLOSE, &[FIRST_KEY]);

    let outcome = emulator.run(&mut guest.cpu).unwrap();

    assert_eq!(outcome, RunOutcome { syscalls: 3 });
    assert_eq!(guest.cpu.completed_statuses(), &[0, 0, 0]);
    assert_eq!(guest.read_u64(handle_out), FIRST_KEY);
    assert_eq!(guest.read_u32(result_length), 18);
    assert_eq!(guest.read_u32(information + 8), 6);
    assert_eq!(guest.read_bytes(information + 12, 6), wide("1.0"));
    assert!(emulator.process().handles().is_empty());
}

#[test]
fn test_guest_statuses_do_not_stop_the_run() {
    let emulator = vendor_emulator();
    let mut guest = Guest::vendor();
    let handle_out = guest.alloc(8);
    let missing = guest.object_attributes(Handle::NULL, r"\Registry\Machine\Software\Missing");

    guest.cpu.queue_syscall(NT_OPEN_KEY, &[handle_out, 0x20019, missing]);
    guest.cpu.queue_syscall(NT_CLOSE, &[0x7c]);
    guest.cpu.queue_syscall(NT_CREATE_KEY, &[]);

    let outcome = emulator.run(&mut guest.cpu).unwrap();

    assert_eq!(outcome.syscalls, 3);
    assert_eq!(
        guest.cpu.completed_statuses(),
        &[
            NtStatus::OBJECT_NAME_NOT_FOUND.to_register(),
            NtStatus::INVALID_HANDLE.to_register(),
            NtStatus::NOT_SUPPORTED.to_register(),
        ]
    );
    assert!(!guest.cpu.is_stopped());
}

#[test]
fn test_fault_stops_the_engine() {
    let emulator = vendor_emulator();
    let mut guest = Guest::vendor();
    let handle_out = guest.alloc(8);
    let attributes = guest.object_attributes(Handle::NULL, r"\Registry\Machine\Software\Vendor");
    let information = guest.alloc(64);
    let result_length = guest.alloc(4);

    guest.cpu.queue_syscall(NT_OPEN_KEY, &[handle_out, 0x20019, attributes]);
    guest
        .cpu
        .queue_syscall(NT_QUERY_KEY, &[FIRST_KEY, 0, information, 64, result_length]);
    guest.cpu.queue_syscall(NT_CLOSE, &[FIRST_KEY]);

    let fault = emulator.run(&mut guest.cpu).unwrap_err();

    assert_eq!(
        fault,
        EmulationFault::UnsupportedInformationClass {
            syscall: "NtQueryKey",
            class: 0,
        }
    );
    assert!(guest.cpu.is_stopped());
    assert_eq!(
        guest.cpu.read_register(Register::Rax),
        NtStatus::NOT_SUPPORTED.to_register()
    );
    // The close after the fault never ran
    assert!(emulator.process().handles().contains(Handle(FIRST_KEY)));
}

#[test]
fn test_unknown_syscall_stops_the_run() {
    let emulator = vendor_emulator();
    let mut guest = Guest::vendor();

    guest.cpu.queue_syscall(NT_CREATE_KEY, &[]);
    guest.cpu.queue_syscall(0x3ff, &[]);
    guest.cpu.queue_syscall(NT_CREATE_KEY, &[]);

    let fault = emulator.run(&mut guest.cpu).unwrap_err();

    assert_eq!(fault, EmulationFault::UnknownSyscall { number: 0x3ff });
    assert_eq!(guest.cpu.completed_statuses(), &[NtStatus::NOT_SUPPORTED.to_register()]);
    assert!(guest.cpu.is_stopped());
}

#[test]
fn test_reset_process_drops_handles() {
    let mut emulator = vendor_emulator();
    let mut guest = Guest::vendor();
    let handle_out = guest.alloc(8);
    let attributes = guest.object_attributes(Handle::NULL, r"\Registry\Machine\Software\Vendor");
    guest.cpu.queue_syscall(NT_OPEN_KEY, &[handle_out, 0x20019, attributes]);

    emulator.run(&mut guest.cpu).unwrap();
    assert_eq!(emulator.process().handles().len(), 1);

    emulator.reset_process();
    assert!(emulator.process().handles().is_empty());
}

#[test]
fn test_instances_share_one_registry() {
    let registry = Arc::new(vendor_registry());
    let first = Emulator::with_registry(EmulatorConfig::default(), &numbering(), Arc::clone(&registry));
    let second = Emulator::with_registry(EmulatorConfig::default(), &numbering(), Arc::clone(&registry));

    assert_ne!(first.id(), second.id());
    assert!(Arc::ptr_eq(first.registry(), second.registry()));
    assert_eq!(first.dispatcher().implemented_count(), 13);
}
