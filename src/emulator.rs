/*!
 * Emulator Instance
 * Owns the shared registry, the dispatcher and the emulated process
 *
 * The run loop drives a CPU engine until it halts. Every syscall trap is
 * serviced synchronously; a fault stops the engine and is returned to the
 * caller rather than being turned into a guest status.
 */

use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::EmulatorConfig;
use crate::core::types::{EmulatorResult, InstanceId};
use crate::cpu::{Cpu, CpuEngine, CpuEvent};
use crate::handles::HandleTable;
use crate::monitoring::SyscallSpan;
use crate::registry::{RegistrySeed, RegistryStore};
use crate::syscalls::{syscall_number, Dispatcher, EmulationFault, SyscallNumbering, SyscallOutcome, SyscallTable};

/// The emulated process: owner of its handle table
#[derive(Debug)]
pub struct Process {
    handles: HandleTable,
}

impl Process {
    pub fn new(first_handle: u64) -> Self {
        Self {
            handles: HandleTable::with_first_handle(first_handle),
        }
    }

    #[inline]
    pub fn handles(&self) -> &HandleTable {
        &self.handles
    }
}

/// Summary of a run that ended with the engine halting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunOutcome {
    /// Syscall traps serviced
    pub syscalls: u64,
}

/// One emulator instance
pub struct Emulator {
    id: InstanceId,
    config: EmulatorConfig,
    registry: Arc<RegistryStore>,
    dispatcher: Dispatcher,
    process: Process,
}

impl Emulator {
    /// Build an instance, seeding the registry from `config.registry_seed`
    pub fn new(config: EmulatorConfig, numbering: &SyscallNumbering) -> EmulatorResult<Self> {
        let registry = match &config.registry_seed {
            Some(path) => RegistryStore::from_seed(&RegistrySeed::from_json_file(path)?)?,
            None => RegistryStore::empty(),
        };
        Ok(Self::with_registry(config, numbering, Arc::new(registry)))
    }

    /// Build an instance around an existing registry store
    pub fn with_registry(
        config: EmulatorConfig,
        numbering: &SyscallNumbering,
        registry: Arc<RegistryStore>,
    ) -> Self {
        let dispatcher = Dispatcher::new(numbering, &SyscallTable::standard());
        let process = Process::new(config.first_handle);
        Self {
            id: Uuid::new_v4(),
            config,
            registry,
            dispatcher,
            process,
        }
    }

    /// Replace the dispatcher, e.g. with one built from a custom handler table
    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    #[inline]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<RegistryStore> {
        &self.registry
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn process(&self) -> &Process {
        &self.process
    }

    /// Start a fresh process; handles of the previous one are dropped
    pub fn reset_process(&mut self) {
        self.process = Process::new(self.config.first_handle);
    }

    /// Service the single syscall trap whose request is in `cpu`
    pub fn handle_syscall(&self, cpu: &mut dyn Cpu) -> SyscallOutcome {
        let number = syscall_number(&*cpu);
        let span = SyscallSpan::new(
            self.id,
            number,
            self.dispatcher.name(number),
            self.config.slow_syscall_threshold(),
        );
        let _entered = span.enter();

        let outcome = self
            .dispatcher
            .dispatch(cpu, self.process.handles(), &self.registry);
        span.record_outcome(&outcome);
        outcome
    }

    /// Run `engine` until it halts or a syscall faults
    ///
    /// On a fault the engine is stopped before the fault is returned.
    pub fn run<E: CpuEngine>(&self, engine: &mut E) -> Result<RunOutcome, EmulationFault> {
        info!(instance = %self.id, "emulation started");
        let mut outcome = RunOutcome::default();

        loop {
            match engine.run_until_event() {
                CpuEvent::Halted => {
                    info!(instance = %self.id, syscalls = outcome.syscalls, "emulation halted");
                    return Ok(outcome);
                }
                CpuEvent::Syscall => {
                    outcome.syscalls += 1;
                    if let Err(fault) = self.handle_syscall(engine) {
                        error!(instance = %self.id, %fault, "emulation stopped on fault");
                        engine.stop();
                        return Err(fault);
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for Emulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emulator")
            .field("id", &self.id)
            .field("process", &self.process)
            .field("registry_keys", &self.registry.key_count())
            .finish()
    }
}
