/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use miette::Diagnostic;
use thiserror::Error;

// Re-export subsystem errors so callers can name them from one place
pub use crate::config::ConfigError;
pub use crate::handles::HandleError;
pub use crate::memory::MemoryError;
pub use crate::registry::RegistryError;
pub use crate::syscalls::EmulationFault;

/// Unified emulator error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum EmulatorError {
    #[error("Memory error: {0}")]
    #[diagnostic(transparent)]
    Memory(#[from] MemoryError),

    #[error("Handle error: {0}")]
    #[diagnostic(transparent)]
    Handle(#[from] HandleError),

    #[error("Registry error: {0}")]
    #[diagnostic(transparent)]
    Registry(#[from] RegistryError),

    #[error("Configuration error: {0}")]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Emulation halted: {0}")]
    #[diagnostic(transparent)]
    Fault(#[from] EmulationFault),
}

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, EmulatorError>;
