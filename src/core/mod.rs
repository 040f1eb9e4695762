/*!
 * Core Module
 * Fundamental emulator types and error handling
 */

pub mod errors;
pub mod id;
pub mod types;

// Re-export for convenience
pub use errors::*;
pub use id::{Handle, HandleGenerator, IdGenerator, RecyclingGenerator, HANDLE_STRIDE};
pub use types::*;
