/*!
 * Registry Types
 * Errors raised while seeding the registry store
 */

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Registry operation result
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Seeding failures
///
/// Lookups never fail with an error; an absent key or value is an
/// ordinary `None` that handlers turn into a status code.
#[derive(Error, Debug, Diagnostic)]
pub enum RegistryError {
    #[error("Key {path} is not under any registered hive")]
    #[diagnostic(
        code(registry::unknown_hive),
        help("Seed paths must start with \\Registry\\Machine, \\Registry\\User or a Win32 root such as HKLM.")
    )]
    UnknownHive { path: String },

    #[error("Empty registry key path")]
    #[diagnostic(code(registry::empty_path))]
    EmptyPath,

    #[error("Invalid data for value {name}: {reason}")]
    #[diagnostic(code(registry::invalid_value))]
    InvalidValueData { name: String, reason: String },

    #[error("Failed to read registry seed {path}: {source}")]
    #[diagnostic(code(registry::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed registry seed: {0}")]
    #[diagnostic(
        code(registry::json),
        help("Expected {{\"keys\": [{{\"path\": ..., \"values\": [...]}}]}}")
    )]
    Json(#[from] serde_json::Error),
}
