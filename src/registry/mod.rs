/*!
 * Registry Emulation
 * Hierarchical key namespace with typed values
 *
 * The store is read-only once built. Guest code reads configuration through
 * open/query syscalls; creation and mutation syscalls are answered with
 * `STATUS_NOT_SUPPORTED` by the handlers, never by the store.
 */

pub mod key;
pub mod path;
pub mod seed;
pub mod store;
pub mod types;
pub mod value;

pub use key::RegistryKey;
pub use path::{canonicalize, normalize, DEFAULT_USER, MACHINE_HIVE, USER_HIVE};
pub use seed::{RegistrySeed, SeedData, SeedKey, SeedValue};
pub use store::{RegistryStore, RegistryStoreBuilder};
pub use types::{RegistryError, RegistryResult};
pub use value::{RegistryValue, ValueType};
