//! Concrete discovery strategies feeding the session registry

mod filesystem;
mod path_lookup;
mod persisted;

pub use filesystem::{FileSystemDiscoverer, ProbeRoot};
pub use path_lookup::PathLookupDiscoverer;
pub use persisted::PersistedToolSource;
