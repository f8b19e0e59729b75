//! Registry of discovered installations for the current agent session.
//!
//! Populated once at session start from every discoverer, then read for the
//! rest of the session. All writers finish before any reader runs, so reads
//! need no synchronization.

mod selection;

pub use selection::{SelectionConstraints, select};

use crate::error::{Error, Result};
use crate::types::Installation;
use std::path::PathBuf;

/// Discovery-identity key. Disk-verified installs are identified by their
/// absolute home directory; records reconstructed from persisted parameters
/// or PATH lookup carry a composite key instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryKey {
    Home(PathBuf),
    Legacy(String),
}

impl RegistryKey {
    /// Derives the identity key an installation registers under. The home
    /// path is canonicalized so two probes reaching the same install
    /// through a symlink or a non-normalized root agree on one key; a path
    /// that cannot be resolved (persisted records) is used as recorded.
    pub fn for_installation(tool: &Installation) -> Self {
        match tool.home().home_dir() {
            Some(home) => {
                let resolved = home.canonicalize().unwrap_or_else(|_| home.to_path_buf());
                RegistryKey::Home(resolved)
            }
            None => RegistryKey::Legacy(legacy_composite(tool)),
        }
    }
}

fn legacy_composite(tool: &Installation) -> String {
    let edition = tool
        .edition()
        .map(|e| e.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    format!("{edition}_{}_{}", tool.version(), tool.bitness())
}

/// A probe that contributes zero or more installations from one source.
/// Callable multiple times; must not fail on "nothing found".
pub trait Discoverer {
    /// Human-readable source name for log attribution
    fn source_name(&self) -> &str;

    fn discover(&self) -> Result<Vec<Installation>>;
}

/// All installations known to the current session, in registration order.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    entries: Vec<(RegistryKey, Installation)>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers under the derived identity key. Idempotent by key: a key
    /// already present is not overwritten within the same session.
    pub fn register(&mut self, tool: Installation) -> bool {
        self.register_keyed(RegistryKey::for_installation(&tool), tool)
    }

    /// Registers under an explicit key (legacy composite keys for records
    /// loaded from persisted parameters).
    pub fn register_keyed(&mut self, key: RegistryKey, tool: Installation) -> bool {
        if self.entries.iter().any(|(k, _)| *k == key) {
            tracing::debug!("Ignoring duplicate registration for {key:?}");
            return false;
        }
        tracing::debug!("Registered {tool}");
        self.entries.push((key, tool));
        true
    }

    /// Runs every discoverer and registers what it finds. A failing probe is
    /// logged and contributes nothing; the remaining discoverers still run.
    pub fn populate(&mut self, discoverers: &[Box<dyn Discoverer>]) {
        for discoverer in discoverers {
            match discoverer.discover() {
                Ok(found) => {
                    tracing::debug!(
                        "Discoverer '{}' found {} installation(s)",
                        discoverer.source_name(),
                        found.len()
                    );
                    for tool in found {
                        self.register(tool);
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        "Discoverer '{}' failed, continuing without it: {err}",
                        discoverer.source_name()
                    );
                }
            }
        }
    }

    pub fn installations(&self) -> impl Iterator<Item = &Installation> {
        self.entries.iter().map(|(_, tool)| tool)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Best-match lookup; pure read over the registry snapshot.
    pub fn select(&self, constraints: &SelectionConstraints) -> Result<&Installation> {
        select(self.installations(), constraints).ok_or_else(|| {
            Error::ToolNotFound(format!("no installation satisfies: {constraints}"))
        })
    }
}
