//! Synthetic fallback discovery via the OS executable search path.
//!
//! When a binary is reachable on `PATH` we emit a path-lookup record rather
//! than a verified install: the launcher resolves the executable at run
//! time, so no home directory is recorded. The version is supplied by the
//! caller (the live `-Version` interrogation of the binary is owned by the
//! probing layer, not by this crate).

use pwsh_runner_core::error::Result;
use pwsh_runner_core::registry::Discoverer;
use pwsh_runner_core::types::{Bitness, Edition, Installation, ToolVersion};
use std::env;
use std::ffi::OsString;

pub struct PathLookupDiscoverer {
    executable: String,
    edition: Edition,
    bitness: Bitness,
    assumed_version: ToolVersion,
    search_path: Option<OsString>,
}

impl PathLookupDiscoverer {
    pub fn new(
        executable: impl Into<String>,
        edition: Edition,
        bitness: Bitness,
        assumed_version: ToolVersion,
    ) -> Self {
        Self {
            executable: executable.into(),
            edition,
            bitness,
            assumed_version,
            search_path: None,
        }
    }

    /// Overrides the `PATH` value to scan (tests)
    pub fn with_search_path(mut self, path: impl Into<OsString>) -> Self {
        self.search_path = Some(path.into());
        self
    }

    fn search_path(&self) -> Option<OsString> {
        self.search_path.clone().or_else(|| env::var_os("PATH"))
    }
}

impl Discoverer for PathLookupDiscoverer {
    fn source_name(&self) -> &str {
        "path-lookup"
    }

    fn discover(&self) -> Result<Vec<Installation>> {
        let Some(path) = self.search_path() else {
            return Ok(Vec::new());
        };
        let hit = env::split_paths(&path).any(|dir| dir.join(&self.executable).is_file());
        if !hit {
            return Ok(Vec::new());
        }
        tracing::debug!("Found {} on PATH", self.executable);
        Ok(vec![Installation::path_lookup(
            self.bitness,
            Some(self.edition),
            self.assumed_version.clone(),
            self.executable.clone(),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn v(text: &str) -> ToolVersion {
        ToolVersion::parse(text).unwrap()
    }

    #[test]
    fn emits_one_path_lookup_record_on_hit() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pwsh"), "").unwrap();

        let discoverer =
            PathLookupDiscoverer::new("pwsh", Edition::Core, Bitness::X64, v("7.4"))
                .with_search_path(dir.path().as_os_str().to_os_string());

        let found = discoverer.discover().unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].is_path_lookup());
        assert_eq!(found[0].executable_path().to_str(), Some("pwsh"));
    }

    #[test]
    fn empty_when_binary_not_on_path() {
        let dir = tempfile::tempdir().unwrap();
        let discoverer =
            PathLookupDiscoverer::new("pwsh", Edition::Core, Bitness::X64, v("7.4"))
                .with_search_path(dir.path().as_os_str().to_os_string());
        assert!(discoverer.discover().unwrap().is_empty());
    }
}
