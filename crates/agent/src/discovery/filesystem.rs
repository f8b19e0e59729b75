//! Filesystem probing for installed interpreters.
//!
//! Each probe root is a directory whose immediate children are version-named
//! install homes (`7.4.1`, `v5.1`, ...) containing the interpreter binary.
//! This matches both the legacy layout (`<root>\v1.0\powershell.exe`) and
//! the cross-platform one (`/opt/microsoft/powershell/7/pwsh`).

use pwsh_runner_core::error::Result;
use pwsh_runner_core::registry::Discoverer;
use pwsh_runner_core::types::{Bitness, Edition, Installation, ToolVersion};
use regex::Regex;
use std::path::PathBuf;
use walkdir::WalkDir;

/// One directory to probe, with the attributes its layout implies
#[derive(Debug, Clone)]
pub struct ProbeRoot {
    pub dir: PathBuf,
    pub edition: Edition,
    pub bitness: Bitness,
    pub executable: String,
}

pub struct FileSystemDiscoverer {
    roots: Vec<ProbeRoot>,
    version_dir: Regex,
}

impl FileSystemDiscoverer {
    pub fn new(roots: Vec<ProbeRoot>) -> Self {
        Self {
            roots,
            // Version-shaped directory names, with an optional `v` prefix
            version_dir: Regex::new(r"^v?(\d+(?:\.\d+)*)$").expect("static pattern"),
        }
    }

    fn probe_root(&self, root: &ProbeRoot, found: &mut Vec<Installation>) {
        if !root.dir.is_dir() {
            tracing::debug!("Probe root {} does not exist, skipping", root.dir.display());
            return;
        }

        for entry in WalkDir::new(&root.dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(captures) = self.version_dir.captures(&name) else {
                continue;
            };
            let version = match ToolVersion::parse(&captures[1]) {
                Ok(v) => v,
                Err(_) => continue,
            };
            let home = entry.path().to_path_buf();
            if !home.join(&root.executable).is_file() {
                tracing::debug!(
                    "Skipping {}: no {} inside",
                    home.display(),
                    root.executable
                );
                continue;
            }
            match Installation::verified(
                root.bitness,
                Some(root.edition),
                version,
                home,
                root.executable.clone(),
            ) {
                Ok(tool) => found.push(tool),
                Err(err) => tracing::warn!("Rejecting probed install: {err}"),
            }
        }
    }
}

impl Discoverer for FileSystemDiscoverer {
    fn source_name(&self) -> &str {
        "filesystem"
    }

    fn discover(&self) -> Result<Vec<Installation>> {
        let mut found = Vec::new();
        for root in &self.roots {
            self.probe_root(root, &mut found);
        }
        Ok(found)
    }
}
