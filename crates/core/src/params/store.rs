//! Flattened parameter-store representation of the registry.
//!
//! The registry itself is never persisted; an external collaborator stores
//! this derived string map instead. Newer consumers read
//! `<edition>_<version>_<bitness>` keys, older ones the `powershell_<bitness>`
//! family, so both are written.

use crate::registry::{RegistryKey, ToolRegistry, SelectionConstraints, select};
use crate::types::{Bitness, Edition, Installation, ToolHome, ToolVersion};
use std::collections::HashMap;

const LEGACY_PREFIX: &str = "powershell_";
const SUFFIX_PATH: &str = "_Path";
const SUFFIX_EDITION: &str = "_Edition";
const SUFFIX_EXECUTABLE: &str = "_Executable";

fn edition_label(tool: &Installation) -> String {
    tool.edition()
        .map(|e| e.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn home_label(tool: &Installation) -> String {
    match tool.home() {
        ToolHome::Installed { home, .. } => home.display().to_string(),
        ToolHome::PathLookup { executable } => executable.clone(),
    }
}

/// Writes one `<edition>_<version>_<bitness>` entry (plus its `_Path`
/// variant) per installation, and the legacy `powershell_<bitness>` family
/// for the best installation of each bitness.
pub fn flatten_into(registry: &ToolRegistry, map: &mut HashMap<String, String>) {
    for tool in registry.installations() {
        let base = format!("{}_{}_{}", edition_label(tool), tool.version(), tool.bitness());
        map.entry(base.clone())
            .or_insert_with(|| tool.version().to_string());
        map.entry(format!("{base}{SUFFIX_PATH}"))
            .or_insert_with(|| home_label(tool));
    }

    for bitness in [Bitness::X86, Bitness::X64] {
        let constraints = SelectionConstraints {
            bitness: Some(bitness),
            ..Default::default()
        };
        let Some(best) = select(registry.installations(), &constraints) else {
            continue;
        };
        let base = format!("{LEGACY_PREFIX}{bitness}");
        map.insert(base.clone(), best.version().to_string());
        map.insert(format!("{base}{SUFFIX_PATH}"), home_label(best));
        map.insert(
            format!("{base}{SUFFIX_EXECUTABLE}"),
            best.home().executable_name().to_string(),
        );
        if let Some(edition) = best.edition() {
            map.insert(format!("{base}{SUFFIX_EDITION}"), edition.to_string());
        }
    }
}

/// Reconstructs installations recorded by a prior session from the legacy
/// `powershell_<bitness>` key family. Malformed entries are skipped with a
/// log line; the home directory is taken on trust since it was verified
/// when the record was first discovered.
pub fn read_persisted(map: &HashMap<String, String>) -> Vec<(RegistryKey, Installation)> {
    let mut found = Vec::new();
    for bitness in [Bitness::X86, Bitness::X64] {
        let base = format!("{LEGACY_PREFIX}{bitness}");
        let Some(version_text) = map.get(&base) else {
            continue;
        };
        let version = match ToolVersion::parse(version_text) {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!("Skipping persisted entry '{base}': {err}");
                continue;
            }
        };
        let Some(home) = map.get(&format!("{base}{SUFFIX_PATH}")) else {
            tracing::warn!("Skipping persisted entry '{base}': no path recorded");
            continue;
        };
        let edition = map
            .get(&format!("{base}{SUFFIX_EDITION}"))
            .and_then(|text| text.parse::<Edition>().ok());
        let executable = map
            .get(&format!("{base}{SUFFIX_EXECUTABLE}"))
            .cloned()
            .unwrap_or_else(|| "powershell.exe".to_string());

        let tool = Installation::from_persisted(bitness, edition, version, home.into(), executable);
        let key =
            RegistryKey::Legacy(format!("{}_{}_{bitness}", edition_label(&tool), tool.version()));
        found.push((key, tool));
    }
    found
}
