//! Typed runner parameters.
//!
//! The host hands the step a flat string map; it is validated into
//! [`RunnerParams`] once at the boundary so the engine only ever sees typed
//! values. Free-text argument blocks stay raw strings and are tokenized
//! later.

mod store;

pub use store::{flatten_into, read_persisted};

use crate::error::{Error, Result};
use crate::registry::SelectionConstraints;
use crate::types::{Bitness, Edition, ToolVersion};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// How the script reaches the interpreter: piped through stdin or passed as
/// a file argument. Persisted per build step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    Stdin,
    File,
}

impl FromStr for ExecutionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdin" => Ok(ExecutionMode::Stdin),
            "file" => Ok(ExecutionMode::File),
            other => Err(Error::ConfigError(format!(
                "unsupported execution mode '{other}'"
            ))),
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Stdin => f.write_str("stdin"),
            ExecutionMode::File => f.write_str("file"),
        }
    }
}

/// Where the script body comes from: inline text or an existing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptMode {
    Code,
    File,
}

impl FromStr for ScriptMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "code" => Ok(ScriptMode::Code),
            "file" => Ok(ScriptMode::File),
            other => Err(Error::ConfigError(format!(
                "unsupported script mode '{other}'"
            ))),
        }
    }
}

// Recognized runner parameter keys
pub const PARAM_EXECUTION_MODE: &str = "powershell.execution_mode";
pub const PARAM_SCRIPT_MODE: &str = "powershell.script_mode";
pub const PARAM_SCRIPT_FILE: &str = "powershell.script_file";
pub const PARAM_SCRIPT_CODE: &str = "powershell.script_code";
pub const PARAM_BITNESS: &str = "powershell.bitness";
pub const PARAM_EDITION: &str = "powershell.edition";
pub const PARAM_MIN_VERSION: &str = "powershell.min_version";
pub const PARAM_ADDITIONAL_ARGS: &str = "powershell.additional_args";
pub const PARAM_SCRIPT_ARGS: &str = "powershell.script_args";
pub const PARAM_NO_PROFILE: &str = "powershell.no_profile";
pub const PARAM_MULTILINE_ARGS: &str = "powershell.multiline_args";
pub const PARAM_ERROR_TO_ERROR: &str = "powershell.error_to_error";
pub const PARAM_KEEP_GENERATED: &str = "powershell.keep_generated_files";

/// Every recognized option of a PowerShell build step, already typed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RunnerParams {
    pub execution_mode: ExecutionMode,
    pub script_mode: ScriptMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitness: Option<Bitness>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition: Option<Edition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_version: Option<ToolVersion>,
    /// Free text appended to the interpreter's own arguments
    #[serde(default)]
    pub additional_args: String,
    /// Free text appended after the script path in file mode
    #[serde(default)]
    pub script_args: String,
    #[serde(default)]
    pub no_profile: bool,
    /// Collapse line breaks in argument blocks to a single logical line
    #[serde(default)]
    pub multiline_args: bool,
    #[serde(default)]
    pub error_to_error: bool,
    #[serde(default)]
    pub keep_generated_files: bool,
}

impl RunnerParams {
    /// Validates the host's flat parameter map into typed values. Fails on
    /// the first unrecognized or missing required value.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self> {
        let execution_mode = required(map, PARAM_EXECUTION_MODE)?.parse()?;
        let script_mode = required(map, PARAM_SCRIPT_MODE)?.parse()?;

        Ok(Self {
            execution_mode,
            script_mode,
            script_file: non_blank(map, PARAM_SCRIPT_FILE),
            script_code: map.get(PARAM_SCRIPT_CODE).cloned(),
            bitness: parse_opt(map, PARAM_BITNESS)?,
            edition: parse_opt(map, PARAM_EDITION)?,
            min_version: parse_opt(map, PARAM_MIN_VERSION)?,
            additional_args: map.get(PARAM_ADDITIONAL_ARGS).cloned().unwrap_or_default(),
            script_args: map.get(PARAM_SCRIPT_ARGS).cloned().unwrap_or_default(),
            no_profile: flag(map, PARAM_NO_PROFILE),
            multiline_args: flag(map, PARAM_MULTILINE_ARGS),
            error_to_error: flag(map, PARAM_ERROR_TO_ERROR),
            keep_generated_files: flag(map, PARAM_KEEP_GENERATED),
        })
    }

    /// Selection constraints carried by this step
    pub fn constraints(&self) -> SelectionConstraints {
        SelectionConstraints {
            bitness: self.bitness,
            min_version: self.min_version.clone(),
            edition: self.edition,
        }
    }
}

fn required<'a>(map: &'a HashMap<String, String>, key: &str) -> Result<&'a str> {
    map.get(key)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::ConfigError(format!("required parameter '{key}' is missing")))
}

fn non_blank(map: &HashMap<String, String>, key: &str) -> Option<String> {
    map.get(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_opt<T: FromStr<Err = Error>>(
    map: &HashMap<String, String>,
    key: &str,
) -> Result<Option<T>> {
    match non_blank(map, key) {
        Some(value) => Ok(Some(value.parse()?)),
        None => Ok(None),
    }
}

fn flag(map: &HashMap<String, String>, key: &str) -> bool {
    map.get(key)
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_map() -> HashMap<String, String> {
        HashMap::from([
            (PARAM_EXECUTION_MODE.to_string(), "file".to_string()),
            (PARAM_SCRIPT_MODE.to_string(), "file".to_string()),
            (PARAM_SCRIPT_FILE.to_string(), "build.ps1".to_string()),
        ])
    }

    #[test]
    fn parses_a_minimal_file_step() {
        let params = RunnerParams::from_map(&base_map()).unwrap();
        assert_eq!(params.execution_mode, ExecutionMode::File);
        assert_eq!(params.script_mode, ScriptMode::File);
        assert_eq!(params.script_file.as_deref(), Some("build.ps1"));
        assert!(!params.no_profile);
        assert!(params.min_version.is_none());
    }

    #[test]
    fn unknown_execution_mode_is_a_config_error() {
        let mut map = base_map();
        map.insert(PARAM_EXECUTION_MODE.to_string(), "telnet".to_string());
        let err = RunnerParams::from_map(&map).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn missing_execution_mode_is_a_config_error() {
        let mut map = base_map();
        map.remove(PARAM_EXECUTION_MODE);
        assert!(RunnerParams::from_map(&map).is_err());
    }

    #[test]
    fn typed_constraint_fields_parse() {
        let mut map = base_map();
        map.insert(PARAM_BITNESS.to_string(), "x86".to_string());
        map.insert(PARAM_EDITION.to_string(), "Core".to_string());
        map.insert(PARAM_MIN_VERSION.to_string(), "7.0".to_string());
        map.insert(PARAM_NO_PROFILE.to_string(), "TRUE".to_string());

        let params = RunnerParams::from_map(&map).unwrap();
        let constraints = params.constraints();
        assert_eq!(constraints.bitness, Some(Bitness::X86));
        assert_eq!(constraints.edition, Some(Edition::Core));
        assert_eq!(
            constraints.min_version,
            Some(ToolVersion::parse("7.0").unwrap())
        );
        assert!(params.no_profile);
    }

    #[test]
    fn deserializes_from_typed_json() {
        let params: RunnerParams = serde_json::from_str(
            r#"{
                "execution_mode": "stdin",
                "script_mode": "code",
                "script_code": "Write-Output 'hi'",
                "multiline_args": true
            }"#,
        )
        .unwrap();
        assert_eq!(params.execution_mode, ExecutionMode::Stdin);
        assert_eq!(params.script_mode, ScriptMode::Code);
        assert!(params.multiline_args);
    }
}
