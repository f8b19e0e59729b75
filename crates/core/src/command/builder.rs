//! Argument-vector assembly for a resolved installation.
//!
//! Token order is fixed and positional consumers depend on it: version pin,
//! profile suppression, non-interactive flag, custom arguments, execution
//! policy, then the mode-specific script invocation.

use crate::error::{Error, Result};
use crate::params::{ExecutionMode, RunnerParams};
use crate::types::{Edition, HostPlatform, Installation};
use std::path::Path;

use super::CommandLine;
use super::tokenizer::tokenize;

pub const FLAG_VERSION: &str = "-Version";
pub const FLAG_NO_PROFILE: &str = "-NoProfile";
pub const FLAG_NON_INTERACTIVE: &str = "-NonInteractive";
pub const FLAG_EXECUTION_POLICY: &str = "-ExecutionPolicy";
pub const EXECUTION_POLICY_VALUE: &str = "ByPass";
pub const FLAG_COMMAND: &str = "-Command";
pub const FLAG_FILE: &str = "-File";

const SCRIPT_EXTENSION: &str = "ps1";

/// Whether `-Version` pinning works for this installation: only the legacy
/// Desktop line on Windows understands it, and only for verified installs.
pub fn supports_explicit_version(platform: HostPlatform, tool: &Installation) -> bool {
    platform.is_windows() && tool.edition() == Some(Edition::Desktop) && !tool.is_path_lookup()
}

/// Builds the argument vector following the resolved executable.
pub fn build_arguments(
    tool: &Installation,
    params: &RunnerParams,
    script_path: &Path,
    platform: HostPlatform,
    use_execution_policy: bool,
) -> Result<Vec<String>> {
    let mut args = Vec::new();

    if let Some(min_version) = &params.min_version {
        if supports_explicit_version(platform, tool) {
            args.push(FLAG_VERSION.to_string());
            args.push(min_version.to_string());
        }
    }

    if params.no_profile {
        args.push(FLAG_NO_PROFILE.to_string());
    }

    args.push(FLAG_NON_INTERACTIVE.to_string());

    args.extend(tokenize(&params.additional_args, params.multiline_args));

    // Never emit the policy pair twice; the user may have set it themselves.
    if use_execution_policy && !contains_policy_flag(&args) {
        args.push(FLAG_EXECUTION_POLICY.to_string());
        args.push(EXECUTION_POLICY_VALUE.to_string());
    }

    let script = script_path.to_string_lossy().into_owned();
    match params.execution_mode {
        ExecutionMode::Stdin => {
            args.push(FLAG_COMMAND.to_string());
            args.push("-".to_string());
            args.push("<".to_string());
            args.push(script);
        }
        ExecutionMode::File => {
            let is_ps1 = script_path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(SCRIPT_EXTENSION));
            if !is_ps1 {
                return Err(Error::ConfigError(format!(
                    "file-mode script '{script}' must have a .{SCRIPT_EXTENSION} extension"
                )));
            }
            args.push(FLAG_FILE.to_string());
            args.push(script);
            args.extend(tokenize(&params.script_args, params.multiline_args));
        }
    }

    tracing::debug!("Assembled arguments: {args:?}");
    Ok(args)
}

/// Full command line (executable plus arguments) for the step.
pub fn build_command_line(
    tool: &Installation,
    params: &RunnerParams,
    script_path: &Path,
    platform: HostPlatform,
    use_execution_policy: bool,
) -> Result<CommandLine> {
    Ok(CommandLine {
        executable: tool.executable_path(),
        args: build_arguments(tool, params, script_path, platform, use_execution_policy)?,
    })
}

fn contains_policy_flag(args: &[String]) -> bool {
    let needle = FLAG_EXECUTION_POLICY.to_ascii_lowercase();
    args.iter()
        .any(|token| token.to_ascii_lowercase().contains(&needle))
}
