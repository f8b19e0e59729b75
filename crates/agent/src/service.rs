//! Per-step driver: select the tool, materialize the script, assemble the
//! command, and wrap it for the host shell when stdin redirection is needed.

use pwsh_runner_core::command::build_command_line;
use pwsh_runner_core::error::Result;
use pwsh_runner_core::params::{ExecutionMode, RunnerParams};
use pwsh_runner_core::registry::ToolRegistry;
use pwsh_runner_core::script::{self, Ownership, StepDirs};
use pwsh_runner_core::types::HostPlatform;
use pwsh_runner_core::CommandLine;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Set by the caller to pre-select an execution policy; never overridden.
pub const POLICY_ENV_VAR: &str = "PSExecutionPolicyPreference";

/// The policy bypass pair is only meaningful where the Windows policy
/// machinery exists, and a caller-set preference always wins.
pub fn should_use_execution_policy(platform: HostPlatform, policy_env: Option<&str>) -> bool {
    platform.is_windows() && policy_env.map(str::trim).unwrap_or("").is_empty()
}

/// Generated files the step must delete once it finishes, success or not.
#[derive(Debug, Default)]
pub struct CleanupList {
    files: Vec<PathBuf>,
    keep: bool,
}

impl CleanupList {
    pub fn new(keep_generated_files: bool) -> Self {
        Self {
            files: Vec::new(),
            keep: keep_generated_files,
        }
    }

    pub fn track(&mut self, path: PathBuf) {
        self.files.push(path);
    }

    pub fn tracked(&self) -> &[PathBuf] {
        &self.files
    }

    /// Best-effort deletion. Failures are logged, never raised; a file that
    /// is already gone counts as deleted.
    pub fn cleanup(&self) {
        if self.keep {
            tracing::debug!("Keeping {} generated file(s)", self.files.len());
            return;
        }
        for path in &self.files {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => {
                    tracing::warn!("Failed to delete {}: {err}", path.display());
                }
            }
        }
    }
}

/// Everything the external process launcher needs for one step.
#[derive(Debug)]
pub struct StepCommand {
    /// What to actually invoke: the interpreter itself, or the generated
    /// wrapper when the shell has to provide stdin redirection
    pub program: PathBuf,
    pub args: Vec<String>,
    /// The underlying interpreter invocation, for logging
    pub command_line: CommandLine,
    pub cleanup: CleanupList,
}

/// Resolves and assembles the full invocation for one build step. Pure with
/// respect to the registry; writes only temp files.
pub fn run_step(
    registry: &ToolRegistry,
    params: &RunnerParams,
    dirs: &StepDirs,
    platform: HostPlatform,
    policy_env: Option<&str>,
) -> Result<StepCommand> {
    let tool = registry.select(&params.constraints())?;
    tracing::debug!("Selected {tool}");

    let mut cleanup = CleanupList::new(params.keep_generated_files);
    let resolved = script::resolve(params, dirs)?;
    if resolved.ownership == Ownership::Owned {
        cleanup.track(resolved.path.clone());
    }

    let use_policy = should_use_execution_policy(platform, policy_env);
    let command_line = build_command_line(tool, params, &resolved.path, platform, use_policy)?;

    let (program, args) = match params.execution_mode {
        ExecutionMode::File => (command_line.executable.clone(), command_line.args.clone()),
        ExecutionMode::Stdin => {
            // The interpreter cannot consume `<` itself; hand the rendered
            // line to a shell wrapper.
            let wrapper = write_wrapper(&command_line, platform, &dirs.temp)?;
            cleanup.track(wrapper.clone());
            (wrapper, Vec::new())
        }
    };

    Ok(StepCommand {
        program,
        args,
        command_line,
        cleanup,
    })
}

/// Writes the platform's wrapper script embedding the rendered command line.
fn write_wrapper(
    command: &CommandLine,
    platform: HostPlatform,
    temp_dir: &Path,
) -> Result<PathBuf> {
    let line = command.render(platform);
    let (suffix, body) = match platform {
        HostPlatform::Windows => (".cmd", format!("@{line}\r\n")),
        HostPlatform::Unix => (".sh", format!("#!/bin/sh\n{line}\n")),
    };

    let mut file = tempfile::Builder::new()
        .prefix("powershell_wrapper_")
        .suffix(suffix)
        .tempfile_in(temp_dir)?;
    file.write_all(body.as_bytes())?;
    file.flush()?;
    let (_, path) = file
        .keep()
        .map_err(|e| pwsh_runner_core::Error::IoError(e.error))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
    }

    tracing::debug!("Wrote wrapper {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_applies_only_on_windows_without_caller_preference() {
        assert!(should_use_execution_policy(HostPlatform::Windows, None));
        assert!(should_use_execution_policy(HostPlatform::Windows, Some("  ")));
        assert!(!should_use_execution_policy(
            HostPlatform::Windows,
            Some("RemoteSigned")
        ));
        assert!(!should_use_execution_policy(HostPlatform::Unix, None));
    }

    #[test]
    fn cleanup_tolerates_missing_files() {
        let mut list = CleanupList::new(false);
        list.track(PathBuf::from("/nonexistent/generated.ps1"));
        list.cleanup();
    }

    #[test]
    fn cleanup_honors_keep_flag() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("generated.ps1");
        std::fs::write(&file, "x").unwrap();

        let mut list = CleanupList::new(true);
        list.track(file.clone());
        list.cleanup();
        assert!(file.exists());

        let mut list = CleanupList::new(false);
        list.track(file.clone());
        list.cleanup();
        assert!(!file.exists());
    }
}
