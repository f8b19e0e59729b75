//! pwsh-runner-core - tool selection and command-line assembly for
//! PowerShell build steps
//!
//! This crate provides functionality to:
//! - Aggregate interpreter installations discovered by independent probes
//!   into a session registry
//! - Resolve the best-matching installation for a step's constraints with
//!   documented tie-break rules
//! - Assemble the argument vector (and wrapper-embeddable command string)
//!   for stdin- and file-based script invocation
//! - Materialize inline script bodies into temp files with the right
//!   encoding policy
pub mod command;
pub mod error;
pub mod params;
pub mod registry;
pub mod script;
pub mod types;

// Re-export commonly used types
pub use command::{CommandLine, build_arguments, build_command_line, tokenize};
pub use error::{Error, Result};
pub use params::{ExecutionMode, RunnerParams, ScriptMode};
pub use registry::{Discoverer, SelectionConstraints, ToolRegistry};
pub use script::{Ownership, ResolvedScript, StepDirs};
pub use types::{Bitness, Edition, HostPlatform, Installation, ToolHome, ToolVersion};
