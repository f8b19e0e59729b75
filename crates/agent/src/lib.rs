//! pwsh-runner-agent - build-step driver for PowerShell steps
//!
//! Bootstraps the per-session installation registry from concrete discovery
//! strategies, then drives each step: tool selection, script
//! materialization, command assembly, shell wrapping, and temp-file
//! cleanup. Process launching itself belongs to the host runner.
pub mod discovery;
pub mod service;
pub mod session;

pub use discovery::{FileSystemDiscoverer, PathLookupDiscoverer, PersistedToolSource, ProbeRoot};
pub use service::{CleanupList, POLICY_ENV_VAR, StepCommand, run_step, should_use_execution_policy};
pub use session::detect_tools;
