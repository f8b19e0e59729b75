//! Script-body resolution: locating an existing script file or materializing
//! inline script text into a temp file the step can hand to the interpreter.

use crate::error::{Error, Result};
use crate::params::{ExecutionMode, RunnerParams, ScriptMode};
use std::io::Write;
use std::path::{Path, PathBuf};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Directories a build step resolves against
#[derive(Debug, Clone)]
pub struct StepDirs {
    pub working: PathBuf,
    pub checkout: PathBuf,
    pub temp: PathBuf,
}

/// Who deletes the script file once the step finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Pre-existing file; the step must leave it alone
    External,
    /// Generated for this step; the step's cleanup list deletes it
    Owned,
}

#[derive(Debug, Clone)]
pub struct ResolvedScript {
    pub path: PathBuf,
    pub ownership: Ownership,
}

/// Resolves the step's script body to a concrete on-disk file.
pub fn resolve(params: &RunnerParams, dirs: &StepDirs) -> Result<ResolvedScript> {
    match params.script_mode {
        ScriptMode::File => {
            let file = params.script_file.as_deref().ok_or_else(|| {
                Error::ConfigError("script file parameter is missing".to_string())
            })?;
            let path = locate(file, dirs)?;
            Ok(ResolvedScript {
                path,
                ownership: Ownership::External,
            })
        }
        ScriptMode::Code => {
            let code = params.script_code.as_deref().unwrap_or("");
            if code.trim().is_empty() {
                return Err(Error::ConfigError("script code is empty".to_string()));
            }
            let path = materialize(code, params.execution_mode, &dirs.temp)?;
            Ok(ResolvedScript {
                path,
                ownership: Ownership::Owned,
            })
        }
    }
}

/// Relative paths resolve against the working directory first, then the
/// checkout directory; the first existing match wins.
fn locate(file: &str, dirs: &StepDirs) -> Result<PathBuf> {
    let direct = Path::new(file);
    if direct.is_absolute() {
        if direct.is_file() {
            return Ok(direct.to_path_buf());
        }
        return Err(Error::ConfigError(format!("script file '{file}' does not exist")));
    }

    for base in [&dirs.working, &dirs.checkout] {
        let candidate = base.join(file);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    Err(Error::ConfigError(format!(
        "script file '{file}' not found in working or checkout directory"
    )))
}

/// Writes inline script text to a uniquely named temp file. Line endings are
/// normalized to CRLF; file-based invocation additionally gets a UTF-8 BOM
/// so the interpreter reads the encoding correctly.
fn materialize(code: &str, mode: ExecutionMode, temp_dir: &Path) -> Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix("powershell_")
        .suffix(".ps1")
        .tempfile_in(temp_dir)?;

    if mode == ExecutionMode::File {
        file.write_all(UTF8_BOM)?;
    }
    file.write_all(normalize_line_endings(code).as_bytes())?;
    file.flush()?;

    let (_, path) = file.keep().map_err(|e| Error::IoError(e.error))?;
    tracing::debug!("Materialized script body to {}", path.display());
    Ok(path)
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', "\r\n")
}
