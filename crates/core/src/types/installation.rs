use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::version::ToolVersion;

/// Processor word width targeted by an interpreter binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bitness {
    X86,
    X64,
}

impl fmt::Display for Bitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bitness::X86 => f.write_str("x86"),
            Bitness::X64 => f.write_str("x64"),
        }
    }
}

impl FromStr for Bitness {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x86" | "32" => Ok(Bitness::X86),
            "x64" | "64" => Ok(Bitness::X64),
            other => Err(Error::ConfigError(format!("unknown bitness '{other}'"))),
        }
    }
}

/// Product line of the interpreter: the legacy Windows-only line or the
/// cross-platform one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edition {
    Desktop,
    Core,
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edition::Desktop => f.write_str("Desktop"),
            Edition::Core => f.write_str("Core"),
        }
    }
}

impl FromStr for Edition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(Edition::Desktop),
            "core" => Ok(Edition::Core),
            other => Err(Error::ConfigError(format!("unknown edition '{other}'"))),
        }
    }
}

/// Where the interpreter binary lives.
///
/// `Installed` is a disk-verified install rooted at a home directory;
/// `PathLookup` is a synthetic fallback that defers to the OS executable
/// search path at run time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolHome {
    Installed { home: PathBuf, executable: String },
    PathLookup { executable: String },
}

impl ToolHome {
    /// Full path to hand to the process launcher. For `PathLookup` this is
    /// the bare executable name, never joined with a directory.
    pub fn executable_path(&self) -> PathBuf {
        match self {
            ToolHome::Installed { home, executable } => home.join(executable),
            ToolHome::PathLookup { executable } => PathBuf::from(executable),
        }
    }

    pub fn home_dir(&self) -> Option<&Path> {
        match self {
            ToolHome::Installed { home, .. } => Some(home),
            ToolHome::PathLookup { .. } => None,
        }
    }

    pub fn executable_name(&self) -> &str {
        match self {
            ToolHome::Installed { executable, .. } => executable,
            ToolHome::PathLookup { executable } => executable,
        }
    }
}

/// One discovered interpreter installation. Immutable after construction;
/// replacement means re-registration under the same or a new key.
///
/// Fields stay private so every record goes through a constructor: freshly
/// probed installs through [`Installation::verified`], PATH fallbacks
/// through [`Installation::path_lookup`], and prior-session records through
/// [`Installation::from_persisted`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installation {
    bitness: Bitness,
    /// Absent only for legacy records whose source never recorded one
    #[serde(skip_serializing_if = "Option::is_none")]
    edition: Option<Edition>,
    version: ToolVersion,
    home: ToolHome,
}

impl Installation {
    /// A disk-verified installation. The home directory must exist.
    pub fn verified(
        bitness: Bitness,
        edition: Option<Edition>,
        version: ToolVersion,
        home: PathBuf,
        executable: impl Into<String>,
    ) -> Result<Self> {
        if !home.is_dir() {
            return Err(Error::ConfigError(format!(
                "installation home {} is not a directory",
                home.display()
            )));
        }
        Ok(Self {
            bitness,
            edition,
            version,
            home: ToolHome::Installed {
                home,
                executable: executable.into(),
            },
        })
    }

    /// A synthetic fallback record resolved via PATH lookup at run time.
    pub fn path_lookup(
        bitness: Bitness,
        edition: Option<Edition>,
        version: ToolVersion,
        executable: impl Into<String>,
    ) -> Self {
        Self {
            bitness,
            edition,
            version,
            home: ToolHome::PathLookup {
                executable: executable.into(),
            },
        }
    }

    /// A record restored from a prior session's parameter store. The home
    /// directory is taken on trust: it was verified when the record was
    /// first discovered, and re-checking would drop installs whose tool
    /// directories are not mounted yet.
    pub fn from_persisted(
        bitness: Bitness,
        edition: Option<Edition>,
        version: ToolVersion,
        home: PathBuf,
        executable: impl Into<String>,
    ) -> Self {
        Self {
            bitness,
            edition,
            version,
            home: ToolHome::Installed {
                home,
                executable: executable.into(),
            },
        }
    }

    pub fn bitness(&self) -> Bitness {
        self.bitness
    }

    pub fn edition(&self) -> Option<Edition> {
        self.edition
    }

    pub fn version(&self) -> &ToolVersion {
        &self.version
    }

    pub fn home(&self) -> &ToolHome {
        &self.home
    }

    pub fn executable_path(&self) -> PathBuf {
        self.home.executable_path()
    }

    pub fn is_path_lookup(&self) -> bool {
        matches!(self.home, ToolHome::PathLookup { .. })
    }
}

impl fmt::Display for Installation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edition = self
            .edition
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        write!(
            f,
            "PowerShell {} {} {} at {}",
            edition,
            self.version,
            self.bitness,
            self.executable_path().display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(text: &str) -> ToolVersion {
        ToolVersion::parse(text).unwrap()
    }

    #[test]
    fn path_lookup_uses_bare_executable_name() {
        let tool = Installation::path_lookup(
            Bitness::X64,
            Some(Edition::Core),
            version("7.4"),
            "pwsh",
        );
        assert_eq!(tool.executable_path(), PathBuf::from("pwsh"));
        assert!(tool.is_path_lookup());
    }

    #[test]
    fn installed_joins_home_and_executable() {
        let dir = tempfile::tempdir().unwrap();
        let tool = Installation::verified(
            Bitness::X64,
            Some(Edition::Core),
            version("7.4"),
            dir.path().to_path_buf(),
            "pwsh",
        )
        .unwrap();
        assert_eq!(tool.executable_path(), dir.path().join("pwsh"));
        assert!(!tool.is_path_lookup());
    }

    #[test]
    fn verified_rejects_missing_home() {
        let result = Installation::verified(
            Bitness::X86,
            Some(Edition::Desktop),
            version("5.1"),
            PathBuf::from("/nonexistent/powershell/home"),
            "powershell.exe",
        );
        assert!(result.is_err());
    }

    #[test]
    fn persisted_records_skip_the_directory_check() {
        let tool = Installation::from_persisted(
            Bitness::X86,
            Some(Edition::Desktop),
            version("5.1"),
            PathBuf::from("/not/mounted/yet"),
            "powershell.exe",
        );
        assert!(!tool.is_path_lookup());
        assert_eq!(
            tool.executable_path(),
            PathBuf::from("/not/mounted/yet/powershell.exe")
        );
    }

    #[test]
    fn bitness_and_edition_parse_case_insensitively() {
        assert_eq!("X64".parse::<Bitness>().unwrap(), Bitness::X64);
        assert_eq!("x86".parse::<Bitness>().unwrap(), Bitness::X86);
        assert_eq!("desktop".parse::<Edition>().unwrap(), Edition::Desktop);
        assert_eq!("CORE".parse::<Edition>().unwrap(), Edition::Core);
        assert!("arm".parse::<Bitness>().is_err());
    }
}
