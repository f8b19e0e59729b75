use serde::{Deserialize, Serialize};

/// Host operating-system family, as far as shell and quoting rules care.
///
/// Passed explicitly so platform-gated behavior stays testable on any host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostPlatform {
    Windows,
    Unix,
}

impl HostPlatform {
    pub fn current() -> Self {
        if cfg!(windows) {
            HostPlatform::Windows
        } else {
            HostPlatform::Unix
        }
    }

    pub fn is_windows(self) -> bool {
        self == HostPlatform::Windows
    }
}
