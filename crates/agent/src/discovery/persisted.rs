//! Fallback source: installations recorded by a prior session in the flat
//! parameter store. Only consulted when the current discovery pass finds
//! nothing; records register under their legacy composite keys.

use pwsh_runner_core::params::read_persisted;
use pwsh_runner_core::registry::ToolRegistry;
use std::collections::HashMap;

pub struct PersistedToolSource {
    params: HashMap<String, String>,
}

impl PersistedToolSource {
    pub fn new(params: HashMap<String, String>) -> Self {
        Self { params }
    }

    /// Registers every well-formed persisted record; returns how many landed.
    pub fn register_into(&self, registry: &mut ToolRegistry) -> usize {
        let mut registered = 0;
        for (key, tool) in read_persisted(&self.params) {
            if registry.register_keyed(key, tool) {
                registered += 1;
            }
        }
        registered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwsh_runner_core::registry::SelectionConstraints;
    use pwsh_runner_core::types::{Bitness, Edition};

    #[test]
    fn prior_session_records_become_selectable() {
        let params = HashMap::from([
            ("powershell_x64".to_string(), "5.1".to_string()),
            ("powershell_x64_Path".to_string(), "C:\\WindowsPowerShell".to_string()),
            ("powershell_x64_Edition".to_string(), "Desktop".to_string()),
        ]);

        let mut registry = ToolRegistry::new();
        let source = PersistedToolSource::new(params);
        assert_eq!(source.register_into(&mut registry), 1);
        // A second pass is idempotent.
        assert_eq!(source.register_into(&mut registry), 0);

        let tool = registry.select(&SelectionConstraints::any()).unwrap();
        assert_eq!(tool.bitness(), Bitness::X64);
        assert_eq!(tool.edition(), Some(Edition::Desktop));
    }
}
