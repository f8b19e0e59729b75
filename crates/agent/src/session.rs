//! Session bootstrap: one registry per agent session, populated before any
//! build step reads it.

use crate::discovery::PersistedToolSource;
use pwsh_runner_core::registry::{Discoverer, ToolRegistry};

/// Runs every discoverer and returns the populated registry handle. When the
/// current pass finds nothing, records persisted by a prior session are
/// registered as a fallback.
pub fn detect_tools(
    discoverers: &[Box<dyn Discoverer>],
    persisted: Option<&PersistedToolSource>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.populate(discoverers);

    if registry.is_empty() {
        if let Some(source) = persisted {
            let restored = source.register_into(&mut registry);
            if restored > 0 {
                tracing::debug!("Restored {restored} installation(s) from a prior session");
            }
        }
    }

    tracing::debug!("Session registry holds {} installation(s)", registry.len());
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwsh_runner_core::error::Result;
    use pwsh_runner_core::registry::SelectionConstraints;
    use pwsh_runner_core::types::{Bitness, Edition, Installation, ToolVersion};
    use std::collections::HashMap;

    struct FixedDiscoverer(Vec<Installation>);

    impl Discoverer for FixedDiscoverer {
        fn source_name(&self) -> &str {
            "fixed"
        }

        fn discover(&self) -> Result<Vec<Installation>> {
            Ok(self.0.clone())
        }
    }

    fn persisted_desktop() -> PersistedToolSource {
        PersistedToolSource::new(HashMap::from([
            ("powershell_x86".to_string(), "5.1".to_string()),
            ("powershell_x86_Path".to_string(), "C:\\WindowsPowerShell".to_string()),
            ("powershell_x86_Edition".to_string(), "Desktop".to_string()),
        ]))
    }

    #[test]
    fn persisted_fallback_used_only_when_discovery_is_empty() {
        let live = Installation::path_lookup(
            Bitness::X64,
            Some(Edition::Core),
            ToolVersion::parse("7.4").unwrap(),
            "pwsh",
        );
        let discoverers: Vec<Box<dyn Discoverer>> =
            vec![Box::new(FixedDiscoverer(vec![live]))];

        let registry = detect_tools(&discoverers, Some(&persisted_desktop()));
        assert_eq!(registry.len(), 1);
        let tool = registry.select(&SelectionConstraints::any()).unwrap();
        assert_eq!(tool.edition(), Some(Edition::Core));
    }

    #[test]
    fn empty_discovery_falls_back_to_persisted() {
        let discoverers: Vec<Box<dyn Discoverer>> =
            vec![Box::new(FixedDiscoverer(Vec::new()))];
        let registry = detect_tools(&discoverers, Some(&persisted_desktop()));
        assert_eq!(registry.len(), 1);
        let tool = registry.select(&SelectionConstraints::any()).unwrap();
        assert_eq!(tool.edition(), Some(Edition::Desktop));
    }
}
