//! Best-match selection over registered installations.
//!
//! Constraints are applied as successive filters; remaining ambiguity is
//! resolved by fixed tie-break policy: prefer the Desktop edition, then
//! prefer x64, then take the maximum version. Edition resolves before
//! bitness on purpose: script semantics differ between editions, raw
//! throughput does not.

use crate::types::{Bitness, Edition, Installation, ToolVersion};
use std::fmt;

/// Per-build-step selection constraints; `None` means unconstrained.
#[derive(Debug, Clone, Default)]
pub struct SelectionConstraints {
    pub bitness: Option<Bitness>,
    pub min_version: Option<ToolVersion>,
    pub edition: Option<Edition>,
}

impl SelectionConstraints {
    pub fn any() -> Self {
        Self::default()
    }
}

impl fmt::Display for SelectionConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edition = self
            .edition
            .map(|e| e.to_string())
            .unwrap_or_else(|| "any edition".to_string());
        let bitness = self
            .bitness
            .map(|b| b.to_string())
            .unwrap_or_else(|| "any bitness".to_string());
        let version = self
            .min_version
            .as_ref()
            .map(|v| format!("version >= {v}"))
            .unwrap_or_else(|| "any version".to_string());
        write!(f, "{edition}, {bitness}, {version}")
    }
}

/// Applies the filter/tie-break algorithm over `candidates` in encounter
/// order. Pure read; returns `None` when nothing satisfies the constraints.
pub fn select<'a>(
    candidates: impl IntoIterator<Item = &'a Installation>,
    constraints: &SelectionConstraints,
) -> Option<&'a Installation> {
    let mut remaining: Vec<&Installation> = candidates
        .into_iter()
        .filter(|tool| match constraints.edition {
            Some(edition) => tool.edition() == Some(edition),
            None => true,
        })
        .filter(|tool| match &constraints.min_version {
            Some(min) => tool.version() >= min,
            None => true,
        })
        .filter(|tool| match constraints.bitness {
            Some(bitness) => tool.bitness() == bitness,
            None => true,
        })
        .collect();

    if remaining.is_empty() {
        return None;
    }
    if remaining.len() == 1 {
        return Some(remaining[0]);
    }

    // Unconstrained edition: prefer the Desktop partition, else the Core
    // partition. Edition-less legacy records survive only when neither
    // partition is populated.
    if constraints.edition.is_none() {
        remaining = prefer(remaining, |tool| tool.edition() == Some(Edition::Desktop));
        if remaining.len() > 1 {
            remaining = prefer(remaining, |tool| tool.edition() == Some(Edition::Core));
        }
        if remaining.len() == 1 {
            return Some(remaining[0]);
        }
    }

    // Unconstrained bitness: prefer x64, fall back to x86.
    if constraints.bitness.is_none() {
        remaining = prefer(remaining, |tool| tool.bitness() == Bitness::X64);
        if remaining.len() == 1 {
            return Some(remaining[0]);
        }
    }

    // Same edition and bitness, differing only by version: take the maximum.
    // Exact version ties keep the first-encountered record.
    remaining
        .into_iter()
        .reduce(|best, tool| if tool.version() > best.version() { tool } else { best })
}

fn prefer<'a, F>(candidates: Vec<&'a Installation>, preferred: F) -> Vec<&'a Installation>
where
    F: Fn(&Installation) -> bool,
{
    let (hits, misses): (Vec<_>, Vec<_>) = candidates.into_iter().partition(|t| preferred(t));
    if hits.is_empty() { misses } else { hits }
}
