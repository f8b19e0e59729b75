use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A dotted interpreter version with an optional pre-release suffix.
///
/// Comparison is numeric per segment, never lexical: `10.0` sorts after
/// `9.0`. Missing trailing segments count as zero, so `5.1` equals `5.1.0`.
/// When numeric prefixes are equal, a version without a suffix sorts after
/// any pre-release (`7.0.0` > `7.0.0-rc.1`), and two suffixes compare
/// lexically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToolVersion {
    raw: String,
    segments: Vec<u64>,
    suffix: Option<String>,
}

impl ToolVersion {
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::ConfigError("version string is empty".to_string()));
        }

        let (numeric, suffix) = match trimmed.split_once('-') {
            Some((head, tail)) => (head, Some(tail.to_string())),
            None => (trimmed, None),
        };

        let mut segments = Vec::new();
        for part in numeric.split('.') {
            let value = part.parse::<u64>().map_err(|_| {
                Error::ConfigError(format!("invalid version segment '{part}' in '{trimmed}'"))
            })?;
            segments.push(value);
        }

        Ok(Self {
            raw: trimmed.to_string(),
            segments,
            suffix,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for ToolVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ToolVersion {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ToolVersion> for String {
    fn from(version: ToolVersion) -> String {
        version.raw
    }
}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Ord for ToolVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let a = self.segments.get(i).copied().unwrap_or(0);
            let b = other.segments.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }

        // Release sorts after any pre-release at an equal numeric prefix.
        match (&self.suffix, &other.suffix) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for ToolVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ToolVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ToolVersion {}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> ToolVersion {
        ToolVersion::parse(text).unwrap()
    }

    #[test]
    fn numeric_segments_compare_numerically() {
        assert!(v("10.0") > v("9.0"));
        assert!(v("2.0") < v("10.0"));
        assert!(v("5.1") > v("5.0.10"));
    }

    #[test]
    fn missing_segments_are_zero() {
        assert_eq!(v("5.1"), v("5.1.0"));
        assert!(v("5.1.1") > v("5.1"));
    }

    #[test]
    fn release_sorts_after_prerelease() {
        assert!(v("7.0.0") > v("7.0.0-rc.1"));
        assert!(v("6.0.0-beta.1") < v("6.0.0-beta.9"));
    }

    #[test]
    fn comparison_is_transitive() {
        let (a, b, c) = (v("6.2.4"), v("7.0.0-rc.1"), v("7.0.0"));
        assert!(a < b);
        assert!(b < c);
        assert!(a < c);
    }

    #[test]
    fn rejects_blank_and_garbage() {
        assert!(ToolVersion::parse("").is_err());
        assert!(ToolVersion::parse("   ").is_err());
        assert!(ToolVersion::parse("five.one").is_err());
    }

    #[test]
    fn display_round_trips_raw_text() {
        assert_eq!(v("7.4.1").to_string(), "7.4.1");
        assert_eq!(v(" 5.1 ").to_string(), "5.1");
    }
}
