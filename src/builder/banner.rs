//! Banner contents: label/value items and the script version badge

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Ordered label/value pair shown in the banner or an inline header panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub label: String,
    pub value: String,
}

impl NavItem {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Hue used when the version string cannot be parsed
pub const DEFAULT_BADGE_HUE: u16 = 210;

/// Version of the script that produced the report, shown next to the title.
///
/// Each version gets its own banner gradient so reports from different
/// script revisions are easy to tell apart at a glance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionBadge {
    pub version: String,
    pub hue: u16,
}

impl VersionBadge {
    pub fn new(version: impl Into<String>) -> Self {
        let version = version.into();
        let hue = version_hue(&version).unwrap_or(DEFAULT_BADGE_HUE);
        Self { version, hue }
    }

    /// Second gradient stop, offset around the color wheel
    pub fn accent_hue(&self) -> u16 {
        (self.hue + 40) % 360
    }
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*[vV]?(\d+)\.(\d+)(?:\.(\d+))?").expect("version pattern is valid")
    })
}

/// Map `major.minor[.patch]` to a hue in 0..360
pub fn version_hue(version: &str) -> Option<u16> {
    let caps = version_pattern().captures(version)?;
    let part = |i: usize| -> u64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };
    let mixed = part(1)
        .wrapping_mul(137)
        .wrapping_add(part(2).wrapping_mul(59))
        .wrapping_add(part(3).wrapping_mul(23));
    Some((mixed % 360) as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_hue_is_deterministic() {
        assert_eq!(version_hue("0.1.2"), version_hue("v0.1.2"));
        assert_eq!(version_hue("0.1.2"), Some((59 + 46) % 360));
        assert_ne!(version_hue("0.1.2"), version_hue("0.1.3"));
    }

    #[test]
    fn test_two_part_version() {
        assert_eq!(version_hue("1.0"), Some(137));
    }

    #[test]
    fn test_unparseable_version_uses_default() {
        assert_eq!(version_hue("nightly"), None);
        let badge = VersionBadge::new("nightly");
        assert_eq!(badge.hue, DEFAULT_BADGE_HUE);
        assert_eq!(badge.accent_hue(), 250);
    }
}
