//! Config schema and deserialization

use crate::builder::ReportOptions;
use crate::image::ImageFormat;
use crate::Theme;
use serde::Deserialize;
use std::path::PathBuf;

/// Root config structure for .testlogrc.json
///
/// Every field is optional so a config can override only what it needs;
/// unset fields fall back to the extended config, then to
/// [`ReportOptions::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default)]
    pub extends: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    /// Keep the banner pinned to the top of the page
    #[serde(default)]
    pub sticky_header: Option<bool>,

    /// Script version shown as a badge next to the title
    #[serde(default)]
    pub version: Option<String>,

    /// Sections can be folded by clicking their header
    #[serde(default)]
    pub collapsible: Option<bool>,

    /// Directory that relative output paths are resolved against
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    #[serde(default)]
    pub default_theme: Option<Theme>,

    /// Format assumed for plots added without an explicit one
    #[serde(default)]
    pub image_format: Option<ImageFormat>,
}

impl Config {
    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.title.is_none() {
            self.title = base.title;
        }
        if self.sticky_header.is_none() {
            self.sticky_header = base.sticky_header;
        }
        if self.version.is_none() {
            self.version = base.version;
        }
        if self.collapsible.is_none() {
            self.collapsible = base.collapsible;
        }
        if self.output_dir.is_none() {
            self.output_dir = base.output_dir;
        }
        if self.default_theme.is_none() {
            self.default_theme = base.default_theme;
        }
        if self.image_format.is_none() {
            self.image_format = base.image_format;
        }
    }

    /// Report options with unset fields taken from the defaults
    pub fn options(&self) -> ReportOptions {
        let defaults = ReportOptions::default();
        ReportOptions {
            title: self.title.clone().unwrap_or(defaults.title),
            sticky_header: self.sticky_header.unwrap_or(defaults.sticky_header),
            version: self.version.clone().or(defaults.version),
            collapsible: self.collapsible.unwrap_or(defaults.collapsible),
            default_theme: self.default_theme.unwrap_or(defaults.default_theme),
            output_dir: self.output_dir.clone().or(defaults.output_dir),
            image_format: self.image_format.unwrap_or(defaults.image_format),
            timestamp: defaults.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_gives_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.options(), ReportOptions::default());
    }

    #[test]
    fn test_camel_case_fields() {
        let config: Config = serde_json::from_str(
            r#"{
                "title": "PIA2 PreTest",
                "stickyHeader": true,
                "version": "0.1.2",
                "collapsible": true,
                "outputDir": "reports",
                "defaultTheme": "dark",
                "imageFormat": "svg"
            }"#,
        )
        .unwrap();
        let options = config.options();
        assert_eq!(options.title, "PIA2 PreTest");
        assert!(options.sticky_header);
        assert_eq!(options.version.as_deref(), Some("0.1.2"));
        assert!(options.collapsible);
        assert_eq!(options.output_dir, Some(PathBuf::from("reports")));
        assert_eq!(options.default_theme, Theme::Dark);
        assert_eq!(options.image_format, ImageFormat::Svg);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<Config, _> = serde_json::from_str(r#"{ "stickyBanner": true }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_keeps_child_values() {
        let mut child = Config {
            title: Some("Child".into()),
            ..Config::default()
        };
        let base = Config {
            title: Some("Base".into()),
            collapsible: Some(true),
            ..Config::default()
        };
        child.merge_from(base);
        assert_eq!(child.title.as_deref(), Some("Child"));
        assert_eq!(child.collapsible, Some(true));
    }
}
