//! Optional user overrides from config.toml

use crate::config::{Preset, Theme, TreeConfig};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of `config.toml`. Every field is optional and overrides the default.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub tree: TreeSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TreeSettings {
    pub depth: Option<u32>,
    pub angle: Option<f64>,
    pub length: Option<f64>,
    pub shrink: Option<f64>,
    pub thickness: Option<f64>,
    pub randomness: Option<f64>,
    pub leaf_mode: Option<bool>,
    pub preset: Option<Preset>,
    pub wind: Option<bool>,
    pub wind_strength: Option<f64>,
    pub wind_speed: Option<f64>,
    pub grow: Option<bool>,
    pub grow_speed: Option<u32>,
    pub theme: Option<Theme>,
    pub seed: Option<u64>,
}

impl Settings {
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                log::warn!("ignoring {}: {}", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                log::warn!("cannot read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fractree")
            .join("config.toml")
    }
}

impl TreeSettings {
    /// Overlay the fields that are set onto `config`
    pub fn apply(&self, mut config: TreeConfig) -> TreeConfig {
        if let Some(v) = self.depth {
            config.depth = v;
        }
        if let Some(v) = self.angle {
            config.angle = v;
        }
        if let Some(v) = self.length {
            config.length = v;
        }
        if let Some(v) = self.shrink {
            config.shrink = v;
        }
        if let Some(v) = self.thickness {
            config.thickness = v;
        }
        if let Some(v) = self.randomness {
            config.randomness = v;
        }
        if let Some(v) = self.leaf_mode {
            config.leaf_mode = v;
        }
        if let Some(v) = self.preset {
            config.preset = v;
        }
        if let Some(v) = self.wind {
            config.wind = v;
        }
        if let Some(v) = self.wind_strength {
            config.wind_strength = v;
        }
        if let Some(v) = self.wind_speed {
            config.wind_speed = v;
        }
        if let Some(v) = self.grow {
            config.grow = v;
        }
        if let Some(v) = self.grow_speed {
            config.grow_speed = v;
        }
        if let Some(v) = self.theme {
            config.theme = v;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_keeps_defaults() {
        let settings = Settings::parse("").unwrap();
        assert_eq!(settings.tree.apply(TreeConfig::default()), TreeConfig::default());
    }

    #[test]
    fn tree_section_overrides_fields() {
        let settings = Settings::parse(
            r#"
            [tree]
            depth = 7
            preset = "autumn"
            theme = "snow"
            wind = false
            seed = 99
            "#,
        )
        .unwrap();
        let config = settings.tree.apply(TreeConfig::default());
        assert_eq!(config.depth, 7);
        assert_eq!(config.preset, Preset::Autumn);
        assert_eq!(config.theme, Theme::Snow);
        assert!(!config.wind);
        assert_eq!(config.angle, TreeConfig::default().angle);
        assert_eq!(settings.tree.seed, Some(99));
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(Settings::parse("[tree]\npreset = \"summer\"").is_err());
        assert!(Settings::parse("[tree]\ndepth = -3").is_err());
        assert!(Settings::parse("[tree]\ndpeth = 3").is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let settings = Settings::load_from(Path::new("/nonexistent/fractree/config.toml"));
        assert!(settings.tree.depth.is_none());
    }
}
