//! Tree parameters, presets and the slider ranges the front end enforces

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Per-level thickness reduction, fixed for every tree
pub const THICKNESS_SHRINK: f64 = 0.75;

/// Reference surface size
pub const CANVAS_WIDTH: u32 = 1000;
pub const CANVAS_HEIGHT: u32 = 650;

/// Slider ranges enforced by the front end. The core itself never validates.
pub mod limits {
    use std::ops::RangeInclusive;

    pub const DEPTH: RangeInclusive<u32> = 0..=14;
    pub const ANGLE: RangeInclusive<f64> = 0.0..=90.0;
    pub const LENGTH: RangeInclusive<f64> = 20.0..=250.0;
    pub const SHRINK: RangeInclusive<f64> = 0.40..=0.85;
    pub const THICKNESS: RangeInclusive<f64> = 1.0..=30.0;
    pub const RANDOMNESS: RangeInclusive<f64> = 0.0..=45.0;
    pub const WIND_STRENGTH: RangeInclusive<f64> = 0.0..=30.0;
    pub const WIND_SPEED: RangeInclusive<f64> = 0.1..=5.0;
    pub const GROW_SPEED: RangeInclusive<u32> = 1..=400;
}

/// Seasonal color presets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Spring,
    Autumn,
    Winter,
    Neon,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Spring, Preset::Autumn, Preset::Winter, Preset::Neon];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Spring => "spring",
            Preset::Autumn => "autumn",
            Preset::Winter => "winter",
            Preset::Neon => "neon",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Preset::Spring => Preset::Autumn,
            Preset::Autumn => Preset::Winter,
            Preset::Winter => Preset::Neon,
            Preset::Neon => Preset::Spring,
        }
    }
}

/// Background themes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Night,
    Dusk,
    Snow,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Night, Theme::Dusk, Theme::Snow];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Night => "night",
            Theme::Dusk => "dusk",
            Theme::Snow => "snow",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Theme::Night => Theme::Dusk,
            Theme::Dusk => Theme::Snow,
            Theme::Snow => Theme::Night,
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == s.to_lowercase())
            .ok_or_else(|| format!("unknown preset '{}' (spring, autumn, winter, neon)", s))
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|t| t.name() == s.to_lowercase())
            .ok_or_else(|| format!("unknown theme '{}' (night, dusk, snow)", s))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for one tree view. Replaced wholesale on every edit.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeConfig {
    // Shape: any change here regenerates the geometry
    pub depth: u32,
    pub angle: f64,
    pub length: f64,
    pub shrink: f64,
    pub thickness: f64,
    pub randomness: f64,

    // Animation and cosmetics: a change here only restarts the frame loop
    pub leaf_mode: bool,
    pub preset: Preset,
    pub wind: bool,
    pub wind_strength: f64,
    pub wind_speed: f64,
    pub grow: bool,
    pub grow_speed: u32,
    pub theme: Theme,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            depth: 10,
            angle: 25.0,
            length: 150.0,
            shrink: 0.67,
            thickness: 10.0,
            randomness: 10.0,
            leaf_mode: true,
            preset: Preset::Spring,
            wind: true,
            wind_strength: 5.0,
            wind_speed: 1.0,
            grow: true,
            grow_speed: 80,
            theme: Theme::Night,
        }
    }
}

impl TreeConfig {
    /// True if the two configs would produce different geometry
    pub fn shape_changed(&self, other: &TreeConfig) -> bool {
        self.depth != other.depth
            || self.angle != other.angle
            || self.length != other.length
            || self.shrink != other.shrink
            || self.thickness != other.thickness
            || self.randomness != other.randomness
    }

    /// True if anything the frame loop reads differs
    pub fn animation_changed(&self, other: &TreeConfig) -> bool {
        self.leaf_mode != other.leaf_mode
            || self.preset != other.preset
            || self.wind != other.wind
            || self.wind_strength != other.wind_strength
            || self.wind_speed != other.wind_speed
            || self.grow != other.grow
            || self.grow_speed != other.grow_speed
            || self.theme != other.theme
    }

    /// Pull every numeric field into its slider range
    pub fn clamped(mut self) -> Self {
        self.depth = self.depth.clamp(*limits::DEPTH.start(), *limits::DEPTH.end());
        self.angle = self.angle.clamp(*limits::ANGLE.start(), *limits::ANGLE.end());
        self.length = self.length.clamp(*limits::LENGTH.start(), *limits::LENGTH.end());
        self.shrink = self.shrink.clamp(*limits::SHRINK.start(), *limits::SHRINK.end());
        self.thickness = self.thickness.clamp(*limits::THICKNESS.start(), *limits::THICKNESS.end());
        self.randomness = self.randomness.clamp(*limits::RANDOMNESS.start(), *limits::RANDOMNESS.end());
        self.wind_strength = self.wind_strength.clamp(*limits::WIND_STRENGTH.start(), *limits::WIND_STRENGTH.end());
        self.wind_speed = self.wind_speed.clamp(*limits::WIND_SPEED.start(), *limits::WIND_SPEED.end());
        self.grow_speed = self.grow_speed.clamp(*limits::GROW_SPEED.start(), *limits::GROW_SPEED.end());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosmetic_edits_are_not_shape_changes() {
        let base = TreeConfig::default();
        let edited = TreeConfig {
            wind_strength: 12.0,
            preset: Preset::Neon,
            theme: Theme::Snow,
            leaf_mode: false,
            ..base.clone()
        };
        assert!(!base.shape_changed(&edited));
        assert!(base.animation_changed(&edited));
    }

    #[test]
    fn shape_edits_are_detected() {
        let base = TreeConfig::default();
        let edited = TreeConfig { randomness: 0.0, ..base.clone() };
        assert!(base.shape_changed(&edited));
        assert!(!base.animation_changed(&edited));
    }

    #[test]
    fn clamped_pulls_values_into_slider_ranges() {
        let wild = TreeConfig {
            depth: 40,
            shrink: 0.99,
            length: 1.0,
            grow_speed: 0,
            wind_speed: 100.0,
            ..TreeConfig::default()
        }
        .clamped();
        assert_eq!(wild.depth, 14);
        assert!((wild.shrink - 0.85).abs() < f64::EPSILON);
        assert!((wild.length - 20.0).abs() < f64::EPSILON);
        assert_eq!(wild.grow_speed, 1);
        assert!((wild.wind_speed - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn names_round_trip_and_cycle() {
        assert_eq!("Neon".parse::<Preset>(), Ok(Preset::Neon));
        assert_eq!("snow".parse::<Theme>(), Ok(Theme::Snow));
        assert!("summer".parse::<Preset>().is_err());
        assert_eq!(Preset::Neon.next(), Preset::Spring);
        assert_eq!(Theme::Snow.next(), Theme::Night);
    }
}
