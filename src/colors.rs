//! Preset palettes, depth-based color bands and theme backgrounds

use crate::config::{Preset, Theme};

/// An opaque RGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::from_hex(0xffffff);

    /// Build from a 0xRRGGBB literal
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }
}

/// Trunk/branch/leaf colors plus the glow flag of one preset
pub struct Palette {
    pub trunk: Rgb,
    pub branch: Rgb,
    pub leaf: Rgb,
    pub glow: bool,
}

const SPRING: Palette = Palette {
    trunk: Rgb::from_hex(0xa16207),
    branch: Rgb::from_hex(0x16a34a),
    leaf: Rgb::from_hex(0x22c55e),
    glow: false,
};

const AUTUMN: Palette = Palette {
    trunk: Rgb::from_hex(0x78350f),
    branch: Rgb::from_hex(0xc2410c),
    leaf: Rgb::from_hex(0xf59e0b),
    glow: false,
};

const WINTER: Palette = Palette {
    trunk: Rgb::from_hex(0x475569),
    branch: Rgb::from_hex(0x94a3b8),
    leaf: Rgb::from_hex(0xe0f2fe),
    glow: false,
};

const NEON: Palette = Palette {
    trunk: Rgb::from_hex(0x7c3aed),
    branch: Rgb::from_hex(0x06b6d4),
    leaf: Rgb::from_hex(0xf0abfc),
    glow: true,
};

impl Preset {
    pub fn palette(self) -> &'static Palette {
        match self {
            Preset::Spring => &SPRING,
            Preset::Autumn => &AUTUMN,
            Preset::Winter => &WINTER,
            Preset::Neon => &NEON,
        }
    }

    pub fn glow(self) -> bool {
        self.palette().glow
    }
}

/// Stroke color for a segment at `depth_left` of `total_depth`
pub fn resolve(preset: Preset, depth_left: u32, total_depth: u32, leaf_mode: bool) -> Rgb {
    let palette = preset.palette();
    if !leaf_mode {
        return palette.branch;
    }

    let ratio = if total_depth == 0 {
        0.0
    } else {
        depth_left as f64 / total_depth as f64
    };

    if ratio > 0.55 {
        palette.trunk
    } else if ratio > 0.25 {
        palette.branch
    } else {
        palette.leaf
    }
}

impl Theme {
    /// Top and bottom stops of the background gradient
    pub fn gradient(self) -> (Rgb, Rgb) {
        match self {
            Theme::Night => (Rgb::from_hex(0x020617), Rgb::from_hex(0x1e293b)),
            Theme::Dusk => (Rgb::from_hex(0x1e1b4b), Rgb::from_hex(0x9a3412)),
            Theme::Snow => (Rgb::from_hex(0x334155), Rgb::from_hex(0xcbd5e1)),
        }
    }

    /// Opacity of the star/snow dot field
    pub fn dot_opacity(self) -> f64 {
        match self {
            Theme::Snow => 0.8,
            _ => 0.35,
        }
    }
}
