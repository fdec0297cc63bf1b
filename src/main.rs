mod animation;
mod app;
mod canvas;
mod colors;
mod config;
mod display;
mod error;
mod geometry;
mod help;
mod logging;
mod render;
mod settings;
mod sway;
mod terminal;

use app::ViewOptions;
use clap::{Args, Parser, Subcommand};
use config::{Preset, Theme, TreeConfig, CANVAS_HEIGHT, CANVAS_WIDTH};
use logging::LogTarget;
use settings::{Settings, TreeSettings};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fractree")]
#[command(author = "Terminal Art Generator")]
#[command(version = "0.1.0")]
#[command(about = "Animated fractal tree: recursive branches, wind sway, growth and PNG export", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grow an animated tree in the terminal
    Grow {
        #[command(flatten)]
        tree: TreeArgs,

        /// Print the fully grown tree to stdout (no interactive display)
        #[arg(short, long)]
        print: bool,

        /// Frames per second
        #[arg(long, default_value = "30", value_parser = clap::value_parser!(u32).range(1..=120))]
        fps: u32,

        /// File written by the save key
        #[arg(short, long, default_value = "fractal-tree.png")]
        out: PathBuf,
    },

    /// Render off-screen and save the last frame as PNG
    Export {
        #[command(flatten)]
        tree: TreeArgs,

        /// Animation frames to run before saving (0 = fully grown tree)
        #[arg(short, long, default_value = "0")]
        frames: u32,

        /// Output PNG path
        #[arg(short, long, default_value = "fractal-tree.png")]
        out: PathBuf,
    },
}

/// Tree options shared by every command. Unset flags fall back to config.toml.
#[derive(Args)]
struct TreeArgs {
    /// Recursion depth (0-14)
    #[arg(short, long)]
    depth: Option<u32>,

    /// Branching angle in degrees (0-90)
    #[arg(short, long)]
    angle: Option<f64>,

    /// Trunk length in pixels (20-250)
    #[arg(short = 'L', long)]
    length: Option<f64>,

    /// Length ratio per level (0.40-0.85)
    #[arg(short = 'k', long)]
    shrink: Option<f64>,

    /// Trunk thickness in pixels (1-30)
    #[arg(short = 'T', long)]
    thickness: Option<f64>,

    /// Random angle per branch in degrees (0-45)
    #[arg(short, long)]
    randomness: Option<f64>,

    /// Color preset: spring, autumn, winter, neon
    #[arg(short = 'c', long)]
    preset: Option<Preset>,

    /// Background: night, dusk, snow
    #[arg(short = 'b', long)]
    theme: Option<Theme>,

    /// Disable wind sway
    #[arg(long)]
    no_wind: bool,

    /// Wind strength in degrees (0-30)
    #[arg(long)]
    wind_strength: Option<f64>,

    /// Wind speed multiplier (0.1-5)
    #[arg(long)]
    wind_speed: Option<f64>,

    /// Disable the grow animation
    #[arg(long)]
    no_grow: bool,

    /// Segments revealed per frame (1-400)
    #[arg(long)]
    grow_speed: Option<u32>,

    /// Draw plain branches without leaves
    #[arg(long)]
    no_leaves: bool,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Canvas width in pixels
    #[arg(long, default_value_t = CANVAS_WIDTH, value_parser = clap::value_parser!(u32).range(1..=8192))]
    width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = CANVAS_HEIGHT, value_parser = clap::value_parser!(u32).range(1..=8192))]
    height: u32,
}

impl TreeArgs {
    /// Defaults, then config.toml, then flags; clamped to the slider ranges
    fn view_options(&self, file: &TreeSettings, out: PathBuf) -> ViewOptions {
        let mut config = file.apply(TreeConfig::default());

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
        if let Some(v) = self.preset {
            config.preset = v;
        }
        if let Some(v) = self.theme {
            config.theme = v;
        }
        if let Some(v) = self.wind_strength {
            config.wind_strength = v;
        }
        if let Some(v) = self.wind_speed {
            config.wind_speed = v;
        }
        if let Some(v) = self.grow_speed {
            config.grow_speed = v;
        }
        if self.no_wind {
            config.wind = false;
        }
        if self.no_grow {
            config.grow = false;
        }
        if self.no_leaves {
            config.leaf_mode = false;
        }

        let seed = self.seed.or(file.seed).unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0) // Fallback seed for misconfigured system clocks
        });

        ViewOptions {
            config: config.clamped(),
            seed,
            width: self.width,
            height: self.height,
            out,
        }
    }
}

fn main() -> error::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Grow { tree, print, fps, out } => {
            logging::init(if print { LogTarget::Stderr } else { LogTarget::File });
            let settings = Settings::load();
            let opts = tree.view_options(&settings.tree, out);
            if print {
                app::print(opts)?;
            } else {
                app::run(opts, fps)?;
            }
        }
        Commands::Export { tree, frames, out } => {
            logging::init(LogTarget::Stderr);
            let settings = Settings::load();
            let opts = tree.view_options(&settings.tree, out);
            app::export(opts, frames)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Commands {
        Cli::try_parse_from(args).map(|cli| cli.command).unwrap()
    }

    #[test]
    fn flags_override_settings_file() {
        let file = Settings::parse("[tree]\ndepth = 6\nangle = 40.0\nseed = 5").unwrap().tree;
        let Commands::Export { tree, out, .. } = parse(&["fractree", "export", "--depth", "8", "--no-wind"]) else {
            panic!("expected export");
        };
        let opts = tree.view_options(&file, out);
        assert_eq!(opts.config.depth, 8);
        assert_eq!(opts.config.angle, 40.0);
        assert!(!opts.config.wind);
        assert_eq!(opts.seed, 5);
        assert_eq!((opts.width, opts.height), (CANVAS_WIDTH, CANVAS_HEIGHT));
    }

    #[test]
    fn out_of_range_flags_are_clamped() {
        let Commands::Grow { tree, out, .. } = parse(&["fractree", "grow", "--shrink", "0.99", "--depth", "30", "--seed", "1"])
        else {
            panic!("expected grow");
        };
        let opts = tree.view_options(&TreeSettings::default(), out);
        assert_eq!(opts.config.depth, 14);
        assert_eq!(opts.config.shrink, 0.85);
        assert_eq!(opts.seed, 1);
    }

    #[test]
    fn named_presets_parse() {
        let Commands::Export { tree, out, .. } = parse(&["fractree", "export", "-c", "neon", "-b", "snow"]) else {
            panic!("expected export");
        };
        let opts = tree.view_options(&TreeSettings::default(), out);
        assert_eq!(opts.config.preset, Preset::Neon);
        assert_eq!(opts.config.theme, Theme::Snow);
        assert!(Cli::try_parse_from(["fractree", "export", "--preset", "summer"]).is_err());
        assert!(Cli::try_parse_from(["fractree", "export", "--width", "0"]).is_err());
    }
}
