//! Interactive tree view, print mode and headless export

use crate::animation::{Animator, Change};
use crate::canvas::Canvas;
use crate::config::TreeConfig;
use crate::display::{self, Placement};
use crate::error::{Error, Result};
use crate::help::show_help_modal;
use crate::terminal::Terminal;
use crossterm::event::KeyCode;
use crossterm::style::Color;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const HELP: &str = "\
FRACTAL TREE
─────────────────────────
r       Regrow tree
Space   Pause/resume
w       Wind on/off
+/-     Wind strength
</>     Wind speed
g       Grow animation on/off
[/]     Grow speed
l       Leaves on/off
c       Cycle color preset
t       Cycle background
d/D     Depth -/+
a/A     Angle -/+
h/H     Length -/+
k/K     Shrink -/+
b/B     Thickness -/+
n/N     Randomness -/+
s       Save PNG
q/Esc   Quit
?       Close help";

/// How long a status message stays up
const FLASH_TIME: Duration = Duration::from_secs(3);

/// Everything needed to set up one view
pub struct ViewOptions {
    pub config: TreeConfig,
    pub seed: u64,
    pub width: u32,
    pub height: u32,
    pub out: PathBuf,
}

/// What a key press asks for
#[derive(Debug, PartialEq)]
pub enum Action {
    Edit(TreeConfig),
    Redraw,
    TogglePause,
    Save,
    Help,
    Quit,
    Ignore,
}

/// Map a key to an action. Edits are clamped to the slider ranges.
pub fn key_action(config: &TreeConfig, code: KeyCode) -> Action {
    let mut next = config.clone();
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
        KeyCode::Char('?') => return Action::Help,
        KeyCode::Char('r') => return Action::Redraw,
        KeyCode::Char(' ') => return Action::TogglePause,
        KeyCode::Char('s') => return Action::Save,

        KeyCode::Char('w') => next.wind = !next.wind,
        KeyCode::Char('+') | KeyCode::Char('=') => next.wind_strength += 1.0,
        KeyCode::Char('-') => next.wind_strength -= 1.0,
        KeyCode::Char('>') | KeyCode::Char('.') => next.wind_speed += 0.1,
        KeyCode::Char('<') | KeyCode::Char(',') => next.wind_speed -= 0.1,
        KeyCode::Char('g') => next.grow = !next.grow,
        KeyCode::Char(']') => next.grow_speed = next.grow_speed.saturating_add(20),
        KeyCode::Char('[') => next.grow_speed = next.grow_speed.saturating_sub(20),
        KeyCode::Char('l') => next.leaf_mode = !next.leaf_mode,
        KeyCode::Char('c') => next.preset = next.preset.next(),
        KeyCode::Char('t') => next.theme = next.theme.next(),

        KeyCode::Char('D') => next.depth = next.depth.saturating_add(1),
        KeyCode::Char('d') => next.depth = next.depth.saturating_sub(1),
        KeyCode::Char('A') => next.angle += 5.0,
        KeyCode::Char('a') => next.angle -= 5.0,
        KeyCode::Char('H') => next.length += 10.0,
        KeyCode::Char('h') => next.length -= 10.0,
        KeyCode::Char('K') => next.shrink += 0.02,
        KeyCode::Char('k') => next.shrink -= 0.02,
        KeyCode::Char('B') => next.thickness += 1.0,
        KeyCode::Char('b') => next.thickness -= 1.0,
        KeyCode::Char('N') => next.randomness += 5.0,
        KeyCode::Char('n') => next.randomness -= 5.0,
        _ => return Action::Ignore,
    }
    Action::Edit(next.clamped())
}

/// Run the animated view until the user quits
pub fn run(opts: ViewOptions, fps: u32) -> Result<()> {
    let frame_time = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
    let mut term = Terminal::new(true)?;
    term.clear_screen()?;

    let mut canvas = Canvas::new(opts.width, opts.height);
    let mut animator = Animator::new(opts.config, opts.width, opts.height, opts.seed);
    let mut frame = Some(animator.start());
    let mut flash: Option<(String, Instant)> = None;

    log::info!(
        "view started: {}x{} canvas, seed {}, {} segments",
        opts.width,
        opts.height,
        opts.seed,
        animator.segments().len()
    );

    let (mut prev_w, mut prev_h) = term.size();

    loop {
        let started = Instant::now();

        let (width, height) = crossterm::terminal::size().unwrap_or((prev_w, prev_h));
        if width != prev_w || height != prev_h {
            term.resize(width, height);
            term.clear_screen()?;
            prev_w = width;
            prev_h = height;
        }

        if let Some((code, _)) = term.check_key()? {
            match key_action(animator.config(), code) {
                Action::Quit => break,
                Action::Help => {
                    if show_help_modal(&mut term, HELP)? {
                        break;
                    }
                }
                Action::Redraw => animator.redraw(canvas.as_mut()),
                Action::TogglePause => {
                    if animator.is_running() {
                        animator.stop();
                    } else {
                        animator.start();
                    }
                }
                Action::Save => {
                    let message = match save(&animator, canvas.as_ref(), &opts.out) {
                        Ok(message) => message,
                        Err(e) => {
                            log::warn!("export failed: {}", e);
                            format!("save failed: {}", e)
                        }
                    };
                    flash = Some((message, Instant::now()));
                }
                Action::Edit(config) => match animator.apply(config) {
                    Change::Rebuilt => log::debug!("shape edit: {} segments", animator.segments().len()),
                    Change::Restarted => {
                        log::debug!("animation edit: loop restarted at wind phase {:.2}", animator.wind_time())
                    }
                    Change::Unchanged => {}
                },
                Action::Ignore => {}
            }
        }

        // A restart registers a new handle; follow it
        frame = animator.active();
        if let Some(handle) = frame {
            frame = animator.tick(handle, canvas.as_mut());
        }

        if flash.as_ref().is_some_and(|(_, at)| at.elapsed() > FLASH_TIME) {
            flash = None;
        }

        term.clear();
        let art_rows = height.saturating_sub(1);
        if let Some(canvas) = &canvas {
            let placement = display::fit(canvas.width(), canvas.height(), width, art_rows);
            display::draw_canvas(&mut term, canvas, placement);
        }
        let line = match &flash {
            Some((message, _)) => format!(" {}", message),
            None => status_line(&animator),
        };
        term.set_str(0, height as i32 - 1, &line, Some(Color::Grey), false);
        term.present()?;

        if let Some(rest) = frame_time.checked_sub(started.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    // Tearing the view down is the only way the loop ends
    animator.stop();
    Ok(())
}

/// Draw the full tree once and print it as ANSI half-blocks
pub fn print(opts: ViewOptions) -> Result<()> {
    let mut term = Terminal::new(false)?;
    let (cols, rows) = term.size();

    let mut canvas = Canvas::new(opts.width, opts.height);
    let mut animator = Animator::new(opts.config, opts.width, opts.height, opts.seed);
    animator.redraw(canvas.as_mut());

    if let Some(canvas) = &canvas {
        let placement = display::fit(canvas.width(), canvas.height(), cols, rows.saturating_sub(1));
        term.resize(placement.cols, placement.rows);
        display::draw_canvas(&mut term, canvas, Placement { x: 0, y: 0, ..placement });
        term.print_to_stdout();
    }
    Ok(())
}

/// Run `frames` ticks off-screen and write the last frame as PNG.
/// Zero frames draws the fully grown tree instead.
pub fn export(opts: ViewOptions, frames: u32) -> Result<()> {
    if let Some(dir) = opts.out.parent() {
        if !dir.as_os_str().is_empty() && !dir.is_dir() {
            return Err(Error::InvalidArgument(format!(
                "output directory {} does not exist",
                dir.display()
            )));
        }
    }

    let mut canvas = Canvas::new(opts.width, opts.height);
    let mut animator = Animator::new(opts.config, opts.width, opts.height, opts.seed);

    if frames == 0 {
        animator.redraw(canvas.as_mut());
    } else {
        let mut frame = Some(animator.start());
        for _ in 0..frames {
            let Some(handle) = frame else { break };
            frame = animator.tick(handle, canvas.as_mut());
        }
        animator.stop();
    }

    if animator.export(canvas.as_ref(), &opts.out)? {
        println!("{}", opts.out.display());
    }
    Ok(())
}

fn save(animator: &Animator, canvas: Option<&Canvas>, out: &Path) -> Result<String> {
    if animator.export(canvas, out)? {
        Ok(format!("saved {}", out.display()))
    } else {
        Ok("nothing to save".to_string())
    }
}

fn status_line(animator: &Animator) -> String {
    let config = animator.config();
    let total = animator.segments().len();
    let shown = if config.grow { animator.reveal().min(total) } else { total };
    let wind = if config.wind {
        format!("wind {:.0}° x{:.1}", config.wind_strength, config.wind_speed)
    } else {
        "wind off".to_string()
    };
    format!(
        " {} · {} · depth {} · {}/{} · {}{} · ? help",
        config.preset,
        config.theme,
        config.depth,
        shown,
        total,
        wind,
        if animator.is_running() { "" } else { " · paused" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Preset, Theme};

    fn edited(code: KeyCode) -> TreeConfig {
        match key_action(&TreeConfig::default(), code) {
            Action::Edit(config) => config,
            other => panic!("expected an edit, got {:?}", other),
        }
    }

    #[test]
    fn control_keys_map_to_actions() {
        let config = TreeConfig::default();
        assert_eq!(key_action(&config, KeyCode::Char('q')), Action::Quit);
        assert_eq!(key_action(&config, KeyCode::Esc), Action::Quit);
        assert_eq!(key_action(&config, KeyCode::Char('r')), Action::Redraw);
        assert_eq!(key_action(&config, KeyCode::Char(' ')), Action::TogglePause);
        assert_eq!(key_action(&config, KeyCode::Char('s')), Action::Save);
        assert_eq!(key_action(&config, KeyCode::Char('?')), Action::Help);
        assert_eq!(key_action(&config, KeyCode::Char('z')), Action::Ignore);
    }

    #[test]
    fn cosmetic_keys_leave_shape_alone() {
        let base = TreeConfig::default();
        for key in ['w', '+', '-', '<', '>', 'g', '[', ']', 'l', 'c', 't'] {
            let next = edited(KeyCode::Char(key));
            assert!(!base.shape_changed(&next), "key {key}");
            assert!(base.animation_changed(&next), "key {key}");
        }
        assert_eq!(edited(KeyCode::Char('c')).preset, Preset::Autumn);
        assert_eq!(edited(KeyCode::Char('t')).theme, Theme::Dusk);
    }

    #[test]
    fn shape_keys_change_shape() {
        let base = TreeConfig::default();
        for key in ['d', 'D', 'a', 'A', 'h', 'H', 'k', 'K', 'b', 'B', 'n', 'N'] {
            assert!(base.shape_changed(&edited(KeyCode::Char(key))), "key {key}");
        }
        assert_eq!(edited(KeyCode::Char('D')).depth, 11);
        assert_eq!(edited(KeyCode::Char('d')).depth, 9);
    }

    #[test]
    fn edits_stop_at_slider_limits() {
        let mut config = TreeConfig::default();
        for _ in 0..50 {
            if let Action::Edit(next) = key_action(&config, KeyCode::Char('D')) {
                config = next;
            }
        }
        assert_eq!(config.depth, 14);

        let slow = TreeConfig { grow_speed: 10, ..TreeConfig::default() };
        match key_action(&slow, KeyCode::Char('[')) {
            Action::Edit(next) => assert_eq!(next.grow_speed, 1),
            other => panic!("expected an edit, got {:?}", other),
        }
    }

    #[test]
    fn status_line_reports_progress() {
        let animator = Animator::new(TreeConfig::default(), 1000, 650, 5);
        let line = status_line(&animator);
        assert!(line.contains("spring"));
        assert!(line.contains(&format!("0/{}", animator.segments().len())));
        assert!(line.contains("paused"));
    }
}
