//! Logging initialization

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

/// Where log records go
pub enum LogTarget {
    /// Headless commands: plain stderr
    Stderr,
    /// Interactive view: a file, so the alternate screen stays clean
    File,
}

/// Initialize env_logger with a default filter of `warn`.
/// Override with the RUST_LOG environment variable.
pub fn init(target: LogTarget) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));

    if let LogTarget::File = target {
        let path = log_path();
        if let Some(dir) = path.parent() {
            let _ = fs::create_dir_all(dir);
        }
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            // No writable cache dir: drop records rather than scribble over the view
            Err(_) => {
                builder.filter_level(log::LevelFilter::Off);
            }
        }
    }

    let _ = builder.try_init();
}

pub fn log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fractree")
        .join("fractree.log")
}
