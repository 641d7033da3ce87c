//! Runtime configuration from environment variables.

use std::str::FromStr;
use std::time::Duration;

use log::warn;

use crate::types::{DEFAULT_SEED, GRAVITY_TICK_MS, RENDER_FPS};

/// Cadence and queue settings for a [`crate::Driver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Milliseconds between gravity ticks
    pub gravity_ms: u64,
    /// Render polls per second
    pub render_fps: u32,
    /// Piece sequence seed
    pub seed: u32,
    /// Commands buffered before senders wait
    pub max_pending_commands: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            gravity_ms: GRAVITY_TICK_MS,
            render_fps: RENDER_FPS,
            seed: DEFAULT_SEED,
            max_pending_commands: 16,
        }
    }
}

impl RuntimeConfig {
    /// Read the configuration from the process environment
    ///
    /// - `TETRIS_GRAVITY_MS`: gravity interval (default: 1000)
    /// - `TETRIS_RENDER_FPS`: render poll rate (default: 30)
    /// - `TETRIS_SEED`: piece sequence seed (default: 1)
    /// - `TETRIS_MAX_PENDING`: command queue depth (default: 16)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; missing or invalid values keep the default
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let gravity_ms: u64 = parse_var(&lookup, "TETRIS_GRAVITY_MS", defaults.gravity_ms);
        let render_fps: u32 = parse_var(&lookup, "TETRIS_RENDER_FPS", defaults.render_fps);
        let seed = parse_var(&lookup, "TETRIS_SEED", defaults.seed);
        let max_pending_commands: usize =
            parse_var(&lookup, "TETRIS_MAX_PENDING", defaults.max_pending_commands);

        Self {
            gravity_ms: gravity_ms.max(1),
            render_fps: render_fps.max(1),
            seed,
            max_pending_commands: max_pending_commands.max(1),
        }
    }

    pub fn gravity_interval(&self) -> Duration {
        Duration::from_millis(self.gravity_ms.max(1))
    }

    pub fn render_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.render_fps.max(1)))
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!("ignoring invalid {key}={raw:?}");
            default
        }
    }
}
