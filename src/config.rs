//! Gameplay tuning.
//!
//! Every constant the session uses lives here so a `config.json` next to the
//! store can override any subset of them. Missing fields keep their default.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// World size in pixels. The renderer scales this to the terminal.
    pub width: f32,
    pub height: f32,
    /// Downward acceleration in px/s².
    pub gravity: f32,
    /// Vertical velocity assigned on every flap (negative is up).
    pub flap_velocity: f32,
    /// Leftward pipe speed in px/s.
    pub pipe_speed: f32,
    pub pipe_width: f32,
    pub pipe_height: f32,
    pub gap_height: f32,
    /// Minimum distance between the gap and the top/bottom of the viewport.
    pub gap_margin: f32,
    pub spawn_interval_ms: u64,
    pub restart_delay_ms: u64,
    pub bird_x: f32,
    pub bird_width: f32,
    pub bird_height: f32,
    /// Tilt in degrees is `vy / tilt_divisor`, capped at `max_tilt`.
    pub tilt_divisor: f32,
    pub max_tilt: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            gravity: 1000.0,
            flap_velocity: -350.0,
            pipe_speed: 200.0,
            pipe_width: 50.0,
            pipe_height: 400.0,
            gap_height: 300.0,
            gap_margin: 100.0,
            spawn_interval_ms: 1500,
            restart_delay_ms: 2000,
            bird_x: 100.0,
            bird_width: 34.0,
            bird_height: 24.0,
            tilt_divisor: 5.0,
            max_tilt: 30.0,
        }
    }
}

impl GameConfig {
    /// Loads overrides from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(json) => Ok(serde_json::from_str::<Self>(&json)?.validated()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Like [`GameConfig::load`], but an unreadable or malformed file is
    /// logged and replaced by the defaults.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("ignoring {}: {e}", path.display());
            Self::default()
        })
    }

    /// A zero spawn interval would disarm the looping spawn timer after its
    /// first fire.
    fn validated(mut self) -> Self {
        if self.spawn_interval_ms == 0 {
            let default = Self::default().spawn_interval_ms;
            warn!("spawn_interval_ms must be positive, using {default}");
            self.spawn_interval_ms = default;
        }
        self
    }

    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }

    /// Inclusive range the gap's top edge is drawn from. Collapses to the
    /// margin when the viewport is too short to fit the gap.
    pub fn gap_range(&self) -> (i32, i32) {
        let lo = self.gap_margin.round() as i32;
        let hi = (self.height - self.gap_margin - self.gap_height).round() as i32;
        (lo, hi.max(lo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: GameConfig = serde_json::from_str(r#"{ "gravity": 1200.0 }"#).unwrap();
        assert_eq!(cfg.gravity, 1200.0);
        assert_eq!(cfg.gap_height, 300.0);
        assert_eq!(cfg.spawn_interval(), Duration::from_millis(1500));
    }

    #[test]
    fn gap_range_for_default_viewport() {
        assert_eq!(GameConfig::default().gap_range(), (100, 200));
    }

    #[test]
    fn gap_range_collapses_on_short_viewport() {
        let cfg = GameConfig {
            height: 400.0,
            ..GameConfig::default()
        };
        assert_eq!(cfg.gap_range(), (100, 100));
    }

    fn scratch_config(name: &str, json: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "flappy-scene-{}-{name}-config.json",
            std::process::id()
        ));
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn malformed_file_is_a_json_error() {
        let path = scratch_config("malformed", "{ \"gravity\": ");
        let result = GameConfig::load(&path);
        assert!(matches!(result, Err(crate::Error::Json(_))));
        assert_eq!(GameConfig::load_or_default(&path), GameConfig::default());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn zero_spawn_interval_falls_back_to_default() {
        let path = scratch_config("zero-interval", r#"{ "spawn_interval_ms": 0, "gravity": 900.0 }"#);
        let cfg = GameConfig::load(&path).unwrap();
        assert_eq!(cfg.spawn_interval_ms, 1500);
        assert_eq!(cfg.gravity, 900.0);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_is_default() {
        let path = std::env::temp_dir().join("flappy-scene-no-such-config.json");
        let cfg = GameConfig::load(&path).unwrap();
        assert_eq!(cfg, GameConfig::default());
    }
}
