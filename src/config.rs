// Host-side settings: the simulation tunables plus window/brush/export options.
// Loaded from an optional JSON file; any missing field takes its default.

use crate::error::{Error, Result};
use crate::params::SimulationParameters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    #[serde(flatten)]
    pub simulation: SimulationParameters,

    /// Start with the Input/Prev/Prev2 overlay visible.
    pub debug: bool,

    /// Window side in pixels.
    pub window_size: usize,

    pub brush_radius: i32,
    /// Fraction of full height added at the brush center per dab.
    pub brush_strength: f32,

    /// Where `S` writes the height map.
    pub export_path: PathBuf,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationParameters::default(),
            debug: false,
            window_size: 512,
            brush_radius: 10,
            brush_strength: 0.35,
            export_path: PathBuf::from("wave_height.png"),
        }
    }
}

impl WaveConfig {
    /// Load configuration from a JSON file
    pub fn load_json(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| Error::config(path, e))
    }

    /// Save configuration to a JSON file
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| Error::config(path, e))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Simulation tunables pinned to their ranges; warns about anything that moved.
    pub fn simulation(&self) -> SimulationParameters {
        let clamped = self.simulation.clamped();
        if clamped != self.simulation {
            log::warn!(
                "simulation settings out of range, using {:?} instead of {:?}",
                clamped,
                self.simulation
            );
        }
        clamped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ripple-pad-{}-{name}", std::process::id()))
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: WaveConfig =
            serde_json::from_str(r#"{ "attenuation": 0.9, "debug": true }"#).unwrap();
        assert_relative_eq!(cfg.simulation.attenuation, 0.9);
        assert!(cfg.debug);
        assert_eq!(cfg.simulation.update_frame_timing, 3);
        assert_eq!(cfg.window_size, 512);
    }

    #[test]
    fn simulation_is_clamped() {
        let cfg: WaveConfig =
            serde_json::from_str(r#"{ "update_frame_timing": 99, "stride": 7.0 }"#).unwrap();
        let p = cfg.simulation();
        assert_eq!(p.update_frame_timing, 10);
        assert_relative_eq!(p.stride, 2.0);
    }

    #[test]
    fn save_then_load_keeps_settings() {
        let path = temp_path("config.json");
        let mut cfg = WaveConfig::default();
        cfg.simulation.propagation_speed = 0.25;
        cfg.brush_radius = 4;
        cfg.save_json(&path).unwrap();

        let loaded = WaveConfig::load_json(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn bad_json_names_the_file() {
        let path = temp_path("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = WaveConfig::load_json(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        match err {
            Error::Config { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io() {
        let err = WaveConfig::load_json(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
