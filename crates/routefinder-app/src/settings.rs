use anyhow::{Context, Result};
use routefinder_graph::StyleConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfinderSettings {
    pub style: StyleConfig,
    pub reveal: RevealSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealSettings {
    /// Time the renderer spends animating each connection of the route.
    pub step_duration_ms: u64,
    pub frames_per_second: u32,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            step_duration_ms: 1000,
            frames_per_second: 60,
        }
    }
}

impl RevealSettings {
    pub fn step_duration(&self) -> Duration {
        Duration::from_millis(self.step_duration_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frames_per_second.max(1)))
    }
}

impl PathfinderSettings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("routefinder").join("settings.json"))
    }

    /// Settings from the user config directory, or defaults when absent or
    /// unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            tracing::info!("Settings file not found, using defaults");
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::error!("{:#}", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        tracing::info!("Loading settings from {:?}", path);
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        Ok(settings)
    }
}
