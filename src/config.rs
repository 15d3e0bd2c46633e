/// Frontend settings read from `pixel_quest.toml`.
///
/// Simulation tuning is compiled in; this only covers how the terminal
/// frontend runs (frame rate, file locations, logging, RNG seed).

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::GameResult;

pub const CONFIG_ENV: &str = "PIXEL_QUEST_CONFIG";
pub const CONFIG_FILE: &str = "pixel_quest.toml";

const DEFAULT_FPS: u32 = 60;
const DEFAULT_LOG_FILE: &str = "pixel_quest.log";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub fps: u32,
    /// Overrides the default best-score location.
    pub score_file: Option<PathBuf>,
    pub log_file: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive, e.g. `"pixel_quest=debug"`.
    pub log_filter: String,
    /// Fixed RNG seed for reproducible levels.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            score_file: None,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Parse `path`. A missing file yields the defaults; a malformed one is
    /// an error.
    pub fn load(path: &Path) -> GameResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn parse(text: &str) -> GameResult<Self> {
        let config: Self = toml::from_str(text)?;
        Ok(Self { fps: config.fps.max(1), ..config })
    }

    /// `$PIXEL_QUEST_CONFIG` if set, otherwise `./pixel_quest.toml`.
    pub fn locate() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }

    pub fn frame_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }
}
