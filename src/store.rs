/// Best-score persistence.

use std::path::PathBuf;

use crate::error::{GameError, GameResult};

pub trait ScoreStore {
    /// The persisted best score; a store that has never been written reads
    /// as zero.
    fn load_best(&self) -> GameResult<u32>;

    fn save_best(&mut self, score: u32) -> GameResult<()>;
}

/// Keeps the best score as plain text in a single file.
#[derive(Clone, Debug)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$HOME/.pixel_quest_score`, or the working directory without `HOME`.
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".pixel_quest_score")
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl ScoreStore for FileScoreStore {
    fn load_best(&self) -> GameResult<u32> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(err.into()),
        };
        let trimmed = text.trim();
        trimmed
            .parse()
            .map_err(|_| GameError::InvalidScore(trimmed.to_string()))
    }

    fn save_best(&mut self, score: u32) -> GameResult<()> {
        std::fs::write(&self.path, score.to_string())?;
        Ok(())
    }
}
