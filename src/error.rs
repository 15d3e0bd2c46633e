/// Errors raised by the peripheral layers (config files, score storage).
///
/// The simulation itself is total and never returns these.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A stored best score that isn't an unsigned integer.
    #[error("invalid stored score: {0:?}")]
    InvalidScore(String),
}

pub type GameResult<T> = Result<T, GameError>;
