use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board size must be at least 1")]
    InvalidSize,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board shape or contents are inconsistent")]
    InvalidBoard,
    #[error("Invalid game settings")]
    InvalidConfig,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;
