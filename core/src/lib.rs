#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use session::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod grid;
mod session;
mod types;

/// Side length and mine count of a square board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new(size: Coord, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, mines);
        config.validate()?;
        Ok(config)
    }

    /// Coerces both values into range instead of failing.
    pub fn clamped(size: Coord, mines: CellCount) -> Self {
        let size = size.clamp(1, Coord::MAX);
        let mines = mines.min(square(size));
        Self::new_unchecked(size, mines)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(GameError::InvalidSize);
        }
        if self.mines > self.total_cells() {
            return Err(GameError::TooManyMines);
        }
        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        square(self.size)
    }

    pub const fn safe_cell_count(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(9, 14)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
}

impl RevealOutcome {
    /// Whether the grid changed, a mine hit counts as a change.
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}
