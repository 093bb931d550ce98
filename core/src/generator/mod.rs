use alloc::vec::Vec;

use crate::*;
pub use random::*;

mod random;

pub trait GridGenerator {
    fn generate(self, config: GameConfig) -> Result<Grid>;
}

/// Places mines at a fixed set of coordinates, mostly useful for tests and
/// replaying known boards.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedGridGenerator {
    mines: Vec<Coord2>,
}

impl FixedGridGenerator {
    pub fn new(mines: impl Into<Vec<Coord2>>) -> Self {
        Self {
            mines: mines.into(),
        }
    }
}

impl GridGenerator for FixedGridGenerator {
    fn generate(self, config: GameConfig) -> Result<Grid> {
        let grid = Grid::from_mine_coords(config.size, &self.mines)?;
        if grid.mine_count() != config.mines {
            log::warn!(
                "Fixed layout has {} mines, config asks for {}",
                grid.mine_count(),
                config.mines
            );
        }
        Ok(grid)
    }
}
