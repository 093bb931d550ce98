use rand::prelude::*;

use super::*;

/// Fills a fresh `size` x `size` board with `mine_count` mines drawn uniformly
/// at random.
///
/// Draws that land on an existing mine are thrown away and redrawn, so no cell
/// ever gets two mines. Parameters are checked up front since an overfull
/// board would never finish sampling.
pub fn make_grid<R: Rng + ?Sized>(size: Coord, mine_count: CellCount, rng: &mut R) -> Result<Grid> {
    let config = GameConfig::new(size, mine_count)?;
    let mut grid = Grid::new(config.size)?;

    let mut mines_placed = 0;
    let mut draws: u64 = 0;
    while mines_placed < config.mines {
        let coords = (rng.random_range(0..size), rng.random_range(0..size));
        draws += 1;
        if grid.place_mine(coords) {
            mines_placed += 1;
        }
    }
    log::debug!(
        "Placed {} mines on a {}x{} board in {} draws",
        mines_placed,
        size,
        size,
        draws
    );

    // double check mine count
    let count = grid.mine_count();
    if count != config.mines {
        log::warn!(
            "Generated grid count mismatch, actual: {}, requested: {}",
            count,
            config.mines
        );
    }
    Ok(grid)
}

/// Purely random generation from a seed, the same seed always yields the same
/// board.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomGridGenerator {
    seed: u64,
}

impl RandomGridGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl GridGenerator for RandomGridGenerator {
    fn generate(self, config: GameConfig) -> Result<Grid> {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        make_grid(config.size, config.mines, &mut rng)
    }
}
