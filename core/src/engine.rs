use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Win/loss state derived from a whole grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatus {
    pub is_game_over: bool,
    pub is_game_won: bool,
}

impl GameStatus {
    pub const IN_PROGRESS: Self = Self {
        is_game_over: false,
        is_game_won: false,
    };

    pub const WON: Self = Self {
        is_game_over: true,
        is_game_won: true,
    };

    pub const LOST: Self = Self {
        is_game_over: true,
        is_game_won: false,
    };

    pub const fn is_in_progress(self) -> bool {
        !self.is_game_over
    }

    pub const fn is_lost(self) -> bool {
        self.is_game_over && !self.is_game_won
    }
}

/// Reveals the cell at `coords` on a copy of `grid`, flooding through
/// zero-count cells. Out of bounds or already revealed cells leave the copy
/// untouched.
pub fn reveal_at(grid: &Grid, coords: Coord2) -> Grid {
    let mut next = grid.clone();
    next.reveal(coords);
    next
}

/// Flips the flag of the cell at `coords` on a copy of `grid`, unless it is
/// revealed or out of bounds.
pub fn toggle_flag_at(grid: &Grid, coords: Coord2) -> Grid {
    let mut next = grid.clone();
    next.toggle_flag(coords);
    next
}

/// Single pass over all cells:
/// - a revealed mine loses right away;
/// - a cell neither revealed nor flagged keeps the game going;
/// - a flag on a safe cell spoils the win, even once that cell got revealed.
///
/// Winning takes every safe cell revealed and every mine flagged.
pub fn derive_status(grid: &Grid) -> GameStatus {
    let mut status = GameStatus::WON;

    for (_, cell) in grid.iter() {
        if cell.is_revealed && cell.is_bomb {
            return GameStatus::LOST;
        }

        if !cell.is_revealed && !cell.is_flagged {
            status.is_game_over = false;
        }

        if cell.is_flagged && !cell.is_bomb {
            status.is_game_won = false;
        }
    }

    if status.is_game_over {
        status
    } else {
        GameStatus::IN_PROGRESS
    }
}

impl Grid {
    pub fn status(&self) -> GameStatus {
        derive_status(self)
    }

    /// In-place reveal.
    ///
    /// Flags do not protect a cell, neither here nor during the flood-fill, and
    /// the flag bit itself is never touched. Revealing a mine is allowed and
    /// reported as [`RevealOutcome::HitMine`].
    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        let Some(cell) = self.cell_at(coords) else {
            log::debug!("Ignoring reveal outside the board at {:?}", coords);
            return RevealOutcome::NoChange;
        };

        if cell.is_revealed {
            return RevealOutcome::NoChange;
        }

        self.cell_mut(coords).is_revealed = true;

        if cell.is_bomb {
            log::debug!("Revealed mine at {:?}", coords);
            return RevealOutcome::HitMine;
        }

        log::debug!("Reveal cell at {:?}, mine count: {}", coords, cell.value);
        if cell.value == 0 {
            self.flood_reveal(coords);
        }
        RevealOutcome::Revealed
    }

    /// In-place flag toggle, revealed cells cannot be flagged or unflagged.
    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        match self.cell_at(coords) {
            Some(cell) if cell.is_unrevealed() => {
                self.cell_mut(coords).is_flagged = !cell.is_flagged;
                log::debug!("Flag at {:?} set to {}", coords, !cell.is_flagged);
                MarkOutcome::Changed
            }
            Some(_) => MarkOutcome::NoChange,
            None => {
                log::debug!("Ignoring flag outside the board at {:?}", coords);
                MarkOutcome::NoChange
            }
        }
    }

    /// Opens the region around an already revealed zero-count cell. Every cell
    /// enters the stack at most once per reveal since `is_revealed` is set
    /// before its neighbors are pushed.
    fn flood_reveal(&mut self, origin: Coord2) {
        let mut to_visit: Vec<Coord2> = self
            .iter_neighbors(origin)
            .filter(|&pos| self[pos].is_unrevealed())
            .collect();
        log::trace!(
            "Starting flood-fill from {:?}, initial neighbors: {:?}",
            origin,
            to_visit
        );

        while let Some(visit_coords) = to_visit.pop() {
            let cell = self[visit_coords];
            if cell.is_revealed {
                continue;
            }

            self.cell_mut(visit_coords).is_revealed = true;
            log::trace!(
                "Flood revealed cell at {:?}, mine count: {}",
                visit_coords,
                cell.value
            );

            // zero cells have no mine around, keep going through them
            if cell.value == 0 && !cell.is_bomb {
                to_visit.extend(
                    self.iter_neighbors(visit_coords)
                        .filter(|&pos| self[pos].is_unrevealed()),
                );
            }
        }
    }
}
