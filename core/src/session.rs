use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::*;

/// Everything needed to start a game.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub config: GameConfig,
    /// Show the contents of unrevealed cells.
    pub debug: bool,
}

impl SessionSettings {
    /// Parses settings from JSON, missing fields fall back to their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json).map_err(|err| {
            log::warn!("Could not parse settings: {}", err);
            GameError::InvalidConfig
        })?;
        settings.config.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|err| {
            log::warn!("Could not serialize settings: {}", err);
            GameError::InvalidConfig
        })
    }
}

/// Holds the current grid of a game and keeps its status in sync.
///
/// Every move goes through the engine and replaces the held grid, the status is
/// derived again right after. Once the game is over no further moves are taken.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredSession")]
pub struct GameSession {
    grid: Grid,
    #[serde(skip_serializing)]
    status: GameStatus,
    debug: bool,
}

/// Serialized form of a session, the status is always derived again on load.
#[derive(Deserialize)]
struct StoredSession {
    grid: Grid,
    #[serde(default)]
    debug: bool,
}

impl From<StoredSession> for GameSession {
    fn from(stored: StoredSession) -> Self {
        Self::with_grid(stored.grid, stored.debug)
    }
}

impl GameSession {
    pub fn new(settings: SessionSettings, seed: u64) -> Result<Self> {
        log::debug!("New game with seed {}", seed);
        Self::generate(settings, RandomGridGenerator::new(seed))
    }

    pub fn generate(settings: SessionSettings, generator: impl GridGenerator) -> Result<Self> {
        let grid = generator.generate(settings.config)?;
        Ok(Self::with_grid(grid, settings.debug))
    }

    pub fn with_grid(grid: Grid, debug: bool) -> Self {
        let status = derive_status(&grid);
        Self {
            grid,
            status,
            debug,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_game_over
    }

    pub fn config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.grid.size(), self.grid.mine_count())
    }

    pub fn settings(&self) -> SessionSettings {
        SessionSettings {
            config: self.config(),
            debug: self.debug,
        }
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn set_debug(&mut self, debug: bool) {
        log::debug!("Debug view {}", if debug { "on" } else { "off" });
        self.debug = debug;
    }

    /// What the player sees at `coords`, honoring the debug view.
    pub fn view_at(&self, coords: Coord2) -> Option<CellView> {
        self.grid.cell_at(coords).map(|cell| cell.view(self.debug))
    }

    pub fn mines_left(&self) -> isize {
        self.grid.mines_left()
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        self.check_not_finished()?;

        let mut next = self.grid.clone();
        let outcome = next.reveal(coords);
        if outcome.has_update() {
            self.replace_grid(next);
        }
        Ok(outcome)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        self.check_not_finished()?;

        let mut next = self.grid.clone();
        let outcome = next.toggle_flag(coords);
        if outcome.has_update() {
            self.replace_grid(next);
        }
        Ok(outcome)
    }

    /// Starts over on a fresh board with the same size and mine count.
    pub fn restart(&mut self, seed: u64) -> Result<()> {
        *self = Self::new(self.settings(), seed)?;
        Ok(())
    }

    fn replace_grid(&mut self, grid: Grid) {
        self.grid = grid;
        self.status = derive_status(&self.grid);
        if self.status.is_game_over {
            log::info!(
                "Game over, {}",
                if self.status.is_game_won { "won" } else { "lost" }
            );
            log::trace!("Final board:\n{}", self.grid.render_text(true));
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.status.is_game_over {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
