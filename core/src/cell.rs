use serde::{Deserialize, Serialize};

/// A single board cell.
///
/// `value` counts the mines among the 8 neighbors and is only meaningful when
/// `is_bomb` is false. Both are fixed when the grid is generated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub value: u8,
    pub is_bomb: bool,
    pub is_revealed: bool,
    pub is_flagged: bool,
}

impl Cell {
    pub const fn is_unrevealed(self) -> bool {
        !self.is_revealed
    }

    /// Shows a flag to the player, a revealed cell shows its contents instead.
    pub const fn is_marked(self) -> bool {
        self.is_flagged && !self.is_revealed
    }

    /// Marked on top of a mine.
    pub const fn is_correctly_flagged(self) -> bool {
        self.is_marked() && self.is_bomb
    }

    /// What the player gets to see for this cell, `debug` exposes the contents of
    /// unrevealed cells as well.
    pub const fn view(self, debug: bool) -> CellView {
        if self.is_revealed || debug {
            self.content()
        } else if self.is_marked() {
            CellView::Flagged
        } else {
            CellView::Hidden
        }
    }

    const fn content(self) -> CellView {
        if self.is_bomb {
            CellView::Mine
        } else if self.value == 0 {
            CellView::Empty
        } else {
            CellView::Number(self.value)
        }
    }
}

/// Player-visible state of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Empty,
    Number(u8),
    Mine,
}

impl CellView {
    pub const fn glyph(self) -> char {
        use CellView::*;
        match self {
            Hidden => '#',
            Flagged => 'F',
            Empty => ' ',
            Number(count) => match char::from_digit(count as u32, 10) {
                Some(digit) => digit,
                None => '?',
            },
            Mine => 'X',
        }
    }
}

impl Default for CellView {
    fn default() -> Self {
        Self::Hidden
    }
}
