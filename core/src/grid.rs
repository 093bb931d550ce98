use alloc::string::String;
use core::ops::Index;
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::*;

/// Square board of cells addressed by `(x, y)`.
///
/// The grid is the single source of truth for a board. Mine placement and the
/// neighbor counts derived from it are fixed once the grid is built; only the
/// revealed and flagged marks change afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Array2<Cell>", into = "Array2<Cell>")]
pub struct Grid {
    cells: Array2<Cell>,
    size: Coord,
}

impl Grid {
    /// Mine-free board with every cell hidden.
    pub fn new(size: Coord) -> Result<Self> {
        if size == 0 {
            return Err(GameError::InvalidSize);
        }
        Ok(Self {
            cells: Array2::default((size, size).to_nd_index()),
            size,
        })
    }

    /// Builds a board with mines at exactly the given coordinates, repeated
    /// coordinates count once.
    pub fn from_mine_coords(size: Coord, mine_coords: &[Coord2]) -> Result<Self> {
        let mut grid = Self::new(size)?;
        for &coords in mine_coords {
            let coords = grid.validate_coords(coords)?;
            grid.place_mine(coords);
        }
        Ok(grid)
    }

    /// Takes over a raw cell buffer, checking that it is square and that every
    /// safe cell counts its neighboring mines correctly.
    pub fn from_cells(cells: Array2<Cell>) -> Result<Self> {
        let (dim_x, dim_y) = cells.dim();
        if dim_x != dim_y {
            return Err(GameError::InvalidBoard);
        }
        let size = Coord::try_from(dim_x).map_err(|_| GameError::InvalidSize)?;
        if size == 0 {
            return Err(GameError::InvalidSize);
        }

        let grid = Self { cells, size };
        for (coords, cell) in grid.iter() {
            if !cell.is_bomb && cell.value != grid.adjacent_mine_count(coords) {
                log::warn!(
                    "Cell at {:?} claims {} adjacent mines, actual: {}",
                    coords,
                    cell.value,
                    grid.adjacent_mine_count(coords)
                );
                return Err(GameError::InvalidBoard);
            }
        }
        Ok(grid)
    }

    pub fn size(&self) -> Coord {
        self.size
    }

    pub fn total_cells(&self) -> CellCount {
        square(self.size)
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        coords.0 < self.size && coords.1 < self.size
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// Cell at `coords`, `None` when out of bounds.
    pub fn cell_at(&self, coords: Coord2) -> Option<Cell> {
        self.contains(coords).then(|| self[coords])
    }

    pub fn mine_count(&self) -> CellCount {
        self.count_cells(|cell| cell.is_bomb)
    }

    pub fn flag_count(&self) -> CellCount {
        self.count_cells(|cell| cell.is_marked())
    }

    pub fn revealed_count(&self) -> CellCount {
        self.count_cells(|cell| cell.is_revealed)
    }

    /// How many mines have not been flagged yet, negative with too many flags.
    pub fn mines_left(&self) -> isize {
        (self.mine_count() as isize) - (self.flag_count() as isize)
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        let count = self
            .iter_neighbors(coords)
            .filter(|&pos| self[pos].is_bomb)
            .count();
        // at most 8 neighbors
        count as u8
    }

    /// Every cell with its coordinates, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.rows().enumerate().flat_map(|(y, row)| {
            row.into_iter()
                .enumerate()
                .map(move |(x, &cell)| ((x as Coord, y as Coord), cell))
        })
    }

    /// Rows from top to bottom, each holding its cells from left to right.
    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, Cell>> {
        self.cells.axis_iter(Axis(1))
    }

    /// Text picture of the board, one line per row.
    pub fn render_text(&self, debug: bool) -> String {
        let side = usize::from(self.size);
        let mut text = String::with_capacity(side * (side + 1));
        for (y, row) in self.rows().enumerate() {
            if y > 0 {
                text.push('\n');
            }
            text.extend(row.iter().map(|cell| cell.view(debug).glyph()));
        }
        text
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[coords.to_nd_index()]
    }

    /// Turns the cell into a mine and bumps the count of each neighbor, returns
    /// false without changes when there already is a mine.
    pub(crate) fn place_mine(&mut self, coords: Coord2) -> bool {
        if self[coords].is_bomb {
            return false;
        }
        self.cell_mut(coords).is_bomb = true;
        for pos in self.iter_neighbors(coords) {
            self.cell_mut(pos).value += 1;
        }
        true
    }

    fn count_cells(&self, predicate: impl Fn(&Cell) -> bool) -> CellCount {
        let count = self.cells.iter().filter(|cell| predicate(cell)).count();
        // bounded by square(Coord::MAX)
        count as CellCount
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl TryFrom<Array2<Cell>> for Grid {
    type Error = GameError;

    fn try_from(cells: Array2<Cell>) -> Result<Self> {
        Self::from_cells(cells)
    }
}

impl From<Grid> for Array2<Cell> {
    fn from(grid: Grid) -> Self {
        grid.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn new_rejects_empty_board() {
        assert_eq!(Grid::new(0), Err(GameError::InvalidSize));
    }

    #[test]
    fn new_board_is_blank() {
        let grid = Grid::new(4).unwrap();

        assert_eq!(grid.size(), 4);
        assert_eq!(grid.total_cells(), 16);
        assert!(grid.iter().all(|(_, cell)| cell == Cell::default()));
    }

    #[test]
    fn from_mine_coords_counts_neighbors() {
        let grid = Grid::from_mine_coords(3, &[(0, 0), (2, 0)]).unwrap();

        assert_eq!(grid.mine_count(), 2);
        assert_eq!(grid[(1, 0)].value, 2);
        assert_eq!(grid[(1, 1)].value, 2);
        assert_eq!(grid[(0, 1)].value, 1);
        assert_eq!(grid[(1, 2)].value, 0);
    }

    #[test]
    fn from_mine_coords_ignores_duplicates() {
        let grid = Grid::from_mine_coords(2, &[(1, 1), (1, 1)]).unwrap();

        assert_eq!(grid.mine_count(), 1);
        assert_eq!(grid[(0, 0)].value, 1);
    }

    #[test]
    fn from_mine_coords_rejects_out_of_bounds() {
        assert_eq!(
            Grid::from_mine_coords(2, &[(2, 0)]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn cell_at_is_none_out_of_bounds() {
        let grid = Grid::new(2).unwrap();

        assert!(grid.cell_at((1, 1)).is_some());
        assert!(grid.cell_at((2, 0)).is_none());
        assert!(grid.cell_at((0, 2)).is_none());
    }

    #[test]
    fn iter_goes_row_by_row() {
        let grid = Grid::new(2).unwrap();
        let coords: Vec<_> = grid.iter().map(|(coords, _)| coords).collect();

        assert_eq!(coords, [(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn render_text_draws_rows() {
        let grid = Grid::from_mine_coords(3, &[(2, 0)]).unwrap();

        assert_eq!(grid.render_text(false), "###\n###\n###");
        assert_eq!(grid.render_text(true), " 1X\n 11\n   ");
    }

    #[test]
    fn from_cells_rejects_wrong_counts() {
        let grid = Grid::from_mine_coords(2, &[(0, 0)]).unwrap();
        let mut cells: Array2<Cell> = grid.into();
        cells[[1, 1]].value = 0;

        assert_eq!(Grid::from_cells(cells), Err(GameError::InvalidBoard));
    }

    #[test]
    fn from_cells_rejects_non_square() {
        let cells: Array2<Cell> = Array2::default([2, 3]);

        assert_eq!(Grid::from_cells(cells), Err(GameError::InvalidBoard));
    }

    #[test]
    fn serde_round_trip_keeps_marks() {
        let mut grid = Grid::from_mine_coords(3, &[(1, 1)]).unwrap();
        grid.cell_mut((0, 0)).is_revealed = true;
        grid.cell_mut((1, 1)).is_flagged = true;

        let json = serde_json::to_string(&grid).unwrap();
        let restored: Grid = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, grid);
    }

    #[test]
    fn mines_left_goes_negative() {
        let mut grid = Grid::from_mine_coords(2, &[(0, 0)]).unwrap();
        grid.cell_mut((1, 0)).is_flagged = true;
        grid.cell_mut((0, 1)).is_flagged = true;

        assert_eq!(grid.mines_left(), -1);
    }
}
