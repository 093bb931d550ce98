use ndarray::Array2;

/// Single coordinate axis used for the board side and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`, `x` being the column and `y` the row.
pub type Coord2 = (Coord, Coord);

/// Turns board coordinates into the `[x, y]` index of the grid's cell buffer.
pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

/// Number of cells on a square board of side `size`.
pub const fn square(size: Coord) -> CellCount {
    let size = size as CellCount;
    size.saturating_mul(size)
}

/// Walks the up to 8 cells touching a position of a 2D buffer, used both to
/// count mines while placing them and to spread a reveal.
pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        let (dim_x, dim_y) = self.dim();
        let bounds = (
            Coord::try_from(dim_x).unwrap_or(Coord::MAX),
            Coord::try_from(dim_y).unwrap_or(Coord::MAX),
        );
        NeighborIter::new(index, bounds)
    }
}

/// Every `{-1, 0, 1}` offset pair except the cell itself, row above first.
const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (i8, i8), bounds: Coord2) -> Option<Coord2> {
    let (x, y) = coords;
    let (dx, dy) = delta;
    let (max_x, max_y) = bounds;

    let next_x = x.checked_add_signed(dx)?;
    if next_x >= max_x {
        return None;
    }

    let next_y = y.checked_add_signed(dy)?;
    if next_y >= max_y {
        return None;
    }

    Some((next_x, next_y))
}

/// Iterates the in-bounds cells among the 8 around `center`, never `center` itself.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub(crate) fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *DISPLACEMENTS.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(next_item) = apply_delta(self.center, delta, self.bounds) {
                return Some(next_item);
            }
        }
    }
}
