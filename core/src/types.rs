/// Grid side length, also used for row/column positions.
pub type Coord = u8;

/// Count type used for cell counts, alive counts and cell indices.
pub type CellCount = u16;

/// Grid position `(row, column)`.
pub type Coord2 = (Coord, Coord);

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

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Row-major position of `index`: cells are ordered left-to-right, then top-to-bottom.
pub const fn cell_coords(index: CellCount, side: Coord) -> Coord2 {
    let side = side as CellCount;
    ((index / side) as Coord, (index % side) as Coord)
}

/// Inverse of [`cell_coords`].
pub const fn cell_index((row, col): Coord2, side: Coord) -> CellCount {
    mult(row, side) + col as CellCount
}
