/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for mine totals and cell totals.
pub type CellCount = u16;

/// Two-dimensional position `(x, y)`.
pub type Pos = (Coord, Coord);

pub const fn area(width: Coord, height: Coord) -> CellCount {
    (width as CellCount).saturating_mul(height as CellCount)
}

pub(crate) const fn nd((x, y): Pos) -> (usize, usize) {
    (x as usize, y as usize)
}

const OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Iterates the up-to-8 in-bounds neighbors of `pos` on a grid of the given
/// bounds.
pub fn neighbors(pos: Pos, bounds: Pos) -> impl Iterator<Item = Pos> {
    OFFSETS.iter().filter_map(move |&(dx, dy)| {
        let x = pos.0.checked_add_signed(dx)?;
        let y = pos.1.checked_add_signed(dy)?;
        (x < bounds.0 && y < bounds.1).then_some((x, y))
    })
}
