use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::grid::{self, CellCount, Pos};

/// Committed mine placement, fixed for the lifetime of a board. The mask and
/// the adjacency grid are built once and never change afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mines: Array2<bool>,
    adjacent: Array2<u8>,
    mine_count: CellCount,
}

impl MineLayout {
    /// Builds a layout from a mask, counting mines and precomputing every
    /// cell's adjacent-mine count from the final placement.
    pub fn from_mine_mask(mines: Array2<bool>) -> Self {
        let dim = mines.dim();
        let size: Pos = (
            dim.0.try_into().expect("grid width exceeds Coord"),
            dim.1.try_into().expect("grid height exceeds Coord"),
        );

        let mut adjacent = Array2::from_elem(dim, 0u8);
        let mut mine_count: CellCount = 0;
        for x in 0..size.0 {
            for y in 0..size.1 {
                if mines[grid::nd((x, y))] {
                    mine_count += 1;
                    for pos in grid::neighbors((x, y), size) {
                        adjacent[grid::nd(pos)] += 1;
                    }
                }
            }
        }

        Self {
            mines,
            adjacent,
            mine_count,
        }
    }

    pub fn from_mine_coords(size: Pos, mine_coords: &[Pos]) -> Result<Self> {
        let mut mines = Array2::from_elem(grid::nd(size), false);
        for &pos in mine_coords {
            if pos.0 >= size.0 || pos.1 >= size.1 {
                return Err(GameError::OutOfBounds);
            }
            mines[grid::nd(pos)] = true;
        }
        Ok(Self::from_mine_mask(mines))
    }

    pub fn size(&self) -> Pos {
        let dim = self.mines.dim();
        (
            dim.0.try_into().expect("grid width exceeds Coord"),
            dim.1.try_into().expect("grid height exceeds Coord"),
        )
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.mines.len() as CellCount
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn contains_mine(&self, pos: Pos) -> bool {
        self.mines[grid::nd(pos)]
    }

    /// Number of mines among the 8 neighbors. Never consulted for mine
    /// cells.
    pub fn adjacent_mines(&self, pos: Pos) -> u8 {
        self.adjacent[grid::nd(pos)]
    }
}
