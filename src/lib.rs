#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use layout::*;

mod board;
mod cell;
mod error;
mod generator;
mod grid;
mod layout;

/// Requested board shape: dimensions plus the mine count the player asked
/// for. The effective mine count is fixed later, when the first reveal
/// commits the layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Pos,
    pub mines: CellCount,
}

impl GameConfig {
    pub fn new((width, height): Pos, mines: CellCount) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mines = mines.min(area(width, height));
        Self {
            size: (width, height),
            mines,
        }
    }

    pub const fn total_cells(&self) -> CellCount {
        area(self.size.0, self.size.1)
    }
}
