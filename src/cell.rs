use serde::{Deserialize, Serialize};

use crate::grid::Pos;

/// Mutable per-cell state tracked by the board.
///
/// Flag and question marks exist only on covered cells; a revealed cell
/// carries its adjacent-mine count and nothing else, so the marks can never
/// survive a reveal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Flagged,
    Questioned,
    Revealed(u8),
}

impl CellState {
    pub const fn is_covered(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged | Self::Questioned)
    }
}

/// Renderer-facing classification of a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellView {
    Hidden,
    Flag,
    Question,
    Revealed(u8),
    /// A mine uncovered by the end-of-game sweep.
    Mine,
    /// The mine whose reveal lost the game.
    Exploded,
    /// A flagged cell that turned out not to hold a mine.
    Misflagged,
    /// A flagged mine confirmed once the game is won.
    CorrectFlag,
}

/// One cell whose visual state changed during an operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellChange {
    pub pos: Pos,
    pub view: CellView,
}
