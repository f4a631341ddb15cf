use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;
use core::num::Saturating;
use core::ops::BitOr;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::GameConfig;
use crate::cell::{CellChange, CellState, CellView};
use crate::error::{GameError, Result};
use crate::generator::{LayoutGenerator, RandomLayoutGenerator};
use crate::grid::{self, CellCount, Coord, Pos};
use crate::layout::MineLayout;

/// Board lifecycle. Transitions are one-directional:
/// `NotStarted -> InProgress -> Won | Lost`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl Phase {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Opened,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Merges per-cell outcomes when a chord reveals several neighbors.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) | (_, HitMine) => HitMine,
            (Won, _) | (_, Won) => Won,
            (Opened, _) | (_, Opened) => Opened,
            (NoChange, NoChange) => NoChange,
        }
    }
}

/// Which step of the annotation cycle a `toggle_flag` call performed, so the
/// caller can pick the matching feedback.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagTransition {
    NoChange,
    FlagSet,
    FlagCleared,
    QuestionSet,
    QuestionCleared,
}

impl FlagTransition {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Result of a reveal or chord: every cell whose visual state changed, plus
/// the merged outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealReport {
    pub changed: Vec<CellChange>,
    pub outcome: RevealOutcome,
}

impl RevealReport {
    const fn unchanged() -> Self {
        Self {
            changed: Vec::new(),
            outcome: RevealOutcome::NoChange,
        }
    }

    pub fn lost(&self) -> bool {
        self.outcome == RevealOutcome::HitMine
    }

    pub fn won(&self) -> bool {
        self.outcome == RevealOutcome::Won
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlagReport {
    pub changed: Vec<CellChange>,
    pub transition: FlagTransition,
}

impl FlagReport {
    const fn unchanged() -> Self {
        Self {
            changed: Vec::new(),
            transition: FlagTransition::NoChange,
        }
    }
}

/// Minefield grid state machine. Owns every cell; all operations run to
/// completion before returning, and each returns the delta of cells whose
/// visual state changed.
///
/// Mine placement is deferred: the board is created empty and the first
/// reveal commits a layout that keeps the clicked neighborhood mine-free.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: GameConfig,
    seed: u64,
    layout: Option<MineLayout>,
    cells: Array2<CellState>,
    revealed_count: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
    phase: Phase,
    triggered_mine: Option<Pos>,
}

impl Board {
    /// A fresh board with no mines committed yet. `seed` drives the
    /// placement shuffle once the first reveal arrives.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            layout: None,
            cells: Array2::from_elem(grid::nd(config.size), CellState::Hidden),
            revealed_count: Saturating(0),
            flagged_count: Saturating(0),
            phase: Phase::NotStarted,
            triggered_mine: None,
        }
    }

    /// A board over a preassembled layout, for scripted games and replays.
    /// Still starts in `NotStarted` until the first reveal.
    pub fn with_layout(layout: MineLayout) -> Self {
        let size = layout.size();
        Self {
            config: GameConfig {
                size,
                mines: layout.mine_count(),
            },
            seed: 0,
            layout: Some(layout),
            cells: Array2::from_elem(grid::nd(size), CellState::Hidden),
            revealed_count: Saturating(0),
            flagged_count: Saturating(0),
            phase: Phase::NotStarted,
            triggered_mine: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn size(&self) -> Pos {
        self.config.size
    }

    pub fn width(&self) -> Coord {
        self.config.size.0
    }

    pub fn height(&self) -> Coord {
        self.config.size.1
    }

    /// Effective mine count: the configured request until placement, the
    /// committed count afterwards.
    pub fn mine_count(&self) -> CellCount {
        self.layout
            .as_ref()
            .map_or(self.config.mines, MineLayout::mine_count)
    }

    /// Informational counter for the mine display. Over-flagging pins it at
    /// zero without implying victory; it is never consulted for the win
    /// check.
    pub fn remaining_mines(&self) -> CellCount {
        self.mine_count().saturating_sub(self.flagged_count.0)
    }

    pub fn has_mine_at(&self, pos: Pos) -> bool {
        self.layout
            .as_ref()
            .is_some_and(|layout| layout.contains_mine(pos))
    }

    /// The mine whose reveal lost the game, if any.
    pub fn triggered_mine(&self) -> Option<Pos> {
        self.triggered_mine
    }

    /// Renderer-facing classification of one cell, resolving the
    /// end-of-game presentation from the terminal phase.
    pub fn cell_view(&self, pos: Pos) -> CellView {
        let base = match self.cells[grid::nd(pos)] {
            CellState::Hidden => CellView::Hidden,
            CellState::Flagged => CellView::Flag,
            CellState::Questioned => CellView::Question,
            CellState::Revealed(count) => CellView::Revealed(count),
        };

        match self.phase {
            Phase::NotStarted | Phase::InProgress => base,
            Phase::Won => match base {
                CellView::Flag if self.has_mine_at(pos) => CellView::CorrectFlag,
                other => other,
            },
            Phase::Lost => {
                if self.triggered_mine == Some(pos) {
                    return CellView::Exploded;
                }
                match (self.has_mine_at(pos), base) {
                    (true, CellView::Flag) => CellView::Flag,
                    (true, _) => CellView::Mine,
                    (false, CellView::Flag) => CellView::Misflagged,
                    (false, other) => other,
                }
            }
        }
    }

    /// Uncovers a cell. Commits the mine layout on the very first reveal,
    /// flood fills from zero-adjacency cells, and resolves win/loss.
    ///
    /// Revealed and flagged targets, and any target once the game has
    /// ended, are defined no-ops returning an empty report.
    pub fn reveal(&mut self, pos: Pos) -> Result<RevealReport> {
        let pos = self.validate(pos)?;

        if self.phase.is_terminal() || !self.is_openable(pos) {
            return Ok(RevealReport::unchanged());
        }

        if self.layout.is_none() {
            self.place_mines(pos);
        }

        let mut changed = Vec::new();
        let outcome = self.reveal_single(pos, &mut changed);
        Ok(RevealReport { changed, outcome })
    }

    /// Reveals every unflagged covered neighbor of a revealed numbered cell
    /// whose flagged-neighbor count matches its number. The flag count is a
    /// player claim; chording onto a wrongly flagged neighborhood loses the
    /// game exactly like a direct reveal.
    pub fn chord(&mut self, pos: Pos) -> Result<RevealReport> {
        let pos = self.validate(pos)?;

        if self.phase != Phase::InProgress {
            return Ok(RevealReport::unchanged());
        }

        let CellState::Revealed(count) = self.cells[grid::nd(pos)] else {
            return Ok(RevealReport::unchanged());
        };
        if count == 0 || count != self.count_flagged_neighbors(pos) {
            return Ok(RevealReport::unchanged());
        }

        let mut changed = Vec::new();
        let mut outcome = RevealOutcome::NoChange;
        for neighbor in grid::neighbors(pos, self.config.size) {
            if self.is_openable(neighbor) {
                outcome = outcome | self.reveal_single(neighbor, &mut changed);
            }
        }
        Ok(RevealReport { changed, outcome })
    }

    /// Steps the annotation cycle on a covered cell:
    /// `bare -> flagged -> questioned -> bare` when question marks are
    /// enabled, `bare -> flagged -> bare` otherwise. The flag is evaluated
    /// at call time, so toggling the preference mid-game takes effect on
    /// the next call.
    pub fn toggle_flag(&mut self, pos: Pos, question_marks: bool) -> Result<FlagReport> {
        use CellState::*;
        use FlagTransition::*;

        let pos = self.validate(pos)?;

        if self.phase.is_terminal() {
            return Ok(FlagReport::unchanged());
        }

        let (next, transition) = match self.cells[grid::nd(pos)] {
            Hidden => (Flagged, FlagSet),
            Flagged if question_marks => (Questioned, QuestionSet),
            Flagged => (Hidden, FlagCleared),
            Questioned => (Hidden, QuestionCleared),
            Revealed(_) => return Ok(FlagReport::unchanged()),
        };

        match transition {
            FlagSet => self.flagged_count += Saturating(1),
            FlagCleared | QuestionSet => self.flagged_count -= Saturating(1),
            QuestionCleared | NoChange => {}
        }
        self.cells[grid::nd(pos)] = next;

        let view = self.cell_view(pos);
        Ok(FlagReport {
            changed: vec![CellChange { pos, view }],
            transition,
        })
    }

    fn place_mines(&mut self, safe: Pos) {
        let layout = RandomLayoutGenerator::new(self.seed, safe).generate(self.config);
        log::debug!(
            "committed {} mines on {}x{}, safe start {:?}",
            layout.mine_count(),
            self.config.size.0,
            self.config.size.1,
            safe
        );
        self.layout = Some(layout);
        self.phase = Phase::InProgress;
    }

    fn reveal_single(&mut self, pos: Pos, changed: &mut Vec<CellChange>) -> RevealOutcome {
        if self.phase.is_terminal() || !self.is_openable(pos) {
            return RevealOutcome::NoChange;
        }

        if self.has_mine_at(pos) {
            self.triggered_mine = Some(pos);
            self.phase = Phase::Lost;
            log::debug!("mine hit at {:?}", pos);
            self.push_loss_sweep(changed);
            return RevealOutcome::HitMine;
        }

        self.open_cell(pos, changed);
        if self.adjacent_mines(pos) == 0 {
            self.flood_fill(pos, changed);
        }

        if self.revealed_count.0 == self.safe_cell_count() {
            self.phase = Phase::Won;
            log::debug!("all safe cells revealed, game won");
            self.push_win_sweep(changed);
            RevealOutcome::Won
        } else {
            if self.phase == Phase::NotStarted {
                self.phase = Phase::InProgress;
            }
            RevealOutcome::Opened
        }
    }

    fn open_cell(&mut self, pos: Pos, changed: &mut Vec<CellChange>) {
        let count = self.adjacent_mines(pos);
        self.cells[grid::nd(pos)] = CellState::Revealed(count);
        self.revealed_count += Saturating(1);
        changed.push(CellChange {
            pos,
            view: CellView::Revealed(count),
        });
    }

    fn flood_fill(&mut self, start: Pos, changed: &mut Vec<CellChange>) {
        let bounds = self.config.size;
        let mut queue: VecDeque<Pos> = grid::neighbors(start, bounds).collect();

        while let Some(pos) = queue.pop_front() {
            // the cell state doubles as the visited check: anything already
            // revealed or flagged is skipped, which also bounds the queue
            if !self.is_openable(pos) {
                continue;
            }

            self.open_cell(pos, changed);
            log::trace!("flood fill opened {:?}", pos);

            if self.adjacent_mines(pos) == 0 {
                queue.extend(grid::neighbors(pos, bounds).filter(|&next| self.is_openable(next)));
            }
        }
    }

    fn push_loss_sweep(&self, changed: &mut Vec<CellChange>) {
        let (width, height) = self.config.size;
        for x in 0..width {
            for y in 0..height {
                let pos = (x, y);
                let state = self.cells[grid::nd(pos)];
                if self.triggered_mine == Some(pos) {
                    changed.push(CellChange {
                        pos,
                        view: CellView::Exploded,
                    });
                } else if self.has_mine_at(pos) && matches!(state, CellState::Hidden | CellState::Questioned) {
                    changed.push(CellChange {
                        pos,
                        view: CellView::Mine,
                    });
                } else if !self.has_mine_at(pos) && state == CellState::Flagged {
                    changed.push(CellChange {
                        pos,
                        view: CellView::Misflagged,
                    });
                }
            }
        }
    }

    fn push_win_sweep(&self, changed: &mut Vec<CellChange>) {
        let (width, height) = self.config.size;
        for x in 0..width {
            for y in 0..height {
                let pos = (x, y);
                if self.cells[grid::nd(pos)] == CellState::Flagged && self.has_mine_at(pos) {
                    changed.push(CellChange {
                        pos,
                        view: CellView::CorrectFlag,
                    });
                }
            }
        }
    }

    fn is_openable(&self, pos: Pos) -> bool {
        matches!(
            self.cells[grid::nd(pos)],
            CellState::Hidden | CellState::Questioned
        )
    }

    fn count_flagged_neighbors(&self, pos: Pos) -> u8 {
        grid::neighbors(pos, self.config.size)
            .filter(|&neighbor| self.cells[grid::nd(neighbor)] == CellState::Flagged)
            .count() as u8
    }

    fn adjacent_mines(&self, pos: Pos) -> u8 {
        self.layout
            .as_ref()
            .map_or(0, |layout| layout.adjacent_mines(pos))
    }

    fn safe_cell_count(&self) -> CellCount {
        self.layout
            .as_ref()
            .map_or_else(|| self.config.total_cells(), MineLayout::safe_cell_count)
    }

    fn validate(&self, pos: Pos) -> Result<Pos> {
        let (width, height) = self.config.size;
        if pos.0 < width && pos.1 < height {
            Ok(pos)
        } else {
            Err(GameError::OutOfBounds)
        }
    }
}
