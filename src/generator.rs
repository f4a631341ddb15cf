use alloc::vec::Vec;
use core::iter;

use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use smallvec::SmallVec;

use crate::GameConfig;
use crate::grid::{self, Pos};
use crate::layout::MineLayout;

/// Strategy seam for committing a mine layout.
pub trait LayoutGenerator {
    fn generate(self, config: GameConfig) -> MineLayout;
}

/// Uniform random placement that keeps the first-clicked cell and its whole
/// neighborhood mine-free, so the first reveal never loses and usually opens
/// an area.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomLayoutGenerator {
    seed: u64,
    safe: Pos,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64, safe: Pos) -> Self {
        Self { seed, safe }
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        let (width, height) = config.size;

        let exclusion: SmallVec<[Pos; 9]> = iter::once(self.safe)
            .chain(grid::neighbors(self.safe, config.size))
            .collect();

        let mut candidates: Vec<Pos> = Vec::with_capacity(config.total_cells() as usize);
        for x in 0..width {
            for y in 0..height {
                if !exclusion.contains(&(x, y)) {
                    candidates.push((x, y));
                }
            }
        }

        let requested = config.mines as usize;
        let placed = requested.min(candidates.len());
        if placed < requested {
            log::warn!("mine count clamped from {} to {}", requested, placed);
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        candidates.shuffle(&mut rng);

        let mut mines = Array2::from_elem(grid::nd((width, height)), false);
        for &pos in &candidates[..placed] {
            mines[grid::nd(pos)] = true;
        }
        MineLayout::from_mine_mask(mines)
    }
}
