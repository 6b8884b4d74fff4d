//! Parallel adjudication of independent games.
//!
//! Each board is adjudicated by exactly one task; boards never share state,
//! so a host running many games can resolve a whole turn at once.

use rayon::prelude::*;

use crate::board::Board;
use crate::options::AdjudicationOptions;

use super::kruijswijk::{Adjudicator, AdjudicationError};
use super::outcome::Adjudication;

/// Adjudicates every board on rayon's global pool. Results are in input order.
pub fn adjudicate_boards(
    boards: &mut [Board],
    options: AdjudicationOptions,
) -> Vec<Result<Adjudication, AdjudicationError>> {
    boards
        .par_iter_mut()
        .map(|board| Adjudicator::new(board, options).and_then(Adjudicator::run))
        .collect()
}

/// Like [`adjudicate_boards`], on a dedicated pool of `threads` workers.
pub fn adjudicate_boards_with_threads(
    boards: &mut [Board],
    options: AdjudicationOptions,
    threads: usize,
) -> Result<Vec<Result<Adjudication, AdjudicationError>>, rayon::ThreadPoolBuildError> {
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
    Ok(pool.install(|| adjudicate_boards(boards, options)))
}
