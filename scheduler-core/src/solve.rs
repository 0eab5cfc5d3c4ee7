//! Invokes the CSP backend with a clamped time budget and reports a
//! normalized status.

use crate::csp::{CpSolution, CpStatus};
use crate::model::SeatingModel;
use crate::types::{MAX_TIME_LIMIT_SECONDS, MIN_TIME_LIMIT_SECONDS};
use std::time::{Duration, Instant};

/// Configuration accepted by the solve step. `num_search_workers` is carried
/// for interface parity with a genuinely parallel CP-SAT backend; the
/// bundled SAT backend solves single-threaded and does not read it.
#[derive(Debug, Clone, Copy)]
pub struct SolveConfig {
    pub time_limit_seconds: u64,
    pub num_search_workers: u32,
}

impl SolveConfig {
    /// Clamps `time_limit_seconds` into `[MIN_TIME_LIMIT_SECONDS, MAX_TIME_LIMIT_SECONDS]`.
    pub fn new(time_limit_seconds: u64) -> Self {
        let clamped = time_limit_seconds.clamp(MIN_TIME_LIMIT_SECONDS, MAX_TIME_LIMIT_SECONDS);
        Self {
            time_limit_seconds: clamped,
            num_search_workers: 8,
        }
    }
}

/// Runs the model's solve once, bounded by `config.time_limit_seconds`.
pub fn solve(model: &SeatingModel, config: SolveConfig) -> CpSolution {
    log::info!(
        "solving seating model: participants={} tables={} rounds={} same_once_pairs={} never_together_pairs={} time_limit_seconds={} num_search_workers={}",
        model.participants,
        model.tables,
        model.rounds,
        model.same_once_pairs.len(),
        model.never_together_pairs.len(),
        config.time_limit_seconds,
        config.num_search_workers,
    );

    let deadline = Instant::now() + Duration::from_secs(config.time_limit_seconds);
    let solution = model.csp.solve(deadline);

    log::info!(
        "solve finished: status={:?} objective={:?} wall_time={:.3}s",
        solution.status,
        solution.objective_value,
        solution.wall_time,
    );

    solution
}

/// Maps a [`CpStatus`] to the normalized status string used in responses.
pub fn status_str(status: CpStatus) -> &'static str {
    status.as_str()
}
