//! Error types returned by the scheduling pipeline.
//!
//! Only malformed or structurally impossible requests are represented as
//! errors. A request that is well-formed but cannot be solved within its
//! time budget is not an error: it comes back as an ordinary [`crate::types::ScheduleResponse`]
//! whose `solver_status` is `"UNKNOWN"` or `"INFEASIBLE"`.

use thiserror::Error;

/// Errors that can occur while building or solving a seating schedule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The request violated one of the structural bounds fixed at the API boundary
    /// (non-positive counts, more tables than participants, an out-of-range time limit).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The request passed input validation but the normalized problem itself has
    /// no well-formed model (for example a round count of zero would normally be
    /// caught by `InvalidInput`; this variant exists for preconditions that can only
    /// be checked once normalization has run).
    #[error("invalid problem: {0}")]
    InvalidProblem(String),
}
