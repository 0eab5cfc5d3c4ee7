//! Request and response shapes for the scheduling operation.
//!
//! These types are the entire public contract of the core: a [`ScheduleRequest`]
//! goes in, a [`ScheduleResponse`] comes out. Both derive `serde::{Serialize, Deserialize}`
//! so the HTTP transport and the CLI driver can move them across JSON verbatim.

use serde::{Deserialize, Serialize};

/// Lower bound on the per-request solver time budget, in seconds.
pub const MIN_TIME_LIMIT_SECONDS: u64 = 1;
/// Upper bound on the per-request solver time budget, in seconds.
pub const MAX_TIME_LIMIT_SECONDS: u64 = 300;
/// Time budget applied when a request omits `time_limit_seconds`.
pub const DEFAULT_TIME_LIMIT_SECONDS: u64 = 60;

/// An unordered pair of participant numbers, as supplied by a caller.
///
/// Pairs are 1-indexed and are not assumed to be canonicalized (`u` need not
/// be less than `v`); canonicalization happens in [`crate::normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair(pub u32, pub u32);

/// A request to seat `participants` people at `tables` tables across `rounds` rounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Total number of participants, numbered `1..=participants`.
    pub participants: u32,
    /// Number of tables. Participants `1..=tables` are hosts, permanently bound
    /// to the table sharing their number.
    pub tables: u32,
    /// Number of seating rounds.
    pub rounds: u32,
    /// Pairs that must share a table in exactly one round.
    #[serde(default)]
    pub same_once_pairs: Vec<Pair>,
    /// Pairs that must never share a table.
    #[serde(default)]
    pub never_together_pairs: Vec<Pair>,
    /// Solver time budget in seconds. Defaults to [`DEFAULT_TIME_LIMIT_SECONDS`] when omitted.
    #[serde(default)]
    pub time_limit_seconds: Option<u64>,
}

/// The outcome of scheduling a single request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    /// Echoed from the request.
    pub participants: u32,
    /// Echoed from the request.
    pub tables: u32,
    /// Echoed from the request.
    pub rounds: u32,
    /// Reference table sizes from the table-size planner, one entry per table.
    pub table_sizes: Vec<u32>,
    /// Actual per-round, per-table sizes read back from the solved assignment.
    /// Empty when no assignment was found.
    pub table_sizes_per_round: Vec<Vec<u32>>,
    /// `assignments[round][table]` lists the participants seated there, ascending.
    /// Empty when no assignment was found.
    pub assignments: Vec<Vec<Vec<u32>>>,
    /// Normalized same-once pairs that met in exactly one round.
    pub satisfied_same_once_pairs: Vec<Pair>,
    /// Normalized same-once pairs that did not meet in exactly one round.
    pub unsatisfied_same_once_pairs: Vec<Pair>,
    /// Normalized never-together pairs that were nonetheless found sharing a table.
    /// A sound model and solver keep this empty; it exists as an audit trail.
    pub never_together_violations: Vec<Pair>,
    /// The solver's weighted objective value. Zero when no assignment was found.
    pub objective_value: i64,
    /// One of `OPTIMAL`, `FEASIBLE`, `INFEASIBLE`, `MODEL_INVALID`, `UNKNOWN`.
    pub solver_status: String,
}
