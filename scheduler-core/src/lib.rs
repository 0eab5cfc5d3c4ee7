//! # Scheduler-Core: Round-Table Seating Optimization Engine
//!
//! This crate builds and solves a constraint-satisfaction model that seats
//! `participants` people at `tables` tables across `rounds` rounds, pinning
//! the first `tables` participants as permanent table hosts, balancing table
//! occupancy within each round, and optimizing for a weighted mix of pair
//! constraints: pairs that must meet in exactly one round, pairs that must
//! never share a table, and a preference for meetings and host visits to
//! spread out rather than cluster.
//!
//! ## Quick Example
//!
//! ```no_run
//! use scheduler_core::{schedule, types::ScheduleRequest};
//!
//! let request = ScheduleRequest {
//!     participants: 6,
//!     tables: 2,
//!     rounds: 2,
//!     same_once_pairs: vec![],
//!     never_together_pairs: vec![],
//!     time_limit_seconds: None,
//! };
//!
//! match schedule(request) {
//!     Ok(response) => println!("status={} objective={}", response.solver_status, response.objective_value),
//!     Err(e) => eprintln!("error: {e}"),
//! }
//! ```
//!
//! ## Pipeline
//!
//! A request flows strictly once through six stages, each in its own module:
//! [`normalize`] canonicalizes the pair lists, [`planner`] computes reference
//! table sizes, [`model`] builds the decision variables and constraints,
//! [`objective`] adds the weighted maximize objective, [`solve`] invokes the
//! [`csp`] backend under a time budget, and [`extract`] reads the solution
//! back into a [`types::ScheduleResponse`] and audits it against the
//! never-together and same-once invariants.

pub mod csp;
pub mod error;
pub mod extract;
pub mod model;
pub mod normalize;
pub mod objective;
pub mod planner;
pub mod solve;
pub mod types;

pub use error::ScheduleError;
pub use types::{Pair, ScheduleRequest, ScheduleResponse};

/// Runs the full pipeline for a single request.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidInput`] if `participants`, `tables`,
/// `rounds`, or `time_limit_seconds` violate the bounds documented on
/// [`ScheduleRequest`]. Returns [`ScheduleError::InvalidProblem`] if the
/// normalized problem still fails the model builder's structural
/// preconditions (unreachable when `InvalidInput` validation above is kept
/// in sync with [`model::build_model`], but checked defensively rather than
/// assumed).
///
/// A request that is well-formed but cannot be solved within its time
/// budget is not an error: the response comes back with `solver_status` set
/// to `"UNKNOWN"` or `"INFEASIBLE"` and empty result fields.
pub fn schedule(request: ScheduleRequest) -> Result<ScheduleResponse, ScheduleError> {
    validate_request(&request)?;

    let same_once = normalize::normalize_pairs(&request.same_once_pairs, request.participants);
    let never_together = normalize::normalize_pairs(&request.never_together_pairs, request.participants);

    let mut seating_model = model::build_model(
        request.participants,
        request.tables,
        request.rounds,
        same_once,
        never_together,
    )
    .map_err(ScheduleError::InvalidProblem)?;

    objective::assemble_objective(&mut seating_model);

    let time_limit = request.time_limit_seconds.unwrap_or(types::DEFAULT_TIME_LIMIT_SECONDS);
    let config = solve::SolveConfig::new(time_limit);
    let solution = solve::solve(&seating_model, config);

    Ok(extract::extract(&seating_model, &solution, solution.status))
}

fn validate_request(request: &ScheduleRequest) -> Result<(), ScheduleError> {
    if request.participants == 0 {
        return Err(ScheduleError::InvalidInput("participants must be at least 1".to_string()));
    }
    if request.tables == 0 {
        return Err(ScheduleError::InvalidInput("tables must be at least 1".to_string()));
    }
    if request.tables > request.participants {
        return Err(ScheduleError::InvalidInput(format!(
            "tables ({}) must not exceed participants ({})",
            request.tables, request.participants
        )));
    }
    if request.rounds == 0 {
        return Err(ScheduleError::InvalidInput("rounds must be at least 1".to_string()));
    }
    if let Some(limit) = request.time_limit_seconds {
        if !(types::MIN_TIME_LIMIT_SECONDS..=types::MAX_TIME_LIMIT_SECONDS).contains(&limit) {
            return Err(ScheduleError::InvalidInput(format!(
                "time_limit_seconds ({limit}) must be between {} and {}",
                types::MIN_TIME_LIMIT_SECONDS,
                types::MAX_TIME_LIMIT_SECONDS
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(participants: u32, tables: u32, rounds: u32) -> ScheduleRequest {
        ScheduleRequest {
            participants,
            tables,
            rounds,
            same_once_pairs: vec![],
            never_together_pairs: vec![],
            time_limit_seconds: Some(5),
        }
    }

    #[test]
    fn rejects_more_tables_than_participants() {
        let err = schedule(request(3, 5, 1)).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidInput(_)));
    }

    #[test]
    fn rejects_out_of_range_time_limit() {
        let mut req = request(4, 2, 1);
        req.time_limit_seconds = Some(1000);
        let err = schedule(req).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidInput(_)));
    }

    #[test]
    fn singleton_tables_seat_every_host_alone() {
        let response = schedule(request(3, 3, 2)).unwrap();
        assert!(response.solver_status == "OPTIMAL" || response.solver_status == "FEASIBLE");
        assert_eq!(response.table_sizes, vec![1, 1, 1]);
        for round in &response.assignments {
            for (i, table) in round.iter().enumerate() {
                assert_eq!(table, &vec![i as u32 + 1]);
            }
        }
    }

    #[test]
    fn hosts_pinned_to_distinct_tables_cannot_satisfy_a_same_once_pair() {
        let mut req = request(4, 2, 2);
        req.same_once_pairs = vec![types::Pair(1, 2), types::Pair(2, 1), types::Pair(1, 2)];
        let response = schedule(req).unwrap();
        assert_eq!(response.unsatisfied_same_once_pairs, vec![types::Pair(1, 2)]);
        assert!(response.satisfied_same_once_pairs.is_empty());
    }

    #[test]
    fn silently_drops_pairs_referencing_unknown_participants() {
        let mut req = request(4, 2, 1);
        req.same_once_pairs = vec![types::Pair(1, 10)];
        req.never_together_pairs = vec![types::Pair(1, 5)];
        let response = schedule(req).unwrap();
        assert!(response.unsatisfied_same_once_pairs.is_empty());
        assert!(response.satisfied_same_once_pairs.is_empty());
    }
}
