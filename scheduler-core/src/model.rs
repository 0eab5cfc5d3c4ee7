//! Translates a normalized seating problem into a [`CpModel`].
//!
//! This is the largest module in the crate by variable count: it owns every
//! decision variable the solver touches and every structural constraint
//! in the seating invariants (one table per round, host pinning, balance,
//! never-together, same-once, guest uniqueness). The objective itself is
//! assembled separately in [`crate::objective`] once every variable this
//! module creates is available.

use crate::csp::{CpModel, VarId};
use crate::types::Pair;

/// All decision variables the model builder creates, indexed so the
/// objective assembler and the result extractor can read them back without
/// re-deriving any indexing arithmetic.
#[derive(Debug)]
pub struct SeatingModel {
    pub csp: CpModel,
    pub participants: u32,
    pub tables: u32,
    pub rounds: u32,
    pub same_once_pairs: Vec<Pair>,
    pub never_together_pairs: Vec<Pair>,

    /// `assign[p][t][r]`, `p` and `t` 0-indexed, true iff participant `p+1`
    /// sits at table `t+1` in round `r`.
    pub assign: Vec<Vec<Vec<VarId>>>,
    /// `size[t][r]`, the occupancy of table `t+1` in round `r`.
    pub size: Vec<Vec<VarId>>,
    /// `min_size[r]` / `max_size[r]`, the extremal table occupancy in round `r`.
    pub min_size: Vec<VarId>,
    pub max_size: Vec<VarId>,
    /// `meet[i][r]`, true iff same-once pair `i` shares a table in round `r`.
    pub meet: Vec<Vec<VarId>>,
    /// `meet_host[i][h]`, true iff same-once pair `i` ever meets at host `h`'s table.
    pub meet_host: Vec<Vec<VarId>>,
    /// `visited[g][h]`, true iff guest `g` ever sits at host `h`'s table.
    /// Indexed by guest position (0-based among guests) and host 0-based index.
    pub visited: Vec<Vec<VarId>>,
    /// `pair_host_used[p][h]` for every participant `p` appearing in at least
    /// one same-once pair, true iff some pair containing `p` meets at host `h`.
    pub pair_host_used: Vec<(u32, Vec<VarId>)>,
}

/// Builds the full constraint model for a normalized problem.
///
/// `same_once_pairs` and `never_together_pairs` must already be canonicalized
/// via [`crate::normalize::normalize_pairs`]. Returns `Err` if the basic
/// structural preconditions (`participants >= tables >= 1`, `rounds >= 1`)
/// do not hold; callers are expected to have already enforced the same via
/// input validation, so this is a defensive second check.
pub fn build_model(
    participants: u32,
    tables: u32,
    rounds: u32,
    same_once_pairs: Vec<Pair>,
    never_together_pairs: Vec<Pair>,
) -> Result<SeatingModel, String> {
    if tables == 0 || participants < tables {
        return Err(format!(
            "need participants >= tables >= 1, got participants={participants} tables={tables}"
        ));
    }
    if rounds == 0 {
        return Err("rounds must be at least 1".to_string());
    }

    let n = participants as usize;
    let t = tables as usize;
    let r = rounds as usize;
    let mut csp = CpModel::new();

    // X[p][t][r]
    let assign: Vec<Vec<Vec<VarId>>> = (0..n)
        .map(|_| (0..t).map(|_| (0..r).map(|_| csp.new_bool_var()).collect()).collect())
        .collect();

    // One table per round, per participant.
    for p in 0..n {
        for round in 0..r {
            let vars: Vec<VarId> = (0..t).map(|table| assign[p][table][round]).collect();
            let coeffs = vec![1i64; t];
            csp.add_linear_eq(&vars, &coeffs, 1);
        }
    }

    // Host pinning: participant h (0-indexed, h < t) is host of table h.
    for h in 0..t {
        for round in 0..r {
            for table in 0..t {
                csp.fix_bool(assign[h][table][round], table == h);
            }
        }
    }

    // Size variables and round-balance.
    let size: Vec<Vec<VarId>> = (0..t).map(|_| (0..r).map(|_| csp.new_int_var(0, n as i64)).collect()).collect();
    let min_size: Vec<VarId> = (0..r).map(|_| csp.new_int_var(0, n as i64)).collect();
    let max_size: Vec<VarId> = (0..r).map(|_| csp.new_int_var(0, n as i64)).collect();
    for round in 0..r {
        for table in 0..t {
            let vars: Vec<VarId> = (0..n).map(|p| assign[p][table][round]).collect();
            let mut lin_vars = vars.clone();
            lin_vars.push(size[table][round]);
            let mut coeffs = vec![1i64; n];
            coeffs.push(-1);
            csp.add_linear_eq(&lin_vars, &coeffs, 0);

            csp.add_linear_ge(&[max_size[round], size[table][round]], &[1, -1], 0);
            csp.add_linear_le(&[min_size[round], size[table][round]], &[1, -1], 0);
        }
        csp.add_linear_le(&[max_size[round], min_size[round]], &[1, -1], 1);
    }

    // Never-together: forbidden co-occurrence at any table, any round.
    for pair in &never_together_pairs {
        let (u, v) = (pair.0 as usize - 1, pair.1 as usize - 1);
        for round in 0..r {
            for table in 0..t {
                csp.add_linear_le(&[assign[u][table][round], assign[v][table][round]], &[1, 1], 1);
            }
        }
    }

    // Same-once pairs: per-table meeting booleans, OR'd into a per-round
    // meeting boolean, capped at one satisfied round overall.
    let mut meet = Vec::with_capacity(same_once_pairs.len());
    let mut meet_host = Vec::with_capacity(same_once_pairs.len());
    for pair in &same_once_pairs {
        let (u, v) = (pair.0 as usize - 1, pair.1 as usize - 1);
        let mut meet_r = Vec::with_capacity(r);
        let mut meet_h = Vec::with_capacity(t);
        let mut z_by_host_round: Vec<Vec<VarId>> = vec![Vec::with_capacity(r); t];
        for round in 0..r {
            let mut z_per_table = Vec::with_capacity(t);
            for table in 0..t {
                let z = csp.new_bool_var();
                csp.add_and_eq(z, &[assign[u][table][round], assign[v][table][round]]);
                z_per_table.push(z);
                z_by_host_round[table].push(z);
            }
            let meet_var = csp.new_bool_var();
            csp.add_or_eq(meet_var, &z_per_table);
            meet_r.push(meet_var);
        }
        for host in 0..t {
            let meet_host_var = csp.new_bool_var();
            csp.add_or_eq(meet_host_var, &z_by_host_round[host]);
            meet_h.push(meet_host_var);
        }
        let coeffs = vec![1i64; r];
        csp.add_linear_le(&meet_r, &coeffs, 1);
        meet.push(meet_r);
        meet_host.push(meet_h);
    }

    // Guest uniqueness: any two guests meet in at most one round, same
    // AND/OR linearization as same-once pairs but without a pair-result
    // distinction (there is no "satisfied" notion for these).
    for g1 in t..n {
        for g2 in (g1 + 1)..n {
            let mut meet_r = Vec::with_capacity(r);
            for round in 0..r {
                let mut z_per_table = Vec::with_capacity(t);
                for table in 0..t {
                    let z = csp.new_bool_var();
                    csp.add_and_eq(z, &[assign[g1][table][round], assign[g2][table][round]]);
                    z_per_table.push(z);
                }
                let meet_var = csp.new_bool_var();
                csp.add_or_eq(meet_var, &z_per_table);
                meet_r.push(meet_var);
            }
            let coeffs = vec![1i64; r];
            csp.add_linear_le(&meet_r, &coeffs, 1);
        }
    }

    // visited[guest][host]
    let mut visited = Vec::with_capacity(n.saturating_sub(t));
    for g in t..n {
        let mut visited_g = Vec::with_capacity(t);
        for h in 0..t {
            let v = csp.new_bool_var();
            let rounds_at_host: Vec<VarId> = (0..r).map(|round| assign[g][h][round]).collect();
            csp.add_or_eq(v, &rounds_at_host);
            visited_g.push(v);
        }
        visited.push(visited_g);
    }

    // pair_host_used[p][h], for every participant appearing in a same-once pair.
    let mut participants_in_pairs: Vec<u32> = same_once_pairs.iter().flat_map(|p| [p.0, p.1]).collect();
    participants_in_pairs.sort_unstable();
    participants_in_pairs.dedup();
    let mut pair_host_used = Vec::with_capacity(participants_in_pairs.len());
    for participant in participants_in_pairs {
        let pair_indices: Vec<usize> = same_once_pairs
            .iter()
            .enumerate()
            .filter(|(_, pair)| pair.0 == participant || pair.1 == participant)
            .map(|(i, _)| i)
            .collect();
        let mut used_by_host = Vec::with_capacity(t);
        for host in 0..t {
            let inputs: Vec<VarId> = pair_indices.iter().map(|&i| meet_host[i][host]).collect();
            let used = csp.new_bool_var();
            csp.add_or_eq(used, &inputs);
            used_by_host.push(used);
        }
        pair_host_used.push((participant, used_by_host));
    }

    Ok(SeatingModel {
        csp,
        participants,
        tables,
        rounds,
        same_once_pairs,
        never_together_pairs,
        assign,
        size,
        min_size,
        max_size,
        meet,
        meet_host,
        visited,
        pair_host_used,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn rejects_more_tables_than_participants() {
        let err = build_model(3, 5, 1, vec![], vec![]).unwrap_err();
        assert!(err.contains("participants"));
    }

    #[test]
    fn rejects_zero_rounds() {
        let err = build_model(4, 2, 0, vec![], vec![]).unwrap_err();
        assert!(err.contains("rounds"));
    }

    #[test]
    fn builds_a_trivial_model_when_every_seat_is_a_host() {
        let model = build_model(3, 3, 1, vec![], vec![]).unwrap();
        let solution = model.csp.solve(Instant::now() + Duration::from_secs(5));
        assert!(solution.status.has_solution());
        for h in 0..3 {
            assert!(solution.bool_value(model.assign[h][h][0]));
        }
    }
}
