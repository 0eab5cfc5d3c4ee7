//! Reference table-size computation.
//!
//! The planner does not influence the solver's own balance constraint; it
//! exists to give callers a reporting baseline (`table_sizes` in
//! [`crate::types::ScheduleResponse`]) independent of any particular round's
//! actual occupancy.

/// Computes the target size of each table for `participants` people split
/// across `tables` tables as evenly as possible.
///
/// The first `participants % tables` tables get `ceil(participants / tables)`
/// seats; the rest get `floor(participants / tables)`. The result always sums
/// to `participants` and has length `tables`.
pub fn compute_table_sizes(participants: u32, tables: u32) -> Vec<u32> {
    if tables == 0 {
        return Vec::new();
    }
    let base = participants / tables;
    let remainder = participants % tables;
    (0..tables)
        .map(|t| if t < remainder { base + 1 } else { base })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_evenly() {
        assert_eq!(compute_table_sizes(6, 2), vec![3, 3]);
    }

    #[test]
    fn spreads_remainder_over_leading_tables() {
        assert_eq!(compute_table_sizes(7, 3), vec![3, 2, 2]);
    }

    #[test]
    fn sums_to_participant_count() {
        let sizes = compute_table_sizes(10, 3);
        assert_eq!(sizes.iter().sum::<u32>(), 10);
        assert_eq!(sizes.len(), 3);
    }
}
