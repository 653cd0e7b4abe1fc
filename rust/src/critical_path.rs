//! Critical path extraction and verification.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::graph::{ActivityGraph, ScheduleError};
use crate::models::{Activity, Schedule};

/// A computed activity that violates one of the schedule invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyError {
    #[error("Activity {0:?} is missing computed times")]
    Incomplete(String),
    #[error("Activity {id:?}: fez is {actual}, expected faz + duration = {expected}")]
    EarliestFinish {
        id: String,
        expected: i64,
        actual: i64,
    },
    #[error("Activity {id:?}: latest start is {actual}, expected sez - duration = {expected}")]
    LatestStart {
        id: String,
        expected: i64,
        actual: i64,
    },
    #[error("Activity {id:?}: float mismatch (saz - faz = {start_float}, sez - fez = {finish_float}, gp = {gp})")]
    FloatMismatch {
        id: String,
        start_float: i64,
        finish_float: i64,
        gp: i64,
    },
    #[error("Activity {0:?}: critical flag disagrees with total float")]
    CriticalFlag(String),
    #[error("Activity {0:?}: time arithmetic overflowed")]
    Overflow(String),
}

/// IDs of all activities marked critical, in input order.
pub fn critical_activity_ids(activities: &[Activity]) -> Vec<String> {
    activities
        .iter()
        .filter(|a| a.is_critical == Some(true))
        .map(|a| a.id.clone())
        .collect()
}

/// Check a learner's critical-path marking.
///
/// Returns true iff `marked_ids`, taken as a set, is exactly the set of
/// critical activities. Order and repeated IDs do not matter.
pub fn verify_critical_path<S: AsRef<str>>(activities: &[Activity], marked_ids: &[S]) -> bool {
    let marked: FxHashSet<&str> = marked_ids.iter().map(AsRef::as_ref).collect();
    let critical: FxHashSet<&str> = activities
        .iter()
        .filter(|a| a.is_critical == Some(true))
        .map(|a| a.id.as_str())
        .collect();
    marked == critical
}

/// Sum of all activity durations, saturating at `i64::MAX`.
pub fn total_work(activities: &[Activity]) -> i64 {
    activities
        .iter()
        .fold(0i64, |sum, a| sum.saturating_add(a.duration))
}

/// Cap applied by [`critical_paths`].
pub const DEFAULT_MAX_CRITICAL_PATHS: usize = 1_000;

/// Enumerate critical chains from a start activity to a sink, at most
/// [`DEFAULT_MAX_CRITICAL_PATHS`] of them.
pub fn critical_paths(schedule: &Schedule) -> Result<Vec<Vec<String>>, ScheduleError> {
    critical_paths_limited(schedule, DEFAULT_MAX_CRITICAL_PATHS)
}

/// Enumerate up to `max_paths` critical chains from a start activity to a sink.
///
/// A step from `a` to successor `b` belongs to a chain when `b` is critical
/// and starts exactly when `a` finishes. Chains are produced depth first,
/// starts and successors in input order. The walk keeps its own stack, so
/// chain length is bounded by memory rather than the call stack.
pub fn critical_paths_limited(
    schedule: &Schedule,
    max_paths: usize,
) -> Result<Vec<Vec<String>>, ScheduleError> {
    let activities = &schedule.activities;
    let graph = ActivityGraph::build(activities)?;

    let is_critical = |i: usize| activities[i].is_critical == Some(true);
    let is_tight = |from: usize, to: usize| {
        is_critical(to) && activities[to].faz.is_some() && activities[to].faz == activities[from].fez
    };

    let mut paths: Vec<Vec<String>> = Vec::new();
    // (activity, next successor slot to try)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for start in (0..graph.len()).filter(|&i| graph.preds[i].is_empty() && is_critical(i)) {
        stack.push((start, 0));
        while let Some(top) = stack.last_mut() {
            let (i, cursor) = *top;
            let succs = &graph.succs[i];

            if succs.is_empty() {
                if paths.len() >= max_paths {
                    return Ok(paths);
                }
                paths.push(
                    stack
                        .iter()
                        .map(|&(j, _)| activities[j].id.clone())
                        .collect(),
                );
                stack.pop();
                continue;
            }

            match succs[cursor..]
                .iter()
                .position(|&s| is_tight(i, s as usize))
            {
                Some(offset) => {
                    top.1 = cursor + offset + 1;
                    stack.push((succs[cursor + offset] as usize, 0));
                }
                None => {
                    stack.pop();
                }
            }
        }
    }
    Ok(paths)
}

/// Verify the schedule invariants on fully computed activities.
pub fn check_consistency(activities: &[Activity]) -> Result<(), ConsistencyError> {
    for a in activities {
        let (Some(t), Some(is_critical)) = (a.timing(), a.is_critical) else {
            return Err(ConsistencyError::Incomplete(a.id.clone()));
        };
        let overflow = || ConsistencyError::Overflow(a.id.clone());

        let expected_fez = t.faz.checked_add(a.duration).ok_or_else(overflow)?;
        if t.fez != expected_fez {
            return Err(ConsistencyError::EarliestFinish {
                id: a.id.clone(),
                expected: expected_fez,
                actual: t.fez,
            });
        }
        let expected_saz = t.sez.checked_sub(a.duration).ok_or_else(overflow)?;
        if t.saz != expected_saz {
            return Err(ConsistencyError::LatestStart {
                id: a.id.clone(),
                expected: expected_saz,
                actual: t.saz,
            });
        }
        let start_float = t.saz.checked_sub(t.faz).ok_or_else(overflow)?;
        let finish_float = t.sez.checked_sub(t.fez).ok_or_else(overflow)?;
        if start_float != t.gp || finish_float != t.gp {
            return Err(ConsistencyError::FloatMismatch {
                id: a.id.clone(),
                start_float,
                finish_float,
                gp: t.gp,
            });
        }
        if is_critical != (t.gp == 0) {
            return Err(ConsistencyError::CriticalFlag(a.id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity;
    use crate::schedule::calculate_schedule;

    fn parallel_paths() -> Schedule {
        calculate_schedule(&[
            activity("A", "a", 2, &[]),
            activity("B", "b", 5, &[]),
            activity("C", "c", 3, &["A", "B"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_verify_parallel_paths() {
        let schedule = parallel_paths();
        assert!(!verify_critical_path(&schedule.activities, &["A", "B", "C"]));
        assert!(verify_critical_path(&schedule.activities, &["B", "C"]));
        assert!(verify_critical_path(&schedule.activities, &["C", "B"]));
    }

    #[test]
    fn test_verify_rejects_missing_and_unknown() {
        let schedule = parallel_paths();
        assert!(!verify_critical_path(&schedule.activities, &["B"]));
        assert!(!verify_critical_path(&schedule.activities, &["B", "C", "Z"]));
        assert!(!verify_critical_path::<&str>(&schedule.activities, &[]));
    }

    #[test]
    fn test_verify_ignores_duplicates() {
        let schedule = parallel_paths();
        let marked = vec!["B".to_string(), "C".to_string(), "B".to_string()];
        assert!(verify_critical_path(&schedule.activities, &marked));
    }

    #[test]
    fn test_critical_ids_in_input_order() {
        let schedule = parallel_paths();
        assert_eq!(critical_activity_ids(&schedule.activities), vec!["B", "C"]);
        assert_eq!(schedule.critical_ids(), vec!["B", "C"]);
    }

    #[test]
    fn test_total_work() {
        let schedule = parallel_paths();
        assert_eq!(total_work(&schedule.activities), 10);
    }

    #[test]
    fn test_single_critical_chain() {
        let schedule = parallel_paths();
        assert_eq!(critical_paths(&schedule).unwrap(), vec![vec!["B", "C"]]);
    }

    #[test]
    fn test_two_equal_critical_chains() {
        // Both branches have length 4, so both are critical
        let schedule = calculate_schedule(&[
            activity("A", "a", 1, &[]),
            activity("B", "b", 3, &["A"]),
            activity("C", "c", 3, &["A"]),
            activity("D", "d", 2, &["B", "C"]),
        ])
        .unwrap();
        assert_eq!(
            critical_paths(&schedule).unwrap(),
            vec![vec!["A", "B", "D"], vec!["A", "C", "D"]]
        );
    }

    #[test]
    fn test_chain_skips_non_tight_successor() {
        // C is critical via B, but the edge A -> C is not tight
        let schedule = calculate_schedule(&[
            activity("A", "a", 2, &[]),
            activity("B", "b", 4, &["A"]),
            activity("C", "c", 1, &["A", "B"]),
        ])
        .unwrap();
        assert_eq!(critical_paths(&schedule).unwrap(), vec![vec!["A", "B", "C"]]);
    }

    #[test]
    fn test_long_chain_does_not_exhaust_the_stack() {
        let n = 200_000;
        let activities: Vec<Activity> = (0..n)
            .map(|i| {
                let preds = if i == 0 { vec![] } else { vec![format!("T{}", i - 1)] };
                Activity::new(format!("T{i}"), "step", 1, preds)
            })
            .collect();
        let schedule = calculate_schedule(&activities).unwrap();

        let paths = critical_paths(&schedule).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].len(), n);
        assert_eq!(paths[0][0], "T0");
        assert_eq!(paths[0][n - 1], format!("T{}", n - 1));
    }

    #[test]
    fn test_wide_diamonds_are_capped() {
        // 20 stacked diamonds, each doubling the number of critical chains
        let mut activities = vec![activity("J0", "join", 1, &[])];
        for k in 0..20 {
            let join = format!("J{k}");
            let (l, r) = (format!("L{k}"), format!("R{k}"));
            activities.push(activity(&l, "left", 1, &[join.as_str()]));
            activities.push(activity(&r, "right", 1, &[join.as_str()]));
            activities.push(activity(&format!("J{}", k + 1), "join", 1, &[l.as_str(), r.as_str()]));
        }
        let schedule = calculate_schedule(&activities).unwrap();
        assert_eq!(schedule.critical_ids().len(), activities.len());

        assert_eq!(critical_paths(&schedule).unwrap().len(), DEFAULT_MAX_CRITICAL_PATHS);

        let first = critical_paths_limited(&schedule, 3).unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(first[0][..3], ["J0", "L0", "J1"]);
        assert!(critical_paths_limited(&schedule, 0).unwrap().is_empty());
    }

    #[test]
    fn test_chains_of_invalid_schedule_are_an_error() {
        let mut schedule = parallel_paths();
        schedule.activities[0].predecessors = vec!["C".into()];
        assert!(matches!(
            critical_paths(&schedule),
            Err(ScheduleError::CyclicDependency(_))
        ));
    }

    #[test]
    fn test_total_work_saturates() {
        let activities = vec![activity("A", "a", i64::MAX, &[]), activity("B", "b", 5, &[])];
        assert_eq!(total_work(&activities), i64::MAX);
    }

    #[test]
    fn test_consistency_reports_overflow() {
        let mut a = activity("A", "a", 1, &[]);
        (a.faz, a.fez, a.saz, a.sez, a.gp) = (Some(i64::MAX), Some(0), Some(0), Some(0), Some(0));
        a.is_critical = Some(true);
        assert_eq!(
            check_consistency(&[a]),
            Err(ConsistencyError::Overflow("A".into()))
        );
    }

    #[test]
    fn test_consistency_of_computed_schedule() {
        let schedule = parallel_paths();
        assert_eq!(check_consistency(&schedule.activities), Ok(()));
    }

    #[test]
    fn test_consistency_detects_tampering() {
        let mut schedule = parallel_paths();
        schedule.activities[0].gp = Some(1);
        assert!(matches!(
            check_consistency(&schedule.activities),
            Err(ConsistencyError::FloatMismatch { .. })
        ));

        let mut schedule = parallel_paths();
        schedule.activities[0].is_critical = Some(true);
        assert_eq!(
            check_consistency(&schedule.activities),
            Err(ConsistencyError::CriticalFlag("A".into()))
        );

        let mut schedule = parallel_paths();
        schedule.activities[1].fez = Some(6);
        assert!(matches!(
            check_consistency(&schedule.activities),
            Err(ConsistencyError::EarliestFinish { .. })
        ));

        let unpassed = vec![activity("A", "a", 1, &[])];
        assert_eq!(
            check_consistency(&unpassed),
            Err(ConsistencyError::Incomplete("A".into()))
        );
    }
}
