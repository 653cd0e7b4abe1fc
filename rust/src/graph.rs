//! Dependency graph construction and validation.
//!
//! Every pass goes through [`ActivityGraph::build`], which rejects malformed
//! input up front: negative durations, duplicate IDs, predecessors that do not
//! exist and cycles.

use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use thiserror::Error;

use crate::interner::{ActivityIdInterner, ActivityIdx};
use crate::models::Activity;

/// Errors raised while validating or scheduling an activity network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Circular dependency detected between activities: {}", .0.join(", "))]
    CyclicDependency(Vec<String>),
    #[error("Activity {activity:?} references unknown predecessor {predecessor:?}")]
    DanglingReference {
        activity: String,
        predecessor: String,
    },
    #[error("Activity {activity:?} has negative duration {duration}")]
    InvalidDuration { activity: String, duration: i64 },
    #[error("Duplicate activity ID: {0}")]
    DuplicateActivity(String),
    #[error("Activity {0:?} has no earliest times; run the forward pass first")]
    MissingForwardPass(String),
    #[error("Time arithmetic overflowed at activity {activity:?}")]
    Overflow { activity: String },
}

/// Successor lists keyed by activity ID.
pub type SuccessorsMap<'a> = FxHashMap<&'a str, Vec<&'a str>>;

/// Build the inverse of the predecessor relation: activity ID -> IDs of the
/// activities that list it as a predecessor.
///
/// Every activity gets an entry, possibly empty. Unknown predecessor IDs are
/// ignored here; [`ActivityGraph::build`] is where they are rejected.
pub fn build_successors_map(activities: &[Activity]) -> SuccessorsMap<'_> {
    let mut successors: SuccessorsMap =
        FxHashMap::with_capacity_and_hasher(activities.len(), Default::default());
    for activity in activities {
        successors.entry(activity.id.as_str()).or_default();
    }
    for activity in activities {
        for pred in &activity.predecessors {
            if let Some(list) = successors.get_mut(pred.as_str()) {
                list.push(activity.id.as_str());
            }
        }
    }
    successors
}

/// Validated, index-based view of an activity network.
///
/// Index `i` in every vector refers to `activities[i]` of the slice the graph
/// was built from.
#[derive(Debug, Clone)]
pub struct ActivityGraph {
    pub index: ActivityIdInterner,
    pub durations: Vec<i64>,
    /// Predecessor indices, deduplicated, indexed by activity.
    pub preds: Vec<Vec<ActivityIdx>>,
    /// Successor indices, indexed by activity.
    pub succs: Vec<Vec<ActivityIdx>>,
    /// Topological order, predecessors first. Ties keep input order.
    pub topo_order: Vec<ActivityIdx>,
}

impl ActivityGraph {
    /// Validate `activities` and compute a topological order.
    pub fn build(activities: &[Activity]) -> Result<Self, ScheduleError> {
        let n = activities.len();
        let mut index = ActivityIdInterner::with_capacity(n);
        let mut durations = Vec::with_capacity(n);

        for activity in activities {
            if activity.duration < 0 {
                return Err(ScheduleError::InvalidDuration {
                    activity: activity.id.clone(),
                    duration: activity.duration,
                });
            }
            let (_, is_new) = index.intern(&activity.id);
            if !is_new {
                return Err(ScheduleError::DuplicateActivity(activity.id.clone()));
            }
            durations.push(activity.duration);
        }

        let mut preds: Vec<Vec<ActivityIdx>> = vec![Vec::new(); n];
        let mut succs: Vec<Vec<ActivityIdx>> = vec![Vec::new(); n];

        for (idx, activity) in activities.iter().enumerate() {
            for pred in &activity.predecessors {
                let Some(pred_idx) = index.get(pred) else {
                    return Err(ScheduleError::DanglingReference {
                        activity: activity.id.clone(),
                        predecessor: pred.clone(),
                    });
                };
                // The same predecessor listed twice is still one edge
                if preds[idx].contains(&pred_idx) {
                    continue;
                }
                preds[idx].push(pred_idx);
                succs[pred_idx as usize].push(idx as ActivityIdx);
            }
        }

        let topo_order = topological_sort(&index, &preds, &succs)?;

        Ok(Self {
            index,
            durations,
            preds,
            succs,
            topo_order,
        })
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Activities without successors.
    pub fn is_sink(&self, idx: ActivityIdx) -> bool {
        self.succs[idx as usize].is_empty()
    }

    /// Topological order as activity IDs.
    pub fn topo_ids(&self) -> Vec<String> {
        self.topo_order
            .iter()
            .filter_map(|&idx| self.index.resolve(idx))
            .map(str::to_string)
            .collect()
    }
}

/// Kahn's algorithm over the index graph.
///
/// Returns indices with every predecessor ahead of its successors. Activities
/// left with a non-zero in-degree lie on or behind a cycle and are reported in
/// the error, sorted by ID.
fn topological_sort(
    index: &ActivityIdInterner,
    preds: &[Vec<ActivityIdx>],
    succs: &[Vec<ActivityIdx>],
) -> Result<Vec<ActivityIdx>, ScheduleError> {
    let n = preds.len();
    let mut in_degree: Vec<usize> = preds.iter().map(Vec::len).collect();

    let mut queue: VecDeque<ActivityIdx> = (0..n)
        .filter(|&i| in_degree[i] == 0)
        .map(|i| i as ActivityIdx)
        .collect();

    let mut result: Vec<ActivityIdx> = Vec::with_capacity(n);

    while let Some(idx) = queue.pop_front() {
        result.push(idx);
        for &succ in &succs[idx as usize] {
            let degree = &mut in_degree[succ as usize];
            *degree -= 1;
            if *degree == 0 {
                queue.push_back(succ);
            }
        }
    }

    if result.len() != n {
        let mut remaining: Vec<String> = (0..n)
            .filter(|&i| in_degree[i] > 0)
            .filter_map(|i| index.resolve(i as ActivityIdx))
            .map(str::to_string)
            .collect();
        remaining.sort();
        return Err(ScheduleError::CyclicDependency(remaining));
    }

    Ok(result)
}
