//! Forward pass: earliest start and finish times.

use crate::config::ScheduleConfig;
use crate::graph::{build_successors_map, ActivityGraph, ScheduleError};
use crate::models::Activity;
use crate::{log_changes, log_debug};

/// Compute `faz` and `fez` for every activity.
///
/// A start activity gets `faz = 0`; any other gets the maximum `fez` over its
/// predecessors. `fez = faz + duration`. Other computed fields are copied
/// through unchanged.
pub fn calculate_forward_pass(activities: &[Activity]) -> Result<Vec<Activity>, ScheduleError> {
    let graph = ActivityGraph::build(activities)?;
    forward_pass_with_graph(activities, &graph, &ScheduleConfig::default())
}

/// Forward pass over an already validated graph.
///
/// `graph` must have been built from `activities`. Fails with
/// [`ScheduleError::Overflow`] if an earliest finish does not fit in `i64`.
pub fn forward_pass_with_graph(
    activities: &[Activity],
    graph: &ActivityGraph,
    config: &ScheduleConfig,
) -> Result<Vec<Activity>, ScheduleError> {
    let mut earliest_finish: Vec<i64> = vec![0; graph.len()];
    let mut result: Vec<Activity> = activities.to_vec();

    for &idx in &graph.topo_order {
        let i = idx as usize;
        let faz = graph.preds[i]
            .iter()
            .map(|&p| earliest_finish[p as usize])
            .max()
            .unwrap_or(0);
        let activity = &mut result[i];
        let fez = faz
            .checked_add(graph.durations[i])
            .ok_or_else(|| ScheduleError::Overflow {
                activity: activity.id.clone(),
            })?;
        earliest_finish[i] = fez;

        activity.faz = Some(faz);
        activity.fez = Some(fez);
        log_debug!(
            config.verbosity,
            "[forward] {}: faz={} fez={}",
            activity.id,
            faz,
            fez
        );
    }

    log_changes!(
        config.verbosity,
        "[forward] computed earliest times for {} activities",
        result.len()
    );
    Ok(result)
}

/// Project duration: the maximum `fez` over all sink activities.
///
/// Activities without `fez` are ignored, so an empty or un-passed list yields 0.
pub fn get_project_duration(activities: &[Activity]) -> i64 {
    let successors = build_successors_map(activities);
    activities
        .iter()
        .filter(|a| {
            successors
                .get(a.id.as_str())
                .map_or(true, |succs| succs.is_empty())
        })
        .filter_map(|a| a.fez)
        .max()
        .unwrap_or(0)
}
