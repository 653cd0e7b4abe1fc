//! Backward pass: latest start/finish times, total float and criticality.

use crate::config::ScheduleConfig;
use crate::graph::{ActivityGraph, ScheduleError};
use crate::models::Activity;
use crate::{log_changes, log_checks, log_debug};

/// Compute `saz`, `sez`, `gp` and `is_critical` for every activity.
///
/// `activities` must already carry `faz`/`fez` from the forward pass.
/// `project_duration` anchors every sink activity: `sez = project_duration`
/// for activities without successors, otherwise `sez` is the minimum `saz`
/// over all successors.
///
/// # Returns
/// * `Ok(Vec<Activity>)` in input order with all computed fields populated
/// * `Err(ScheduleError::MissingForwardPass)` if an activity has no `faz`
/// * Any validation error from [`ActivityGraph::build`]
pub fn calculate_backward_pass(
    activities: &[Activity],
    project_duration: i64,
) -> Result<Vec<Activity>, ScheduleError> {
    let graph = ActivityGraph::build(activities)?;
    backward_pass_with_graph(
        activities,
        &graph,
        project_duration,
        &ScheduleConfig::default(),
    )
}

/// Backward pass over an already validated graph built from `activities`.
pub fn backward_pass_with_graph(
    activities: &[Activity],
    graph: &ActivityGraph,
    project_duration: i64,
    config: &ScheduleConfig,
) -> Result<Vec<Activity>, ScheduleError> {
    let mut latest_start: Vec<i64> = vec![0; graph.len()];
    let mut result: Vec<Activity> = activities.to_vec();

    // Successors come first in reverse topological order
    for &idx in graph.topo_order.iter().rev() {
        let i = idx as usize;
        let activity = &mut result[i];
        let faz = activity
            .faz
            .ok_or_else(|| ScheduleError::MissingForwardPass(activity.id.clone()))?;

        let sez = graph.succs[i]
            .iter()
            .map(|&s| latest_start[s as usize])
            .min()
            .unwrap_or(project_duration);
        let overflow = || ScheduleError::Overflow {
            activity: activity.id.clone(),
        };
        let saz = sez.checked_sub(graph.durations[i]).ok_or_else(overflow)?;
        let gp = saz.checked_sub(faz).ok_or_else(overflow)?;
        latest_start[i] = saz;

        activity.saz = Some(saz);
        activity.sez = Some(sez);
        activity.gp = Some(gp);
        activity.is_critical = Some(gp == 0);

        log_debug!(
            config.verbosity,
            "[backward] {}: saz={} sez={} gp={}",
            activity.id,
            saz,
            sez,
            gp
        );
        if gp < 0 {
            log_checks!(
                config.verbosity,
                "[backward] {} has negative float {}; project duration {} is shorter than its earliest finish",
                activity.id,
                gp,
                project_duration
            );
        }
    }

    log_changes!(
        config.verbosity,
        "[backward] project duration {}, {} of {} activities critical",
        project_duration,
        result.iter().filter(|a| a.is_critical == Some(true)).count(),
        result.len()
    );
    Ok(result)
}
