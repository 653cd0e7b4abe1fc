//! Full scheduling pipeline: validate, forward pass, project duration,
//! backward pass.

use crate::backward_pass::backward_pass_with_graph;
use crate::config::ScheduleConfig;
use crate::forward_pass::{forward_pass_with_graph, get_project_duration};
use crate::graph::{ActivityGraph, ScheduleError};
use crate::log_changes;
use crate::models::{Activity, Schedule};

/// Run both passes over `activities` with the default configuration.
pub fn calculate_schedule(activities: &[Activity]) -> Result<Schedule, ScheduleError> {
    calculate_schedule_with_config(activities, &ScheduleConfig::default())
}

/// Run both passes over `activities`.
///
/// The input is validated once and the graph is shared by both passes. Any
/// computed fields already present on the input are overwritten.
pub fn calculate_schedule_with_config(
    activities: &[Activity],
    config: &ScheduleConfig,
) -> Result<Schedule, ScheduleError> {
    let graph = ActivityGraph::build(activities)?;

    let forward = forward_pass_with_graph(activities, &graph, config)?;
    let project_duration = get_project_duration(&forward);
    log_changes!(config.verbosity, "[schedule] project duration {}", project_duration);

    let activities = backward_pass_with_graph(&forward, &graph, project_duration, config)?;
    Ok(Schedule::new(activities, project_duration, graph.topo_ids()))
}
