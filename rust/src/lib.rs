//! Critical Path Method scheduling for network-planning exercises.
//!
//! The core is a forward pass (earliest times), a backward pass (latest times,
//! total float, criticality) and verification of a learner's critical-path
//! marking. Around it sit diagram layout, calendar projection, exercise
//! scenarios and a progress store.

pub mod backward_pass;
pub mod calendar;
pub mod config;
pub mod critical_path;
pub mod forward_pass;
pub mod graph;
mod interner;
pub mod layout;
pub mod logging;
mod models;
pub mod progress;
pub mod scenario;
pub mod schedule;

#[cfg(feature = "python")]
mod python;

pub use backward_pass::calculate_backward_pass;
pub use calendar::{project_calendar, CalendarEntry, CalendarError};
pub use config::{CalendarConfig, LayoutConfig, ScheduleConfig};
pub use critical_path::{
    check_consistency, critical_activity_ids, critical_paths, critical_paths_limited, total_work,
    verify_critical_path, ConsistencyError, DEFAULT_MAX_CRITICAL_PATHS,
};
pub use forward_pass::{calculate_forward_pass, get_project_duration};
pub use graph::{build_successors_map, ActivityGraph, ScheduleError};
pub use interner::{ActivityIdInterner, ActivityIdx};
pub use layout::{compute_layout, compute_levels, layout_edges, LayoutEdge, NodePosition};
pub use models::{Activity, ActivityTiming, Schedule};
pub use progress::{MemoryProgressPort, ProgressError, ProgressPort, ProgressRecord, ProgressStore};
pub use scenario::{
    find_scenario, scenario_catalogue, FieldCheck, LearningObjective, Scenario, ScenarioSession,
    SessionError, TimeField, UserInput,
};
pub use schedule::{calculate_schedule, calculate_schedule_with_config};
