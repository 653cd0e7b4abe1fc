//! Python bindings for the scheduling core.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::NaiveDate;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::calendar::CalendarEntry;
use crate::config::{CalendarConfig, LayoutConfig, ScheduleConfig};
use crate::layout::NodePosition;
use crate::models::Activity;
use crate::scenario::Scenario;

fn to_py_err(e: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Activity with optional computed times (PyO3 wrapper).
#[pyclass(name = "Activity")]
#[derive(Clone, Debug)]
pub struct PyActivity {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub duration: i64,
    #[pyo3(get, set)]
    pub predecessors: Vec<String>,
    #[pyo3(get, set)]
    pub faz: Option<i64>,
    #[pyo3(get, set)]
    pub fez: Option<i64>,
    #[pyo3(get, set)]
    pub saz: Option<i64>,
    #[pyo3(get, set)]
    pub sez: Option<i64>,
    #[pyo3(get, set)]
    pub gp: Option<i64>,
    #[pyo3(get, set)]
    pub is_critical: Option<bool>,
}

#[pymethods]
impl PyActivity {
    #[new]
    #[pyo3(signature = (id, duration, predecessors=Vec::new(), name=None))]
    fn new(id: String, duration: i64, predecessors: Vec<String>, name: Option<String>) -> Self {
        let name = name.unwrap_or_else(|| id.clone());
        Activity::new(id, name, duration, predecessors).into()
    }

    fn __repr__(&self) -> String {
        format!(
            "Activity(id={:?}, duration={}, predecessors={:?}, faz={:?}, fez={:?}, saz={:?}, sez={:?}, gp={:?})",
            self.id,
            self.duration,
            self.predecessors,
            self.faz,
            self.fez,
            self.saz,
            self.sez,
            self.gp
        )
    }
}

impl From<Activity> for PyActivity {
    fn from(a: Activity) -> Self {
        Self {
            id: a.id,
            name: a.name,
            duration: a.duration,
            predecessors: a.predecessors,
            faz: a.faz,
            fez: a.fez,
            saz: a.saz,
            sez: a.sez,
            gp: a.gp,
            is_critical: a.is_critical,
        }
    }
}

impl From<PyActivity> for Activity {
    fn from(a: PyActivity) -> Self {
        Self {
            id: a.id,
            name: a.name,
            duration: a.duration,
            predecessors: a.predecessors,
            faz: a.faz,
            fez: a.fez,
            saz: a.saz,
            sez: a.sez,
            gp: a.gp,
            is_critical: a.is_critical,
        }
    }
}

fn to_activities(activities: Vec<PyActivity>) -> Vec<Activity> {
    activities.into_iter().map(Activity::from).collect()
}

fn to_py(activities: Vec<Activity>) -> Vec<PyActivity> {
    activities.into_iter().map(PyActivity::from).collect()
}

/// Compute earliest start/finish for every activity.
///
/// # Raises
/// * ValueError on cycles, unknown predecessors, duplicate IDs or negative durations
#[pyfunction]
fn calculate_forward_pass(activities: Vec<PyActivity>) -> PyResult<Vec<PyActivity>> {
    crate::forward_pass::calculate_forward_pass(&to_activities(activities))
        .map(to_py)
        .map_err(to_py_err)
}

/// Compute latest start/finish, total float and criticality.
///
/// # Raises
/// * ValueError if the forward pass has not run or the graph is invalid
#[pyfunction]
fn calculate_backward_pass(
    activities: Vec<PyActivity>,
    project_duration: i64,
) -> PyResult<Vec<PyActivity>> {
    crate::backward_pass::calculate_backward_pass(&to_activities(activities), project_duration)
        .map(to_py)
        .map_err(to_py_err)
}

/// Maximum earliest finish over all sink activities.
#[pyfunction]
fn get_project_duration(activities: Vec<PyActivity>) -> i64 {
    crate::forward_pass::get_project_duration(&to_activities(activities))
}

/// True iff `marked_ids` is exactly the set of critical activities.
#[pyfunction]
fn verify_critical_path(activities: Vec<PyActivity>, marked_ids: Vec<String>) -> bool {
    crate::critical_path::verify_critical_path(&to_activities(activities), &marked_ids)
}

/// Run both passes and return `(activities, project_duration)`.
#[pyfunction]
#[pyo3(signature = (activities, verbosity=0))]
fn calculate_schedule(
    activities: Vec<PyActivity>,
    verbosity: u8,
) -> PyResult<(Vec<PyActivity>, i64)> {
    let config = ScheduleConfig { verbosity };
    let schedule =
        crate::schedule::calculate_schedule_with_config(&to_activities(activities), &config)
            .map_err(to_py_err)?;
    let duration = schedule.project_duration;
    Ok((to_py(schedule.activities), duration))
}

/// Diagram level of every activity, in input order.
#[pyfunction]
fn compute_levels(activities: Vec<PyActivity>) -> PyResult<Vec<usize>> {
    crate::layout::compute_levels(&to_activities(activities)).map_err(to_py_err)
}

/// Diagram placement of one activity (PyO3 wrapper).
#[pyclass(name = "NodePosition")]
#[derive(Clone, Debug)]
pub struct PyNodePosition {
    #[pyo3(get)]
    pub id: String,
    #[pyo3(get)]
    pub level: usize,
    #[pyo3(get)]
    pub row: usize,
    #[pyo3(get)]
    pub x: f64,
    #[pyo3(get)]
    pub y: f64,
}

impl From<NodePosition> for PyNodePosition {
    fn from(p: NodePosition) -> Self {
        Self {
            id: p.id,
            level: p.level,
            row: p.row,
            x: p.x,
            y: p.y,
        }
    }
}

/// Calendar dates of one activity (PyO3 wrapper).
#[pyclass(name = "CalendarEntry")]
#[derive(Clone, Debug)]
pub struct PyCalendarEntry {
    #[pyo3(get)]
    pub id: String,
    #[pyo3(get)]
    pub earliest_start: NaiveDate,
    #[pyo3(get)]
    pub earliest_finish: NaiveDate,
    #[pyo3(get)]
    pub latest_start: NaiveDate,
    #[pyo3(get)]
    pub latest_finish: NaiveDate,
    #[pyo3(get)]
    pub is_critical: bool,
}

impl From<CalendarEntry> for PyCalendarEntry {
    fn from(e: CalendarEntry) -> Self {
        Self {
            id: e.id,
            earliest_start: e.earliest_start,
            earliest_finish: e.earliest_finish,
            latest_start: e.latest_start,
            latest_finish: e.latest_finish,
            is_critical: e.is_critical,
        }
    }
}

/// Practice scenario from the built-in catalogue (PyO3 wrapper).
#[pyclass(name = "Scenario")]
#[derive(Clone, Debug)]
pub struct PyScenario {
    #[pyo3(get)]
    pub id: String,
    #[pyo3(get)]
    pub title: String,
    #[pyo3(get)]
    pub description: String,
    /// "easy", "medium" or "hard".
    #[pyo3(get)]
    pub difficulty: String,
    #[pyo3(get)]
    pub activities: Vec<PyActivity>,
    /// Objective descriptions, in catalogue order.
    #[pyo3(get)]
    pub objectives: Vec<String>,
    #[pyo3(get)]
    pub hints: Vec<String>,
    #[pyo3(get)]
    pub points: u32,
}

impl From<Scenario> for PyScenario {
    fn from(s: Scenario) -> Self {
        Self {
            id: s.id,
            title: s.title,
            description: s.description,
            difficulty: format!("{:?}", s.difficulty).to_lowercase(),
            activities: to_py(s.activities),
            objectives: s
                .objectives
                .iter()
                .map(|o| o.description().to_string())
                .collect(),
            hints: s.hints,
            points: s.points,
        }
    }
}

/// Defaults from [`LayoutConfig::default`] for every geometry value not given.
fn layout_config(
    level_spacing: Option<f64>,
    row_spacing: Option<f64>,
    margin: Option<f64>,
    node_width: Option<f64>,
    node_height: Option<f64>,
) -> LayoutConfig {
    let defaults = LayoutConfig::default();
    LayoutConfig {
        level_spacing: level_spacing.unwrap_or(defaults.level_spacing),
        row_spacing: row_spacing.unwrap_or(defaults.row_spacing),
        margin: margin.unwrap_or(defaults.margin),
        node_width: node_width.unwrap_or(defaults.node_width),
        node_height: node_height.unwrap_or(defaults.node_height),
    }
}

/// Diagram coordinates of every activity, in input order.
///
/// # Raises
/// * ValueError if the graph is invalid
#[pyfunction]
#[pyo3(signature = (activities, level_spacing=None, row_spacing=None, margin=None, node_width=None, node_height=None))]
fn compute_layout(
    activities: Vec<PyActivity>,
    level_spacing: Option<f64>,
    row_spacing: Option<f64>,
    margin: Option<f64>,
    node_width: Option<f64>,
    node_height: Option<f64>,
) -> PyResult<Vec<PyNodePosition>> {
    let config = layout_config(level_spacing, row_spacing, margin, node_width, node_height);
    let positions =
        crate::layout::compute_layout(&to_activities(activities), &config).map_err(to_py_err)?;
    Ok(positions.into_iter().map(PyNodePosition::from).collect())
}

/// Schedule `activities` and place every time unit on a working day from
/// `start` on. Returns `(entries, project_end)`.
///
/// # Raises
/// * ValueError if the graph is invalid or a date falls outside the calendar
#[pyfunction]
#[pyo3(signature = (activities, start, skip_weekends=true, verbosity=0))]
fn project_calendar(
    activities: Vec<PyActivity>,
    start: NaiveDate,
    skip_weekends: bool,
    verbosity: u8,
) -> PyResult<(Vec<PyCalendarEntry>, NaiveDate)> {
    calendar_for(to_activities(activities), start, skip_weekends, verbosity).map_err(to_py_err)
}

fn calendar_for(
    activities: Vec<Activity>,
    start: NaiveDate,
    skip_weekends: bool,
    verbosity: u8,
) -> Result<(Vec<PyCalendarEntry>, NaiveDate), String> {
    let schedule =
        crate::schedule::calculate_schedule_with_config(&activities, &ScheduleConfig { verbosity })
            .map_err(|e| e.to_string())?;
    let config = CalendarConfig { skip_weekends };
    let entries =
        crate::calendar::project_calendar(&schedule, start, &config).map_err(|e| e.to_string())?;
    let end = crate::calendar::project_end_date(&schedule, start, &config)
        .map_err(|e| e.to_string())?;
    Ok((entries.into_iter().map(PyCalendarEntry::from).collect(), end))
}

/// Built-in practice scenarios, easiest first.
#[pyfunction]
fn scenario_catalogue() -> Vec<PyScenario> {
    crate::scenario::scenario_catalogue()
        .into_iter()
        .map(PyScenario::from)
        .collect()
}

/// The netzplan Python module.
#[pymodule]
fn netzplan(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyActivity>()?;
    m.add_class::<PyNodePosition>()?;
    m.add_class::<PyCalendarEntry>()?;
    m.add_class::<PyScenario>()?;

    m.add_function(wrap_pyfunction!(calculate_forward_pass, m)?)?;
    m.add_function(wrap_pyfunction!(calculate_backward_pass, m)?)?;
    m.add_function(wrap_pyfunction!(get_project_duration, m)?)?;
    m.add_function(wrap_pyfunction!(verify_critical_path, m)?)?;
    m.add_function(wrap_pyfunction!(calculate_schedule, m)?)?;
    m.add_function(wrap_pyfunction!(compute_levels, m)?)?;
    m.add_function(wrap_pyfunction!(compute_layout, m)?)?;
    m.add_function(wrap_pyfunction!(project_calendar, m)?)?;
    m.add_function(wrap_pyfunction!(scenario_catalogue, m)?)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity;

    #[test]
    fn test_layout_config_fills_defaults() {
        let config = layout_config(Some(300.0), None, Some(10.0), None, None);
        assert_eq!(
            config,
            LayoutConfig {
                level_spacing: 300.0,
                margin: 10.0,
                ..LayoutConfig::default()
            }
        );
        assert_eq!(layout_config(None, None, None, None, None), LayoutConfig::default());
    }

    #[test]
    fn test_calendar_respects_weekend_flag() {
        // 2024-01-05 is a Friday
        let start = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let activities = vec![activity("A", "a", 2, &[]), activity("B", "b", 1, &["A"])];

        let (entries, end) = calendar_for(activities.clone(), start, true, 0).unwrap();
        assert_eq!(entries[1].id, "B");
        assert_eq!(entries[1].earliest_start, NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
        assert!(entries.iter().all(|e| e.is_critical));

        let (_, end) = calendar_for(activities, start, false, 0).unwrap();
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
    }

    #[test]
    fn test_calendar_reports_invalid_graph() {
        let err = calendar_for(vec![activity("A", "a", 1, &["X"])], NaiveDate::MIN, true, 0)
            .unwrap_err();
        assert!(err.contains("unknown predecessor"));
    }

    #[test]
    fn test_scenario_wrapper() {
        let scenarios: Vec<PyScenario> = crate::scenario::scenario_catalogue()
            .into_iter()
            .map(PyScenario::from)
            .collect();
        assert_eq!(scenarios.len(), 3);
        let erp = scenarios.iter().find(|s| s.id == "erp-introduction").unwrap();
        assert_eq!(erp.difficulty, "hard");
        assert_eq!(erp.points, 200);
        assert!(!erp.objectives.is_empty());
        assert!(erp.activities.iter().all(|a| a.faz.is_none()));
    }
}
