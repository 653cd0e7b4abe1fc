//! Network-planning exercises and answer checking.
//!
//! A [`Scenario`] bundles a fixed activity list with learning objectives,
//! hints and a point reward. A [`ScenarioSession`] holds one learner's answers
//! for a scenario and checks them against the computed schedule.

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::config::ScheduleConfig;
use crate::critical_path::verify_critical_path;
use crate::graph::ScheduleError;
use crate::models::{activity, Activity, ActivityTiming, Schedule};
use crate::schedule::calculate_schedule_with_config;
use crate::{log_changes, log_checks};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Unknown activity in scenario: {0}")]
    UnknownActivity(String),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Something the learner has to get right to finish a scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LearningObjective {
    /// Enter the correct project duration.
    ProjectDuration,
    /// Enter correct `faz` and `fez` for every activity.
    ForwardPass,
    /// Enter correct `saz` and `sez` for every activity.
    BackwardPass,
    /// Enter correct total float for every activity.
    TotalFloat,
    /// Mark exactly the critical activities.
    CriticalPath,
}

impl LearningObjective {
    pub fn description(&self) -> &'static str {
        match self {
            Self::ProjectDuration => "Determine the minimum project duration",
            Self::ForwardPass => "Compute earliest start (FAZ) and earliest finish (FEZ)",
            Self::BackwardPass => "Compute latest start (SAZ) and latest finish (SEZ)",
            Self::TotalFloat => "Compute the total float (GP) of every activity",
            Self::CriticalPath => "Mark all activities on the critical path",
        }
    }
}

/// A named exercise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scenario {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub activities: Vec<Activity>,
    pub objectives: Vec<LearningObjective>,
    pub hints: Vec<String>,
    pub points: u32,
}

/// One of the time fields a learner can fill in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimeField {
    Faz,
    Fez,
    Saz,
    Sez,
    Gp,
}

impl TimeField {
    pub const ALL: [TimeField; 5] = [Self::Faz, Self::Fez, Self::Saz, Self::Sez, Self::Gp];

    fn of(self, timing: &ActivityTiming) -> i64 {
        match self {
            Self::Faz => timing.faz,
            Self::Fez => timing.fez,
            Self::Saz => timing.saz,
            Self::Sez => timing.sez,
            Self::Gp => timing.gp,
        }
    }
}

/// Values a learner entered for one activity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UserInput {
    pub faz: Option<i64>,
    pub fez: Option<i64>,
    pub saz: Option<i64>,
    pub sez: Option<i64>,
    pub gp: Option<i64>,
}

impl UserInput {
    pub fn get(&self, field: TimeField) -> Option<i64> {
        match field {
            TimeField::Faz => self.faz,
            TimeField::Fez => self.fez,
            TimeField::Saz => self.saz,
            TimeField::Sez => self.sez,
            TimeField::Gp => self.gp,
        }
    }

    pub fn set(&mut self, field: TimeField, value: Option<i64>) {
        let slot = match field {
            TimeField::Faz => &mut self.faz,
            TimeField::Fez => &mut self.fez,
            TimeField::Saz => &mut self.saz,
            TimeField::Sez => &mut self.sez,
            TimeField::Gp => &mut self.gp,
        };
        *slot = value;
    }
}

/// Result of checking one entered value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldCheck {
    Empty,
    Correct,
    Incorrect,
}

/// One learner's work on a scenario.
///
/// The scenario's activity list is never modified; only the learner's answers
/// change.
#[derive(Clone, Debug)]
pub struct ScenarioSession {
    scenario: Scenario,
    schedule: Schedule,
    inputs: FxHashMap<String, UserInput>,
    duration_answer: Option<i64>,
    marked_critical: FxHashSet<String>,
    hints_revealed: usize,
    verbosity: u8,
}

impl ScenarioSession {
    pub fn new(scenario: Scenario) -> Result<Self, SessionError> {
        Self::with_config(scenario, &ScheduleConfig::default())
    }

    pub fn with_config(scenario: Scenario, config: &ScheduleConfig) -> Result<Self, SessionError> {
        let schedule = calculate_schedule_with_config(&scenario.activities, config)?;
        log_changes!(
            config.verbosity,
            "[scenario] started {:?}: {} activities, duration {}",
            scenario.id,
            scenario.activities.len(),
            schedule.project_duration
        );
        Ok(Self {
            scenario,
            schedule,
            inputs: FxHashMap::default(),
            duration_answer: None,
            marked_critical: FxHashSet::default(),
            hints_revealed: 0,
            verbosity: config.verbosity,
        })
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn ensure_known(&self, activity_id: &str) -> Result<(), SessionError> {
        if self.schedule.get(activity_id).is_none() {
            return Err(SessionError::UnknownActivity(activity_id.to_string()));
        }
        Ok(())
    }

    /// Replace all entered values for an activity.
    pub fn set_input(&mut self, activity_id: &str, input: UserInput) -> Result<(), SessionError> {
        self.ensure_known(activity_id)?;
        self.inputs.insert(activity_id.to_string(), input);
        Ok(())
    }

    /// Enter (or clear, with `None`) a single value.
    pub fn set_field(
        &mut self,
        activity_id: &str,
        field: TimeField,
        value: Option<i64>,
    ) -> Result<(), SessionError> {
        self.ensure_known(activity_id)?;
        self.inputs
            .entry(activity_id.to_string())
            .or_default()
            .set(field, value);
        Ok(())
    }

    pub fn input(&self, activity_id: &str) -> UserInput {
        self.inputs.get(activity_id).copied().unwrap_or_default()
    }

    pub fn answer_project_duration(&mut self, duration: i64) {
        self.duration_answer = Some(duration);
    }

    /// Flip the learner's critical marking for an activity.
    pub fn toggle_critical(&mut self, activity_id: &str) -> Result<bool, SessionError> {
        self.ensure_known(activity_id)?;
        if self.marked_critical.remove(activity_id) {
            Ok(false)
        } else {
            self.marked_critical.insert(activity_id.to_string());
            Ok(true)
        }
    }

    pub fn marked_critical(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.marked_critical.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Check one entered value against the computed schedule.
    pub fn check_field(
        &self,
        activity_id: &str,
        field: TimeField,
    ) -> Result<FieldCheck, SessionError> {
        let timing = self
            .schedule
            .timing(activity_id)
            .ok_or_else(|| SessionError::UnknownActivity(activity_id.to_string()))?;
        let check = match self.input(activity_id).get(field) {
            None => FieldCheck::Empty,
            Some(v) if v == field.of(&timing) => FieldCheck::Correct,
            Some(_) => FieldCheck::Incorrect,
        };
        log_checks!(
            self.verbosity,
            "[scenario] {} {:?}: {:?}",
            activity_id,
            field,
            check
        );
        Ok(check)
    }

    fn all_correct(&self, fields: &[TimeField]) -> bool {
        self.schedule.activities.iter().all(|a| {
            let (Some(timing), Some(input)) = (a.timing(), self.inputs.get(&a.id)) else {
                return false;
            };
            fields
                .iter()
                .all(|&f| input.get(f) == Some(f.of(&timing)))
        })
    }

    pub fn is_objective_complete(&self, objective: LearningObjective) -> bool {
        match objective {
            LearningObjective::ProjectDuration => {
                self.duration_answer == Some(self.schedule.project_duration)
            }
            LearningObjective::ForwardPass => self.all_correct(&[TimeField::Faz, TimeField::Fez]),
            LearningObjective::BackwardPass => self.all_correct(&[TimeField::Saz, TimeField::Sez]),
            LearningObjective::TotalFloat => self.all_correct(&[TimeField::Gp]),
            LearningObjective::CriticalPath => {
                let marked: Vec<&str> = self.marked_critical.iter().map(String::as_str).collect();
                verify_critical_path(&self.schedule.activities, &marked)
            }
        }
    }

    pub fn completed_objectives(&self) -> Vec<LearningObjective> {
        self.scenario
            .objectives
            .iter()
            .copied()
            .filter(|&o| self.is_objective_complete(o))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.scenario
            .objectives
            .iter()
            .all(|&o| self.is_objective_complete(o))
    }

    /// Points awarded so far: the full reward once every objective is met.
    pub fn earned_points(&self) -> u32 {
        if self.is_complete() {
            self.scenario.points
        } else {
            0
        }
    }

    /// Reveal the next hint, if any are left.
    pub fn reveal_hint(&mut self) -> Option<&str> {
        let hint = self.scenario.hints.get(self.hints_revealed)?;
        self.hints_revealed += 1;
        Some(hint.as_str())
    }

    pub fn hints_revealed(&self) -> usize {
        self.hints_revealed
    }

    /// Discard all answers.
    pub fn reset(&mut self) {
        self.inputs.clear();
        self.duration_answer = None;
        self.marked_critical.clear();
        self.hints_revealed = 0;
    }
}

/// All built-in scenarios.
pub fn scenario_catalogue() -> Vec<Scenario> {
    vec![
        Scenario {
            id: "server-rollout".to_string(),
            title: "Server rollout".to_string(),
            description: "Plan the installation of a new file server for a small office."
                .to_string(),
            difficulty: Difficulty::Easy,
            activities: vec![
                activity("A", "Order hardware", 3, &[]),
                activity("B", "Install operating system", 2, &["A"]),
                activity("C", "Configure shares", 4, &["B"]),
            ],
            objectives: vec![
                LearningObjective::ForwardPass,
                LearningObjective::ProjectDuration,
            ],
            hints: vec![
                "Activities without predecessors start at time 0.".to_string(),
                "FEZ = FAZ + duration.".to_string(),
            ],
            points: 50,
        },
        Scenario {
            id: "network-upgrade".to_string(),
            title: "Network upgrade".to_string(),
            description: "Cabling and switch replacement run in parallel before the new VLANs go live."
                .to_string(),
            difficulty: Difficulty::Medium,
            activities: vec![
                activity("A", "Lay cables", 2, &[]),
                activity("B", "Replace switches", 5, &[]),
                activity("C", "Configure VLANs", 3, &["A", "B"]),
            ],
            objectives: vec![
                LearningObjective::ForwardPass,
                LearningObjective::BackwardPass,
                LearningObjective::CriticalPath,
            ],
            hints: vec![
                "An activity can only start when all its predecessors have finished.".to_string(),
                "SEZ of the last activity equals the project duration.".to_string(),
                "Critical activities have a total float of 0.".to_string(),
            ],
            points: 100,
        },
        Scenario {
            id: "erp-introduction".to_string(),
            title: "ERP introduction".to_string(),
            description: "Introduce a new ERP system including data migration and staff training."
                .to_string(),
            difficulty: Difficulty::Hard,
            activities: vec![
                activity("A", "Requirements analysis", 4, &[]),
                activity("B", "Select vendor", 3, &["A"]),
                activity("C", "Prepare infrastructure", 5, &["A"]),
                activity("D", "Install ERP", 2, &["B", "C"]),
                activity("E", "Migrate data", 6, &["D"]),
                activity("F", "Train staff", 4, &["D"]),
                activity("G", "Write documentation", 3, &["B"]),
                activity("H", "Go live", 1, &["E", "F", "G"]),
            ],
            objectives: vec![
                LearningObjective::ForwardPass,
                LearningObjective::BackwardPass,
                LearningObjective::TotalFloat,
                LearningObjective::CriticalPath,
                LearningObjective::ProjectDuration,
            ],
            hints: vec![
                "Work through the forward pass in topological order.".to_string(),
                "In the backward pass, SEZ is the smallest SAZ of all successors.".to_string(),
                "GP = SAZ - FAZ = SEZ - FEZ.".to_string(),
            ],
            points: 200,
        },
    ]
}

/// Look up a built-in scenario by ID.
pub fn find_scenario(id: &str) -> Option<Scenario> {
    scenario_catalogue().into_iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str) -> ScenarioSession {
        ScenarioSession::new(find_scenario(id).unwrap()).unwrap()
    }

    /// Fill in every field with the computed answer.
    fn fill_correct(session: &mut ScenarioSession) {
        let timings: Vec<(String, ActivityTiming)> = session
            .schedule()
            .activities
            .iter()
            .map(|a| (a.id.clone(), a.timing().unwrap()))
            .collect();
        for (id, t) in timings {
            session
                .set_input(
                    &id,
                    UserInput {
                        faz: Some(t.faz),
                        fez: Some(t.fez),
                        saz: Some(t.saz),
                        sez: Some(t.sez),
                        gp: Some(t.gp),
                    },
                )
                .unwrap();
        }
    }

    #[test]
    fn test_catalogue_scenarios_are_valid() {
        let catalogue = scenario_catalogue();
        assert_eq!(catalogue.len(), 3);
        for scenario in catalogue {
            assert!(!scenario.objectives.is_empty());
            assert!(ScenarioSession::new(scenario).is_ok());
        }
    }

    #[test]
    fn test_erp_schedule() {
        let session = session("erp-introduction");
        let schedule = session.schedule();
        // A(0-4) C(4-9) D(9-11) E(11-17) H(17-18)
        assert_eq!(schedule.project_duration, 18);
        assert_eq!(schedule.critical_ids(), vec!["A", "C", "D", "E", "H"]);
        assert_eq!(schedule.timing("B").unwrap().gp, 2);
        assert_eq!(schedule.timing("F").unwrap().gp, 2);
        assert_eq!(schedule.timing("G").unwrap().gp, 7);
    }

    #[test]
    fn test_check_field() {
        let mut session = session("network-upgrade");
        assert_eq!(session.check_field("C", TimeField::Faz), Ok(FieldCheck::Empty));

        session.set_field("C", TimeField::Faz, Some(2)).unwrap();
        assert_eq!(session.check_field("C", TimeField::Faz), Ok(FieldCheck::Incorrect));

        session.set_field("C", TimeField::Faz, Some(5)).unwrap();
        assert_eq!(session.check_field("C", TimeField::Faz), Ok(FieldCheck::Correct));

        session.set_field("C", TimeField::Faz, None).unwrap();
        assert_eq!(session.check_field("C", TimeField::Faz), Ok(FieldCheck::Empty));
    }

    #[test]
    fn test_unknown_activity() {
        let mut session = session("network-upgrade");
        assert_eq!(
            session.set_field("Z", TimeField::Faz, Some(0)),
            Err(SessionError::UnknownActivity("Z".into()))
        );
        assert!(session.toggle_critical("Z").is_err());
        assert!(session.check_field("Z", TimeField::Gp).is_err());
    }

    #[test]
    fn test_critical_path_objective() {
        let mut session = session("network-upgrade");
        for id in ["A", "B", "C"] {
            session.toggle_critical(id).unwrap();
        }
        assert!(!session.is_objective_complete(LearningObjective::CriticalPath));

        assert_eq!(session.toggle_critical("A"), Ok(false));
        assert_eq!(session.marked_critical(), vec!["B", "C"]);
        assert!(session.is_objective_complete(LearningObjective::CriticalPath));
    }

    #[test]
    fn test_partial_answers_do_not_complete() {
        let mut session = session("server-rollout");
        session.set_field("A", TimeField::Faz, Some(0)).unwrap();
        session.set_field("A", TimeField::Fez, Some(3)).unwrap();
        assert!(!session.is_objective_complete(LearningObjective::ForwardPass));

        session.answer_project_duration(9);
        assert_eq!(
            session.completed_objectives(),
            vec![LearningObjective::ProjectDuration]
        );
        assert_eq!(session.earned_points(), 0);
    }

    #[test]
    fn test_full_completion_awards_points() {
        let mut session = session("erp-introduction");
        fill_correct(&mut session);
        session.answer_project_duration(18);
        for id in ["A", "C", "D", "E", "H"] {
            session.toggle_critical(id).unwrap();
        }
        assert!(session.is_complete());
        assert_eq!(session.earned_points(), 200);

        session.reset();
        assert!(!session.is_complete());
        assert_eq!(session.input("A"), UserInput::default());
    }

    #[test]
    fn test_session_does_not_touch_activities() {
        let scenario = find_scenario("network-upgrade").unwrap();
        let mut session = ScenarioSession::new(scenario.clone()).unwrap();
        fill_correct(&mut session);
        assert_eq!(session.scenario(), &scenario);
        assert!(session.scenario().activities.iter().all(|a| a.faz.is_none()));
    }

    #[test]
    fn test_hints_in_order() {
        let mut session = session("server-rollout");
        assert_eq!(
            session.reveal_hint(),
            Some("Activities without predecessors start at time 0.")
        );
        assert_eq!(session.reveal_hint(), Some("FEZ = FAZ + duration."));
        assert_eq!(session.reveal_hint(), None);
        assert_eq!(session.hints_revealed(), 2);
    }

    #[test]
    fn test_find_scenario() {
        assert!(find_scenario("server-rollout").is_some());
        assert!(find_scenario("unknown").is_none());
    }

    #[test]
    fn test_objective_descriptions() {
        assert!(LearningObjective::CriticalPath
            .description()
            .contains("critical path"));
    }
}
