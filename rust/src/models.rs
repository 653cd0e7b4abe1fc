//! Core data types for the network-planning scheduler.

use rustc_hash::FxHashMap;

/// One activity (vertex) of a project network.
///
/// The computed fields are `None` until the corresponding pass has run:
/// `faz`/`fez` after the forward pass, `saz`/`sez`/`gp`/`is_critical` after
/// the backward pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Activity {
    pub id: String,
    pub name: String,
    /// Duration in time units. Signed so that invalid input can be reported.
    pub duration: i64,
    /// IDs of activities that must finish before this one starts.
    pub predecessors: Vec<String>,
    /// Earliest start.
    pub faz: Option<i64>,
    /// Earliest finish.
    pub fez: Option<i64>,
    /// Latest start.
    pub saz: Option<i64>,
    /// Latest finish.
    pub sez: Option<i64>,
    /// Total float.
    pub gp: Option<i64>,
    pub is_critical: Option<bool>,
}

impl Activity {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        duration: i64,
        predecessors: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration,
            predecessors,
            faz: None,
            fez: None,
            saz: None,
            sez: None,
            gp: None,
            is_critical: None,
        }
    }

    /// Whether the activity has no predecessors.
    pub fn is_start(&self) -> bool {
        self.predecessors.is_empty()
    }

    /// Timing record, available once both passes have run.
    pub fn timing(&self) -> Option<ActivityTiming> {
        Some(ActivityTiming {
            faz: self.faz?,
            fez: self.fez?,
            saz: self.saz?,
            sez: self.sez?,
            gp: self.gp?,
        })
    }

    /// Drop all computed fields, leaving only the reference data.
    pub fn clear_computed(&mut self) {
        self.faz = None;
        self.fez = None;
        self.saz = None;
        self.sez = None;
        self.gp = None;
        self.is_critical = None;
    }
}

/// Fully computed timing of a single activity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActivityTiming {
    pub faz: i64,
    pub fez: i64,
    pub saz: i64,
    pub sez: i64,
    pub gp: i64,
}

impl ActivityTiming {
    pub fn is_critical(&self) -> bool {
        self.gp == 0
    }

    /// Free slack between earliest and latest finish. Equals `gp` for a
    /// consistent schedule.
    pub fn finish_float(&self) -> i64 {
        self.sez - self.fez
    }
}

/// Result of running both passes over an activity list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schedule {
    /// Activities in input order with all computed fields populated.
    pub activities: Vec<Activity>,
    /// Maximum earliest finish over all sink activities.
    pub project_duration: i64,
    /// Activity IDs in topological order (predecessors first).
    pub topo_order: Vec<String>,
    index: FxHashMap<String, usize>,
}

impl Schedule {
    pub fn new(activities: Vec<Activity>, project_duration: i64, topo_order: Vec<String>) -> Self {
        let index = activities
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id.clone(), i))
            .collect();
        Self {
            activities,
            project_duration,
            topo_order,
            index,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Activity> {
        self.index.get(id).map(|&i| &self.activities[i])
    }

    pub fn timing(&self, id: &str) -> Option<ActivityTiming> {
        self.get(id).and_then(Activity::timing)
    }

    /// IDs of critical activities, in input order.
    pub fn critical_ids(&self) -> Vec<String> {
        crate::critical_path::critical_activity_ids(&self.activities)
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

/// Build an activity from string slices. Test and catalogue helper.
pub(crate) fn activity(id: &str, name: &str, duration: i64, preds: &[&str]) -> Activity {
    Activity::new(
        id,
        name,
        duration,
        preds.iter().map(|p| p.to_string()).collect(),
    )
}
