//! Learner progress with pluggable persistence.
//!
//! [`ProgressStore`] owns the in-memory state and writes through a
//! [`ProgressPort`] after every change. Storage backends implement the port;
//! [`MemoryProgressPort`] keeps everything in process.

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

use crate::scenario::ScenarioSession;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgressError {
    #[error("Failed to load progress: {0}")]
    Load(String),
    #[error("Failed to save progress: {0}")]
    Save(String),
}

/// One completed scenario.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletedScenario {
    pub points: u32,
    pub completed_on: NaiveDate,
}

/// Everything persisted about a learner.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgressRecord {
    pub completed: FxHashMap<String, CompletedScenario>,
}

impl ProgressRecord {
    pub fn total_points(&self) -> u32 {
        self.completed.values().map(|c| c.points).sum()
    }
}

/// Persistence boundary for progress records.
pub trait ProgressPort {
    fn load(&self) -> Result<ProgressRecord, ProgressError>;
    fn save(&self, record: &ProgressRecord) -> Result<(), ProgressError>;
}

/// In-process storage. Clones share the same underlying record.
#[derive(Clone, Debug, Default)]
pub struct MemoryProgressPort {
    record: Rc<RefCell<ProgressRecord>>,
}

impl MemoryProgressPort {
    pub fn new(record: ProgressRecord) -> Self {
        Self {
            record: Rc::new(RefCell::new(record)),
        }
    }

    /// Current stored record.
    pub fn snapshot(&self) -> ProgressRecord {
        self.record.borrow().clone()
    }
}

impl ProgressPort for MemoryProgressPort {
    fn load(&self) -> Result<ProgressRecord, ProgressError> {
        Ok(self.record.borrow().clone())
    }

    fn save(&self, record: &ProgressRecord) -> Result<(), ProgressError> {
        *self.record.borrow_mut() = record.clone();
        Ok(())
    }
}

/// Progress state backed by a persistence port.
pub struct ProgressStore<P: ProgressPort> {
    port: P,
    record: ProgressRecord,
}

impl<P: ProgressPort> ProgressStore<P> {
    /// Load the stored record through `port`.
    pub fn open(port: P) -> Result<Self, ProgressError> {
        let record = port.load()?;
        Ok(Self { port, record })
    }

    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }

    pub fn total_points(&self) -> u32 {
        self.record.total_points()
    }

    pub fn is_completed(&self, scenario_id: &str) -> bool {
        self.record.completed.contains_key(scenario_id)
    }

    /// Record a completed scenario. Each scenario counts once; returns
    /// whether anything changed.
    ///
    /// The in-memory state only changes if saving succeeds.
    pub fn record_completion(
        &mut self,
        scenario_id: &str,
        points: u32,
        completed_on: NaiveDate,
    ) -> Result<bool, ProgressError> {
        if self.is_completed(scenario_id) {
            return Ok(false);
        }
        let mut updated = self.record.clone();
        updated.completed.insert(
            scenario_id.to_string(),
            CompletedScenario {
                points,
                completed_on,
            },
        );
        self.port.save(&updated)?;
        self.record = updated;
        Ok(true)
    }

    /// Record `session` if all of its objectives are met.
    pub fn record_session(
        &mut self,
        session: &ScenarioSession,
        completed_on: NaiveDate,
    ) -> Result<bool, ProgressError> {
        if !session.is_complete() {
            return Ok(false);
        }
        self.record_completion(&session.scenario().id, session.earned_points(), completed_on)
    }

    /// Forget all progress.
    pub fn reset(&mut self) -> Result<(), ProgressError> {
        let empty = ProgressRecord::default();
        self.port.save(&empty)?;
        self.record = empty;
        Ok(())
    }
}
