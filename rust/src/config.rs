//! Configuration types for scheduling, layout and calendar projection.

use chrono::Weekday;

/// Configuration for the scheduling pipeline.
#[derive(Clone, Debug, Default)]
pub struct ScheduleConfig {
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    pub verbosity: u8,
}

/// Geometry for the network diagram.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Horizontal distance between levels.
    pub level_spacing: f64,
    /// Vertical distance between activities on the same level.
    pub row_spacing: f64,
    /// Offset of the first level and first row from the origin.
    pub margin: f64,
    /// Width of one activity box.
    pub node_width: f64,
    /// Height of one activity box.
    pub node_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            level_spacing: 200.0,
            row_spacing: 120.0,
            margin: 50.0,
            node_width: 140.0,
            node_height: 80.0,
        }
    }
}

/// How integer time units map onto calendar days.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarConfig {
    /// Skip Saturdays and Sundays when counting time units.
    pub skip_weekends: bool,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            skip_weekends: true,
        }
    }
}

impl CalendarConfig {
    pub fn is_working_day(&self, weekday: Weekday) -> bool {
        !(self.skip_weekends && matches!(weekday, Weekday::Sat | Weekday::Sun))
    }
}
