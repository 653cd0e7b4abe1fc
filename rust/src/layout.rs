//! Diagram layout for the network graph.
//!
//! Levels are spaced horizontally, activities on the same level are stacked
//! vertically in input order.

use crate::config::LayoutConfig;
use crate::graph::{ActivityGraph, ScheduleError};
use crate::models::{Activity, Schedule};

/// Placement of one activity box.
#[derive(Clone, Debug, PartialEq)]
pub struct NodePosition {
    pub id: String,
    pub level: usize,
    /// Position within the level, from the top.
    pub row: usize,
    pub x: f64,
    pub y: f64,
}

/// Arrow between two activity boxes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutEdge {
    pub from: String,
    pub to: String,
    /// Both ends critical and `to` starts exactly when `from` finishes.
    pub critical: bool,
}

/// Level of every activity, in input order.
///
/// A start activity sits on level 0; every other activity one level past its
/// deepest predecessor.
pub fn compute_levels(activities: &[Activity]) -> Result<Vec<usize>, ScheduleError> {
    let graph = ActivityGraph::build(activities)?;
    Ok(levels_with_graph(&graph))
}

fn levels_with_graph(graph: &ActivityGraph) -> Vec<usize> {
    let mut levels = vec![0usize; graph.len()];
    for &idx in &graph.topo_order {
        let i = idx as usize;
        levels[i] = graph.preds[i]
            .iter()
            .map(|&p| levels[p as usize] + 1)
            .max()
            .unwrap_or(0);
    }
    levels
}

/// Assign diagram coordinates to every activity, in input order.
pub fn compute_layout(
    activities: &[Activity],
    config: &LayoutConfig,
) -> Result<Vec<NodePosition>, ScheduleError> {
    let graph = ActivityGraph::build(activities)?;
    let levels = levels_with_graph(&graph);

    let depth = levels.iter().copied().max().map_or(0, |m| m + 1);
    let mut next_row = vec![0usize; depth];

    Ok(activities
        .iter()
        .zip(levels)
        .map(|(activity, level)| {
            let row = next_row[level];
            next_row[level] += 1;
            NodePosition {
                id: activity.id.clone(),
                level,
                row,
                x: config.margin + level as f64 * config.level_spacing,
                y: config.margin + row as f64 * config.row_spacing,
            }
        })
        .collect())
}

/// Canvas size needed to draw `positions`.
pub fn canvas_size(positions: &[NodePosition], config: &LayoutConfig) -> (f64, f64) {
    let max_x = positions.iter().map(|p| p.x).fold(0.0, f64::max);
    let max_y = positions.iter().map(|p| p.y).fold(0.0, f64::max);
    if positions.is_empty() {
        return (2.0 * config.margin, 2.0 * config.margin);
    }
    (
        max_x + config.node_width + config.margin,
        max_y + config.node_height + config.margin,
    )
}

/// Predecessor edges of a computed schedule, in input order.
pub fn layout_edges(schedule: &Schedule) -> Vec<LayoutEdge> {
    let mut edges = Vec::new();
    for activity in &schedule.activities {
        for pred_id in &activity.predecessors {
            let Some(pred) = schedule.get(pred_id) else {
                continue;
            };
            let critical = pred.is_critical == Some(true)
                && activity.is_critical == Some(true)
                && pred.fez.is_some()
                && pred.fez == activity.faz;
            edges.push(LayoutEdge {
                from: pred_id.clone(),
                to: activity.id.clone(),
                critical,
            });
        }
    }
    edges
}
