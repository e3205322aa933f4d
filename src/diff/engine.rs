use std::collections::{HashMap, HashSet};

use crate::{
    diff::flow::{EdgeStatus, FlowEdge, FlowGraph},
    foundation::error::{CtxmapError, CtxmapResult, Side},
    model::item::{WeightedItem, ensure_unique_ids},
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Column titles for a before/after view. Opaque to the engine.
pub struct DiffLabels {
    /// Title of the before column.
    pub before: String,
    /// Title of the after column.
    pub after: String,
}

impl Default for DiffLabels {
    fn default() -> Self {
        Self {
            before: "Before".to_string(),
            after: "After".to_string(),
        }
    }
}

impl DiffLabels {
    /// Build labels from two titles.
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// A flow graph together with the labels it should be titled with.
pub struct LabeledFlow {
    /// Pass-through column titles.
    pub labels: DiffLabels,
    /// The computed flow.
    pub graph: FlowGraph,
}

/// Match `before` and `after` by id and build the flow graph between them.
///
/// Edges follow `before` order (unchanged, shrunk, grown, removed), then
/// added items in `after` order. The only failure on well-formed input is a
/// repeated id within one side.
#[tracing::instrument(skip_all, fields(before = before.len(), after = after.len()))]
pub fn diff(before: &[WeightedItem], after: &[WeightedItem]) -> CtxmapResult<FlowGraph> {
    ensure_unique_ids(before, Side::Before)?;
    ensure_unique_ids(after, Side::After)?;

    let after_by_id: HashMap<&str, &WeightedItem> =
        after.iter().map(|item| (item.id.as_str(), item)).collect();
    let before_ids: HashSet<&str> = before.iter().map(|item| item.id.as_str()).collect();

    let mut edges = Vec::with_capacity(before.len() + after.len());
    for item in before {
        let matched = after_by_id.get(item.id.as_str()).copied();
        edges.push(edge_for(Some(item), matched)?);
    }
    for item in after {
        if !before_ids.contains(item.id.as_str()) {
            edges.push(edge_for(None, Some(item))?);
        }
    }

    let mut graph = FlowGraph {
        before_total: 0,
        after_total: 0,
        edges,
        waste_total: 0,
    };
    for edge in &graph.edges {
        graph.before_total = add_tokens(graph.before_total, edge.before_weight, Side::Before)?;
        graph.after_total = add_tokens(graph.after_total, edge.after_weight, Side::After)?;
        if edge.status == EdgeStatus::Removed {
            graph.waste_total += edge.before_weight;
        }
    }
    graph.check_conservation()?;

    tracing::debug!(
        edges = graph.edges.len(),
        removed = graph.edges_with(EdgeStatus::Removed).count(),
        added = graph.edges_with(EdgeStatus::Added).count(),
        waste = graph.waste_total,
        "flow graph built"
    );
    Ok(graph)
}

/// [`diff`] with pass-through labels for the renderer.
pub fn diff_labeled(
    before: &[WeightedItem],
    after: &[WeightedItem],
    labels: DiffLabels,
) -> CtxmapResult<LabeledFlow> {
    Ok(LabeledFlow {
        labels,
        graph: diff(before, after)?,
    })
}

fn edge_for(
    before: Option<&WeightedItem>,
    after: Option<&WeightedItem>,
) -> CtxmapResult<FlowEdge> {
    let status = EdgeStatus::classify(before.map(|i| i.weight), after.map(|i| i.weight))
        .ok_or_else(|| CtxmapError::invariant("flow edge with no item on either side"))?;
    let source = after
        .or(before)
        .ok_or_else(|| CtxmapError::invariant("flow edge with no item on either side"))?;
    Ok(FlowEdge {
        item_id: source.id.clone(),
        kind: source.kind,
        before_weight: before.map_or(0, |i| i.weight),
        after_weight: after.map_or(0, |i| i.weight),
        status,
    })
}

fn add_tokens(acc: u64, add: u64, side: Side) -> CtxmapResult<u64> {
    acc.checked_add(add)
        .ok_or_else(|| CtxmapError::validation(format!("{side} weights overflow u64")))
}

#[cfg(test)]
#[path = "../../tests/unit/diff/engine.rs"]
mod tests;
