use crate::{
    foundation::error::{CtxmapError, CtxmapResult},
    model::item::ItemKind,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// How an item's weight moved between the before and after sets.
pub enum EdgeStatus {
    /// Present on both sides with the same weight.
    Unchanged,
    /// Present on both sides, lighter after.
    Shrunk,
    /// Present on both sides, heavier after.
    Grown,
    /// Only present before; its weight flows into the waste sink.
    Removed,
    /// Only present after.
    Added,
}

impl EdgeStatus {
    /// Classify a before/after pair. `None` means "absent on that side".
    pub(crate) fn classify(before: Option<u64>, after: Option<u64>) -> Option<Self> {
        match (before, after) {
            (Some(b), Some(a)) if a == b => Some(Self::Unchanged),
            (Some(b), Some(a)) if a < b => Some(Self::Shrunk),
            (Some(_), Some(_)) => Some(Self::Grown),
            (Some(_), None) => Some(Self::Removed),
            (None, Some(_)) => Some(Self::Added),
            (None, None) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
/// One band of the flow diagram.
///
/// Serializes with an extra derived `pct_change` field (see [`FlowEdge::pct_change`]);
/// it is ignored when deserializing.
pub struct FlowEdge {
    /// Id shared by the matched items.
    pub item_id: String,
    /// Kind of the after item when present, otherwise of the before item.
    pub kind: ItemKind,
    /// Tokens on the before side (0 for [`EdgeStatus::Added`]).
    pub before_weight: u64,
    /// Tokens on the after side (0 for [`EdgeStatus::Removed`]).
    pub after_weight: u64,
    /// Classification of the change.
    pub status: EdgeStatus,
}

impl FlowEdge {
    /// Relative change `(after - before) / before`.
    ///
    /// Removed edges report `-1.0`; added edges have no baseline and report `None`.
    pub fn pct_change(&self) -> Option<f64> {
        match self.status {
            EdgeStatus::Removed => Some(-1.0),
            EdgeStatus::Added => None,
            EdgeStatus::Unchanged | EdgeStatus::Shrunk | EdgeStatus::Grown => {
                if self.before_weight == 0 {
                    return None;
                }
                let before = self.before_weight as f64;
                Some((self.after_weight as f64 - before) / before)
            }
        }
    }

    /// Signed token delta `after - before`.
    pub fn delta(&self) -> i128 {
        i128::from(self.after_weight) - i128::from(self.before_weight)
    }
}

impl serde::Serialize for FlowEdge {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct as _;

        let mut s = serializer.serialize_struct("FlowEdge", 6)?;
        s.serialize_field("item_id", &self.item_id)?;
        s.serialize_field("kind", &self.kind)?;
        s.serialize_field("before_weight", &self.before_weight)?;
        s.serialize_field("after_weight", &self.after_weight)?;
        s.serialize_field("status", &self.status)?;
        s.serialize_field("pct_change", &self.pct_change())?;
        s.end()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Before/after flow description with conserved totals.
pub struct FlowGraph {
    /// Sum of all before weights.
    pub before_total: u64,
    /// Sum of all after weights.
    pub after_total: u64,
    /// Edges: before order first, then added items in after order.
    pub edges: Vec<FlowEdge>,
    /// Weight carried by removed edges into the waste sink.
    pub waste_total: u64,
}

impl FlowGraph {
    /// Edges with the given status, in graph order.
    pub fn edges_with(&self, status: EdgeStatus) -> impl Iterator<Item = &FlowEdge> + '_ {
        self.edges.iter().filter(move |e| e.status == status)
    }

    /// Look up the edge for an id.
    pub fn edge(&self, item_id: &str) -> Option<&FlowEdge> {
        self.edges.iter().find(|e| e.item_id == item_id)
    }

    /// Tokens freed by the transformation (negative when the context grew).
    pub fn saved(&self) -> i128 {
        i128::from(self.before_total) - i128::from(self.after_total)
    }

    /// Re-derive the totals from the edges and fail on any mismatch.
    pub fn check_conservation(&self) -> CtxmapResult<()> {
        let mut before = 0u64;
        let mut after = 0u64;
        let mut waste = 0u64;
        for edge in &self.edges {
            match edge.status {
                EdgeStatus::Removed if edge.after_weight != 0 => {
                    return Err(CtxmapError::invariant(format!(
                        "removed edge '{}' keeps {} tokens",
                        edge.item_id, edge.after_weight
                    )));
                }
                EdgeStatus::Added if edge.before_weight != 0 => {
                    return Err(CtxmapError::invariant(format!(
                        "added edge '{}' claims {} prior tokens",
                        edge.item_id, edge.before_weight
                    )));
                }
                _ => {}
            }
            before = checked(before, edge.before_weight, "before")?;
            after = checked(after, edge.after_weight, "after")?;
            if edge.status == EdgeStatus::Removed {
                waste = checked(waste, edge.before_weight, "waste")?;
            }
        }

        for (name, derived, stored) in [
            ("before_total", before, self.before_total),
            ("after_total", after, self.after_total),
            ("waste_total", waste, self.waste_total),
        ] {
            if derived != stored {
                return Err(CtxmapError::invariant(format!(
                    "{name} is {stored} but edges sum to {derived}"
                )));
            }
        }
        Ok(())
    }
}

fn checked(acc: u64, add: u64, what: &str) -> CtxmapResult<u64> {
    acc.checked_add(add)
        .ok_or_else(|| CtxmapError::validation(format!("{what} weights overflow u64")))
}

#[cfg(test)]
#[path = "../../tests/unit/diff/flow.rs"]
mod tests;
