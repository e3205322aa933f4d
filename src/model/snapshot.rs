use std::{io::Read, path::Path};

use crate::{
    foundation::error::{CtxmapError, CtxmapResult},
    model::item::{
        ItemKind, WeightedItem, ensure_no_reserved_id, first_duplicate_id, total_weight,
    },
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// A context window at one point in time: its capacity and ordered components.
///
/// This is the input record of the engine. It can be:
/// - built programmatically
/// - serialized/deserialized via Serde (JSON)
///
/// Geometry comes from [`crate::layout`]; before/after comparisons from
/// [`crate::diff`] or [`crate::compare`].
pub struct ContextSnapshot {
    /// Context window size in tokens.
    pub capacity: u64,
    /// Components in window order.
    pub items: Vec<WeightedItem>,
    /// Optional display label, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ContextSnapshot {
    /// Build an unlabeled snapshot.
    pub fn new(capacity: u64, items: Vec<WeightedItem>) -> Self {
        Self {
            capacity,
            items,
            label: None,
        }
    }

    /// Attach a display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Tokens used by all items (saturating on overflow).
    pub fn total_weight(&self) -> u64 {
        total_weight(&self.items).unwrap_or(u64::MAX)
    }

    /// Tokens left free; zero when the window is full or overfull.
    pub fn unused(&self) -> u64 {
        self.capacity.saturating_sub(self.total_weight())
    }

    /// Utilization as a percentage (0-100). Zero when capacity is zero.
    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.total_weight() as f64 / self.capacity as f64 * 100.0
    }

    /// Items of one kind, in window order.
    pub fn items_of_kind(&self, kind: ItemKind) -> impl Iterator<Item = &WeightedItem> + '_ {
        self.items.iter().filter(move |item| item.kind == kind)
    }

    /// Look up an item by id.
    pub fn item(&self, id: &str) -> Option<&WeightedItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Check everything a layout or diff of this snapshot would reject.
    pub fn validate(&self) -> CtxmapResult<()> {
        if self.capacity == 0 {
            return Err(CtxmapError::validation("snapshot capacity must be > 0"));
        }
        ensure_no_reserved_id(&self.items)?;
        if let Some(id) = first_duplicate_id(&self.items) {
            return Err(CtxmapError::validation(format!(
                "snapshot item id '{id}' is not unique"
            )));
        }
        let total = total_weight(&self.items)
            .ok_or_else(|| CtxmapError::validation("snapshot item weights overflow u64"))?;
        if total > self.capacity {
            return Err(CtxmapError::CapacityExceeded {
                total,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Parse a snapshot from JSON text.
    pub fn from_json_str(s: &str) -> CtxmapResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Parse a snapshot from a JSON reader.
    pub fn from_json_reader(r: impl Read) -> CtxmapResult<Self> {
        Ok(serde_json::from_reader(r)?)
    }

    /// Load a snapshot from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> CtxmapResult<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path).map_err(|e| {
            CtxmapError::Other(anyhow::Error::new(e).context(format!(
                "open snapshot '{}'",
                path.display()
            )))
        })?;
        Self::from_json_reader(std::io::BufReader::new(f))
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> CtxmapResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/snapshot.rs"]
mod tests;
