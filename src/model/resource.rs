use std::collections::BTreeSet;

use crate::{
    foundation::error::{CtxmapError, CtxmapResult},
    model::item::{ItemKind, UNUSED_ID, WeightedItem, first_repeated},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One candidate of a [`ResourcePool`].
pub struct PoolItem {
    /// Identifier, unique within the pool.
    pub id: String,
    /// Token count (computed by the caller).
    pub weight: u64,
    /// Optional relevance score, e.g. from a retriever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl PoolItem {
    /// Build an unscored candidate.
    pub fn new(id: impl Into<String>, weight: u64) -> Self {
        Self {
            id: id.into(),
            weight,
            score: None,
        }
    }

    /// Attach a relevance score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A named pool of candidate items of one kind, plus the subset selected for
/// the context window.
///
/// Retrieved documents, few-shot examples or archived history usually live
/// here; only the selected candidates become [`WeightedItem`]s.
pub struct ResourcePool {
    /// Display name, unique within an edit session.
    pub name: String,
    /// Kind every selected candidate is given.
    pub kind: ItemKind,
    /// Candidates in pool order.
    #[serde(default)]
    pub items: Vec<PoolItem>,
    #[serde(default)]
    selected: BTreeSet<String>,
}

impl ResourcePool {
    /// Build a pool with nothing selected.
    pub fn new(name: impl Into<String>, kind: ItemKind, items: Vec<PoolItem>) -> Self {
        Self {
            name: name.into(),
            kind,
            items,
            selected: BTreeSet::new(),
        }
    }

    /// Reject repeated or reserved candidate ids.
    pub fn validate(&self) -> CtxmapResult<()> {
        if self.items.iter().any(|item| item.id == UNUSED_ID) {
            return Err(CtxmapError::validation(format!(
                "pool '{}' uses the reserved id '{UNUSED_ID}'",
                self.name
            )));
        }
        if let Some(id) = first_repeated(self.items.iter().map(|item| item.id.as_str())) {
            return Err(CtxmapError::validation(format!(
                "pool '{}' lists id '{id}' more than once",
                self.name
            )));
        }
        Ok(())
    }

    /// `true` when the pool has a candidate with this id.
    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Add ids to the selection. Ids that are not candidates are ignored.
    pub fn select<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for id in ids {
            let id = id.as_ref();
            if self.contains(id) {
                self.selected.insert(id.to_string());
            }
        }
    }

    /// Remove ids from the selection.
    pub fn deselect<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for id in ids {
            self.selected.remove(id.as_ref());
        }
    }

    /// Replace the whole selection.
    pub fn set_selection<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.selected.clear();
        self.select(ids);
    }

    /// Select every candidate.
    pub fn select_all(&mut self) {
        self.selected = self.items.iter().map(|item| item.id.clone()).collect();
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// `true` when `id` is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Selected candidates, in pool order.
    pub fn selected_items(&self) -> impl Iterator<Item = &PoolItem> + '_ {
        self.items.iter().filter(move |item| self.is_selected(&item.id))
    }

    /// Candidates left out of the window, in pool order.
    pub fn unselected_items(&self) -> impl Iterator<Item = &PoolItem> + '_ {
        self.items.iter().filter(move |item| !self.is_selected(&item.id))
    }

    /// Tokens of the selected candidates (saturating).
    pub fn total_selected_weight(&self) -> u64 {
        self.selected_items()
            .fold(0u64, |acc, item| acc.saturating_add(item.weight))
    }

    /// Tokens of every candidate (saturating).
    pub fn total_weight(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |acc, item| acc.saturating_add(item.weight))
    }

    /// Selected candidates as context items of the pool's kind.
    pub fn to_items(&self) -> Vec<WeightedItem> {
        self.selected_items()
            .map(|item| WeightedItem::new(item.id.clone(), item.weight, self.kind))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/resource.rs"]
mod tests;
