use std::collections::HashSet;

use crate::foundation::error::{CtxmapError, CtxmapResult, Side};

/// Reserved id of the synthetic "unused capacity" item.
pub const UNUSED_ID: &str = "_unused";

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
/// Category of a context component.
///
/// Only used for identity and presentation (color tables live in the renderer);
/// layout and diff logic never branch on it.
pub enum ItemKind {
    /// System prompt / persistent instructions.
    SystemPrompt,
    /// The current user turn.
    UserMessage,
    /// Earlier conversation turns.
    ChatHistory,
    /// Retrieved documents.
    Rag,
    /// Tool definitions or tool results.
    Tool,
    /// Few-shot examples.
    Example,
    /// Offloaded notes and working memory.
    Scratchpad,
}

impl ItemKind {
    /// Every kind, in declaration order.
    pub const ALL: [ItemKind; 7] = [
        ItemKind::SystemPrompt,
        ItemKind::UserMessage,
        ItemKind::ChatHistory,
        ItemKind::Rag,
        ItemKind::Tool,
        ItemKind::Example,
        ItemKind::Scratchpad,
    ];

    /// Short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::SystemPrompt => "System",
            ItemKind::UserMessage => "User",
            ItemKind::ChatHistory => "History",
            ItemKind::Rag => "RAG",
            ItemKind::Tool => "Tool",
            ItemKind::Example => "Example",
            ItemKind::Scratchpad => "Scratchpad",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// One sized component of a context window.
pub struct WeightedItem {
    /// Identifier, unique within its owning set.
    pub id: String,
    /// Token count.
    pub weight: u64,
    /// Presentation category.
    pub kind: ItemKind,
}

impl WeightedItem {
    /// Build an item.
    pub fn new(id: impl Into<String>, weight: u64, kind: ItemKind) -> Self {
        Self {
            id: id.into(),
            weight,
            kind,
        }
    }
}

/// Sum of item weights, or `None` on `u64` overflow.
pub(crate) fn total_weight(items: &[WeightedItem]) -> Option<u64> {
    items
        .iter()
        .try_fold(0u64, |acc, item| acc.checked_add(item.weight))
}

/// Rejects the reserved [`UNUSED_ID`] anywhere in `items`.
pub(crate) fn ensure_no_reserved_id(items: &[WeightedItem]) -> CtxmapResult<()> {
    if items.iter().any(|item| item.id == UNUSED_ID) {
        return Err(CtxmapError::validation(format!(
            "item id '{UNUSED_ID}' is reserved for unused capacity"
        )));
    }
    Ok(())
}

/// First id that appears more than once in `items`.
pub(crate) fn first_duplicate_id(items: &[WeightedItem]) -> Option<&str> {
    first_repeated(items.iter().map(|item| item.id.as_str()))
}

/// First value yielded twice by `ids`.
pub(crate) fn first_repeated<'a>(ids: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    ids.into_iter().find(|id| !seen.insert(*id))
}

/// Fails with [`CtxmapError::DuplicateIdentity`] on the first repeated id.
pub(crate) fn ensure_unique_ids(items: &[WeightedItem], side: Side) -> CtxmapResult<()> {
    match first_duplicate_id(items) {
        Some(id) => Err(CtxmapError::duplicate(id, side)),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/item.rs"]
mod tests;
