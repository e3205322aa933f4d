use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use crate::{
    foundation::error::{CtxmapError, CtxmapResult},
    model::item::{ItemKind, WeightedItem, first_repeated},
    model::resource::ResourcePool,
    model::snapshot::ContextSnapshot,
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
/// What the host UI is currently doing with the snapshot.
pub enum InteractionMode {
    /// Read-only overview.
    View,
    /// One component is focused (hovered or opened).
    Explore {
        /// Focused item id.
        focus: String,
    },
    /// One component is being edited.
    Edit {
        /// Edited item id.
        target: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Discrete UI events that move an [`EditSession`] between modes.
pub enum SessionEvent {
    /// Focus an item (View/Explore -> Explore).
    Focus(String),
    /// Drop focus (Explore -> View).
    Blur,
    /// Start editing the focused item (Explore -> Edit).
    BeginEdit,
    /// Leave the editor without committing (Edit -> Explore).
    Cancel,
    /// Validate the working copy, hand it to the commit callback, return to View.
    Commit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
/// Weight change recorded for one item since the last commit.
pub struct WeightEdit {
    /// Weight at the last commit.
    pub original: u64,
    /// Current working weight.
    pub edited: u64,
}

type CommitHook = Box<dyn FnMut(&ContextSnapshot) + Send>;

/// Host-side edit state: a committed baseline, a working copy and the UI mode.
///
/// Layout and diff are not involved here; the commit callback is expected to
/// re-run them on the snapshot it receives.
pub struct EditSession {
    baseline: ContextSnapshot,
    working: ContextSnapshot,
    mode: InteractionMode,
    edits: BTreeMap<String, WeightEdit>,
    pools: Vec<ResourcePool>,
    on_commit: Option<CommitHook>,
}

impl fmt::Debug for EditSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditSession")
            .field("mode", &self.mode)
            .field("items", &self.working.items.len())
            .field("edits", &self.edits)
            .field("pools", &self.pools.len())
            .field("has_on_commit", &self.on_commit.is_some())
            .finish()
    }
}

impl EditSession {
    /// Start a session on a valid snapshot.
    pub fn new(snapshot: ContextSnapshot) -> CtxmapResult<Self> {
        snapshot.validate()?;
        Ok(Self {
            working: snapshot.clone(),
            baseline: snapshot,
            mode: InteractionMode::View,
            edits: BTreeMap::new(),
            pools: Vec::new(),
            on_commit: None,
        })
    }

    /// Register the callback run on every successful [`SessionEvent::Commit`].
    pub fn with_on_commit(mut self, hook: impl FnMut(&ContextSnapshot) + Send + 'static) -> Self {
        self.on_commit = Some(Box::new(hook));
        self
    }

    /// Attach the candidate pools that [`EditSession::apply_selections`] draws from.
    ///
    /// Pool names must be unique and each pool must be valid.
    pub fn with_pools(mut self, pools: Vec<ResourcePool>) -> CtxmapResult<Self> {
        for pool in &pools {
            pool.validate()?;
        }
        if let Some(name) = first_repeated(pools.iter().map(|pool| pool.name.as_str())) {
            return Err(CtxmapError::validation(format!(
                "pool name '{name}' is not unique"
            )));
        }
        self.pools = pools;
        Ok(self)
    }

    /// Attached pools, in attach order.
    pub fn pools(&self) -> &[ResourcePool] {
        &self.pools
    }

    /// Look up a pool by name.
    pub fn pool(&self, name: &str) -> Option<&ResourcePool> {
        self.pools.iter().find(|pool| pool.name == name)
    }

    /// Current UI mode.
    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    /// Snapshot as of the last commit.
    pub fn baseline(&self) -> &ContextSnapshot {
        &self.baseline
    }

    /// Snapshot with all pending changes applied.
    pub fn working(&self) -> &ContextSnapshot {
        &self.working
    }

    /// Weight edits since the last commit, keyed by item id.
    pub fn edits(&self) -> &BTreeMap<String, WeightEdit> {
        &self.edits
    }

    /// `true` when the working copy differs from the baseline.
    pub fn has_changes(&self) -> bool {
        self.working != self.baseline
    }

    /// Replace an item's token count (recounted by the caller).
    pub fn set_weight(&mut self, id: &str, weight: u64) -> CtxmapResult<()> {
        let item = self
            .working
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| CtxmapError::validation(format!("no item with id '{id}'")))?;

        let previous = item.weight;
        item.weight = weight;
        let original = self.edits.get(id).map_or(previous, |e| e.original);
        if original == weight {
            self.edits.remove(id);
        } else {
            let edit = WeightEdit {
                original,
                edited: weight,
            };
            self.edits.insert(id.to_string(), edit);
        }
        Ok(())
    }

    /// Move the listed ids to the front in the given order; the rest keep their relative order.
    ///
    /// Unknown ids are ignored.
    pub fn reorder<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rest = std::mem::take(&mut self.working.items);
        let mut ordered = Vec::with_capacity(rest.len());
        for id in ids {
            if let Some(pos) = rest.iter().position(|item| item.id == id.as_ref()) {
                ordered.push(rest.remove(pos));
            }
        }
        ordered.extend(rest);
        self.working.items = ordered;
    }

    /// Drop an item from the working copy. Focus on it is released.
    pub fn remove(&mut self, id: &str) -> CtxmapResult<WeightedItem> {
        let pos = self
            .working
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| CtxmapError::validation(format!("no item with id '{id}'")))?;
        let removed = self.working.items.remove(pos);
        self.edits.remove(id);

        if self.focused() == Some(id) {
            self.mode = InteractionMode::View;
        }
        Ok(removed)
    }

    /// Replace the selection of the named pools and rebuild the working items.
    ///
    /// Items whose kind belongs to no attached pool keep their place; every
    /// pool's selected candidates are then appended in pool order. Pools not
    /// named in `selections` keep their current selection. An unknown pool
    /// name fails before anything changes.
    pub fn apply_selections(
        &mut self,
        selections: &BTreeMap<String, Vec<String>>,
    ) -> CtxmapResult<()> {
        if let Some(name) = selections.keys().find(|name| self.pool(name).is_none()) {
            return Err(CtxmapError::validation(format!("no pool named '{name}'")));
        }
        for pool in &mut self.pools {
            if let Some(ids) = selections.get(&pool.name) {
                pool.set_selection(ids);
            }
        }

        let pool_kinds: BTreeSet<ItemKind> = self.pools.iter().map(|pool| pool.kind).collect();
        self.working.items.retain(|item| !pool_kinds.contains(&item.kind));
        for pool in &self.pools {
            self.working.items.extend(pool.to_items());
        }

        let working = &self.working;
        self.edits
            .retain(|id, edit| working.item(id).is_some_and(|item| item.weight == edit.edited));
        if let Some(focus) = self.focused()
            && self.working.item(focus).is_none()
        {
            self.mode = InteractionMode::View;
        }

        tracing::debug!(
            items = self.working.items.len(),
            pools = self.pools.len(),
            "pool selections applied"
        );
        Ok(())
    }

    /// Discard every item change since the last commit and return to View.
    ///
    /// Pool selections are left as they are.
    pub fn reset(&mut self) {
        self.working = self.baseline.clone();
        self.edits.clear();
        self.mode = InteractionMode::View;
    }

    /// Apply one UI event. Invalid transitions fail and leave the session untouched.
    #[tracing::instrument(skip(self), fields(mode = ?self.mode))]
    pub fn handle(&mut self, event: SessionEvent) -> CtxmapResult<&InteractionMode> {
        if event == SessionEvent::Commit {
            self.commit()?;
            self.mode = InteractionMode::View;
            return Ok(&self.mode);
        }

        let next = match (&self.mode, event) {
            (InteractionMode::View | InteractionMode::Explore { .. }, SessionEvent::Focus(id)) => {
                if self.working.item(&id).is_none() {
                    return Err(CtxmapError::validation(format!(
                        "cannot focus unknown item '{id}'"
                    )));
                }
                InteractionMode::Explore { focus: id }
            }
            (InteractionMode::Explore { .. }, SessionEvent::Blur) => InteractionMode::View,
            (InteractionMode::Explore { focus }, SessionEvent::BeginEdit) => InteractionMode::Edit {
                target: focus.clone(),
            },
            (InteractionMode::Edit { target }, SessionEvent::Cancel) => InteractionMode::Explore {
                focus: target.clone(),
            },
            (mode, event) => {
                return Err(CtxmapError::validation(format!(
                    "event {event:?} is not valid in mode {mode:?}"
                )));
            }
        };
        self.mode = next;
        Ok(&self.mode)
    }

    fn focused(&self) -> Option<&str> {
        match &self.mode {
            InteractionMode::View => None,
            InteractionMode::Explore { focus } => Some(focus.as_str()),
            InteractionMode::Edit { target } => Some(target.as_str()),
        }
    }

    fn commit(&mut self) -> CtxmapResult<()> {
        self.working.validate()?;
        if let Some(hook) = self.on_commit.as_mut() {
            hook(&self.working);
        }
        tracing::debug!(edits = self.edits.len(), "edit session committed");
        self.baseline = self.working.clone();
        self.edits.clear();
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
