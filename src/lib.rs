//! ctxmap turns the contents of an LLM context window into geometry and flows.
//!
//! Two pure engines share one item model ([`WeightedItem`]: id, token count, kind):
//!
//! 1. **Layout**: `items + capacity -> Vec<Region>`, a partition of the unit canvas
//!    where every component's area is its share of the window, plus one region
//!    for unused capacity. See [`layout()`] and [`LayoutMode`].
//! 2. **Diff**: `before items + after items -> FlowGraph`, identity-matched
//!    edges with exact token conservation and a waste sink for removed items.
//!    See [`diff()`].
//!
//! [`compare()`] runs both layouts and the diff for two [`ContextSnapshot`]s
//! concurrently, and [`EditSession`] models the host-side view/explore/edit
//! cycle that feeds edited snapshots back in.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: identical input always yields bit-identical output.
//! - **No presentation**: colors, pixels and markup belong to the renderer.
//!
//! For a walkthrough of the algorithms and their invariants, see [`crate::guide`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod compare;
mod diff;
mod foundation;
mod layout;
mod model;
mod session;

/// Standalone documentation of ctxmap's concepts and invariants.
pub mod guide;

pub use compare::{CompareOptions, Comparison, compare, labels_for};
pub use diff::engine::{DiffLabels, LabeledFlow, diff, diff_labeled};
pub use diff::flow::{EdgeStatus, FlowEdge, FlowGraph};
pub use diff::summary::{KindRow, KindSummary};
pub use foundation::core::{AREA_EPSILON, Rect, Size, UNIT_CANVAS};
pub use foundation::error::{CtxmapError, CtxmapResult, Side};
pub use layout::check::{PartitionAudit, audit};
pub use layout::{LayoutMode, LayoutOptions, Region, layout, layout_with};
pub use model::item::{ItemKind, UNUSED_ID, WeightedItem};
pub use model::resource::{PoolItem, ResourcePool};
pub use model::snapshot::ContextSnapshot;
pub use session::editor::{EditSession, InteractionMode, SessionEvent, WeightEdit};
