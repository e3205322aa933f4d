//! # ctxmap guide
//!
//! A standalone walkthrough of what ctxmap computes and which invariants callers
//! (renderers, tracers, notebook hosts) can rely on.
//!
//! ---
//!
//! ## Core concepts
//!
//! - [`WeightedItem`](crate::WeightedItem): one context component (`id`, token `weight`, [`ItemKind`](crate::ItemKind))
//! - [`ContextSnapshot`](crate::ContextSnapshot): a capacity plus ordered items; the JSON input record
//! - [`Region`](crate::Region): a normalized rectangle for one item, or for unused capacity
//! - [`FlowGraph`](crate::FlowGraph): before/after edges with conserved totals
//!
//! Token counting is not part of ctxmap. Weights arrive as integers.
//!
//! ---
//!
//! ## Layout
//!
//! [`layout`](crate::layout()) partitions the unit canvas `[0,1] × [0,1]`:
//!
//! - every input item gets exactly one region, in input order, even at weight 0
//! - when `Σ weight < capacity`, one more region with id [`UNUSED_ID`](crate::UNUSED_ID)
//!   covers `(capacity - Σ weight) / capacity` of the canvas
//! - `Σ weight > capacity` fails with [`CtxmapError::CapacityExceeded`](crate::CtxmapError::CapacityExceeded)
//!
//! Modes ([`LayoutMode`](crate::LayoutMode)):
//!
//! - `Horizontal`: full-height columns, widths `weight / capacity`, left to right
//! - `Vertical`: the same, transposed
//! - `Treemap`: squarified treemap. Items are stably sorted by weight (largest
//!   first), unused capacity is appended last so it ends up as the residual
//!   background region, and strips are grown along the shorter side while the
//!   worst aspect ratio `max(s²·max/sum², sum²/(s²·min))` does not increase.
//!   [`LayoutOptions::aspect_ratio`](crate::LayoutOptions::aspect_ratio) squarifies
//!   against the real viewport shape; output stays normalized.
//!
//! Every layout re-checks area conservation against the input weights with
//! [`AREA_EPSILON`](crate::AREA_EPSILON) before returning. A failure surfaces as
//! [`CtxmapError::LayoutInvariantViolation`](crate::CtxmapError::LayoutInvariantViolation),
//! which always indicates a bug ([`CtxmapError::is_internal`](crate::CtxmapError::is_internal)).
//! [`audit`](crate::audit) additionally checks pairwise overlap, which is too
//! expensive for the hot path.
//!
//! ---
//!
//! ## Diff
//!
//! [`diff`](crate::diff()) matches items by id only:
//!
//! | before | after | status |
//! |---|---|---|
//! | `w` | `w` | `Unchanged` |
//! | `w` | `< w` | `Shrunk` |
//! | `w` | `> w` | `Grown` |
//! | `w` | absent | `Removed` (weight goes to the waste sink) |
//! | absent | `w` | `Added` |
//!
//! Edges keep `before` order, then list added items in `after` order, so a
//! renderer's bands do not reshuffle when the same baseline is compared against
//! different results. Totals are integer sums and conserved exactly.
//! A repeated id within one side fails with
//! [`CtxmapError::DuplicateIdentity`](crate::CtxmapError::DuplicateIdentity).
//!
//! ---
//!
//! ## Putting it together
//!
//! ```
//! use ctxmap::{ContextSnapshot, ItemKind, LayoutMode, WeightedItem};
//!
//! let before = ContextSnapshot::new(
//!     128_000,
//!     vec![
//!         WeightedItem::new("history", 20_000, ItemKind::ChatHistory),
//!         WeightedItem::new("rag", 15_000, ItemKind::Rag),
//!     ],
//! );
//! let after = ContextSnapshot::new(
//!     128_000,
//!     vec![WeightedItem::new("history", 8_000, ItemKind::ChatHistory)],
//! );
//!
//! let regions = ctxmap::layout(&before.items, before.capacity, LayoutMode::Treemap)?;
//! assert_eq!(regions.len(), 3);
//!
//! let flow = ctxmap::diff(&before.items, &after.items)?;
//! assert_eq!(flow.waste_total, 15_000);
//! # Ok::<(), ctxmap::CtxmapError>(())
//! ```
