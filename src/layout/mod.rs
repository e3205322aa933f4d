//! Weighted partition layout.
//!
//! Turns an ordered set of [`WeightedItem`]s plus a capacity into regions of the
//! unit canvas whose areas are proportional to the items' share of capacity.
//! Free capacity becomes one extra region with the reserved [`UNUSED_ID`].

pub mod check;
pub mod strip;
pub mod treemap;

use crate::{
    foundation::core::Rect,
    foundation::error::{CtxmapError, CtxmapResult},
    model::item::{ItemKind, UNUSED_ID, WeightedItem, ensure_no_reserved_id, total_weight},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Geometry used to partition the canvas.
pub enum LayoutMode {
    /// Full-height columns packed left to right in input order.
    #[default]
    Horizontal,
    /// Full-width rows stacked top to bottom in input order.
    Vertical,
    /// Squarified treemap, largest items first.
    Treemap,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Per-call layout settings.
pub struct LayoutOptions {
    /// Partition geometry.
    #[serde(default)]
    pub mode: LayoutMode,
    /// Width / height of the viewport the regions will be drawn into.
    ///
    /// Only the treemap uses it, to keep regions square in the final drawing.
    /// Output coordinates stay normalized to `[0, 1]` on both axes.
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: f64,
}

fn default_aspect_ratio() -> f64 {
    1.0
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            mode: LayoutMode::default(),
            aspect_ratio: default_aspect_ratio(),
        }
    }
}

impl LayoutOptions {
    /// Options for `mode` with a square viewport.
    pub fn new(mode: LayoutMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Set the viewport aspect ratio (width / height).
    pub fn with_aspect_ratio(mut self, aspect_ratio: f64) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Reject non-finite or non-positive aspect ratios.
    pub fn validate(&self) -> CtxmapResult<()> {
        if !self.aspect_ratio.is_finite() || self.aspect_ratio <= 0.0 {
            return Err(CtxmapError::validation(
                "layout aspect_ratio must be finite and > 0",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A normalized rectangle mapped 1:1 to an input item or to unused capacity.
pub struct Region {
    /// Id of the source item, or [`UNUSED_ID`].
    pub item_id: String,
    /// Kind of the source item; `None` for unused capacity.
    pub kind: Option<ItemKind>,
    /// Token count the region stands for.
    pub weight: u64,
    /// Left edge in `[0, 1]`.
    pub x: f64,
    /// Top edge in `[0, 1]`.
    pub y: f64,
    /// Width in `[0, 1]`.
    pub width: f64,
    /// Height in `[0, 1]`.
    pub height: f64,
}

impl Region {
    /// `width * height`.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// `true` for the synthetic unused-capacity region.
    pub fn is_unused(&self) -> bool {
        self.kind.is_none() && self.item_id == UNUSED_ID
    }

    /// The region as a [`kurbo::Rect`].
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Longer side over shorter side; `None` for degenerate regions.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some((self.width / self.height).max(self.height / self.width))
    }
}

/// One entry of the sequence a layout mode partitions: an input item or unused capacity.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Slot<'a> {
    pub(crate) id: &'a str,
    pub(crate) kind: Option<ItemKind>,
    pub(crate) weight: u64,
}

impl Slot<'_> {
    pub(crate) fn is_unused(&self) -> bool {
        self.kind.is_none()
    }

    pub(crate) fn region(&self, x: f64, y: f64, width: f64, height: f64) -> Region {
        Region {
            item_id: self.id.to_string(),
            kind: self.kind,
            weight: self.weight,
            x,
            y,
            width,
            height,
        }
    }
}

/// Lay out `items` against `capacity` with default options for `mode`.
///
/// Returns one region per item in input order, followed by the unused region
/// when the items leave capacity free.
pub fn layout(
    items: &[WeightedItem],
    capacity: u64,
    mode: LayoutMode,
) -> CtxmapResult<Vec<Region>> {
    layout_with(items, capacity, &LayoutOptions::new(mode))
}

#[tracing::instrument(skip(items), fields(items = items.len()))]
/// Lay out `items` against `capacity` with explicit options.
pub fn layout_with(
    items: &[WeightedItem],
    capacity: u64,
    opts: &LayoutOptions,
) -> CtxmapResult<Vec<Region>> {
    opts.validate()?;
    let slots = slots_for(items, capacity)?;

    let regions = match opts.mode {
        LayoutMode::Horizontal => strip::horizontal(&slots, capacity),
        LayoutMode::Vertical => strip::vertical(&slots, capacity),
        LayoutMode::Treemap => treemap::squarify(&slots, capacity, opts.aspect_ratio),
    };

    check::verify_conservation(&regions, capacity)?;
    Ok(regions)
}

/// Input items in order, plus the unused pseudo-item when capacity is left free.
pub(crate) fn slots_for(items: &[WeightedItem], capacity: u64) -> CtxmapResult<Vec<Slot<'_>>> {
    if capacity == 0 {
        return Err(CtxmapError::validation("layout capacity must be > 0"));
    }
    ensure_no_reserved_id(items)?;

    // An overflowing sum is larger than any capacity.
    let total = total_weight(items).ok_or(CtxmapError::CapacityExceeded {
        total: u64::MAX,
        capacity,
    })?;
    if total > capacity {
        return Err(CtxmapError::CapacityExceeded { total, capacity });
    }

    let mut slots = Vec::with_capacity(items.len() + 1);
    slots.extend(items.iter().map(|item| Slot {
        id: item.id.as_str(),
        kind: Some(item.kind),
        weight: item.weight,
    }));
    if total < capacity {
        slots.push(Slot {
            id: UNUSED_ID,
            kind: None,
            weight: capacity - total,
        });
    }
    Ok(slots)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/mod.rs"]
mod tests;
