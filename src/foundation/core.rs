pub use kurbo::{Rect, Size};

/// Absolute tolerance for area checks on the unit canvas (total area 1.0).
pub const AREA_EPSILON: f64 = 1e-9;

/// The canonical canvas every layout covers.
pub const UNIT_CANVAS: Rect = Rect {
    x0: 0.0,
    y0: 0.0,
    x1: 1.0,
    y1: 1.0,
};

/// Fraction of `capacity` taken by `weight`. `capacity` must be > 0.
pub(crate) fn share(weight: u64, capacity: u64) -> f64 {
    weight as f64 / capacity as f64
}

pub(crate) fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

/// `true` when the interiors of `a` and `b` intersect by more than `eps` along both axes.
pub(crate) fn interiors_overlap(a: Rect, b: Rect, eps: f64) -> bool {
    let i = a.intersect(b);
    i.width() > eps && i.height() > eps
}

/// `true` when `inner` lies inside `outer`, edges allowed to touch within `eps`.
pub(crate) fn contains_rect(outer: Rect, inner: Rect, eps: f64) -> bool {
    inner.x0 >= outer.x0 - eps
        && inner.y0 >= outer.y0 - eps
        && inner.x1 <= outer.x1 + eps
        && inner.y1 <= outer.y1 + eps
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
