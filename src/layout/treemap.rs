//! Squarified treemap (Bruls, Huizing, van Wijk).
//!
//! Items are sorted largest first and packed into strips along the shorter side
//! of the remaining rectangle. A strip keeps growing while the worst aspect
//! ratio of its members does not get worse. The loop is a flat worklist over
//! the sorted order, so depth never grows with the item count.

use crate::{
    foundation::core::{Rect, share},
    layout::{Region, Slot},
};

/// Running statistics of the strip being grown.
#[derive(Clone, Copy, Debug)]
struct RowStats {
    sum: f64,
    min: f64,
    max: f64,
}

impl RowStats {
    fn start(area: f64) -> Self {
        Self {
            sum: area,
            min: area,
            max: area,
        }
    }

    fn with(self, area: f64) -> Self {
        Self {
            sum: self.sum + area,
            min: self.min.min(area),
            max: self.max.max(area),
        }
    }

    /// `max(s²·max/sum², sum²/(s²·min))` for a strip laid along a side of length `side`.
    fn worst(self, side: f64) -> f64 {
        if side <= 0.0 || self.sum <= 0.0 || self.min <= 0.0 {
            return f64::INFINITY;
        }
        let side_sq = side * side;
        let sum_sq = self.sum * self.sum;
        ((side_sq * self.max) / sum_sq).max(sum_sq / (side_sq * self.min))
    }
}

/// Squarify `slots` into an `aspect × 1` rectangle and normalize back to the unit canvas.
///
/// Regions come back in slot order, not placement order.
pub(crate) fn squarify(slots: &[Slot<'_>], capacity: u64, aspect: f64) -> Vec<Region> {
    let order = placement_order(slots);
    let areas: Vec<f64> = slots
        .iter()
        .map(|slot| share(slot.weight, capacity) * aspect)
        .collect();

    let mut placed = vec![Rect::ZERO; slots.len()];
    let mut cell = Rect::new(0.0, 0.0, aspect, 1.0);
    let mut cursor = 0usize;
    let mut rows = 0usize;

    while cursor < order.len() {
        let first = order[cursor];
        if areas[first] <= 0.0 {
            placed[first] = Rect::new(cell.x0, cell.y0, cell.x0, cell.y0);
            cursor += 1;
            continue;
        }

        let side = cell.width().min(cell.height());
        let mut row = RowStats::start(areas[first]);
        let mut end = cursor + 1;
        while end < order.len() {
            let next = areas[order[end]];
            if next <= 0.0 {
                break;
            }
            let grown = row.with(next);
            if grown.worst(side) > row.worst(side) {
                break;
            }
            row = grown;
            end += 1;
        }

        let last = order[end..].iter().all(|&idx| areas[idx] <= 0.0);
        cell = place_row(&order[cursor..end], &areas, row.sum, cell, last, &mut placed);
        rows += 1;
        cursor = end;
    }

    tracing::debug!(items = slots.len(), rows, aspect, "squarified treemap");

    slots
        .iter()
        .zip(placed)
        .map(|(slot, r)| slot.region(r.x0 / aspect, r.y0, r.width() / aspect, r.height()))
        .collect()
}

/// Stable descending sort by weight, with unused capacity forced to the end.
fn placement_order(slots: &[Slot<'_>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..slots.len())
        .filter(|&idx| !slots[idx].is_unused())
        .collect();
    order.sort_by(|&a, &b| slots[b].weight.cmp(&slots[a].weight));
    order.extend((0..slots.len()).filter(|&idx| slots[idx].is_unused()));
    order
}

/// Place one strip against the shorter side of `cell` and return what is left.
///
/// The last member of a strip takes the remaining side length and the final
/// strip takes the remaining thickness, so rounding never leaves gaps.
fn place_row(
    row: &[usize],
    areas: &[f64],
    sum: f64,
    cell: Rect,
    last: bool,
    placed: &mut [Rect],
) -> Rect {
    let along_x = cell.width() <= cell.height();
    let (short, long) = if along_x {
        (cell.width(), cell.height())
    } else {
        (cell.height(), cell.width())
    };
    let thickness = if last || short <= 0.0 {
        long
    } else {
        (sum / short).min(long)
    };

    let mut offset = 0.0;
    for (pos, &idx) in row.iter().enumerate() {
        let length = if pos + 1 == row.len() {
            (short - offset).max(0.0)
        } else if thickness > 0.0 {
            (areas[idx] / thickness).min((short - offset).max(0.0))
        } else {
            0.0
        };
        placed[idx] = if along_x {
            Rect::new(
                cell.x0 + offset,
                cell.y0,
                cell.x0 + offset + length,
                cell.y0 + thickness,
            )
        } else {
            Rect::new(
                cell.x0,
                cell.y0 + offset,
                cell.x0 + thickness,
                cell.y0 + offset + length,
            )
        };
        offset += length;
    }

    if along_x {
        Rect::new(cell.x0, cell.y0 + thickness, cell.x1, cell.y1)
    } else {
        Rect::new(cell.x0 + thickness, cell.y0, cell.x1, cell.y1)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/treemap.rs"]
mod tests;
