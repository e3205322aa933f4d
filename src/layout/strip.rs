use crate::{
    foundation::core::share,
    layout::{Region, Slot},
};

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

/// Full-height columns, left to right.
pub(crate) fn horizontal(slots: &[Slot<'_>], capacity: u64) -> Vec<Region> {
    stack(slots, capacity, Axis::X)
}

/// Full-width rows, top to bottom.
pub(crate) fn vertical(slots: &[Slot<'_>], capacity: u64) -> Vec<Region> {
    stack(slots, capacity, Axis::Y)
}

fn stack(slots: &[Slot<'_>], capacity: u64, axis: Axis) -> Vec<Region> {
    // Edges come from integer prefix sums so neighbours share an exact boundary
    // and the last edge lands on 1.0 when the slots fill capacity.
    let mut prefix = 0u64;
    slots
        .iter()
        .map(|slot| {
            let start = share(prefix, capacity);
            prefix += slot.weight;
            let extent = share(prefix, capacity) - start;
            match axis {
                Axis::X => slot.region(start, 0.0, extent, 1.0),
                Axis::Y => slot.region(0.0, start, 1.0, extent),
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/layout/strip.rs"]
mod tests;
