use crate::{
    foundation::core::{
        AREA_EPSILON, UNIT_CANVAS, approx_eq, contains_rect, interiors_overlap, share,
    },
    foundation::error::{CtxmapError, CtxmapResult},
    layout::Region,
};

/// Re-derive every region's area from its weight and fail if geometry drifted.
///
/// Checks, within [`AREA_EPSILON`]: finite non-negative dimensions, each area
/// equal to `weight / capacity`, and total area equal to the unit canvas.
/// A failure here is a bug in a layout mode, never bad input.
pub(crate) fn verify_conservation(regions: &[Region], capacity: u64) -> CtxmapResult<()> {
    let mut total_area = 0.0;
    for region in regions {
        let dims = [region.x, region.y, region.width, region.height];
        if dims.iter().any(|v| !v.is_finite()) || region.width < 0.0 || region.height < 0.0 {
            return Err(CtxmapError::invariant(format!(
                "region '{}' has invalid dimensions {}x{} at ({}, {})",
                region.item_id, region.width, region.height, region.x, region.y
            )));
        }
        if !contains_rect(UNIT_CANVAS, region.to_rect(), AREA_EPSILON) {
            return Err(CtxmapError::invariant(format!(
                "region '{}' leaves the unit canvas",
                region.item_id
            )));
        }

        let expected = share(region.weight, capacity);
        let area = region.area();
        if !approx_eq(area, expected, AREA_EPSILON) {
            return Err(CtxmapError::invariant(format!(
                "region '{}' covers {area} of the canvas, expected {expected}",
                region.item_id
            )));
        }
        total_area += area;
    }

    if !approx_eq(total_area, UNIT_CANVAS.area(), AREA_EPSILON) {
        return Err(CtxmapError::invariant(format!(
            "regions cover {total_area} of the unit canvas"
        )));
    }
    Ok(())
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
/// Geometric health report over a finished layout.
pub struct PartitionAudit {
    /// Sum of region areas.
    pub covered_area: f64,
    /// Index pairs `(i, j)`, `i < j`, whose interiors intersect.
    pub overlapping_pairs: Vec<(usize, usize)>,
    /// Indices of regions reaching outside the unit canvas.
    pub out_of_bounds: Vec<usize>,
}

impl PartitionAudit {
    /// `true` when regions tile the unit canvas exactly (within [`AREA_EPSILON`]).
    pub fn is_clean(&self) -> bool {
        self.overlapping_pairs.is_empty()
            && self.out_of_bounds.is_empty()
            && approx_eq(self.covered_area, UNIT_CANVAS.area(), AREA_EPSILON)
    }
}

/// Pairwise overlap and bounds audit of `regions`.
///
/// Quadratic in the region count; meant for debugging renderers and tests,
/// not for the layout hot path.
pub fn audit(regions: &[Region]) -> PartitionAudit {
    let rects: Vec<_> = regions.iter().map(Region::to_rect).collect();
    let mut audit = PartitionAudit {
        covered_area: regions.iter().map(Region::area).sum(),
        ..PartitionAudit::default()
    };

    for (i, a) in rects.iter().enumerate() {
        if !contains_rect(UNIT_CANVAS, *a, AREA_EPSILON) {
            audit.out_of_bounds.push(i);
        }
        for (j, b) in rects.iter().enumerate().skip(i + 1) {
            if interiors_overlap(*a, *b, AREA_EPSILON) {
                audit.overlapping_pairs.push((i, j));
            }
        }
    }
    audit
}

#[cfg(test)]
#[path = "../../tests/unit/layout/check.rs"]
mod tests;
