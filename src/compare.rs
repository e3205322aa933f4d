use crate::{
    diff::engine::{DiffLabels, diff},
    diff::flow::FlowGraph,
    foundation::error::CtxmapResult,
    layout::{LayoutOptions, Region, layout_with},
    model::snapshot::ContextSnapshot,
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Settings for [`compare`].
pub struct CompareOptions {
    /// Layout used for both columns.
    #[serde(default)]
    pub layout: LayoutOptions,
    /// Run both layouts and the diff on the rayon pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_parallel() -> bool {
    true
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            layout: LayoutOptions::default(),
            parallel: default_parallel(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Everything a side-by-side before/after view needs.
pub struct Comparison {
    /// Pass-through column titles.
    pub labels: DiffLabels,
    /// Geometry of the before snapshot.
    pub before_regions: Vec<Region>,
    /// Geometry of the after snapshot.
    pub after_regions: Vec<Region>,
    /// Identity-matched flow between the two.
    pub flow: FlowGraph,
}

/// Column titles taken from the snapshots' own labels, falling back to the defaults.
pub fn labels_for(before: &ContextSnapshot, after: &ContextSnapshot) -> DiffLabels {
    let defaults = DiffLabels::default();
    DiffLabels {
        before: before.label.clone().unwrap_or(defaults.before),
        after: after.label.clone().unwrap_or(defaults.after),
    }
}

/// Lay out both snapshots and diff them.
///
/// None of the three computations reads another's output, so with
/// `opts.parallel` they run concurrently. Errors are reported in the order
/// before layout, after layout, diff; no partial result is returned.
#[tracing::instrument(skip_all, fields(mode = ?opts.layout.mode, parallel = opts.parallel))]
pub fn compare(
    before: &ContextSnapshot,
    after: &ContextSnapshot,
    labels: DiffLabels,
    opts: &CompareOptions,
) -> CtxmapResult<Comparison> {
    let lay =
        |snapshot: &ContextSnapshot| layout_with(&snapshot.items, snapshot.capacity, &opts.layout);

    let ((before_regions, after_regions), flow) = if opts.parallel {
        rayon::join(
            || rayon::join(|| lay(before), || lay(after)),
            || diff(&before.items, &after.items),
        )
    } else {
        ((lay(before), lay(after)), diff(&before.items, &after.items))
    };

    Ok(Comparison {
        labels,
        before_regions: before_regions?,
        after_regions: after_regions?,
        flow: flow?,
    })
}

#[cfg(test)]
#[path = "../tests/unit/compare.rs"]
mod tests;
