use farview_geom::{Cube, GridPos, range_to_step};

use crate::config::DrawConfig;
use crate::tree::TreeParams;

/// A resolved LOD cell: aligned origin, edge length, and detail step.
///
/// `step` is `range_to_step` of the cell's edge length in LOD-cell units, so
/// it grows monotonically with the cell size and 0 means the finest
/// addressable cell. `size` is in raw grid units, or rescaled to cells when
/// the query ran with `cell_each == false`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LodResult {
    pub pos: GridPos,
    pub size: i32,
    pub step: u8,
}

/// Inputs for one recursive point query.
#[derive(Clone, Copy, Debug)]
pub struct FindParams {
    pub viewpoint: GridPos,
    pub target: GridPos,
    pub cell_size_pow: u8,
    pub farmesh_quality_pow: u8,
    pub cell_each: bool,
}

impl FindParams {
    fn result(&self, node: Cube) -> LodResult {
        let shift = if self.cell_each { 0 } else { self.cell_size_pow };
        LodResult {
            pos: node.pos,
            size: node.size >> shift,
            // Step 0 is the finest addressable cell, so the raw edge length
            // is measured in cells before quantizing.
            step: range_to_step(node.size >> self.cell_size_pow),
        }
    }
}

/// Chebyshev distance from the viewpoint to the node center, quantized down
/// to the active cell granularity so sub-cell viewpoint motion cannot flip
/// the decision.
#[inline]
pub(crate) fn quantized_distance(viewpoint: GridPos, node: Cube, cell_size_pow: u8) -> i32 {
    (viewpoint.chebyshev(node.center()) >> cell_size_pow) << cell_size_pow
}

/// The single coarsening rule: a node far enough from the viewpoint is
/// emitted whole instead of being subdivided.
#[inline]
pub(crate) fn far_enough(
    viewpoint: GridPos,
    node: Cube,
    cell_size_pow: u8,
    farmesh_quality_pow: u8,
) -> bool {
    let distance = quantized_distance(viewpoint, node, cell_size_pow);
    let threshold = node.size << (1 + farmesh_quality_pow.max(cell_size_pow));
    distance >= threshold
}

/// Recursive descent to the leaf covering `param.target`.
///
/// Exactly one branch is explored below the root, so the cost is linear in
/// the tree height. A target outside the root yields the root itself as a
/// coarse fallback; outside any deeper node it yields `None` for that branch.
pub fn find(param: &FindParams, node: Cube, depth: u16) -> Option<LodResult> {
    if !node.contains(param.target) {
        if depth == 0 {
            return Some(param.result(node));
        }
        return None;
    }

    if node.size <= 1 << param.cell_size_pow {
        return Some(param.result(node));
    }

    if far_enough(
        param.viewpoint,
        node,
        param.cell_size_pow,
        param.farmesh_quality_pow,
    ) {
        return Some(param.result(node));
    }

    for child in node.children() {
        if let Some(res) = find(param, child, depth + 1) {
            return Some(res);
        }
    }
    None
}

/// Resolve the LOD cell covering `target` for the given viewpoint.
///
/// Returns `None` when the octree far mesh is disabled.
pub fn far_params(
    config: &DrawConfig,
    viewpoint: GridPos,
    target: GridPos,
    cell_each: bool,
) -> Option<LodResult> {
    if config.farmesh <= 0 {
        return None;
    }
    let target_cell = target.align_down(config.cell_size_pow);
    let tree = TreeParams::new(config.farmesh);
    let root = tree.root(viewpoint, None);
    find(
        &FindParams {
            viewpoint,
            target: target_cell,
            cell_size_pow: config.cell_size_pow,
            farmesh_quality_pow: config.farmesh_quality_pow,
            cell_each,
        },
        root,
        0,
    )
}

/// Detail step for `target`, 0 when no result applies.
pub fn far_step(config: &DrawConfig, viewpoint: GridPos, target: GridPos) -> u8 {
    far_params(config, viewpoint, target, false)
        .map(|res| res.step)
        .unwrap_or(0)
}

/// Aligned origin of the LOD cell covering `target`; falls back to an
/// `external_pow` alignment straight from the tree parameters.
pub fn far_actual_block_pos(config: &DrawConfig, viewpoint: GridPos, target: GridPos) -> GridPos {
    if let Some(res) = far_params(config, viewpoint, target, false) {
        return res.pos;
    }
    let tree = TreeParams::new(config.farmesh);
    target.align_down(tree.external_pow)
}

/// Does `(blockpos, step)` exactly match the cell the query resolves to?
pub fn in_far_grid(config: &DrawConfig, viewpoint: GridPos, blockpos: GridPos, step: u8) -> bool {
    match far_params(config, viewpoint, blockpos, false) {
        Some(res) => res.pos == blockpos && res.step == step,
        None => false,
    }
}

/// Viewpoint snapped to the coarsest active grid, for stable cache keys.
pub fn player_block_align(config: &DrawConfig, viewpoint: GridPos) -> GridPos {
    let step_pow = config.cell_size_pow + config.farmesh_quality_pow;
    let nudge = i32::from(step_pow >> 1);
    viewpoint.align_down(step_pow).offset(nudge, nudge, nudge)
}
