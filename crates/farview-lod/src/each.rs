use farview_geom::{Cube, GridPos, range_to_step};

use crate::query::{LodResult, far_enough};
use crate::tree::TreeParams;

/// Per-leaf traversal control.
///
/// `SkipSiblings` stops enumerating further siblings at the recursion level
/// the leaf was emitted on; branches already entered above are unaffected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Walk {
    Continue,
    SkipSiblings,
}

/// Inputs for one full-volume traversal.
#[derive(Clone, Copy, Debug)]
pub struct EachParams {
    pub viewpoint: GridPos,
    pub cell_size_pow: u8,
    pub farmesh_quality_pow: u8,
    pub cell_each: bool,
    /// Column mode: visit only the four octants sharing the parent Y plane.
    pub two_d: bool,
}

impl EachParams {
    fn result(&self, node: Cube) -> LodResult {
        let shift = if self.cell_each { 0 } else { self.cell_size_pow };
        LodResult {
            pos: node.pos,
            size: node.size >> shift,
            step: range_to_step(node.size >> self.cell_size_pow),
        }
    }
}

/// Visit every leaf under `node`, partitioning its volume exactly.
///
/// A node far enough from the viewpoint, or already at one LOD cell, is
/// emitted whole; anything else recurses into all octants (or the lower four
/// in 2-D mode). The returned [`Walk`] is the callback's verdict when this
/// call emitted a leaf, so the caller can stop its sibling loop.
pub fn each(
    param: &EachParams,
    node: Cube,
    func: &mut dyn FnMut(&LodResult) -> Walk,
) -> Walk {
    let at_cell = node.size <= 1 << param.cell_size_pow;
    if at_cell
        || far_enough(
            param.viewpoint,
            node,
            param.cell_size_pow,
            param.farmesh_quality_pow,
        )
    {
        return func(&param.result(node));
    }

    let children = node.children_2d_first();
    let visit = if param.two_d { &children[..4] } else { &children[..] };
    for child in visit {
        if each(param, *child, func) == Walk::SkipSiblings {
            break;
        }
    }
    Walk::Continue
}

/// Enumerate every leaf of the far tree around `viewpoint`.
///
/// `two_d` pins the root's Y origin and restricts traversal to one layer of
/// octants per level (column-based LOD instead of volumetric).
pub fn run_far_all(
    viewpoint: GridPos,
    cell_size_pow: u8,
    farmesh: i32,
    farmesh_quality_pow: u8,
    two_d: Option<i32>,
    cell_each: bool,
    func: &mut dyn FnMut(&LodResult) -> Walk,
) {
    if farmesh <= 0 {
        return;
    }
    let tree = TreeParams::new(farmesh);
    let root = tree.root(viewpoint, two_d);
    each(
        &EachParams {
            viewpoint,
            cell_size_pow,
            farmesh_quality_pow,
            cell_each,
            two_d: two_d.is_some(),
        },
        root,
        func,
    );
}
