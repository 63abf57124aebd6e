use farview_geom::{Cube, GridPos, range_to_step};

/// Maximum supported LOD step; also bounds the octree height so
/// `tree_size` stays representable.
pub const FAR_STEP_MAX: u8 = 12;

/// Octree sizing derived once per query set from the configured far-mesh
/// extent. The root is re-anchored on the (aligned) viewpoint every time so
/// the viewpoint stays near its center regardless of drift.
#[derive(Clone, Copy, Debug)]
pub struct TreeParams {
    pub tree_pow: u8,
    pub tree_size: i32,
    pub tree_align: u8,
    pub tree_align_size: i32,
    pub external_pow: u8,
}

impl TreeParams {
    pub fn new(farmesh: i32) -> Self {
        let tree_pow = range_to_step(farmesh).saturating_sub(1).min(FAR_STEP_MAX);
        let tree_align = tree_pow.saturating_sub(1);
        Self {
            tree_pow,
            tree_size: 1 << tree_pow,
            tree_align,
            tree_align_size: 1 << tree_align,
            external_pow: tree_pow.saturating_sub(2),
        }
    }

    /// Root cube anchored at the viewpoint. With `two_d` the Y origin is the
    /// given fixed plane instead of the aligned viewpoint Y.
    pub fn root(&self, viewpoint: GridPos, two_d: Option<i32>) -> Cube {
        let half = self.tree_align_size >> 1;
        let aligned = viewpoint.align_down(self.tree_align);
        let mut pos = aligned.offset(-half, -half, -half);
        if let Some(y) = two_d {
            pos.y = y;
        }
        Cube::new(pos, self.tree_size)
    }
}
