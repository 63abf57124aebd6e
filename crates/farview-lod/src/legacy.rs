//! Pre-octree step heuristics, kept as independently selectable strategies.
//!
//! Their numeric outputs are not guaranteed to match the octree query;
//! configuration decides which estimator a renderer uses.

use farview_geom::{GridPos, range_to_step};

use crate::config::DrawConfig;
use crate::tree::FAR_STEP_MAX;

/// Iterative range-shrinking ladder.
///
/// Halves the Chebyshev range, derives a provisional step, re-measures the
/// range between step-aligned endpoints, and re-derives. Returns 1, not 0,
/// for near targets; callers opting into this estimator accept that floor.
pub fn far_step_legacy(config: &DrawConfig, viewpoint: GridPos, target: GridPos) -> u8 {
    if config.farmesh == 0 {
        return 1;
    }

    const NEXT_STEP: u8 = 1;
    let range = viewpoint.chebyshev(target) >> NEXT_STEP;
    if range <= 1 {
        return 1;
    }

    let mut skip = range_to_step(range);
    let realigned = viewpoint
        .align_down(skip)
        .chebyshev(target.align_down(skip))
        >> (NEXT_STEP + config.cell_size_pow);
    if realigned > 1 {
        skip = range_to_step(realigned);
    }
    skip.min(FAR_STEP_MAX)
}

/// Linear-threshold ladder over configured cell multiples, used when the
/// legacy `lodmesh` mode is enabled instead of the octree far mesh.
pub fn lod_step(config: &DrawConfig, viewpoint: GridPos, target: GridPos) -> u8 {
    if config.lodmesh == 0 {
        return 0;
    }
    let range = viewpoint.chebyshev(target);
    let cells = (config.cell_size() << 1).max(config.lodmesh >> config.cell_size_pow);

    if range >= cells + config.lodmesh * 4 {
        4
    } else if range >= cells + config.lodmesh * 2 {
        3
    } else if range >= cells + config.lodmesh {
        2
    } else if range >= cells {
        1
    } else {
        0
    }
}
