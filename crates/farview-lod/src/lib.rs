//! Far-mesh LOD selection: octree point queries, full-volume enumeration,
//! and the legacy distance-ladder heuristics.
#![forbid(unsafe_code)]

mod config;
mod each;
mod legacy;
mod query;
mod tree;

pub use config::DrawConfig;
pub use each::{EachParams, Walk, each, run_far_all};
pub use legacy::{far_step_legacy, lod_step};
pub use query::{
    FindParams, LodResult, far_actual_block_pos, far_params, far_step, find, in_far_grid,
    player_block_align,
};
pub use tree::{FAR_STEP_MAX, TreeParams};
