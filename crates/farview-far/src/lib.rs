//! Far block access: resolve world positions to voxels at the right LOD,
//! coordinating per-worker caches, shared storage, persistent stores, and
//! the procedural fallback.
#![forbid(unsafe_code)]

mod access;
mod seed;
mod storage;
mod worker;

pub use access::FarAccess;
pub use seed::{SeedStats, seed_area};
pub use storage::{FarBlockStorage, FarBlockStorageStats};
pub use worker::FarWorkerCtx;
