//! Voxel, far-block, and content-registry crate.
#![forbid(unsafe_code)]

pub mod codec;
pub mod registry;
pub mod types;

pub use codec::{CodecError, SER_VERSION, SER_VERSION_INVALID};
pub use registry::ContentRegistry;
pub use types::{FAR_BLOCK_POW, FAR_BLOCK_SIZE, FarBlock, Voxel, block_pos_of};
