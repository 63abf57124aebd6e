//! Procedural fallback content for far terrain.
#![forbid(unsafe_code)]

pub mod worldgen;

mod world;

pub use world::{GenCtx, World};
pub use worldgen::{WorldGenConfig, WorldGenParams};
