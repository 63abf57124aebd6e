use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Largest shift any configured power may take; keeps every
/// `size << (1 + pow)` in the engine inside `i32`.
const MAX_POW: u8 = 8;

/// Renderer-supplied draw configuration. Read-only to the engine.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct DrawConfig {
    /// Legacy linear LOD ladder: 0 disables, magnitude scales the thresholds.
    #[serde(default)]
    pub lodmesh: i32,
    /// Total far-mesh extent in grid cells; 0 disables octree LOD.
    #[serde(default)]
    pub farmesh: i32,
    /// log2 of how aggressively detail coarsens with distance.
    #[serde(default = "default_quality_pow")]
    pub farmesh_quality_pow: u8,
    /// log2 size, in grid cells, of the smallest addressable LOD cell.
    #[serde(default = "default_cell_size_pow")]
    pub cell_size_pow: u8,
}

fn default_quality_pow() -> u8 {
    1
}

fn default_cell_size_pow() -> u8 {
    2
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            lodmesh: 0,
            farmesh: 0,
            farmesh_quality_pow: default_quality_pow(),
            cell_size_pow: default_cell_size_pow(),
        }
    }
}

impl DrawConfig {
    pub fn new(farmesh: i32, cell_size_pow: u8, farmesh_quality_pow: u8) -> Self {
        Self {
            lodmesh: 0,
            farmesh,
            farmesh_quality_pow,
            cell_size_pow,
        }
        .sanitized()
    }

    /// Clamp degenerate values at construction; queries never fail on them.
    pub fn sanitized(mut self) -> Self {
        self.farmesh = self.farmesh.max(0);
        self.lodmesh = self.lodmesh.max(0);
        self.farmesh_quality_pow = self.farmesh_quality_pow.min(MAX_POW);
        self.cell_size_pow = self.cell_size_pow.min(MAX_POW);
        self
    }

    #[inline]
    pub fn cell_size(&self) -> i32 {
        1 << self.cell_size_pow
    }

    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: DrawConfig = toml::from_str(s)?;
        Ok(cfg.sanitized())
    }

    pub fn load_from_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }
}
