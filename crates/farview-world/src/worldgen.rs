use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default)]
    pub height: Height,
    #[serde(default)]
    pub water: Water,
    #[serde(default)]
    pub climate: Climate,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Height {
    #[serde(default = "default_height_freq")]
    pub frequency: f32,
    #[serde(default = "default_height_scale")]
    pub scale: f32,
    #[serde(default)]
    pub offset: f32,
}
fn default_height_freq() -> f32 {
    0.01
}
fn default_height_scale() -> f32 {
    120.0
}
impl Default for Height {
    fn default() -> Self {
        Self {
            frequency: default_height_freq(),
            scale: default_height_scale(),
            offset: 0.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Water {
    #[serde(default)]
    pub level: i32,
}
impl Default for Water {
    fn default() -> Self {
        Self { level: 0 }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Climate {
    #[serde(default = "default_base_heat")]
    pub base_heat: i32,
    /// Grid units of altitude per degree of cooling.
    #[serde(default = "default_heat_lapse")]
    pub heat_lapse: i32,
    #[serde(default = "default_humidity")]
    pub humidity: i32,
}
fn default_base_heat() -> i32 {
    10
}
fn default_heat_lapse() -> i32 {
    100
}
fn default_humidity() -> i32 {
    60
}
impl Default for Climate {
    fn default() -> Self {
        Self {
            base_heat: default_base_heat(),
            heat_lapse: default_heat_lapse(),
            humidity: default_humidity(),
        }
    }
}

impl WorldGenConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(s)?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }
}

/// Runtime worldgen parameters resolved from [`WorldGenConfig`].
#[derive(Clone, Debug)]
pub struct WorldGenParams {
    pub height_frequency: f32,
    pub height_scale: f32,
    pub height_offset: f32,
    pub water_level: i32,
    pub base_heat: i32,
    pub heat_lapse: i32,
    pub humidity: i32,
}

impl Default for WorldGenParams {
    fn default() -> Self {
        Self::from_config(&WorldGenConfig::default())
    }
}

impl WorldGenParams {
    pub fn from_config(cfg: &WorldGenConfig) -> Self {
        Self {
            height_frequency: cfg.height.frequency,
            height_scale: cfg.height.scale,
            height_offset: cfg.height.offset,
            water_level: cfg.water.level,
            base_heat: cfg.climate.base_heat,
            heat_lapse: cfg.climate.heat_lapse.max(1),
            humidity: cfg.climate.humidity,
        }
    }
}
