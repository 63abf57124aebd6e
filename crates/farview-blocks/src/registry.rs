use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::types::Voxel;

#[derive(Clone, Debug, Deserialize)]
pub struct ContentsConfig {
    #[serde(default)]
    pub contents: Vec<ContentDef>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ContentDef {
    pub name: String,
    pub id: Option<u16>,
}

/// Name -> content id mapping for generator output.
///
/// Id 0 is always `air`; unknown names resolve to it.
#[derive(Clone, Debug)]
pub struct ContentRegistry {
    by_name: HashMap<String, u16>,
}

impl ContentRegistry {
    /// Built-in content set used when no config file is supplied.
    pub fn with_defaults() -> Self {
        let mut by_name = HashMap::new();
        for (i, name) in ["air", "stone", "grass", "sand", "snow", "water", "ice"]
            .iter()
            .enumerate()
        {
            by_name.insert((*name).to_string(), i as u16);
        }
        Self { by_name }
    }

    pub fn from_config(cfg: ContentsConfig) -> Self {
        let mut reg = Self::with_defaults();
        let mut next_id = reg.by_name.len() as u16;
        for def in cfg.contents {
            let id = def.id.unwrap_or_else(|| {
                let id = next_id;
                next_id += 1;
                id
            });
            reg.by_name.entry(def.name).or_insert(id);
        }
        reg
    }

    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: ContentsConfig = toml::from_str(s)?;
        Ok(Self::from_config(cfg))
    }

    pub fn load_from_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    #[inline]
    pub fn id_by_name(&self, name: &str) -> Option<u16> {
        self.by_name.get(name).copied()
    }

    /// Resolve a name, falling back to air for unknown content.
    #[inline]
    pub fn resolve(&self, name: &str) -> u16 {
        self.id_by_name(name).unwrap_or(Voxel::AIR.id)
    }

    #[inline]
    pub fn voxel(&self, name: &str) -> Voxel {
        Voxel::new(self.resolve(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reserve_zero_for_air() {
        let reg = ContentRegistry::with_defaults();
        assert_eq!(reg.resolve("air"), 0);
        assert_ne!(reg.resolve("stone"), 0);
        assert_eq!(reg.resolve("no_such_thing"), 0);
    }

    #[test]
    fn config_extends_defaults() {
        let reg = ContentRegistry::from_toml_str(
            r#"
            [[contents]]
            name = "basalt"

            [[contents]]
            name = "gravel"
            id = 40
        "#,
        )
        .unwrap();
        assert!(reg.id_by_name("basalt").is_some());
        assert_eq!(reg.id_by_name("gravel"), Some(40));
        // Defaults survive.
        assert_eq!(reg.resolve("air"), 0);
        assert!(reg.id_by_name("water").is_some());
    }
}
