use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use farview_blocks::FarBlock;
use farview_geom::GridPos;
use farview_lod::FAR_STEP_MAX;
use hashbrown::HashMap;

#[derive(Clone, Copy, Debug, Default)]
pub struct FarBlockStorageStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Shared in-memory far blocks, one map per detail step.
///
/// Populated by loading subsystems (seeding, network, tests); read
/// concurrently by every rendering worker. Blocks are reference-counted so a
/// worker's cache slot stays valid across concurrent replacement.
pub struct FarBlockStorage {
    steps: Vec<RwLock<HashMap<GridPos, Arc<FarBlock>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for FarBlockStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl FarBlockStorage {
    pub fn new() -> Self {
        Self {
            steps: (0..usize::from(FAR_STEP_MAX))
                .map(|_| RwLock::new(HashMap::new()))
                .collect(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, step: u8, pos: GridPos) -> Option<Arc<FarBlock>> {
        let found = self
            .steps
            .get(usize::from(step))
            .and_then(|map| map.read().ok().and_then(|m| m.get(&pos).cloned()));
        match &found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    pub fn insert(&self, step: u8, pos: GridPos, block: Arc<FarBlock>) {
        if let Some(map) = self.steps.get(usize::from(step)) {
            if let Ok(mut m) = map.write() {
                m.insert(pos, block);
            }
        }
    }

    pub fn remove(&self, step: u8, pos: GridPos) -> Option<Arc<FarBlock>> {
        self.steps
            .get(usize::from(step))
            .and_then(|map| map.write().ok().and_then(|mut m| m.remove(&pos)))
    }

    pub fn snapshot(&self) -> FarBlockStorageStats {
        FarBlockStorageStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self
                .steps
                .iter()
                .map(|map| map.read().map(|m| m.len()).unwrap_or(0))
                .sum(),
        }
    }
}
