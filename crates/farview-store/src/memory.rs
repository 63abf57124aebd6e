use std::io;
use std::sync::Mutex;

use farview_geom::GridPos;
use hashbrown::HashMap;

use crate::BlockStore;

/// Process-local store backend; blobs live in a locked map.
#[derive(Default)]
pub struct MemoryStore {
    blocks: Mutex<HashMap<GridPos, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blocks.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlockStore for MemoryStore {
    fn save_block(&self, pos: GridPos, blob: &[u8]) -> io::Result<()> {
        if let Ok(mut map) = self.blocks.lock() {
            map.insert(pos, blob.to_vec());
        }
        Ok(())
    }

    fn load_block(&self, pos: GridPos) -> io::Result<Option<Vec<u8>>> {
        Ok(self
            .blocks
            .lock()
            .ok()
            .and_then(|map| map.get(&pos).cloned()))
    }

    fn delete_block(&self, pos: GridPos) -> io::Result<bool> {
        Ok(self
            .blocks
            .lock()
            .map(|mut map| map.remove(&pos).is_some())
            .unwrap_or(false))
    }

    fn list_all_loadable_blocks(&self) -> io::Result<Vec<GridPos>> {
        Ok(self
            .blocks
            .lock()
            .map(|map| map.keys().copied().collect())
            .unwrap_or_default())
    }
}
