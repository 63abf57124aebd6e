use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use hashbrown::HashMap;

use crate::{BlockStore, FileStore};

/// One persistent store per detail step.
pub trait StoreSet: Send + Sync {
    /// The backend for `step`, or `None` when that step has no store (the
    /// access layer degrades to generated content).
    fn store_for_step(&self, step: u8) -> Option<Arc<dyn BlockStore>>;
}

/// File-backed store set: `<root>/step_<n>/`, opened lazily and cached.
pub struct FarStores {
    root: PathBuf,
    opened: Mutex<HashMap<u8, Arc<FileStore>>>,
}

impl FarStores {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            opened: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl StoreSet for FarStores {
    fn store_for_step(&self, step: u8) -> Option<Arc<dyn BlockStore>> {
        let mut opened = self.opened.lock().ok()?;
        if let Some(store) = opened.get(&step) {
            return Some(Arc::clone(store) as Arc<dyn BlockStore>);
        }
        match FileStore::open(self.root.join(format!("step_{step}"))) {
            Ok(store) => {
                let store = Arc::new(store);
                opened.insert(step, Arc::clone(&store));
                Some(store as Arc<dyn BlockStore>)
            }
            Err(e) => {
                log::warn!("far store for step {} unavailable: {}", step, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farview_geom::GridPos;

    #[test]
    fn steps_are_isolated() {
        let tmp = tempfile::tempdir().unwrap();
        let stores = FarStores::new(tmp.path());
        let s0 = stores.store_for_step(0).unwrap();
        let s3 = stores.store_for_step(3).unwrap();
        let pos = GridPos::new(1, 1, 1);
        s0.save_block(pos, &[0]).unwrap();
        assert_eq!(s3.load_block(pos).unwrap(), None);
        assert!(s0.load_block(pos).unwrap().is_some());
        assert!(tmp.path().join("step_0").is_dir());
        assert!(tmp.path().join("step_3").is_dir());
    }

    #[test]
    fn reopening_a_step_reuses_the_backend() {
        let tmp = tempfile::tempdir().unwrap();
        let stores = FarStores::new(tmp.path());
        let a = stores.store_for_step(2).unwrap();
        let pos = GridPos::new(0, 5, 0);
        a.save_block(pos, &[7]).unwrap();
        let b = stores.store_for_step(2).unwrap();
        assert_eq!(b.load_block(pos).unwrap(), Some(vec![7]));
    }
}
