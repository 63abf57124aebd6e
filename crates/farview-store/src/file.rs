use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use farview_geom::GridPos;

use crate::BlockStore;

/// One file per block under a root directory, named `<x>.<y>.<z>.far`.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let root = path.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn block_path(&self, pos: GridPos) -> PathBuf {
        self.root.join(format!("{}.{}.{}.far", pos.x, pos.y, pos.z))
    }

    fn parse_file_name(name: &str) -> Option<GridPos> {
        let stem = name.strip_suffix(".far")?;
        let mut parts = stem.split('.');
        let x = parts.next()?.parse().ok()?;
        let y = parts.next()?.parse().ok()?;
        let z = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(GridPos::new(x, y, z))
    }
}

impl BlockStore for FileStore {
    fn save_block(&self, pos: GridPos, blob: &[u8]) -> io::Result<()> {
        fs::write(self.block_path(pos), blob)
    }

    fn load_block(&self, pos: GridPos) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.block_path(pos)) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                log::warn!("far block read failed at {:?}: {}", pos, e);
                Err(e)
            }
        }
    }

    fn delete_block(&self, pos: GridPos) -> io::Result<bool> {
        match fs::remove_file(self.block_path(pos)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn list_all_loadable_blocks(&self) -> io::Result<Vec<GridPos>> {
        let mut out = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if let Some(pos) = entry
                .file_name()
                .to_str()
                .and_then(Self::parse_file_name)
            {
                out.push(pos);
            }
        }
        Ok(out)
    }
}
