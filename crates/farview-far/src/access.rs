use std::sync::Arc;

use farview_blocks::{FAR_BLOCK_SIZE, FarBlock, Voxel, block_pos_of};
use farview_geom::GridPos;
use farview_lod::{DrawConfig, FAR_STEP_MAX, far_actual_block_pos, far_step};
use farview_store::StoreSet;
use farview_world::World;

use crate::storage::FarBlockStorage;
use crate::worker::FarWorkerCtx;

/// Resolves absolute world positions to voxels at the LOD the viewpoint
/// warrants. Every failure along the pipeline degrades to the next source;
/// nothing here returns an error.
pub struct FarAccess {
    pub config: DrawConfig,
    /// Viewpoint in block units; the renderer updates it as the camera moves.
    pub viewpoint_block: GridPos,
    pub use_weather: bool,
    /// Self-contained session: never consult a persistent store.
    pub offline: bool,
    /// Explicit generation overrides active: stored blocks would not match.
    pub custom_params: bool,
    world: Arc<World>,
    storage: Arc<FarBlockStorage>,
    stores: Option<Arc<dyn StoreSet>>,
}

impl FarAccess {
    pub fn new(world: Arc<World>, storage: Arc<FarBlockStorage>, config: DrawConfig) -> Self {
        Self {
            config,
            viewpoint_block: GridPos::ZERO,
            use_weather: true,
            offline: false,
            custom_params: false,
            world,
            storage,
            stores: None,
        }
    }

    pub fn with_stores(mut self, stores: Arc<dyn StoreSet>) -> Self {
        self.stores = Some(stores);
        self
    }

    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    pub fn storage(&self) -> &Arc<FarBlockStorage> {
        &self.storage
    }

    /// Fresh per-worker context; one per rendering thread.
    pub fn make_worker_ctx(&self) -> FarWorkerCtx {
        FarWorkerCtx::new(self.world.make_gen_ctx())
    }

    /// Resolve `pos` (world grid units) to a voxel.
    pub fn voxel_at(&self, ctx: &mut FarWorkerCtx, pos: GridPos) -> Voxel {
        let bpos = block_pos_of(pos);
        let step = far_step(&self.config, self.viewpoint_block, bpos);
        let aligned = far_actual_block_pos(&self.config, self.viewpoint_block, bpos);

        let mut block = ctx.cached(step, aligned);

        if block.is_none() && step < FAR_STEP_MAX {
            block = self.storage.get(step, aligned);
        }

        if block.is_none()
            && !self.offline
            && !self.custom_params
            && !ctx.is_missing(step, aligned)
        {
            if let Some(stores) = &self.stores {
                block = self.load_block(stores.as_ref(), step, aligned);
                if block.is_none() {
                    ctx.mark_missing(step, aligned);
                }
            }
        }

        if let Some(block) = block {
            ctx.remember(step, aligned, Arc::clone(&block));
            // One far voxel covers 2^(step + cell_size_pow) world units.
            let pitch = step + self.config.cell_size_pow;
            let rel = (pos - aligned * FAR_BLOCK_SIZE).shr(pitch);
            let v = block.get_rel(rel);
            if !v.is_ignore() {
                return v;
            }
        }

        if let Some(v) = self.world.visible_voxel_at(&ctx.r#gen, pos, self.use_weather) {
            return v;
        }
        self.world.visible_transparent()
    }

    fn load_block(&self, stores: &dyn StoreSet, step: u8, aligned: GridPos) -> Option<Arc<FarBlock>> {
        let store = stores.store_for_step(step)?;
        let blob = match store.load_block(aligned) {
            Ok(Some(blob)) => blob,
            Ok(None) => return None,
            Err(e) => {
                log::debug!("far load failed at {:?} step {}: {}", aligned, step, e);
                return None;
            }
        };
        match FarBlock::deserialize(&blob) {
            Ok(block) => Some(Arc::new(block)),
            Err(e) => {
                log::debug!("far block at {:?} step {} rejected: {}", aligned, step, e);
                None
            }
        }
    }
}
