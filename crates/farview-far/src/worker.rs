use std::sync::Arc;

use farview_blocks::FarBlock;
use farview_geom::GridPos;
use farview_lod::FAR_STEP_MAX;
use farview_world::GenCtx;
use hashbrown::HashSet;

/// Per-worker far access context.
///
/// Holds the single-slot block cache, the per-step miss sets, and the
/// worker's generation context. Each rendering worker owns exactly one;
/// nothing here is shared between workers and cross-worker coherence is not
/// a goal — a block another worker loaded is simply loaded again.
///
/// Miss entries are permanent for the worker's lifetime: a position that
/// failed to load once is never retried.
pub struct FarWorkerCtx {
    pub r#gen: GenCtx,
    slot: Option<(u8, GridPos, Arc<FarBlock>)>,
    miss: [HashSet<GridPos>; FAR_STEP_MAX as usize],
}

impl FarWorkerCtx {
    pub fn new(r#gen: GenCtx) -> Self {
        Self {
            r#gen,
            slot: None,
            miss: core::array::from_fn(|_| HashSet::new()),
        }
    }

    /// The cached block iff it is exactly `(step, pos)`.
    #[inline]
    pub fn cached(&self, step: u8, pos: GridPos) -> Option<Arc<FarBlock>> {
        match &self.slot {
            Some((s, p, block)) if *s == step && *p == pos => Some(Arc::clone(block)),
            _ => None,
        }
    }

    /// Overwrite the slot; every successful lookup lands here.
    #[inline]
    pub fn remember(&mut self, step: u8, pos: GridPos, block: Arc<FarBlock>) {
        self.slot = Some((step, pos, block));
    }

    #[inline]
    pub fn is_missing(&self, step: u8, pos: GridPos) -> bool {
        self.miss
            .get(usize::from(step))
            .is_some_and(|set| set.contains(&pos))
    }

    #[inline]
    pub fn mark_missing(&mut self, step: u8, pos: GridPos) {
        if let Some(set) = self.miss.get_mut(usize::from(step)) {
            set.insert(pos);
        }
    }

    pub fn miss_count(&self) -> usize {
        self.miss.iter().map(|set| set.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farview_blocks::Voxel;
    use farview_world::World;

    fn ctx() -> FarWorkerCtx {
        FarWorkerCtx::new(World::with_defaults(1).make_gen_ctx())
    }

    #[test]
    fn slot_matches_exact_key_only() {
        let mut ctx = ctx();
        let pos = GridPos::new(4, 0, 4);
        assert!(ctx.cached(1, pos).is_none());
        ctx.remember(1, pos, Arc::new(FarBlock::filled(Voxel::new(3))));
        assert!(ctx.cached(1, pos).is_some());
        assert!(ctx.cached(2, pos).is_none());
        assert!(ctx.cached(1, pos.offset(1, 0, 0)).is_none());
        // Overwritten on the next lookup.
        ctx.remember(2, pos, Arc::new(FarBlock::filled(Voxel::new(4))));
        assert!(ctx.cached(1, pos).is_none());
        assert!(ctx.cached(2, pos).is_some());
    }

    #[test]
    fn miss_sets_isolated_per_step_and_permanent() {
        let mut ctx = ctx();
        let pos = GridPos::new(-8, 8, 0);
        ctx.mark_missing(3, pos);
        assert!(ctx.is_missing(3, pos));
        assert!(!ctx.is_missing(2, pos));
        assert_eq!(ctx.miss_count(), 1);
        // Out-of-range steps never panic, just degrade.
        ctx.mark_missing(FAR_STEP_MAX, pos);
        assert!(!ctx.is_missing(FAR_STEP_MAX, pos));
    }
}
