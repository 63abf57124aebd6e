use farview_geom::GridPos;
use farview_lod::{DrawConfig, Walk, run_far_all};
use farview_store::StoreSet;
use farview_world::World;
use hashbrown::HashMap;

#[derive(Clone, Copy, Debug, Default)]
pub struct SeedStats {
    /// Leaves the traversal visited.
    pub leaves: usize,
    /// Blocks generated and written.
    pub saved: usize,
    /// All-ignore blocks skipped (open sky).
    pub empty: usize,
    /// Write or backend failures, logged and skipped.
    pub failed: usize,
}

/// Generate a far block for every leaf around `viewpoint_block` and persist
/// each through the per-step store contract. This is the write path a far
/// server performs ahead of clients; reads then resolve through
/// [`crate::FarAccess`] without live generation.
pub fn seed_area(
    world: &World,
    stores: &dyn StoreSet,
    config: &DrawConfig,
    viewpoint_block: GridPos,
    two_d: Option<i32>,
    use_weather: bool,
) -> SeedStats {
    let ctx = world.make_gen_ctx();
    let mut stats = SeedStats::default();

    let mut by_step: HashMap<u8, Vec<GridPos>> = HashMap::new();
    run_far_all(
        viewpoint_block,
        config.cell_size_pow,
        config.farmesh,
        config.farmesh_quality_pow,
        two_d,
        true,
        &mut |res| {
            by_step.entry(res.step).or_default().push(res.pos);
            Walk::Continue
        },
    );

    for (step, positions) in by_step {
        stats.leaves += positions.len();
        let Some(store) = stores.store_for_step(step) else {
            stats.failed += positions.len();
            continue;
        };
        let pitch = step + config.cell_size_pow;
        store.begin_save();
        for pos in positions {
            let block = world.generate_far_block(&ctx, pos, pitch, use_weather);
            if block.is_all_ignore() {
                stats.empty += 1;
                continue;
            }
            match store.save_block(pos, &block.serialize()) {
                Ok(()) => stats.saved += 1,
                Err(e) => {
                    log::warn!("far seed write failed at {:?} step {}: {}", pos, step, e);
                    stats.failed += 1;
                }
            }
        }
        store.end_save();
    }

    log::debug!(
        "far seed around {:?}: {} leaves, {} saved, {} empty",
        viewpoint_block,
        stats.leaves,
        stats.saved,
        stats.empty
    );
    stats
}
