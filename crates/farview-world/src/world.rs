use std::sync::{Arc, RwLock};

use fastnoise_lite::{FastNoiseLite, NoiseType};

use farview_blocks::{ContentRegistry, FAR_BLOCK_SIZE, FarBlock, Voxel};
use farview_geom::GridPos;

use crate::worldgen::WorldGenParams;

/// Reusable per-worker generation context: configured noise plus the params
/// snapshot it was built against. Create one per worker via
/// [`World::make_gen_ctx`] and reuse it across many voxel samples.
pub struct GenCtx {
    pub height: FastNoiseLite,
    pub params: Arc<WorldGenParams>,
}

/// Content ids the generator emits, resolved once at construction.
#[derive(Clone, Copy, Debug)]
struct SurfaceVoxels {
    stone: Voxel,
    grass: Voxel,
    sand: Voxel,
    snow: Voxel,
    water: Voxel,
    ice: Voxel,
}

pub struct World {
    pub seed: i32,
    gen_params: Arc<RwLock<Arc<WorldGenParams>>>,
    surface: SurfaceVoxels,
}

impl World {
    pub fn new(seed: i32, params: WorldGenParams, registry: &ContentRegistry) -> Self {
        Self {
            seed,
            gen_params: Arc::new(RwLock::new(Arc::new(params))),
            surface: SurfaceVoxels {
                stone: registry.voxel("stone"),
                grass: registry.voxel("grass"),
                sand: registry.voxel("sand"),
                snow: registry.voxel("snow"),
                water: registry.voxel("water"),
                ice: registry.voxel("ice"),
            },
        }
    }

    pub fn with_defaults(seed: i32) -> Self {
        Self::new(
            seed,
            WorldGenParams::default(),
            &ContentRegistry::with_defaults(),
        )
    }

    pub fn make_gen_ctx(&self) -> GenCtx {
        let params = {
            let guard = self.gen_params.read().unwrap();
            Arc::clone(&guard)
        };
        let mut height = FastNoiseLite::with_seed(self.seed);
        height.set_noise_type(Some(NoiseType::OpenSimplex2));
        height.set_frequency(Some(params.height_frequency));
        GenCtx { height, params }
    }

    pub fn update_worldgen_params(&self, params: WorldGenParams) {
        if let Ok(mut guard) = self.gen_params.write() {
            *guard = Arc::new(params);
        }
    }

    /// Terrain surface height for a column.
    #[inline]
    pub fn height_at(&self, ctx: &GenCtx, x: i32, z: i32) -> i32 {
        let n = ctx.height.get_noise_2d(x as f32, z as f32);
        (n * ctx.params.height_scale + ctx.params.height_offset) as i32
    }

    /// The fixed see-through sentinel returned when nothing else resolves.
    #[inline]
    pub fn visible_transparent(&self) -> Voxel {
        Voxel::AIR
    }

    /// Generator "visible content": the voxel a distant observer would see at
    /// `pos`, or `None` for open air. Altitude-derived heat selects frozen
    /// versus temperate surfaces when `use_weather` is set.
    pub fn visible_voxel_at(&self, ctx: &GenCtx, pos: GridPos, use_weather: bool) -> Option<Voxel> {
        let params = &ctx.params;
        let height = self.height_at(ctx, pos.x, pos.z);
        let visible = pos.y < height;
        let under_water = pos.y < params.water_level;
        if !visible && !under_water {
            return None;
        }

        if !use_weather {
            return Some(self.surface.grass);
        }

        // Upper is colder, lower is hotter.
        let heat = params.base_heat + pos.y / -params.heat_lapse;

        if !visible && pos.y < params.water_level {
            return Some(if heat < 0 {
                self.surface.ice
            } else {
                self.surface.water
            });
        }

        let humidity = params.humidity;
        Some(if heat < 0 {
            if humidity < 20 {
                self.surface.stone
            } else {
                self.surface.snow
            }
        } else if heat < 10 {
            self.surface.stone
        } else if heat < 40 {
            if humidity < 20 {
                self.surface.sand
            } else {
                self.surface.grass
            }
        } else {
            self.surface.sand
        })
    }

    /// Sample a far block for the leaf at `bpos` (block units) whose cells
    /// span `2^pitch_pow` grid units each. Cells with no visible content stay
    /// [`Voxel::IGNORE`] so readers fall through to live generation.
    pub fn generate_far_block(
        &self,
        ctx: &GenCtx,
        bpos: GridPos,
        pitch_pow: u8,
        use_weather: bool,
    ) -> FarBlock {
        let base = bpos * FAR_BLOCK_SIZE;
        let half = (1i32 << pitch_pow) >> 1;
        let mut block = FarBlock::filled(Voxel::IGNORE);
        for y in 0..FAR_BLOCK_SIZE {
            for z in 0..FAR_BLOCK_SIZE {
                for x in 0..FAR_BLOCK_SIZE {
                    let wp = base.offset(
                        (x << pitch_pow) + half,
                        (y << pitch_pow) + half,
                        (z << pitch_pow) + half,
                    );
                    if let Some(v) = self.visible_voxel_at(ctx, wp, use_weather) {
                        block.set(x, y, z, v);
                    }
                }
            }
        }
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worldgen::WorldGenConfig;

    fn world() -> World {
        World::with_defaults(0xC0FFEE_u32 as i32)
    }

    #[test]
    fn heights_deterministic_per_seed() {
        let w = world();
        let a = w.make_gen_ctx();
        let b = w.make_gen_ctx();
        for (x, z) in [(0, 0), (17, -40), (-333, 909)] {
            assert_eq!(w.height_at(&a, x, z), w.height_at(&b, x, z));
        }
        let other = World::with_defaults(1);
        let c = other.make_gen_ctx();
        let same = [(0, 0), (17, -40), (-333, 909)]
            .iter()
            .all(|&(x, z)| w.height_at(&a, x, z) == other.height_at(&c, x, z));
        assert!(!same, "different seeds produced identical terrain");
    }

    #[test]
    fn deep_ground_visible_open_sky_not() {
        let w = world();
        let ctx = w.make_gen_ctx();
        let deep = GridPos::new(5, -2000, 5);
        assert!(w.visible_voxel_at(&ctx, deep, true).is_some());
        let sky = GridPos::new(5, 2000, 5);
        assert_eq!(w.visible_voxel_at(&ctx, sky, true), None);
    }

    #[test]
    fn weather_off_yields_uniform_surface() {
        let w = world();
        let ctx = w.make_gen_ctx();
        let a = w.visible_voxel_at(&ctx, GridPos::new(0, -50, 0), false);
        let b = w.visible_voxel_at(&ctx, GridPos::new(900, -50, -900), false);
        assert_eq!(a, b);
        assert!(a.is_some());
    }

    #[test]
    fn cold_altitude_freezes_water() {
        let reg = ContentRegistry::with_defaults();
        let cfg = WorldGenConfig::from_toml_str(
            r#"
            [height]
            scale = 0.0
            offset = -4000.0

            [water]
            level = 2000

            [climate]
            base_heat = 10
            heat_lapse = 100
        "#,
        )
        .unwrap();
        let w = World::new(7, WorldGenParams::from_config(&cfg), &reg);
        let ctx = w.make_gen_ctx();
        // Water column from -4000 up to 2000; above y=1000 heat goes negative.
        let warm = w.visible_voxel_at(&ctx, GridPos::new(0, 10, 0), true).unwrap();
        assert_eq!(warm, reg.voxel("water"));
        let frozen = w
            .visible_voxel_at(&ctx, GridPos::new(0, 1500, 0), true)
            .unwrap();
        assert_eq!(frozen, reg.voxel("ice"));
    }

    #[test]
    fn far_block_sampling_matches_point_queries() {
        let w = world();
        let ctx = w.make_gen_ctx();
        let bpos = GridPos::new(0, -4, 0);
        let pitch = 3u8;
        let block = w.generate_far_block(&ctx, bpos, pitch, true);
        let base = bpos * FAR_BLOCK_SIZE;
        let half = (1 << pitch) >> 1;
        for (x, y, z) in [(0, 0, 0), (15, 3, 9), (7, 15, 2)] {
            let wp = base.offset((x << pitch) + half, (y << pitch) + half, (z << pitch) + half);
            let expect = w
                .visible_voxel_at(&ctx, wp, true)
                .unwrap_or(Voxel::IGNORE);
            assert_eq!(block.get(x, y, z), expect);
        }
    }

    #[test]
    fn empty_sky_block_is_all_ignore() {
        let w = world();
        let ctx = w.make_gen_ctx();
        // Way above any terrain the defaults can produce.
        let block = w.generate_far_block(&ctx, GridPos::new(0, 100, 0), 2, true);
        assert!(block.is_all_ignore());
    }
}
