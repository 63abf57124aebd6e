use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Deserialize;

use farview_blocks::block_pos_of;
use farview_far::{FarAccess, FarBlockStorage, seed_area};
use farview_geom::GridPos;
use farview_lod::{DrawConfig, Walk, far_actual_block_pos, far_step, run_far_all};
use farview_store::FarStores;
use farview_world::{World, WorldGenConfig, WorldGenParams};

#[derive(Parser)]
#[command(name = "farview", about = "Far terrain LOD inspection tools")]
struct Cli {
    /// TOML config with [draw] and [worldgen] sections.
    #[arg(long)]
    config: Option<PathBuf>,
    /// World seed for the procedural fallback.
    #[arg(long, default_value_t = 0)]
    seed: i32,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Enumerate far leaves around a viewpoint, print per-step counts.
    Stats {
        /// Viewpoint in block units, as "x,y,z".
        #[arg(long, default_value = "0,0,0")]
        viewpoint: String,
        /// Column mode: fixed Y origin for the tree.
        #[arg(long)]
        two_d: Option<i32>,
    },
    /// Resolve one world position through the far access pipeline.
    Probe {
        /// Viewpoint in block units, as "x,y,z".
        #[arg(long, default_value = "0,0,0")]
        viewpoint: String,
        /// Position to resolve, in world grid units, as "x,y,z".
        #[arg(long)]
        at: String,
        /// Per-step block store root to consult.
        #[arg(long)]
        store: Option<PathBuf>,
        /// Self-contained session: skip the persistent store.
        #[arg(long)]
        offline: bool,
    },
    /// Generate far blocks around a viewpoint and persist them.
    Seed {
        /// Viewpoint in block units, as "x,y,z".
        #[arg(long, default_value = "0,0,0")]
        viewpoint: String,
        /// Per-step block store root to write into.
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        two_d: Option<i32>,
    },
}

#[derive(Default, Deserialize)]
struct AppConfig {
    #[serde(default)]
    draw: Option<DrawConfig>,
    #[serde(default)]
    worldgen: WorldGenConfig,
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig, Box<dyn Error>> {
    match path {
        Some(p) => Ok(toml::from_str(&std::fs::read_to_string(p)?)?),
        None => Ok(AppConfig::default()),
    }
}

fn parse_pos(s: &str) -> Result<GridPos, Box<dyn Error>> {
    let parts: Vec<i32> = s
        .split(',')
        .map(|p| p.trim().parse())
        .collect::<Result<_, _>>()?;
    if parts.len() != 3 {
        return Err(format!("expected \"x,y,z\", got {:?}", s).into());
    }
    Ok(GridPos::new(parts[0], parts[1], parts[2]))
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let app = load_config(cli.config.as_ref())?;
    // Without a config, pick a sensible inspection extent instead of the
    // disabled default.
    let draw = app
        .draw
        .map(DrawConfig::sanitized)
        .unwrap_or_else(|| DrawConfig::new(4096, 2, 1));
    let params = WorldGenParams::from_config(&app.worldgen);
    let registry = farview_blocks::ContentRegistry::with_defaults();

    match cli.command {
        Command::Stats { viewpoint, two_d } => {
            let vp = parse_pos(&viewpoint)?;
            let mut by_step: hashbrown::HashMap<u8, (usize, i64)> = hashbrown::HashMap::new();
            let mut leaves = 0usize;
            run_far_all(
                vp,
                draw.cell_size_pow,
                draw.farmesh,
                draw.farmesh_quality_pow,
                two_d,
                true,
                &mut |res| {
                    let entry = by_step.entry(res.step).or_default();
                    entry.0 += 1;
                    entry.1 += i64::from(res.size).pow(3);
                    leaves += 1;
                    Walk::Continue
                },
            );
            let mut steps: Vec<_> = by_step.into_iter().collect();
            steps.sort_by_key(|(step, _)| *step);
            println!("{} leaves around {:?}:", leaves, vp);
            for (step, (count, volume)) in steps {
                println!("  step {:>2}: {:>8} leaves, {:>14} cells", step, count, volume);
            }
        }
        Command::Probe {
            viewpoint,
            at,
            store,
            offline,
        } => {
            let vp = parse_pos(&viewpoint)?;
            let pos = parse_pos(&at)?;
            let world = Arc::new(World::new(cli.seed, params, &registry));
            let storage = Arc::new(FarBlockStorage::new());
            let mut access = FarAccess::new(Arc::clone(&world), storage, draw);
            access.viewpoint_block = vp;
            access.offline = offline;
            if let Some(root) = store {
                access = access.with_stores(Arc::new(FarStores::new(root)));
            }
            let mut ctx = access.make_worker_ctx();
            let bpos = block_pos_of(pos);
            let step = far_step(&draw, vp, bpos);
            let aligned = far_actual_block_pos(&draw, vp, bpos);
            let voxel = access.voxel_at(&mut ctx, pos);
            println!(
                "pos {:?} -> block {:?}, step {}, aligned {:?}",
                pos, bpos, step, aligned
            );
            println!("voxel id {} state {}", voxel.id, voxel.state);
        }
        Command::Seed {
            viewpoint,
            out,
            two_d,
        } => {
            let vp = parse_pos(&viewpoint)?;
            let world = World::new(cli.seed, params, &registry);
            let stores = FarStores::new(&out);
            let stats = seed_area(&world, &stores, &draw, vp, two_d, true);
            println!(
                "seeded {} of {} leaves into {} ({} empty, {} failed)",
                stats.saved,
                stats.leaves,
                out.display(),
                stats.empty,
                stats.failed
            );
        }
    }
    Ok(())
}
