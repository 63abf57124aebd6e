use farview_geom::{Cube, GridPos};
use farview_lod::{DrawConfig, TreeParams, Walk, far_params, far_step, run_far_all};
use proptest::prelude::*;

fn viewpoint() -> impl Strategy<Value = GridPos> {
    (-5000i32..5000, -500i32..500, -5000i32..5000).prop_map(|(x, y, z)| GridPos::new(x, y, z))
}

proptest! {
    // Every query terminates with a cube containing the (cell-aligned)
    // target, or the root fallback when the target escapes the tree.
    #[test]
    fn find_covers_target_or_falls_back(
        vp in viewpoint(),
        target in viewpoint(),
        cell_pow in 0u8..4,
        quality_pow in 0u8..4,
        farmesh in prop::sample::select(vec![64, 256, 1024, 4096]),
    ) {
        let cfg = DrawConfig::new(farmesh, cell_pow, quality_pow);
        let res = far_params(&cfg, vp, target, true).unwrap();
        let cube = Cube::new(res.pos, res.size);
        let tree = TreeParams::new(cfg.farmesh);
        let root = tree.root(vp, None);
        let aligned = target.align_down(cell_pow);
        if root.contains(aligned) {
            prop_assert!(cube.contains(aligned), "target {:?} not in {:?}", aligned, res);
        } else {
            prop_assert_eq!(cube, root);
        }
    }

    // For targets inside the tree, the resolved cell origin is a multiple of
    // 2^step on every axis (the out-of-tree fallback only guarantees the
    // root's own coarse alignment).
    #[test]
    fn far_pos_aligned_to_step(
        vp in viewpoint(),
        off in (-128i32..128, -128i32..128, -128i32..128),
        cell_pow in 0u8..4,
        quality_pow in 0u8..4,
    ) {
        let cfg = DrawConfig::new(1024, cell_pow, quality_pow);
        let target = vp.offset(off.0, off.1, off.2);
        let step = far_step(&cfg, vp, target);
        let pos = farview_lod::far_actual_block_pos(&cfg, vp, target);
        let m = 1i32 << step;
        prop_assert_eq!(pos.x.rem_euclid(m), 0);
        prop_assert_eq!(pos.y.rem_euclid(m), 0);
        prop_assert_eq!(pos.z.rem_euclid(m), 0);
    }

    // Walking away from the viewpoint along an axis never refines detail.
    #[test]
    fn step_never_refines_with_distance(
        vp in viewpoint(),
        cell_pow in 0u8..4,
        quality_pow in 0u8..4,
        axis in 0usize..3,
    ) {
        let cfg = DrawConfig::new(1024, cell_pow, quality_pow);
        let mut last = 0u8;
        for d in 0..200 {
            let target = match axis {
                0 => vp.offset(d, 0, 0),
                1 => vp.offset(0, d, 0),
                _ => vp.offset(0, 0, d),
            };
            let step = far_step(&cfg, vp, target);
            prop_assert!(step >= last, "step {} after {} at d={}", step, last, d);
            last = step;
        }
    }

    // Volume enumeration is an exact partition: leaf volumes sum to the root
    // volume and sampled points land in exactly one leaf.
    #[test]
    fn enumeration_partitions_exactly(
        vp in viewpoint(),
        cell_pow in 0u8..3,
        quality_pow in 0u8..3,
        samples in prop::collection::vec(any::<(u16, u16, u16)>(), 8),
    ) {
        let farmesh = 256;
        let tree = TreeParams::new(farmesh);
        let root = tree.root(vp, None);

        let mut leaves: Vec<(GridPos, i32)> = Vec::new();
        run_far_all(vp, cell_pow, farmesh, quality_pow, None, true, &mut |res| {
            leaves.push((res.pos, res.size));
            Walk::Continue
        });

        let covered: i64 = leaves.iter().map(|(_, s)| i64::from(*s).pow(3)).sum();
        prop_assert_eq!(covered, i64::from(root.size).pow(3));

        for (sx, sy, sz) in samples {
            let p = root.pos.offset(
                i32::from(sx) % root.size,
                i32::from(sy) % root.size,
                i32::from(sz) % root.size,
            );
            let n = leaves
                .iter()
                .filter(|(pos, size)| Cube::new(*pos, *size).contains(p))
                .count();
            prop_assert_eq!(n, 1, "point {:?} covered {} times", p, n);
        }
    }

    // Point query and enumeration resolve to the same leaf grid: the leaf the
    // walk emits for a position matches what find returns for it.
    #[test]
    fn find_agrees_with_enumeration(
        vp in viewpoint(),
        cell_pow in 0u8..3,
        quality_pow in 0u8..3,
    ) {
        let farmesh = 256;
        let cfg = DrawConfig::new(farmesh, cell_pow, quality_pow);
        let mut checked = 0usize;
        run_far_all(vp, cell_pow, farmesh, quality_pow, None, true, &mut |res| {
            let probe = res.pos;
            let found = far_params(&cfg, vp, probe, true).unwrap();
            assert_eq!(found.pos, res.pos);
            assert_eq!(found.size, res.size);
            assert_eq!(found.step, res.step);
            checked += 1;
            if checked >= 64 { Walk::SkipSiblings } else { Walk::Continue }
        });
        prop_assert!(checked > 0);
    }
}
