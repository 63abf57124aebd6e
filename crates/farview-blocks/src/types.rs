use farview_geom::GridPos;

/// Edge length of a far block in voxels. A block at step `s` spans
/// `FAR_BLOCK_SIZE << s` world units per axis.
pub const FAR_BLOCK_SIZE: i32 = 16;
pub const FAR_BLOCK_POW: u8 = 4;

const VOLUME: usize = (FAR_BLOCK_SIZE * FAR_BLOCK_SIZE * FAR_BLOCK_SIZE) as usize;

/// Block position (block units) of the voxel position `pos`.
#[inline]
pub fn block_pos_of(pos: GridPos) -> GridPos {
    pos.shr(FAR_BLOCK_POW)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Voxel {
    pub id: u16,
    pub state: u16,
}

impl Voxel {
    /// Empty, see-through content.
    pub const AIR: Voxel = Voxel { id: 0, state: 0 };
    /// Present block, slot intentionally without authoritative content.
    pub const IGNORE: Voxel = Voxel {
        id: u16::MAX,
        state: 0,
    };

    #[inline]
    pub const fn new(id: u16) -> Self {
        Self { id, state: 0 }
    }

    #[inline]
    pub fn is_air(self) -> bool {
        self.id == Voxel::AIR.id
    }

    #[inline]
    pub fn is_ignore(self) -> bool {
        self.id == Voxel::IGNORE.id
    }
}

/// Dense 16x16x16 buffer of far voxels.
///
/// One voxel here stands for a `2^step` cube of finest-level cells; the
/// buffer itself does not know its step, the access layer keys it by
/// `(step, aligned block pos)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FarBlock {
    voxels: Vec<Voxel>,
}

impl FarBlock {
    pub fn filled(v: Voxel) -> Self {
        Self {
            voxels: vec![v; VOLUME],
        }
    }

    pub fn from_voxels(voxels: Vec<Voxel>) -> Self {
        let mut v = voxels;
        if v.len() != VOLUME {
            v.resize(VOLUME, Voxel::IGNORE);
        }
        Self { voxels: v }
    }

    #[inline]
    fn idx(x: i32, y: i32, z: i32) -> usize {
        ((y * FAR_BLOCK_SIZE + z) * FAR_BLOCK_SIZE + x) as usize
    }

    /// Voxel at local coordinates. Out-of-range reads degrade to
    /// [`Voxel::IGNORE`] so a caller falls through to the generator.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Voxel {
        if !(0..FAR_BLOCK_SIZE).contains(&x)
            || !(0..FAR_BLOCK_SIZE).contains(&y)
            || !(0..FAR_BLOCK_SIZE).contains(&z)
        {
            return Voxel::IGNORE;
        }
        self.voxels[Self::idx(x, y, z)]
    }

    #[inline]
    pub fn get_rel(&self, rel: GridPos) -> Voxel {
        self.get(rel.x, rel.y, rel.z)
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32, v: Voxel) {
        if (0..FAR_BLOCK_SIZE).contains(&x)
            && (0..FAR_BLOCK_SIZE).contains(&y)
            && (0..FAR_BLOCK_SIZE).contains(&z)
        {
            self.voxels[Self::idx(x, y, z)] = v;
        }
    }

    #[inline]
    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    #[inline]
    pub fn is_all_ignore(&self) -> bool {
        self.voxels.iter().all(|v| v.is_ignore())
    }

    #[inline]
    pub fn has_content(&self) -> bool {
        self.voxels.iter().any(|v| !v.is_ignore() && !v.is_air())
    }
}
