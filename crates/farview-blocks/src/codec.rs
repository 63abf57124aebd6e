//! Versioned binary wire format for far blocks.
//!
//! Layout: one version byte, then `16^3` voxels as little-endian
//! `(id: u16, state: u16)` pairs. A version byte of `SER_VERSION_INVALID`
//! (or any unknown version) rejects the blob.

use crate::types::{FAR_BLOCK_SIZE, FarBlock, Voxel};

pub const SER_VERSION: u8 = 1;
pub const SER_VERSION_INVALID: u8 = 255;

const VOLUME: usize = (FAR_BLOCK_SIZE * FAR_BLOCK_SIZE * FAR_BLOCK_SIZE) as usize;
const PAYLOAD_LEN: usize = VOLUME * 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodecError {
    InvalidVersion(u8),
    Truncated { expected: usize, got: usize },
}

impl core::fmt::Display for CodecError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CodecError::InvalidVersion(v) => write!(f, "invalid far block version {}", v),
            CodecError::Truncated { expected, got } => {
                write!(f, "far block payload truncated: {} of {} bytes", got, expected)
            }
        }
    }
}

impl std::error::Error for CodecError {}

impl FarBlock {
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + PAYLOAD_LEN);
        out.push(SER_VERSION);
        for v in self.voxels() {
            out.extend_from_slice(&v.id.to_le_bytes());
            out.extend_from_slice(&v.state.to_le_bytes());
        }
        out
    }

    pub fn deserialize(blob: &[u8]) -> Result<FarBlock, CodecError> {
        let (&version, payload) = blob.split_first().ok_or(CodecError::Truncated {
            expected: 1 + PAYLOAD_LEN,
            got: 0,
        })?;
        if version != SER_VERSION {
            return Err(CodecError::InvalidVersion(version));
        }
        if payload.len() < PAYLOAD_LEN {
            return Err(CodecError::Truncated {
                expected: PAYLOAD_LEN,
                got: payload.len(),
            });
        }
        let mut voxels = Vec::with_capacity(VOLUME);
        for pair in payload[..PAYLOAD_LEN].chunks_exact(4) {
            voxels.push(Voxel {
                id: u16::from_le_bytes([pair[0], pair[1]]),
                state: u16::from_le_bytes([pair[2], pair[3]]),
            });
        }
        Ok(FarBlock::from_voxels(voxels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_preserves_voxels() {
        let mut b = FarBlock::filled(Voxel::AIR);
        b.set(0, 0, 0, Voxel::new(3));
        b.set(15, 15, 15, Voxel { id: 9, state: 4 });
        let blob = b.serialize();
        assert_eq!(blob.len(), 1 + PAYLOAD_LEN);
        assert_eq!(blob[0], SER_VERSION);
        let back = FarBlock::deserialize(&blob).unwrap();
        assert_eq!(back, b);
    }

    #[test]
    fn invalid_version_rejected() {
        let mut blob = FarBlock::filled(Voxel::AIR).serialize();
        blob[0] = SER_VERSION_INVALID;
        assert_eq!(
            FarBlock::deserialize(&blob),
            Err(CodecError::InvalidVersion(SER_VERSION_INVALID))
        );
        blob[0] = 7;
        assert_eq!(
            FarBlock::deserialize(&blob),
            Err(CodecError::InvalidVersion(7))
        );
    }

    #[test]
    fn truncated_payload_rejected() {
        assert!(matches!(
            FarBlock::deserialize(&[]),
            Err(CodecError::Truncated { .. })
        ));
        let blob = FarBlock::filled(Voxel::AIR).serialize();
        assert!(matches!(
            FarBlock::deserialize(&blob[..blob.len() / 2]),
            Err(CodecError::Truncated { .. })
        ));
    }
}
