//! Non-hardened BIP32 child key derivation, generalized to the Ed25519
//! point group (see `key-share::hd_wallet` for the `generic-ec` version this
//! mirrors; the recipe is identical, only the point/scalar arithmetic
//! differs since `frost_ed25519` types aren't `generic-ec` curves).
//!
//! Only non-hardened indices (`< 2^31`) are supported, for the same reason
//! as the ECDSA side: a hardened index needs the parent *private* key.

use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;
use curve25519_dalek::edwards::CompressedEdwardsY;
use curve25519_dalek::scalar::Scalar;
use hmac::{Hmac, Mac};
use sha2::Sha512;

use crate::key_share::ChainCode;

const HARDENED_INDEX_START: u32 = 1 << 31;

/// Failure modes of non-hardened BIP32 derivation
#[derive(Debug, thiserror_no_std::Error)]
pub enum DeriveError {
    #[error("hardened child indices are not supported")]
    HardenedIndex,
    #[error("derived offset is degenerate, this child index cannot be used")]
    InvalidOffset,
    #[error("malformed derivation path")]
    InvalidPath,
    #[error("parent or derived public key is not a valid Ed25519 point")]
    InvalidPoint,
}

/// One BIP32 derivation step's output: the additive offset to the parent
/// public key, and the child chain code.
pub struct Shift {
    /// `I_L mod L` (the Ed25519 group order), the scalar added to the
    /// parent public key
    pub delta: Scalar,
    /// `I_R`, the new chain code
    pub chain_code: ChainCode,
}

/// Derives `I = HMAC-SHA512(chain_code, compressed(parent_pub) || index_be32)`
/// and splits it into `(delta, child_chain_code)`.
pub fn derive_one_step(
    chain_code: &ChainCode,
    parent_public_key: &frost_ed25519::VerifyingKey,
    child_index: u32,
) -> Result<Shift, DeriveError> {
    if child_index >= HARDENED_INDEX_START {
        return Err(DeriveError::HardenedIndex);
    }

    let parent_bytes = parent_public_key.serialize().map_err(|_| DeriveError::InvalidPoint)?;

    let mut mac = Hmac::<Sha512>::new_from_slice(chain_code).expect("HMAC accepts keys of any length");
    mac.update(&parent_bytes);
    mac.update(&child_index.to_be_bytes());
    let i = mac.finalize().into_bytes();

    let (i_l, i_r) = i.split_at(32);
    let mut i_l_array = [0u8; 32];
    i_l_array.copy_from_slice(i_l);
    let delta = Scalar::from_bytes_mod_order(i_l_array);
    if delta == Scalar::ZERO {
        return Err(DeriveError::InvalidOffset);
    }

    let mut child_chain_code = [0u8; 32];
    child_chain_code.copy_from_slice(i_r);

    Ok(Shift {
        delta,
        chain_code: child_chain_code,
    })
}

/// Cumulative shift across a full derivation path
pub struct DerivedShift {
    /// `Σ I_L mod L`, the cumulative scalar added to the root public key
    pub delta: Scalar,
    /// Derived child public key `parent_pub + Δ·G`
    pub child_public_key: frost_ed25519::VerifyingKey,
    /// Chain code at the end of the path
    pub chain_code: ChainCode,
}

/// Applies a full derivation path to a root public key and chain code,
/// accumulating the scalar shift as it goes.
pub fn derive_path(
    root_public_key: &frost_ed25519::VerifyingKey,
    root_chain_code: ChainCode,
    path: &[u32],
) -> Result<DerivedShift, DeriveError> {
    let mut delta = Scalar::ZERO;
    let mut pk = *root_public_key;
    let mut cc = root_chain_code;
    for &index in path {
        let shift = derive_one_step(&cc, &pk, index)?;
        delta += shift.delta;
        pk = add_to_point(&pk, shift.delta)?;
        cc = shift.chain_code;
    }
    Ok(DerivedShift {
        delta,
        child_public_key: pk,
        chain_code: cc,
    })
}

fn add_to_point(point: &frost_ed25519::VerifyingKey, delta: Scalar) -> Result<frost_ed25519::VerifyingKey, DeriveError> {
    let bytes = point.serialize().map_err(|_| DeriveError::InvalidPoint)?;
    let mut compressed = [0u8; 32];
    compressed.copy_from_slice(&bytes);
    let decompressed = CompressedEdwardsY(compressed).decompress().ok_or(DeriveError::InvalidPoint)?;
    let shifted = decompressed + delta * ED25519_BASEPOINT_POINT;
    frost_ed25519::VerifyingKey::deserialize(&shifted.compress().to_bytes()).map_err(|_| DeriveError::InvalidPoint)
}

/// Parses a `/`-separated derivation path of plain indices (hardened markers
/// like `'`/`h` are rejected by failing to parse as a bare `u32`).
pub fn parse_path(path: &str) -> Result<Vec<u32>, DeriveError> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    path.split('/')
        .map(|component| component.parse::<u32>().map_err(|_| DeriveError::InvalidPath))
        .collect()
}
