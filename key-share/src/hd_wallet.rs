//! Non-hardened BIP32 child key derivation
//!
//! Only non-hardened indices (`< 2^31`) are supported: a hardened index
//! would require the parent *private* key to derive, which defeats the
//! purpose of never reconstructing it.

use generic_ec::{Curve, Point, Scalar};
use hmac::{Hmac, Mac};
use sha2::Sha512;

use crate::ChainCode;

const HARDENED_INDEX_START: u32 = 1 << 31;

/// Failure modes of non-hardened BIP32 derivation
#[derive(Debug, thiserror_no_std::Error)]
pub enum DeriveError {
    /// Index requests hardened derivation, which is not supported for
    /// public-key-only (non-hardened) paths
    #[error("hardened child indices are not supported")]
    HardenedIndex,
    /// `I_L mod q == 0`; caller should retry with a different chain code
    /// (practically never happens)
    #[error("derived offset is degenerate, this child index cannot be used")]
    InvalidOffset,
    /// The path string could not be parsed (non-digit component)
    #[error("malformed derivation path")]
    InvalidPath,
}

/// One BIP32 derivation step's output: the additive offset to the parent
/// public key, and the child chain code.
pub struct Shift<E: Curve> {
    /// `I_L mod q`, the scalar added to the parent public key
    pub delta: Scalar<E>,
    /// `I_R`, the new chain code
    pub chain_code: ChainCode,
}

/// Derives `I = HMAC-SHA512(chain_code, serialize_compressed(parent_pub) || index_be32)`
/// and splits it into `(delta, child_chain_code)`.
pub fn derive_one_step<E: Curve>(
    chain_code: &ChainCode,
    parent_public_key: &Point<E>,
    child_index: u32,
) -> Result<Shift<E>, DeriveError> {
    if child_index >= HARDENED_INDEX_START {
        return Err(DeriveError::HardenedIndex);
    }

    let mut mac =
        Hmac::<Sha512>::new_from_slice(chain_code).expect("HMAC accepts keys of any length");
    mac.update(&parent_public_key.to_bytes(true));
    mac.update(&child_index.to_be_bytes());
    let i = mac.finalize().into_bytes();

    let (i_l, i_r) = i.split_at(32);
    let delta = Scalar::<E>::from_be_bytes_mod_order(i_l);
    if delta == Scalar::<E>::zero() {
        return Err(DeriveError::InvalidOffset);
    }

    let mut child_chain_code = [0u8; 32];
    child_chain_code.copy_from_slice(i_r);

    Ok(Shift {
        delta,
        chain_code: child_chain_code,
    })
}

/// A single non-hardened derivation index, parsed from a path component such
/// as `"0"` (hardened indices, `"0'"`/`"0h"`, are rejected).
pub fn parse_path(path: &str) -> Result<Vec<u32>, DeriveError> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    path.split('/')
        .map(|component| component.parse::<u32>().map_err(|_| DeriveError::InvalidPath))
        .collect()
}

/// Cumulative shift across a full derivation path: the public key shift
/// `Δ = Σ I_L mod q` (applied to `Pubkey`) and the final chain code.
pub struct DerivedShift<E: Curve> {
    /// `Σ I_L mod q`, the cumulative scalar that was added to the root
    /// public key along the path
    pub delta: Scalar<E>,
    /// Derived child public key `parent_pub + Δ·G`
    pub child_public_key: Point<E>,
    /// Chain code at the end of the path
    pub chain_code: ChainCode,
}

/// Applies a full derivation path to a root public key and chain code,
/// accumulating the scalar shift as it goes (`Δ = Σ I_L mod q`).
pub fn derive_path<E: Curve>(
    root_public_key: Point<E>,
    root_chain_code: ChainCode,
    path: &[u32],
) -> Result<DerivedShift<E>, DeriveError> {
    let mut delta = Scalar::<E>::zero();
    let mut pk = root_public_key;
    let mut cc = root_chain_code;
    for &index in path {
        let shift = derive_one_step(&cc, &pk, index)?;
        delta = delta + shift.delta;
        pk = pk + Point::generator() * shift.delta;
        cc = shift.chain_code;
    }
    Ok(DerivedShift {
        delta,
        child_public_key: pk,
        chain_code: cc,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use generic_ec::{Point, SecretScalar};
    use rand_core::OsRng;

    type E = generic_ec::curves::Secp256k1;

    #[test]
    fn parse_path_splits_on_slash() {
        assert_eq!(parse_path("0/1/2/2/10").unwrap(), vec![0, 1, 2, 2, 10]);
        assert_eq!(parse_path("").unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn parse_path_rejects_hardened_markers() {
        assert!(matches!(parse_path("0'"), Err(DeriveError::InvalidPath)));
        assert!(matches!(parse_path("0h"), Err(DeriveError::InvalidPath)));
    }

    #[test]
    fn derive_one_step_rejects_hardened_index() {
        let secret = SecretScalar::<E>::random(&mut OsRng);
        let pk = Point::<E>::generator() * *secret.as_ref();
        let cc = [7u8; 32];
        assert!(matches!(
            derive_one_step::<E>(&cc, &pk, HARDENED_INDEX_START),
            Err(DeriveError::HardenedIndex)
        ));
    }

    #[test]
    fn derive_path_child_key_matches_direct_computation() {
        let secret = SecretScalar::<E>::random(&mut OsRng);
        let root_pk = Point::<E>::generator() * *secret.as_ref();
        let root_cc = [9u8; 32];
        let path = parse_path("0/1/2/2/10").unwrap();

        let shift = derive_path::<E>(root_pk, root_cc, &path).expect("path must derive");
        assert_eq!(shift.child_public_key, root_pk + Point::generator() * shift.delta);

        // Deriving the same path twice from the same root is deterministic.
        let shift_again = derive_path::<E>(root_pk, root_cc, &path).expect("path must derive");
        assert_eq!(shift.delta, shift_again.delta);
        assert_eq!(shift.chain_code, shift_again.chain_code);
    }
}
