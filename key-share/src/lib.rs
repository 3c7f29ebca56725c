//! Key share of a threshold signature scheme (TSS)
//!
//! This crate defines the key share types that are output by a DKG
//! (key generation) protocol and consumed by the signing protocols built on
//! top of it. It deliberately knows nothing about any particular signing
//! protocol (CGGMP21 ECDSA, FROST EdDSA, ...) — it only models the secret
//! sharing of a curve scalar, the public commitments to the other parties'
//! shares, and (optionally) non-hardened BIP32 key derivation.

#![forbid(missing_docs)]

mod core_share;
pub mod lagrange;
mod valid;

#[cfg(feature = "hd-wallets")]
pub mod hd_wallet;

#[cfg(feature = "spof")]
pub mod trusted_dealer;

pub use self::core_share::{IncompleteKeyShare, PartyId, VssSetup};
pub use self::lagrange::lagrange_coefficient;
pub use self::valid::{evaluate_exponent_commitments, verify_vss_share, InvalidKeyShare, Valid, VssError};

pub use generic_ec;

/// A fixed-size chain code carried alongside a keygen output, used as the
/// seed for [BIP32](https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki)
/// non-hardened child key derivation.
pub type ChainCode = [u8; 32];

/// Reconstructs the joint verification key from per-party public shares
///
/// `Σ_i public_shares[i] == shared_public_key` is a core keygen invariant;
/// this helper recomputes the left-hand side so callers can double check it
/// (e.g. in a test harness after fixture loading).
pub fn reconstruct_public_key<E: generic_ec::Curve>(
    public_shares: &[generic_ec::Point<E>],
) -> generic_ec::Point<E> {
    public_shares.iter().fold(generic_ec::Point::zero(), |acc, p| acc + p)
}
