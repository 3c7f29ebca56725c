//! Key share types produced by [`crate::keygen`] and consumed by
//! [`crate::presign`]/[`crate::sign`].
//!
//! Unlike the ECDSA side there's no separate auxiliary-setup step: FROST
//! needs no Paillier material, so a [`KeyShare`] is just `frost_ed25519`'s
//! own `KeyPackage`/`PublicKeyPackage` pair plus the chain code HD
//! derivation needs. `frost_ed25519` already applies the Lagrange
//! correction internally (`round2::sign` takes the full `SigningPackage`,
//! which carries every participating identifier), so unlike
//! `cggmp21::KeyShare` there's no `subset`/`signer_weight` step here: picking
//! a signing subset is just a matter of which commitments go into the
//! `SigningPackage` built in [`crate::sign`].

use frost_ed25519::keys::{KeyPackage, PublicKeyPackage};

/// A chain code for non-hardened HD derivation, same shape as
/// `key_share::ChainCode`.
pub type ChainCode = [u8; 32];

/// One party's share of a FROST keygen session: its own signing share plus
/// the public material every signer needs (everyone's verifying shares and
/// the joint verifying key).
#[derive(Clone, serde::Serialize, serde::Deserialize)]
pub struct KeyShare {
    pub key_package: KeyPackage,
    pub public_key_package: PublicKeyPackage,
    #[cfg(feature = "hd-wallets")]
    pub chain_code: ChainCode,
}

impl KeyShare {
    /// This party's FROST identifier
    pub fn identifier(&self) -> frost_ed25519::Identifier {
        *self.key_package.identifier()
    }

    /// Total number of parties this key was generated for
    pub fn n(&self) -> u16 {
        self.public_key_package.verifying_shares().len() as u16
    }

    /// Minimum number of signers required to produce a valid signature
    pub fn min_signers(&self) -> u16 {
        *self.key_package.min_signers()
    }

    /// The joint Ed25519 public key this share is a part of
    pub fn verifying_key(&self) -> &frost_ed25519::VerifyingKey {
        self.public_key_package.verifying_key()
    }
}
