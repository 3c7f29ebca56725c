//! FROST-style threshold EdDSA (Ed25519), the sibling of `cggmp21`'s
//! ECDSA stack.
//!
//! Unlike ECDSA there's no Paillier-backed auxiliary setup: FROST's DKG
//! ([`keygen`]) produces a usable [`key_share::KeyShare`] directly, and
//! signing is two rounds ([`presign`] for the message-independent nonce
//! commitment, [`sign`] for the message-dependent share and aggregation)
//! instead of CGGMP21's three-round presign plus one-round sign. Driven by
//! the same [`round_based::Mpc`] engine `cggmp21` uses, so callers get one
//! consistent transport story across both signature families.

#![forbid(missing_docs)]
#![allow(non_snake_case)]

pub mod cggmp_variant;
pub mod execution_id;
pub mod key_share;
pub mod presign;
pub mod progress;
pub mod sign;
#[cfg(feature = "spof")]
pub mod trusted_dealer;
mod utils;

#[cfg(feature = "hd-wallets")]
pub mod hd_wallet;

mod msg;

/// Key generation: FROST's own distributed key generation
/// (`frost_ed25519::keys::dkg`), driven over `round_based`.
pub mod keygen {
    pub use crate::keygen_impl::{Bug, KeygenBuilder, KeygenError};
    pub use crate::msg::{Msg, MsgRound1, MsgRound2P2p};
}
#[path = "keygen.rs"]
mod keygen_impl;

pub use key_share::KeyShare;

pub use frost_ed25519;
pub use round_based;
