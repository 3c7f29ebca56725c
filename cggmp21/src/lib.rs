//! Threshold ECDSA (secp256k1/secp256r1/stark) based on the CGGMP21 paper
//!
//! This crate wires the individual protocol rounds — [`keygen`] (via
//! [`cggmp21_keygen`]), [`auxiliary`], [`presign`], [`signing`] — into the
//! small set of builder entry points applications actually call. It knows
//! nothing about the wire transport (that's [`round_based::Mpc`], supplied
//! by the caller) or about how key material is persisted ([`key_share`]'s
//! types are `serde`-serializable but otherwise opaque to the caller's
//! storage layer).
//!
//! A typical session: run [`keygen::KeygenBuilder`] to get an
//! [`key_share::IncompleteKeyShare`], run [`auxiliary::AuxGenBuilder`] once
//! to get an [`key_share::AuxInfo`] (or use [`trusted_dealer`] to skip the
//! MPC session entirely for test fixtures), combine the two into a
//! [`KeyShare`], run [`presign::PresignBuilder`] once per signature to get a
//! [`presign::PresignOutput`], then hand that and the message digest to
//! [`signing::SigningBuilder::sign`].

#![forbid(missing_docs)]
#![allow(non_snake_case)]

pub mod auxiliary;
pub mod execution_id;
pub mod key_share;
pub mod paillier;
pub mod presign;
pub mod progress;
pub mod security_level;
pub mod signing;
#[cfg(feature = "spof")]
pub mod trusted_dealer;
mod utils;
pub mod zk;

/// Curves this crate is compiled against, gated behind the `curve-*` features
pub mod supported_curves {
    #[cfg(feature = "curve-secp256k1")]
    pub use generic_ec::curves::Secp256k1;
    #[cfg(feature = "curve-secp256r1")]
    pub use generic_ec::curves::Secp256r1;
    #[cfg(feature = "curve-stark")]
    pub use generic_ec::curves::Stark;
}

/// Key generation, re-exported from [`cggmp21_keygen`]: the same
/// curve-generic DKG drives both non-threshold and threshold ECDSA keygen
pub mod keygen {
    pub use cggmp21_keygen::{Bug, KeygenBuilder, KeygenError, Msg, ProtocolAborted, ProtocolAbortReason};
}

pub use self::key_share::KeyShare;

pub use cggmp21_keygen;
pub use generic_ec;
pub use paillier_zk;
pub use round_based;

/// The external `key-share` crate, re-exported under this name since the
/// crate root already has a local `key_share` module (see [`key_share`])
/// built on top of it; the leading `::` is required here to pick the
/// extern-prelude crate over the local module of the same name.
pub use ::key_share as key_share_core;
