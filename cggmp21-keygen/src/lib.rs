//! Curve-generic distributed key generation (DKG)
//!
//! Implements the keygen protocol shared by CGGMP21 ECDSA and the FROST-style
//! EdDSA protocol: both the non-threshold (n-of-n additive) and threshold
//! (t-of-n, VSS) variants are the same round sequence over a
//! [`generic_ec::Curve`], so `cggmp21` and `eddsa-frost` both depend on this
//! crate rather than duplicating it.
//!
//! Output is a [`key_share::Valid<key_share::IncompleteKeyShare>`] — "core"
//! key material only. `cggmp21` additionally runs its own [auxiliary setup]
//! to attach Paillier/Ring-Pedersen material before signing; `eddsa-frost`
//! needs nothing more and signs directly off this crate's output.
//!
//! [auxiliary setup]: https://docs.rs/cggmp21/latest/cggmp21/auxiliary/index.html

#![forbid(missing_docs)]
#![allow(non_snake_case)]

pub mod execution_id;
mod keygen;
mod msg;
pub mod progress;
pub mod security_level;
pub mod utils;

pub use self::keygen::{Bug, KeygenBuilder, KeygenError, ProtocolAborted, ProtocolAbortReason};
pub use self::msg::Msg;

pub use key_share;
pub use round_based;
