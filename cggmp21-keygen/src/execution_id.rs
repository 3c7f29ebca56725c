//! Session-bound execution id (`ssid`)
//!
//! Every protocol round hashes the `ssid` into its transcript so that
//! messages from one protocol instance can never be replayed into another:
//! it binds the ordered party keys, a protocol discriminant, and whatever
//! extra context the caller supplies (e.g. a random nonce).

use digest::Digest;
use generic_ec::{Curve, Point};

use crate::security_level::SecurityLevel;

/// Distinguishes which protocol an execution id was derived for, so the same
/// party-key list can't be replayed across protocol types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolChoice {
    Keygen,
    KeyRefresh,
    Presign,
    SigningSession,
}

impl ProtocolChoice {
    fn as_bytes(self) -> &'static [u8] {
        match self {
            ProtocolChoice::Keygen => b"cggmp21.keygen",
            ProtocolChoice::KeyRefresh => b"cggmp21.aux-gen",
            ProtocolChoice::Presign => b"cggmp21.presign",
            ProtocolChoice::SigningSession => b"cggmp21.signing",
        }
    }
}

/// Builder for a protocol's execution id
///
/// Defaults to an empty extra-context byte string; callers typically mix in
/// the ordered list of party public keys via [`Self::set_parties`].
pub struct ExecutionId<E, L, D> {
    extra_context: Vec<u8>,
    _ph: core::marker::PhantomData<(E, L, D)>,
}

impl<E, L, D> Default for ExecutionId<E, L, D> {
    fn default() -> Self {
        Self {
            extra_context: Vec::new(),
            _ph: core::marker::PhantomData,
        }
    }
}

impl<E: Curve, L: SecurityLevel, D: Digest> ExecutionId<E, L, D> {
    /// Builds an execution id from an arbitrary byte string, e.g. a session
    /// identifier agreed upon out of band
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            extra_context: bytes.to_vec(),
            _ph: core::marker::PhantomData,
        }
    }

    /// Mixes the ordered list of party public keys into the execution id
    pub fn set_parties(mut self, parties: &[Point<E>]) -> Self {
        for p in parties {
            self.extra_context.extend_from_slice(&p.to_bytes(true));
        }
        self
    }

    /// Finalizes the execution id into its transcript bytes, tagged by which
    /// protocol it's used for
    pub fn evaluate(self, protocol: ProtocolChoice) -> Vec<u8> {
        let mut hasher = D::new();
        hasher.update(protocol.as_bytes());
        hasher.update((self.extra_context.len() as u64).to_be_bytes());
        hasher.update(&self.extra_context);
        hasher.finalize().to_vec()
    }
}
