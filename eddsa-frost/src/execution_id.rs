//! Session-bound execution id (`ssid`)
//!
//! Same purpose as `cggmp21::execution_id`: every round hashes the `ssid`
//! into its transcript so messages from one protocol instance can't be
//! replayed into another. Unlike the ECDSA side there's no `generic-ec`
//! curve parameter here — FROST identifiers and verifying shares are
//! `frost_ed25519` types directly.

use digest::Digest;

/// Distinguishes which protocol an execution id was derived for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolChoice {
    Keygen,
    Presign,
    SigningSession,
    /// [`crate::cggmp_variant`]'s combined presign+sign session, kept
    /// distinct from [`ProtocolChoice::SigningSession`] so the two EdDSA
    /// constructions this crate implements can never cross-pollinate
    /// transcripts even if run over the same `ssid`.
    CggmpVariantSign,
}

impl ProtocolChoice {
    fn as_bytes(self) -> &'static [u8] {
        match self {
            ProtocolChoice::Keygen => b"eddsa-frost.keygen",
            ProtocolChoice::Presign => b"eddsa-frost.presign",
            ProtocolChoice::SigningSession => b"eddsa-frost.signing",
            ProtocolChoice::CggmpVariantSign => b"eddsa-frost.cggmp-variant.sign",
        }
    }
}

/// Builder for a protocol's execution id
pub struct ExecutionId<D> {
    extra_context: Vec<u8>,
    _ph: core::marker::PhantomData<D>,
}

impl<D> Default for ExecutionId<D> {
    fn default() -> Self {
        Self {
            extra_context: Vec::new(),
            _ph: core::marker::PhantomData,
        }
    }
}

impl<D: Digest> ExecutionId<D> {
    /// Builds an execution id from an arbitrary byte string, e.g. a session
    /// identifier agreed upon out of band
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            extra_context: bytes.to_vec(),
            _ph: core::marker::PhantomData,
        }
    }

    /// Mixes the ordered list of participant identifiers into the execution id
    pub fn set_parties(mut self, identifiers: &[frost_ed25519::Identifier]) -> Self {
        for id in identifiers {
            self.extra_context.extend_from_slice(id.serialize().as_slice());
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
