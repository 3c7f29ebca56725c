//! ECDSA signing (spec.md §4.8): one round given a presignature.
//!
//! Everything message-independent was already done by [`crate::presign`];
//! this round only computes and broadcasts each party's additive share of
//! `s`, sums them, normalizes to the low half of the curve order, and
//! recovers the `v` recovery id from `R`'s coordinates so the output is a
//! drop-in `(r, s, v)` secp256k1-style signature.

use generic_ec::{Curve, Point, Scalar};
use round_based::{
    rounds_router::{simple_store::RoundInput, RoundsRouter},
    Delivery, Mpc, MpcParty, Outgoing, ProtocolMessage,
};
use thiserror_no_std::Error;

use crate::{key_share::KeyShare, presign::PresignOutput, progress::Tracer, security_level::SecurityLevel};

/// Message of the signing protocol: each party's additive share of `s`
#[derive(ProtocolMessage, Clone)]
pub enum Msg<E: Curve> {
    /// Only round
    Round1(MsgRound1<E>),
}

#[derive(Clone)]
pub struct MsgRound1<E: Curve> {
    sigma: Scalar<E>,
}

/// A message digest to be signed, together with the byte length it should be
/// treated as having been (spec.md §8 scenario B: a digest with leading zero
/// bytes must hash the same way regardless of how many leading zeros it has,
/// so the caller can pin the length explicitly instead of relying on however
/// many bytes happen to be non-zero).
#[derive(Clone, Copy)]
pub struct DataToSign<E: Curve> {
    scalar: Scalar<E>,
}

impl<E: Curve> DataToSign<E> {
    /// Builds a `DataToSign` from a message digest, treating `digest.len()`
    /// as the full byte length.
    pub fn from_digest(digest: &[u8]) -> Self {
        Self::from_digest_with_length(digest, digest.len())
    }

    /// Builds a `DataToSign` from a message digest, left-padding it with
    /// zero bytes up to `full_bytes_len` before reducing modulo the curve
    /// order. Use this when `digest` may have had leading zero bytes
    /// stripped by an untrusted intermediary.
    pub fn from_digest_with_length(digest: &[u8], full_bytes_len: usize) -> Self {
        let mut padded = vec![0u8; full_bytes_len.saturating_sub(digest.len())];
        padded.extend_from_slice(digest);
        Self {
            scalar: Scalar::<E>::from_be_bytes_mod_order(&padded),
        }
    }
}

/// An ECDSA signature produced by [`SigningBuilder::sign`]: a plain
/// `(r, s)` pair plus the recovery id needed to recover the public key (or
/// the nonce point `R`) from the signature alone.
#[derive(Clone, Debug)]
pub struct Signature<E: Curve> {
    pub r: Scalar<E>,
    pub s: Scalar<E>,
    /// Recovery id: bit 0 is `R.y`'s parity, bit 1 is set if `R.x` had to be
    /// reduced modulo the curve order (i.e. `R.x >= q`).
    pub recovery_id: u8,
}

impl<E: Curve> Signature<E> {
    /// Checks this signature against a verification key, the standard
    /// ECDSA equation `R' = s^-1*(m*G + r*Pubkey)`, `R'.x mod q == r`.
    pub fn verify(&self, public_key: &Point<E>, message: &DataToSign<E>) -> Result<(), InvalidSignature> {
        let s_inv = self.s.invert().ok_or(InvalidSignature)?;
        let u1 = message.scalar * s_inv;
        let u2 = self.r * s_inv;
        let r_point = Point::<E>::generator() * u1 + *public_key * u2;
        let x = crate::utils::point_x_as_scalar::<E>(&r_point).ok_or(InvalidSignature)?;
        if x == self.r {
            Ok(())
        } else {
            Err(InvalidSignature)
        }
    }
}

/// Signature failed to verify
#[derive(Debug, Error)]
#[error("signature is not valid")]
pub struct InvalidSignature;

/// Builds and drives the one-round signing protocol
///
/// Unlike [`crate::auxiliary::AuxGenBuilder`] or [`crate::presign::PresignBuilder`]
/// this round has no `set_execution_id`: signing carries no Fiat-Shamir
/// transcript of its own, and replay/session confusion is already ruled out
/// one layer down, by the `ssid` baked into the presignature it consumes.
pub struct SigningBuilder<'a, E: Curve, L> {
    key_share: &'a KeyShare<E, L>,
    tracer: Option<&'a mut dyn Tracer>,
}

impl<'a, E, L> SigningBuilder<'a, E, L>
where
    E: Curve,
    L: SecurityLevel,
{
    pub fn new(key_share: &'a KeyShare<E, L>) -> Self {
        Self { key_share, tracer: None }
    }

    pub fn set_progress_tracer(mut self, tracer: &'a mut dyn Tracer) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// Consumes a presignature and produces a signature over `message`.
    ///
    /// The presignature must never be reused: signing twice with the same
    /// `presignature` against two different messages leaks `chi_i`'s
    /// relation to the secret key (the classic ECDSA nonce-reuse attack,
    /// here at the additive-share level).
    pub async fn sign<M>(
        self,
        party: M,
        presignature: PresignOutput<E>,
        message: DataToSign<E>,
    ) -> Result<Signature<E>, SigningError<M::ReceiveError, M::SendError>>
    where
        M: Mpc<ProtocolMessage = Msg<E>>,
    {
        run_signing(party, self.key_share, presignature, message, self.tracer).await
    }
}

async fn run_signing<M, E, L>(
    party: M,
    key_share: &KeyShare<E, L>,
    presignature: PresignOutput<E>,
    message: DataToSign<E>,
    mut tracer: Option<&mut dyn Tracer>,
) -> Result<Signature<E>, SigningError<M::ReceiveError, M::SendError>>
where
    M: Mpc<ProtocolMessage = Msg<E>>,
    E: Curve,
{
    tracer.protocol_begins();

    tracer.stage("Setup networking");
    let i = key_share.i();
    let n = key_share.n();
    let MpcParty { delivery, .. } = party.into_party();
    let (incomings, mut outgoings) = delivery.split();

    let mut rounds = RoundsRouter::<Msg<E>>::builder();
    let round1 = rounds.add_round(RoundInput::<MsgRound1<E>>::broadcast(i, n));
    let mut rounds = rounds.listen(incomings);

    tracer.round_begins();
    tracer.stage("Compute and broadcast sigma_i = k_i*m + r*chi_i");
    let r = crate::utils::point_x_as_scalar::<E>(&presignature.R).ok_or(Bug::ZeroR)?;
    let sigma_i = presignature.k * message.scalar + r * presignature.chi;

    outgoings
        .send(Outgoing::broadcast(Msg::Round1(MsgRound1 { sigma: sigma_i })))
        .await
        .map_err(SigningError::SendError)?;

    tracer.receive_msgs();
    let shares = rounds.complete(round1).await.map_err(SigningError::ReceiveMessage)?;
    tracer.msgs_received();

    tracer.stage("Sum shares, normalize s, derive recovery id");
    let s: Scalar<E> = shares.iter().fold(Scalar::zero(), |acc, m| acc + m.sigma);
    let (s, flipped) = normalize_s(s);

    let y_odd = crate::utils::point_y_is_odd::<E>(&presignature.R);
    let x_overflowed = crate::utils::point_x_overflowed::<E>(&presignature.R);
    let mut recovery_id = (y_odd ^ flipped) as u8;
    if x_overflowed {
        recovery_id |= 0b10;
    }

    let signature = Signature { r, s, recovery_id };

    tracer.stage("Verify against the joint public key");
    let public_key = key_share.core.shared_public_key;
    signature.verify(&public_key, &message).map_err(|_| Bug::InvalidSignature)?;

    tracer.protocol_ends();
    Ok(signature)
}

/// Normalizes `s` to the low half of the curve order (`s <= q/2`), the
/// "low-s" convention most ECDSA verifiers require; returns whether the
/// value was flipped, since flipping `s` also flips the effective `y`
/// parity used for recovery-id bit 0.
fn normalize_s<E: Curve>(s: Scalar<E>) -> (Scalar<E>, bool) {
    if crate::utils::scalar_is_high::<E>(&s) {
        (-s, true)
    } else {
        (s, false)
    }
}

/// Error of the signing protocol
#[derive(Debug, Error)]
pub enum SigningError<IErr, OErr> {
    #[error("receive message")]
    ReceiveMessage(
        #[source] round_based::rounds_router::CompleteRoundError<round_based::rounds_router::simple_store::RoundInputError, IErr>,
    ),
    #[error("send message")]
    SendError(#[source] OErr),
    #[error("internal error")]
    InternalError(#[from] Bug),
}

/// Unexpected error not caused by other parties
#[derive(Debug, Error)]
pub enum Bug {
    #[error("presignature's R has zero x coordinate")]
    ZeroR,
    #[error("produced signature failed to verify; a presignature or a share must be corrupted")]
    InvalidSignature,
}
