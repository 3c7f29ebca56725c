//! FROST signing (spec.md §4.9's FROST path): the message-dependent round,
//! consuming a [`crate::presign::PresignOutput`] and a message to produce a
//! complete, independently-verifiable Ed25519 signature.

use frost_ed25519::keys::{KeyPackage, PublicKeyPackage};
use frost_ed25519::{round2, Signature, SigningPackage};
use round_based::{
    rounds_router::{simple_store::RoundInput, RoundsRouter},
    Delivery, Mpc, MpcParty, Outgoing, ProtocolMessage,
};
use thiserror_no_std::Error;

use crate::{presign::PresignOutput, progress::Tracer, utils::identifier};

/// Message of the signing protocol: each party's signature share
#[derive(Clone, ProtocolMessage, serde::Serialize, serde::Deserialize)]
pub enum Msg {
    Round1(MsgRound1),
}

#[derive(Clone, serde::Serialize, serde::Deserialize)]
pub struct MsgRound1 {
    share: round2::SignatureShare,
}

/// Builds and drives the one-round signing protocol
pub struct SigningBuilder<'a> {
    i: u16,
    n: u16,
    key_package: &'a KeyPackage,
    public_key_package: &'a PublicKeyPackage,
    tracer: Option<&'a mut dyn Tracer>,
}

impl<'a> SigningBuilder<'a> {
    pub fn new(i: u16, n: u16, key_package: &'a KeyPackage, public_key_package: &'a PublicKeyPackage) -> Self {
        Self {
            i,
            n,
            key_package,
            public_key_package,
            tracer: None,
        }
    }

    pub fn set_progress_tracer(mut self, tracer: &'a mut dyn Tracer) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// Consumes a presignature and produces a signature over `message`.
    ///
    /// The presignature must never be reused across two different messages
    /// (see [`PresignOutput`]'s doc comment).
    pub async fn sign<M>(self, party: M, presignature: PresignOutput, message: &[u8]) -> Result<Signature, SigningError<M::ReceiveError, M::SendError>>
    where
        M: Mpc<ProtocolMessage = Msg>,
    {
        run_signing(party, self.i, self.n, self.key_package, self.public_key_package, presignature, message, self.tracer).await
    }
}

async fn run_signing<M>(
    party: M,
    i: u16,
    n: u16,
    key_package: &KeyPackage,
    public_key_package: &PublicKeyPackage,
    presignature: PresignOutput,
    message: &[u8],
    mut tracer: Option<&mut dyn Tracer>,
) -> Result<Signature, SigningError<M::ReceiveError, M::SendError>>
where
    M: Mpc<ProtocolMessage = Msg>,
{
    tracer.protocol_begins();

    tracer.stage("Setup networking");
    let MpcParty { delivery, .. } = party.into_party();
    let (incomings, mut outgoings) = delivery.split();

    let mut rounds = RoundsRouter::<Msg>::builder();
    let round1 = rounds.add_round(RoundInput::<MsgRound1>::broadcast(i, n));
    let mut rounds = rounds.listen(incomings);

    tracer.round_begins();
    tracer.stage("Build signing package and compute this party's share");
    let signing_package = SigningPackage::new(presignature.commitments.clone(), message);
    let share = round2::sign(&signing_package, &presignature.nonces, key_package).map_err(Bug::Sign)?;

    tracer.send_msg();
    outgoings
        .send(Outgoing::broadcast(Msg::Round1(MsgRound1 { share })))
        .await
        .map_err(SigningError::SendError)?;
    tracer.msg_sent();

    tracer.receive_msgs();
    let received = rounds.complete(round1).await.map_err(SigningError::ReceiveMessage)?;
    tracer.msgs_received();

    tracer.stage("Aggregate signature shares");
    let shares = (0..n).map(|j| (identifier(j), received[usize::from(j)].share.clone())).collect();
    let signature =
        frost_ed25519::aggregate(&signing_package, &shares, public_key_package).map_err(Bug::Aggregate)?;

    tracer.stage("Verify against the joint public key");
    public_key_package
        .verifying_key()
        .verify(message, &signature)
        .map_err(|_| Bug::InvalidSignature)?;

    tracer.protocol_ends();
    Ok(signature)
}

/// Error of the signing protocol
#[derive(Debug, Error)]
pub enum SigningError<IErr, OErr> {
    #[error("receive message")]
    ReceiveMessage(
        #[source]
        round_based::rounds_router::CompleteRoundError<
            round_based::rounds_router::simple_store::RoundInputError,
            IErr,
        >,
    ),
    #[error("send message")]
    SendError(#[source] OErr),
    #[error("internal error")]
    InternalError(#[from] Bug),
}

/// Unexpected error not caused by other parties
#[derive(Debug, Error)]
pub enum Bug {
    #[error("failed to compute this party's signature share")]
    Sign(#[source] frost_ed25519::Error),
    #[error("failed to aggregate signature shares; some party sent an invalid share")]
    Aggregate(#[source] frost_ed25519::Error),
    #[error("produced signature failed to verify; a presignature or a share must be corrupted")]
    InvalidSignature,
}
