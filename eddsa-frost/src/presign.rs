//! FROST presignature: the one message-independent round, producing a
//! nonce commitment every signer broadcasts before the message to sign is
//! even known — mirrors the `cggmp21::presign`/`cggmp21::signing` split so
//! both signature families offer the same two-phase shape to the caller.

use std::collections::BTreeMap;

use frost_ed25519::keys::KeyPackage;
use frost_ed25519::round1::{self, SigningCommitments, SigningNonces};
use rand_core::{CryptoRng, RngCore};
use round_based::{
    rounds_router::{simple_store::RoundInput, RoundsRouter},
    Delivery, Mpc, MpcParty, Outgoing, ProtocolMessage,
};
use thiserror_no_std::Error;

use crate::{progress::Tracer, utils::identifier};

/// Message of the presign protocol: each party's round 1 nonce commitment
#[derive(Clone, ProtocolMessage, serde::Serialize, serde::Deserialize)]
pub enum Msg {
    Round1(MsgRound1),
}

#[derive(Clone, serde::Serialize, serde::Deserialize)]
pub struct MsgRound1 {
    commitments: SigningCommitments,
}

/// A FROST presignature: single-use, like `cggmp21::PresignOutput` — signing
/// twice with the same nonces leaks the signing share, since two signature
/// shares over different messages with the same nonce let an observer solve
/// for the secret by subtracting the two linear equations.
pub struct PresignOutput {
    pub(crate) nonces: SigningNonces,
    pub(crate) commitments: BTreeMap<frost_ed25519::Identifier, SigningCommitments>,
}

/// Builds and drives the presign protocol
pub struct PresignBuilder<'a> {
    i: u16,
    n: u16,
    key_package: &'a KeyPackage,
    tracer: Option<&'a mut dyn Tracer>,
}

impl<'a> PresignBuilder<'a> {
    pub fn new(i: u16, n: u16, key_package: &'a KeyPackage) -> Self {
        Self {
            i,
            n,
            key_package,
            tracer: None,
        }
    }

    pub fn set_progress_tracer(mut self, tracer: &'a mut dyn Tracer) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub async fn generate<R, M>(self, rng: &mut R, party: M) -> Result<PresignOutput, PresignError<M::ReceiveError, M::SendError>>
    where
        R: RngCore + CryptoRng,
        M: Mpc<ProtocolMessage = Msg>,
    {
        run_presign(rng, party, self.i, self.n, self.key_package, self.tracer).await
    }
}

async fn run_presign<R, M>(
    rng: &mut R,
    party: M,
    i: u16,
    n: u16,
    key_package: &KeyPackage,
    mut tracer: Option<&mut dyn Tracer>,
) -> Result<PresignOutput, PresignError<M::ReceiveError, M::SendError>>
where
    R: RngCore + CryptoRng,
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
    tracer.stage("Sample nonces and commit");
    let (nonces, commitments) = round1::commit(key_package.signing_share(), rng);

    tracer.send_msg();
    outgoings
        .send(Outgoing::broadcast(Msg::Round1(MsgRound1 { commitments })))
        .await
        .map_err(PresignError::SendError)?;
    tracer.msg_sent();

    tracer.receive_msgs();
    let received = rounds.complete(round1).await.map_err(PresignError::ReceiveMessage)?;
    tracer.msgs_received();

    let commitments = (0..n)
        .map(|j| (identifier(j), received[usize::from(j)].commitments.clone()))
        .collect();

    tracer.protocol_ends();
    Ok(PresignOutput { nonces, commitments })
}

/// Error of the presign protocol
#[derive(Debug, Error)]
pub enum PresignError<IErr, OErr> {
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
}
