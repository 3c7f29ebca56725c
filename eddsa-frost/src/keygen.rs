//! FROST distributed key generation: 2 rounds plus a local finalization
//! step, shared between non-threshold (`min_signers == n`) and threshold
//! modes — FROST's own DKG (`frost_ed25519::keys::dkg`) takes `min_signers`
//! as a plain parameter, so there's no separate code path the way
//! `cggmp21_keygen::keygen` needs one for its additive-vs-VSS split.

use std::collections::BTreeMap;

use digest::Digest;
use frost_ed25519::keys::dkg::{part1, part2, part3, round1, round2};
use rand_core::{CryptoRng, RngCore};
use round_based::{
    rounds_router::{simple_store::RoundInput, RoundsRouter},
    Delivery, Mpc, MpcParty, Outgoing,
};
use thiserror_no_std::Error;

use crate::{
    execution_id::{ExecutionId, ProtocolChoice},
    key_share::KeyShare,
    msg::{Msg, MsgRound1, MsgRound2P2p},
    progress::Tracer,
    utils::{identifier, iter_peers},
};

/// Builds and drives the key generation protocol
pub struct KeygenBuilder<'a, D> {
    i: u16,
    n: u16,
    min_signers: u16,
    execution_id: ExecutionId<D>,
    tracer: Option<&'a mut dyn Tracer>,
}

impl<'a, D> KeygenBuilder<'a, D>
where
    D: Digest,
{
    /// Non-threshold (n-of-n) key generation: every one of the `n` parties
    /// is required to sign
    pub fn new_non_threshold(i: u16, n: u16) -> Self {
        Self::new_threshold(i, n, n)
    }

    /// Threshold (`min_signers`-of-`n`) key generation
    pub fn new_threshold(i: u16, n: u16, min_signers: u16) -> Self {
        Self {
            i,
            n,
            min_signers,
            execution_id: Default::default(),
            tracer: None,
        }
    }

    pub fn set_execution_id(self, execution_id: ExecutionId<D>) -> Self {
        Self { execution_id, ..self }
    }

    pub fn set_progress_tracer(mut self, tracer: &'a mut dyn Tracer) -> Self {
        self.tracer = Some(tracer);
        self
    }

    #[cfg(feature = "hd-wallets")]
    pub async fn start<R, M>(self, rng: &mut R, party: M) -> Result<KeyShare, KeygenError<M::ReceiveError, M::SendError>>
    where
        R: RngCore + CryptoRng,
        M: Mpc<ProtocolMessage = Msg>,
    {
        let mut chain_code = [0u8; 32];
        rng.fill_bytes(&mut chain_code);
        run_keygen(rng, party, self.i, self.n, self.min_signers, self.execution_id, chain_code, self.tracer).await
    }

    #[cfg(not(feature = "hd-wallets"))]
    pub async fn start<R, M>(self, rng: &mut R, party: M) -> Result<KeyShare, KeygenError<M::ReceiveError, M::SendError>>
    where
        R: RngCore + CryptoRng,
        M: Mpc<ProtocolMessage = Msg>,
    {
        run_keygen(rng, party, self.i, self.n, self.min_signers, self.execution_id, self.tracer).await
    }
}

#[cfg(feature = "hd-wallets")]
#[allow(clippy::too_many_arguments)]
async fn run_keygen<R, M, D>(
    rng: &mut R,
    party: M,
    i: u16,
    n: u16,
    min_signers: u16,
    execution_id: ExecutionId<D>,
    chain_code: crate::key_share::ChainCode,
    mut tracer: Option<&mut dyn Tracer>,
) -> Result<KeyShare, KeygenError<M::ReceiveError, M::SendError>>
where
    R: RngCore + CryptoRng,
    M: Mpc<ProtocolMessage = Msg>,
    D: Digest,
{
    let (key_package, public_key_package) = run_dkg(rng, party, i, n, min_signers, execution_id, &mut tracer).await?;
    Ok(KeyShare {
        key_package,
        public_key_package,
        chain_code,
    })
}

#[cfg(not(feature = "hd-wallets"))]
async fn run_keygen<R, M, D>(
    rng: &mut R,
    party: M,
    i: u16,
    n: u16,
    min_signers: u16,
    execution_id: ExecutionId<D>,
    mut tracer: Option<&mut dyn Tracer>,
) -> Result<KeyShare, KeygenError<M::ReceiveError, M::SendError>>
where
    R: RngCore + CryptoRng,
    M: Mpc<ProtocolMessage = Msg>,
    D: Digest,
{
    let (key_package, public_key_package) = run_dkg(rng, party, i, n, min_signers, execution_id, &mut tracer).await?;
    Ok(KeyShare { key_package, public_key_package })
}

async fn run_dkg<R, M, D>(
    rng: &mut R,
    party: M,
    i: u16,
    n: u16,
    min_signers: u16,
    execution_id: ExecutionId<D>,
    tracer: &mut Option<&mut dyn Tracer>,
) -> Result<(frost_ed25519::keys::KeyPackage, frost_ed25519::keys::PublicKeyPackage), KeygenError<M::ReceiveError, M::SendError>>
where
    R: RngCore + CryptoRng,
    M: Mpc<ProtocolMessage = Msg>,
    D: Digest,
{
    tracer.protocol_begins();

    tracer.stage("Setup networking");
    let MpcParty { delivery, .. } = party.into_party();
    let (incomings, mut outgoings) = delivery.split();

    let mut rounds = RoundsRouter::<Msg>::builder();
    let round1 = rounds.add_round(RoundInput::<MsgRound1>::broadcast(i, n));
    let round2 = rounds.add_round(RoundInput::<MsgRound2P2p>::p2p(i, n));
    let mut rounds = rounds.listen(incomings);

    // The execution id has no further use here beyond binding this run to a
    // session; FROST's own `part1`/`part2`/`part3` derive their Fiat-Shamir
    // challenges from the identifiers and commitments themselves.
    let parties: Vec<_> = (0..n).map(identifier).collect();
    let _sid = execution_id.set_parties(&parties).evaluate(ProtocolChoice::Keygen);

    let my_id = identifier(i);

    // Round 1
    tracer.round_begins();
    tracer.stage("Generate round 1 DKG package");
    let (round1_secret, round1_package) =
        part1(my_id, n, min_signers, rng).map_err(Bug::Dkg).map_err(KeygenError::InternalError)?;

    tracer.send_msg();
    outgoings
        .send(Outgoing::broadcast(Msg::Round1(MsgRound1 { package: round1_package })))
        .await
        .map_err(KeygenError::SendError)?;
    tracer.msg_sent();

    // Round 2
    tracer.round_begins();
    tracer.receive_msgs();
    let round1_packages_by_pos = rounds.complete(round1).await.map_err(KeygenError::ReceiveMessage)?;
    tracer.msgs_received();

    let round1_packages: BTreeMap<frost_ed25519::Identifier, round1::Package> = iter_peers(i, n)
        .map(|j| (identifier(j), round1_packages_by_pos[usize::from(j)].package.clone()))
        .collect();

    tracer.stage("Derive this party's round 2 shares");
    let (round2_secret, round2_packages) = part2(round1_secret, &round1_packages)
        .map_err(Bug::Dkg)
        .map_err(KeygenError::InternalError)?;

    tracer.stage("Send round 2 shares point-to-point");
    for j in iter_peers(i, n) {
        let package = round2_packages
            .get(&identifier(j))
            .ok_or(Bug::MissingRound2Package)
            .map_err(KeygenError::InternalError)?
            .clone();
        outgoings
            .send(Outgoing::p2p(j, Msg::Round2(MsgRound2P2p { package })))
            .await
            .map_err(KeygenError::SendError)?;
    }

    // Finalization
    tracer.round_begins();
    tracer.receive_msgs();
    let round2_packages_by_pos = rounds.complete(round2).await.map_err(KeygenError::ReceiveMessage)?;
    tracer.msgs_received();

    let round2_packages: BTreeMap<frost_ed25519::Identifier, round2::Package> = iter_peers(i, n)
        .map(|j| (identifier(j), round2_packages_by_pos[usize::from(j)].package.clone()))
        .collect();

    tracer.stage("Verify shares and assemble key package");
    let (key_package, public_key_package) = part3(&round2_secret, &round1_packages, &round2_packages)
        .map_err(Bug::Dkg)
        .map_err(KeygenError::InternalError)?;

    tracer.protocol_ends();
    Ok((key_package, public_key_package))
}

/// Error of the key generation protocol
#[derive(Debug, Error)]
pub enum KeygenError<IErr, OErr> {
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

/// Unexpected error not caused by other parties. `frost_core`'s own DKG
/// already validates every proof of knowledge and VSS share internally and
/// reports the culprit identifier inside `frost_core::Error` — there's no
/// separate blame-collection pass to write here the way the ECDSA side
/// needs one.
#[derive(Debug, Error)]
pub enum Bug {
    #[error("frost dkg failed")]
    Dkg(#[source] frost_ed25519::Error),
    #[error("round 2 package missing for a party we just computed one for")]
    MissingRound2Package,
}
