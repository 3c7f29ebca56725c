//! Key generation: 3 rounds + finalization, shared between non-threshold
//! (additive) and threshold (VSS) modes.

use digest::Digest;
use generic_ec::{hash_to_curve::FromHash, Curve, Point, Scalar, SecretScalar};
use generic_ec_zkp::{hash_commitment::HashCommit, schnorr_pok};
use key_share::{IncompleteKeyShare, PartyId, Valid, VssSetup};
use rand_core::{CryptoRng, RngCore};
use round_based::{
    rounds_router::{simple_store::RoundInput, RoundsRouter},
    Delivery, Mpc, MpcParty, Outgoing,
};
use thiserror_no_std::Error;

use crate::{
    execution_id::{ExecutionId, ProtocolChoice},
    msg::{Msg, MsgRound1, MsgRound2, MsgRound2P2p, MsgRound3},
    progress::Tracer,
    security_level::SecurityLevel,
    utils::{collect_blame, collect_simple_blame, iter_peers, try_collect_blame, xor_array, AbortBlame},
};

/// Builds and drives the key generation protocol
pub struct KeygenBuilder<'a, E, L, D>
where
    E: Curve,
    L: SecurityLevel,
    D: Digest,
{
    i: u16,
    n: u16,
    threshold: Option<u16>,
    execution_id: ExecutionId<E, L, D>,
    tracer: Option<&'a mut dyn Tracer>,
}

impl<'a, E, L, D> KeygenBuilder<'a, E, L, D>
where
    E: Curve,
    L: SecurityLevel,
    D: Digest,
{
    /// Non-threshold (n-of-n additive) key generation
    pub fn new_non_threshold(i: u16, n: u16) -> Self {
        Self {
            i,
            n,
            threshold: None,
            execution_id: Default::default(),
            tracer: None,
        }
    }

    /// Threshold (t-of-n, Shamir/VSS) key generation
    pub fn new_threshold(i: u16, n: u16, min_signers: u16) -> Self {
        Self {
            i,
            n,
            threshold: Some(min_signers),
            execution_id: Default::default(),
            tracer: None,
        }
    }

    pub fn set_execution_id(self, execution_id: ExecutionId<E, L, D>) -> Self {
        Self {
            execution_id,
            ..self
        }
    }

    pub fn set_progress_tracer(mut self, tracer: &'a mut dyn Tracer) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub async fn start<R, M>(
        self,
        rng: &mut R,
        party: M,
    ) -> Result<Valid<IncompleteKeyShare<E>>, KeygenError<M::ReceiveError, M::SendError>>
    where
        R: RngCore + CryptoRng,
        M: Mpc<ProtocolMessage = Msg<E, D>>,
        E: Curve,
        Scalar<E>: FromHash,
        L: SecurityLevel,
        D: Digest<OutputSize = digest::typenum::U32> + Clone + 'static,
    {
        run_keygen(
            rng,
            party,
            self.i,
            self.n,
            self.threshold,
            self.execution_id,
            self.tracer,
        )
        .await
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_keygen<R, M, E, L, D>(
    rng: &mut R,
    party: M,
    i: u16,
    n: u16,
    threshold: Option<u16>,
    execution_id: ExecutionId<E, L, D>,
    mut tracer: Option<&mut dyn Tracer>,
) -> Result<Valid<IncompleteKeyShare<E>>, KeygenError<M::ReceiveError, M::SendError>>
where
    R: RngCore + CryptoRng,
    M: Mpc<ProtocolMessage = Msg<E, D>>,
    E: Curve,
    Scalar<E>: FromHash,
    L: SecurityLevel,
    D: Digest<OutputSize = digest::typenum::U32> + Clone + 'static,
{
    tracer.protocol_begins();

    tracer.stage("Setup networking");
    let MpcParty { delivery, .. } = party.into_party();
    let (incomings, mut outgoings) = delivery.split();

    let mut rounds = RoundsRouter::<Msg<E, D>>::builder();
    let round1 = rounds.add_round(RoundInput::<MsgRound1<D>>::broadcast(i, n));
    let round2 = rounds.add_round(RoundInput::<MsgRound2<E, D>>::broadcast(i, n));
    let round2p2p = threshold
        .is_some()
        .then(|| rounds.add_round(RoundInput::<MsgRound2P2p<E>>::p2p(i, n)));
    let round3 = rounds.add_round(RoundInput::<MsgRound3<E>>::broadcast(i, n));
    let mut rounds = rounds.listen(incomings);

    tracer.stage("Precompute execution id and party identity");
    let execution_id = execution_id.evaluate(ProtocolChoice::Keygen);
    let sid = execution_id.as_slice();
    let tag_htc =
        generic_ec::hash_to_curve::Tag::new(&execution_id).ok_or(Bug::InvalidHashToCurveTag)?;

    // Identity key used as the VSS evaluation point; deterministic from index
    // so parties need no extra round to negotiate it (pairwise-distinct by
    // construction, satisfying the Lagrange-denominator invariant).
    let my_id: PartyId<E> = Scalar::from(u64::from(i) + 1);

    // Round 1
    tracer.round_begins();

    let t = threshold.map(usize::from).unwrap_or(1);
    let coefficients: Vec<Scalar<E>> = if threshold.is_some() {
        let mut secret = SecretScalar::<E>::random(rng);
        let mut cs = vec![*secret.as_ref()];
        secret.invalidate();
        for _ in 1..t {
            cs.push(Scalar::random(rng));
        }
        cs
    } else {
        vec![*SecretScalar::<E>::random(rng).as_ref()]
    };
    let vss_commitments: Vec<Point<E>> = coefficients.iter().map(|c| Point::generator() * c).collect();

    tracer.stage("Compute schnorr commitment for a_0");
    let (sch_secret, sch_commit) = schnorr_pok::prover_commits_ephemeral_secret::<E, _>(rng);

    tracer.stage("Sample rid and chain code contributions");
    let mut rid_bytes = vec![0u8; L::SECURITY_BYTES];
    rng.fill_bytes(&mut rid_bytes);
    let mut chain_code_bytes = vec![0u8; 32];
    rng.fill_bytes(&mut chain_code_bytes);

    tracer.stage("Compute hash commitment");
    let (hash_commit, decommit) = HashCommit::<D>::builder()
        .mix_bytes(sid)
        .mix(n)
        .mix(i)
        .mix_many(&vss_commitments)
        .mix(sch_commit.0)
        .mix_bytes(&rid_bytes)
        .mix_bytes(&chain_code_bytes)
        .commit(rng);

    tracer.send_msg();
    let commitment = MsgRound1 {
        commitment: hash_commit,
    };
    outgoings
        .send(Outgoing::broadcast(Msg::Round1(commitment.clone())))
        .await
        .map_err(KeygenError::SendError)?;
    tracer.msg_sent();

    // Round 2
    tracer.round_begins();
    tracer.receive_msgs();
    let commitments = rounds.complete(round1).await.map_err(KeygenError::ReceiveMessage)?;
    tracer.msgs_received();

    tracer.send_msg();
    let decommitment = MsgRound2 {
        vss_commitments: vss_commitments.clone(),
        sch_commit: sch_commit.clone(),
        rid_bytes: rid_bytes.clone(),
        chain_code_bytes: chain_code_bytes.clone(),
        decommit,
    };
    outgoings
        .send(Outgoing::broadcast(Msg::Round2Broadcast(decommitment.clone())))
        .await
        .map_err(KeygenError::SendError)?;
    tracer.msg_sent();

    if threshold.is_some() {
        tracer.stage("Send VSS shares point-to-point");
        for j in iter_peers(i, n) {
            let id_j = Scalar::<E>::from(u64::from(j) + 1);
            let share = evaluate_polynomial(&coefficients, id_j);
            outgoings
                .send(Outgoing::p2p(j, Msg::Round2P2p(MsgRound2P2p { share })))
                .await
                .map_err(KeygenError::SendError)?;
        }
    }

    // Round 3
    tracer.round_begins();
    tracer.receive_msgs();
    let decommitments = rounds.complete(round2).await.map_err(KeygenError::ReceiveMessage)?;
    tracer.msgs_received();

    tracer.stage("Validate round 1 decommitments");
    let blame = collect_blame(&decommitments, &commitments, "round2", |j, d, c| {
        HashCommit::<D>::builder()
            .mix_bytes(sid)
            .mix(n)
            .mix(j)
            .mix_many(&d.vss_commitments)
            .mix(d.sch_commit.0)
            .mix_bytes(&d.rid_bytes)
            .mix_bytes(&d.chain_code_bytes)
            .verify(&c.commitment, &d.decommit)
            .is_err()
    });
    if !blame.is_empty() {
        return Err(KeygenError::Aborted(ProtocolAborted::invalid_decommitment(blame)));
    }

    tracer.stage("Validate commitment vector lengths");
    let expected_len = if threshold.is_some() { t } else { 1 };
    let blame = collect_simple_blame(&decommitments, "round2", |d| {
        d.vss_commitments.len() != expected_len || d.rid_bytes.len() != L::SECURITY_BYTES
    });
    if !blame.is_empty() {
        return Err(KeygenError::Aborted(ProtocolAborted::invalid_data_size(blame)));
    }

    let my_share: Scalar<E> = if let Some(round2p2p) = round2p2p {
        tracer.stage("Validate and sum received VSS shares");
        let received = rounds.complete(round2p2p).await.map_err(KeygenError::ReceiveMessage)?;
        let blame = try_collect_blame(&received, &decommitments, "round2p2p", |_, share_msg, d| {
            let expected = key_share::evaluate_exponent_commitments(my_id, &d.vss_commitments);
            Ok::<_, Bug>(Point::generator() * share_msg.share != expected)
        })?;
        if !blame.is_empty() {
            return Err(KeygenError::Aborted(ProtocolAborted::invalid_vss_share(blame)));
        }
        received.iter().map(|m| m.share).fold(evaluate_polynomial(&coefficients, my_id), |acc, s| acc + s)
    } else {
        coefficients[0]
    };

    tracer.stage("Combine rid and chain code contributions");
    let rid = decommitments.iter().map(|d| &d.rid_bytes).fold(rid_bytes, xor_array);
    let chain_code = decommitments
        .iter()
        .map(|d| &d.chain_code_bytes)
        .fold(chain_code_bytes, xor_array);

    tracer.stage("Compute schnorr challenge and proof for a_0");
    let challenge = Scalar::<E>::hash_concat(tag_htc, &[&i.to_be_bytes(), rid.as_ref()])
        .map_err(Bug::HashToScalarError)?;
    let challenge = schnorr_pok::Challenge { nonce: challenge };
    let a_0 = coefficients[0];
    let sch_proof = schnorr_pok::prove(&sch_secret, &challenge, &a_0);

    tracer.send_msg();
    outgoings
        .send(Outgoing::broadcast(Msg::Round3(MsgRound3 { sch_proof })))
        .await
        .map_err(KeygenError::SendError)?;
    tracer.msg_sent();

    // Finalization
    tracer.round_begins();
    tracer.receive_msgs();
    let proofs = rounds.complete(round3).await.map_err(KeygenError::ReceiveMessage)?;
    tracer.msgs_received();

    tracer.stage("Verify schnorr proofs");
    let blame = try_collect_blame(&proofs, &decommitments, "round3", |j, proof_msg, d| {
        let challenge = Scalar::<E>::hash_concat(tag_htc, &[&j.to_be_bytes(), rid.as_ref()])
            .map_err(Bug::HashToScalarError)?;
        let challenge = schnorr_pok::Challenge { nonce: challenge };
        Ok::<_, Bug>(
            proof_msg
                .sch_proof
                .verify(&d.sch_commit, &challenge, &d.vss_commitments[0])
                .is_err(),
        )
    })?;
    if !blame.is_empty() {
        return Err(KeygenError::Aborted(ProtocolAborted::invalid_schnorr_proof(blame)));
    }

    tracer.stage("Assemble key share");
    let (public_shares, shared_public_key, vss_setup) = if threshold.is_some() {
        let public_shares: Vec<Point<E>> = (0..n)
            .map(|k| {
                let id_k = Scalar::<E>::from(u64::from(k) + 1);
                decommitments
                    .iter()
                    .map(|d| key_share::evaluate_exponent_commitments(id_k, &d.vss_commitments))
                    .fold(Point::zero(), |acc, p| acc + p)
            })
            .collect();
        let shared_public_key = decommitments
            .iter()
            .map(|d| d.vss_commitments[0])
            .fold(Point::zero(), |acc, p| acc + p);
        let ids = (0..n).map(|k| Scalar::<E>::from(u64::from(k) + 1)).collect();
        (
            public_shares,
            shared_public_key,
            Some(VssSetup {
                min_signers: threshold.expect("threshold is Some in this branch"),
                ids,
            }),
        )
    } else {
        let public_shares: Vec<Point<E>> = decommitments.iter().map(|d| d.vss_commitments[0]).collect();
        let shared_public_key = public_shares.iter().fold(Point::zero(), |acc, p| acc + p);
        (public_shares, shared_public_key, None)
    };

    let mut x = my_share;
    let share = IncompleteKeyShare {
        i,
        share_id: my_id,
        shared_public_key,
        public_shares,
        x: SecretScalar::new(&mut x),
        chain_code: {
            let mut cc = [0u8; 32];
            cc.copy_from_slice(&chain_code);
            cc
        },
        vss_setup,
    };

    tracer.protocol_ends();
    share.try_into().map_err(Bug::InvalidShareGenerated).map_err(KeygenError::InternalError)
}

fn evaluate_polynomial<E: Curve>(coefficients: &[Scalar<E>], at: Scalar<E>) -> Scalar<E> {
    coefficients.iter().rev().fold(Scalar::zero(), |acc, c| acc * at + c)
}

/// Error of the key generation protocol
#[derive(Debug, Error)]
pub enum KeygenError<IErr, OErr> {
    #[error("protocol was aborted by malicious party")]
    Aborted(#[source] ProtocolAborted),
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
    #[error("`Tag` appears to be an invalid `generic_ec::hash_to_curve::Tag`")]
    InvalidHashToCurveTag,
    #[error("hash to scalar returned error")]
    HashToScalarError(#[source] generic_ec::errors::HashError),
    #[error("invalid key share generated")]
    InvalidShareGenerated(#[source] key_share::InvalidKeyShare),
}

/// Protocol was aborted by a malicious party
#[derive(Debug, Error)]
#[error("protocol aborted; malicious parties: {parties:?}; reason: {reason}")]
pub struct ProtocolAborted {
    pub reason: ProtocolAbortReason,
    pub parties: Vec<AbortBlame>,
}

#[derive(Debug, Error)]
pub enum ProtocolAbortReason {
    #[error("decommitment doesn't match commitment")]
    InvalidDecommitment,
    #[error("party sent a message with missing or wrongly-sized data")]
    InvalidDataSize,
    #[error("VSS share failed the exponent-commitment check")]
    InvalidVssShare,
    #[error("provided invalid schnorr proof")]
    InvalidSchnorrProof,
}

macro_rules! make_factory {
    ($function:ident, $reason:ident) => {
        fn $function(parties: Vec<AbortBlame>) -> Self {
            Self {
                reason: ProtocolAbortReason::$reason,
                parties,
            }
        }
    };
}
impl ProtocolAborted {
    make_factory!(invalid_decommitment, InvalidDecommitment);
    make_factory!(invalid_data_size, InvalidDataSize);
    make_factory!(invalid_vss_share, InvalidVssShare);
    make_factory!(invalid_schnorr_proof, InvalidSchnorrProof);
}
