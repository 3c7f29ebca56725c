//! Auxiliary setup: generates each party's Paillier key and Ring-Pedersen
//! parameters (3 rounds + finalization).
//!
//! Unlike the upstream "key refresh" protocol this is grounded on, auxiliary
//! setup here never touches the secret share `x_i` or an ElGamal `y` — it
//! only produces [`AuxInfo`], matching the spec's `AuxSaveData` (pure
//! Paillier + Ring-Pedersen material, reused across many signings).
//!
//! The `mod` proof is computed in round 3 (after `rho` is fully XOR'd) and
//! sent p2p bundled with the `fac` proof, not broadcast in round 2: of the
//! two wire-incompatible variants that exist upstream, this is the more
//! widely used one.

use digest::Digest;
use generic_ec::Curve;
use generic_ec_zkp::hash_commitment::{self, HashCommit};
use paillier_zk::{
    libpaillier, no_small_factor::non_interactive as pi_fac, paillier_blum_modulus as pi_mod,
    unknown_order::BigNumber, BigNumberExt,
};
use rand_core::{CryptoRng, RngCore};
use round_based::{
    rounds_router::{simple_store::RoundInput, RoundsRouter},
    Delivery, Mpc, MpcParty, Outgoing, ProtocolMessage,
};
use thiserror_no_std::Error;

use crate::{
    execution_id::{ExecutionId, ProtocolChoice},
    key_share::{AuxInfo, PartyAux},
    progress::Tracer,
    security_level::SecurityLevel,
    utils,
    utils::{iter_peers, xor_array, AbortBlame},
};

/// Message of the auxiliary-setup protocol
#[derive(ProtocolMessage, Clone)]
#[allow(clippy::large_enum_variant)]
pub enum Msg<D: Digest> {
    Round1(MsgRound1<D>),
    Round2(MsgRound2<D>),
    Round3(MsgRound3),
}

#[derive(Clone)]
pub struct MsgRound1<D: Digest> {
    commitment: HashCommit<D>,
}

#[derive(Clone)]
pub struct MsgRound2<D: Digest> {
    N: BigNumber,
    s: BigNumber,
    t: BigNumber,
    /// psi-hat_i in the paper: the `prm` proof that `(N, s, t)` is well formed
    params_proof: crate::zk::ring_pedersen_parameters::Proof,
    /// rho_i in the paper
    rho_bytes: Vec<u8>,
    /// u_i in the paper
    decommit: hash_commitment::DecommitNonce<D>,
}

/// Unicast message of round 3, sent to each peer
#[derive(Clone)]
pub struct MsgRound3 {
    /// psi_i in the paper: the `mod` proof that `N` is a Paillier-Blum modulus
    mod_proof: (pi_mod::Commitment, pi_mod::Proof),
    /// phi_i^j in the paper: the `fac` proof, keyed under the recipient's
    /// own Ring-Pedersen parameters
    fac_proof: pi_fac::Proof,
}

/// Paillier primes pre-generated ahead of time, to speed up tests and
/// benchmarks; see [`PregeneratedPrimes::generate`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PregeneratedPrimes<L> {
    p: BigNumber,
    q: BigNumber,
    _ph: core::marker::PhantomData<L>,
}

impl<L: SecurityLevel> PregeneratedPrimes<L> {
    pub fn new(p: BigNumber, q: BigNumber) -> Self {
        Self {
            p,
            q,
            _ph: core::marker::PhantomData,
        }
    }

    pub fn split(self) -> (BigNumber, BigNumber) {
        (self.p, self.q)
    }

    /// Samples two 1024-bit safe primes. Takes a while.
    pub fn generate<R: RngCore>(rng: &mut R) -> Self {
        Self {
            p: BigNumber::safe_prime_from_rng(4 * L::SECURITY_BITS, rng),
            q: BigNumber::safe_prime_from_rng(4 * L::SECURITY_BITS, rng),
            _ph: core::marker::PhantomData,
        }
    }
}

pub struct AuxGenBuilder<'a, E, L, D>
where
    L: SecurityLevel,
    D: Digest,
{
    i: u16,
    n: u16,
    execution_id: ExecutionId<E, L, D>,
    pregenerated: Option<PregeneratedPrimes<L>>,
    tracer: Option<&'a mut dyn Tracer>,
}

impl<'a, E, L, D> AuxGenBuilder<'a, E, L, D>
where
    E: Curve,
    L: SecurityLevel,
    D: Digest,
{
    pub fn new(i: u16, n: u16) -> Self {
        Self {
            i,
            n,
            execution_id: Default::default(),
            pregenerated: None,
            tracer: None,
        }
    }

    pub fn set_execution_id(self, execution_id: ExecutionId<E, L, D>) -> Self {
        Self { execution_id, ..self }
    }

    /// Supplies Paillier primes generated ahead of time with
    /// [`PregeneratedPrimes::generate`]. If unset, primes are generated
    /// on a blocking worker during round 1.
    pub fn set_pregenerated_primes(self, pregenerated: PregeneratedPrimes<L>) -> Self {
        Self {
            pregenerated: Some(pregenerated),
            ..self
        }
    }

    pub fn set_progress_tracer(mut self, tracer: &'a mut dyn Tracer) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub async fn start<R, M>(self, rng: &mut R, party: M) -> Result<AuxInfo<L>, AuxGenError<M::ReceiveError, M::SendError>>
    where
        R: RngCore + CryptoRng,
        M: Mpc<ProtocolMessage = Msg<D>>,
        D: Digest<OutputSize = digest::typenum::U32> + Clone + 'static,
    {
        run_aux_gen(
            rng,
            party,
            self.i,
            self.n,
            self.execution_id,
            self.pregenerated,
            self.tracer,
        )
        .await
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_aux_gen<R, M, E, L, D>(
    mut rng: &mut R,
    party: M,
    i: u16,
    n: u16,
    execution_id: ExecutionId<E, L, D>,
    pregenerated: Option<PregeneratedPrimes<L>>,
    mut tracer: Option<&mut dyn Tracer>,
) -> Result<AuxInfo<L>, AuxGenError<M::ReceiveError, M::SendError>>
where
    R: RngCore + CryptoRng,
    M: Mpc<ProtocolMessage = Msg<D>>,
    L: SecurityLevel,
    D: Digest<OutputSize = digest::typenum::U32> + Clone + 'static,
{
    tracer.protocol_begins();

    tracer.stage("Setup networking");
    let MpcParty { delivery, blocking, .. } = party.into_party();
    let (incomings, mut outgoings) = delivery.split();

    let mut rounds = RoundsRouter::<Msg<D>>::builder();
    let round1 = rounds.add_round(RoundInput::<MsgRound1<D>>::broadcast(i, n));
    let round2 = rounds.add_round(RoundInput::<MsgRound2<D>>::broadcast(i, n));
    let round3 = rounds.add_round(RoundInput::<MsgRound3>::p2p(i, n));
    let mut rounds = rounds.listen(incomings);

    tracer.stage("Precompute execution id");
    let execution_id = execution_id.evaluate(ProtocolChoice::AuxGen);
    let sid = execution_id.as_slice();
    let parties_shared_state = D::new_with_prefix(&execution_id);

    // Round 1
    tracer.round_begins();

    tracer.stage("Retrieve or compute Paillier primes (p, q)");
    let PregeneratedPrimes { p, q, .. } = match pregenerated {
        Some(x) => x,
        None => blocking
            .spawn(|| {
                let mut rng = rand_core::OsRng;
                PregeneratedPrimes::generate(&mut rng)
            })
            .await
            .map_err(|_| AuxGenError::SpawnError)?,
    };
    tracer.stage("Compute Paillier decryption key (N)");
    let N = &p * &q;
    let phi_n = (&p - 1) * (&q - 1);
    let _dec =
        libpaillier::DecryptionKey::with_primes_unchecked(&p, &q).ok_or(Bug::PaillierKeyError)?;

    tracer.stage("Generate Ring-Pedersen parameters (s, t, lambda)");
    let r = utils::sample_bigint_in_mult_group(rng, &N);
    let lambda = BigNumber::from_rng(&phi_n, rng);
    let t = r.modmul(&r, &N);
    let s = t.powmod(&lambda, &N).map_err(|_| Bug::PowMod)?;

    tracer.stage("Prove Ππrm");
    let params_proof = crate::zk::ring_pedersen_parameters::prove(
        parties_shared_state.clone(),
        rng,
        crate::zk::ring_pedersen_parameters::Data { N: &N, s: &s, t: &t },
        &phi_n,
        &lambda,
    )
    .map_err(Bug::PiPrm)?;

    tracer.stage("Sample rho_i contribution");
    let mut rho_bytes = vec![0u8; L::SECURITY_BYTES];
    rng.fill_bytes(&mut rho_bytes);

    tracer.stage("Compute hash commitment");
    let (hash_commit, decommit) = HashCommit::<D>::builder()
        .mix_bytes(sid)
        .mix(n)
        .mix(i)
        .mix_bytes(&N.to_bytes())
        .mix_bytes(&s.to_bytes())
        .mix_bytes(&t.to_bytes())
        .mix_bytes(&rho_bytes)
        .commit(rng);

    tracer.send_msg();
    let commitment = MsgRound1 { commitment: hash_commit };
    outgoings
        .send(Outgoing::broadcast(Msg::Round1(commitment.clone())))
        .await
        .map_err(AuxGenError::SendError)?;
    tracer.msg_sent();

    // Round 2
    tracer.round_begins();
    tracer.receive_msgs();
    let commitments = rounds.complete(round1).await.map_err(AuxGenError::ReceiveMessage)?;
    tracer.msgs_received();

    tracer.send_msg();
    let decommitment = MsgRound2 {
        N: N.clone(),
        s: s.clone(),
        t: t.clone(),
        params_proof,
        rho_bytes: rho_bytes.clone(),
        decommit,
    };
    outgoings
        .send(Outgoing::broadcast(Msg::Round2(decommitment.clone())))
        .await
        .map_err(AuxGenError::SendError)?;
    tracer.msg_sent();

    // Round 3
    tracer.round_begins();
    tracer.receive_msgs();
    let decommitments = rounds.complete(round2).await.map_err(AuxGenError::ReceiveMessage)?;
    tracer.msgs_received();

    tracer.stage("Validate round 1 decommitments");
    let blame = utils::collect_blame(&decommitments, &commitments, "round2", |j, d, c| {
        HashCommit::<D>::builder()
            .mix_bytes(sid)
            .mix(n)
            .mix(j)
            .mix_bytes(&d.N.to_bytes())
            .mix_bytes(&d.s.to_bytes())
            .mix_bytes(&d.t.to_bytes())
            .mix_bytes(&d.rho_bytes)
            .verify(&c.commitment, &d.decommit)
            .is_err()
    });
    if !blame.is_empty() {
        return Err(AuxGenError::Aborted(ProtocolAborted::invalid_decommitment(blame)));
    }

    tracer.stage("Validate N sizes and rho lengths");
    let blame = utils::collect_simple_blame(&decommitments, "round2", |d| {
        d.N.bit_length() < 2048 || d.rho_bytes.len() != L::SECURITY_BYTES
    });
    if !blame.is_empty() {
        return Err(AuxGenError::Aborted(ProtocolAborted::invalid_data_size(blame)));
    }

    tracer.stage("Validate Ππrm proofs");
    let blame = utils::collect_simple_blame(&decommitments, "round2", |d| {
        crate::zk::ring_pedersen_parameters::verify(
            parties_shared_state.clone(),
            crate::zk::ring_pedersen_parameters::Data { N: &d.N, s: &d.s, t: &d.t },
            &d.params_proof,
        )
        .is_err()
    });
    if !blame.is_empty() {
        return Err(AuxGenError::Aborted(ProtocolAborted::invalid_ring_pedersen_parameters(blame)));
    }

    tracer.stage("Combine rho contributions");
    let rho_bytes = decommitments.iter().map(|d| &d.rho_bytes).fold(rho_bytes, xor_array);

    tracer.stage("Compute Ππmod (psi_i)");
    let mod_proof = {
        let data = pi_mod::Data { n: N.clone() };
        let pdata = pi_mod::PrivateData { p: p.clone(), q: q.clone() };
        pi_mod::non_interactive::prove(parties_shared_state.clone(), &data, &pdata, &mut rng)
            .map_err(Bug::PiMod)?
    };

    tracer.stage("Prepare Ππfac security parameters");
    let pi_fac_security = pi_fac::SecurityParams {
        l: L::ELL,
        epsilon: L::EPSILON,
        q: L::q(),
    };

    for j in iter_peers(i, n) {
        tracer.stage("Compute Ππfac (phi_i^j) under peer's Ring-Pedersen parameters");
        let peer = &decommitments[usize::from(j)];
        let fac_proof = pi_fac::prove(
            parties_shared_state.clone(),
            &pi_fac::Aux {
                s: peer.s.clone(),
                t: peer.t.clone(),
                rsa_modulo: peer.N.clone(),
            },
            pi_fac::Data { n: &N, n_root: &utils::sqrt(&N) },
            pi_fac::PrivateData { p: &p, q: &q },
            &pi_fac_security,
            &mut rng,
        )
        .map_err(Bug::PiFac)?;

        tracer.send_msg();
        outgoings
            .send(Outgoing::p2p(
                j,
                Msg::Round3(MsgRound3 {
                    mod_proof: mod_proof.clone(),
                    fac_proof,
                }),
            ))
            .await
            .map_err(AuxGenError::SendError)?;
        tracer.msg_sent();
    }

    // Finalization
    tracer.round_begins();
    tracer.receive_msgs();
    let proofs = rounds.complete(round3).await.map_err(AuxGenError::ReceiveMessage)?;
    tracer.msgs_received();

    tracer.stage("Validate Ππmod proofs");
    let blame = utils::collect_blame(&proofs, &decommitments, "round3", |_, proof_msg, d| {
        let data = pi_mod::Data { n: d.N.clone() };
        let (ref comm, ref proof) = proof_msg.mod_proof;
        pi_mod::non_interactive::verify(parties_shared_state.clone(), &data, comm, proof).is_err()
    });
    if !blame.is_empty() {
        return Err(AuxGenError::Aborted(ProtocolAborted::invalid_mod_proof(blame)));
    }

    tracer.stage("Validate Ππfac proofs (under our own Ring-Pedersen parameters)");
    let blame = utils::collect_blame(&proofs, &decommitments, "round3", |_, proof_msg, d| {
        pi_fac::verify(
            parties_shared_state.clone(),
            &pi_fac::Aux { s: s.clone(), t: t.clone(), rsa_modulo: N.clone() },
            pi_fac::Data { n: &d.N, n_root: &utils::sqrt(&d.N) },
            &pi_fac_security,
            &proof_msg.fac_proof,
        )
        .is_err()
    });
    if !blame.is_empty() {
        return Err(AuxGenError::Aborted(ProtocolAborted::invalid_fac_proof(blame)));
    }

    tracer.stage("Assemble auxiliary info");
    let parties = decommitments
        .iter()
        .map(|d| PartyAux {
            N: d.N.clone(),
            s: d.s.clone(),
            t: d.t.clone(),
        })
        .collect();

    tracer.protocol_ends();
    Ok(AuxInfo::new(p, q, parties))
}

/// Error of the auxiliary-setup protocol
#[derive(Debug, Error)]
pub enum AuxGenError<IErr, OErr> {
    #[error("protocol was aborted by malicious party")]
    Aborted(#[source] ProtocolAborted),
    #[error("receive message")]
    ReceiveMessage(
        #[source] round_based::rounds_router::CompleteRoundError<round_based::rounds_router::simple_store::RoundInputError, IErr>,
    ),
    #[error("send message")]
    SendError(#[source] OErr),
    #[error("could not spawn worker thread")]
    SpawnError,
    #[error("internal error")]
    InternalError(#[from] Bug),
}

/// Unexpected error not caused by other parties
#[derive(Debug, Error)]
pub enum Bug {
    #[error("unexpected error constructing the paillier decryption key")]
    PaillierKeyError,
    #[error("powmod not defined")]
    PowMod,
    #[error("couldn't prove a prm statement")]
    PiPrm(#[source] crate::zk::ring_pedersen_parameters::ZkError),
    #[error("couldn't prove a mod statement")]
    PiMod(#[source] paillier_zk::Error),
    #[error("couldn't prove a fac statement")]
    PiFac(#[source] paillier_zk::Error),
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
    #[error("N, s and t parameters are invalid")]
    InvalidRingPedersenParameters,
    #[error("provided invalid proof for Rmod")]
    InvalidModProof,
    #[error("provided invalid proof for Rfac")]
    InvalidFacProof,
}

macro_rules! make_factory {
    ($function:ident, $reason:ident) => {
        fn $function(parties: Vec<AbortBlame>) -> Self {
            Self { reason: ProtocolAbortReason::$reason, parties }
        }
    };
}
impl ProtocolAborted {
    make_factory!(invalid_decommitment, InvalidDecommitment);
    make_factory!(invalid_data_size, InvalidDataSize);
    make_factory!(invalid_ring_pedersen_parameters, InvalidRingPedersenParameters);
    make_factory!(invalid_mod_proof, InvalidModProof);
    make_factory!(invalid_fac_proof, InvalidFacProof);
}
