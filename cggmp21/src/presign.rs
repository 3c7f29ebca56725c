//! ECDSA presignature generation (spec.md §4.7): 3 rounds + finalization.
//!
//! Produces everything a signing round needs *before* the message digest is
//! known: a shared nonce point `R` and each party's additive shares `k_i`,
//! `chi_i` of `k` and `k·x` respectively. The bulk of the work is the MtA
//! (multiplicative-to-additive) conversion, run twice per ordered pair of
//! parties — once for the `k_j · γ_i` cross term, once for `k_j · w_i` — via
//! the `aff-g` proof in [`crate::zk::aff_g`].
//!
//! `δ_i`/`Δ_i` are additionally broadcast in the clear in round 3: spec.md's
//! prose gives the finalization sums `δ = Σδ_j`, `Δ = ΣΔ_j` without saying
//! how each party learns the others' `δ_j`/`Δ_j`, so this is the (recorded
//! in `DESIGN.md`) broadcast that makes those sums computable.

use digest::Digest;
use generic_ec::{Curve, Point, Scalar};
use paillier_zk::{libpaillier, unknown_order::BigNumber, BigNumberExt, SafePaillierEncryptionExt};
use rand_core::{CryptoRng, RngCore};
use round_based::{
    rounds_router::{simple_store::RoundInput, RoundsRouter},
    Delivery, Mpc, MpcParty, Outgoing, ProtocolMessage,
};
use thiserror_no_std::Error;

use crate::{
    execution_id::{ExecutionId, ProtocolChoice},
    key_share::KeyShare,
    paillier,
    progress::Tracer,
    security_level::SecurityLevel,
    utils,
    utils::{scalar_to_bignumber, AbortBlame},
    zk,
};

/// Message of the presignature-generation protocol
#[derive(ProtocolMessage, Clone)]
#[allow(clippy::large_enum_variant)]
pub enum Msg<E: Curve> {
    Round1Bcast(MsgRound1Bcast),
    Round1P2p(MsgRound1P2p),
    Round2Bcast(MsgRound2Bcast<E>),
    Round2P2p(MsgRound2P2p<E>),
    Round3Bcast(MsgRound3Bcast<E>),
    Round3P2p(MsgRound3P2p<E>),
}

#[derive(Clone)]
pub struct MsgRound1Bcast {
    K: BigNumber,
    G: BigNumber,
}

#[derive(Clone)]
pub struct MsgRound1P2p {
    /// psi_j in the paper: proof that `K_i`'s plaintext is in range, under
    /// the recipient's Ring-Pedersen parameters
    enc_proof: zk::enc::Proof,
}

#[derive(Clone)]
pub struct MsgRound2Bcast<E: Curve> {
    Gamma: Point<E>,
}

/// Unicast message of round 2: the two MtA ciphertext pairs plus their
/// `aff-g` proofs, and the `log-star` proof tying `G_i` to `Gamma_i`, all
/// addressed to one specific recipient's Ring-Pedersen parameters.
#[derive(Clone)]
pub struct MsgRound2P2p<E: Curve> {
    D: BigNumber,
    F: BigNumber,
    D_hat: BigNumber,
    F_hat: BigNumber,
    psi: zk::aff_g::Proof<E>,
    psi_hat: zk::aff_g::Proof<E>,
    psi_prime: zk::log_star::Proof<E>,
}

#[derive(Clone)]
pub struct MsgRound3Bcast<E: Curve> {
    delta: Scalar<E>,
    Delta: Point<E>,
}

#[derive(Clone)]
pub struct MsgRound3P2p<E: Curve> {
    /// psi-prime-prime in the paper: `K_i`'s plaintext matches `Delta_i`'s
    /// discrete log w.r.t. base `Gamma`
    psi_prime_prime: zk::log_star::Proof<E>,
}

/// A presignature: everything [`crate::signing`] needs once the message
/// digest becomes known. Single-use — sign against the same presignature
/// twice and the secret key leaks, so callers must discard it after one
/// [`crate::signing::SigningBuilder::sign`] call.
#[derive(Clone)]
pub struct PresignOutput<E: Curve> {
    pub k: Scalar<E>,
    pub chi: Scalar<E>,
    pub R: Point<E>,
}

pub struct PresignBuilder<'a, E: Curve, L, D> {
    key_share: &'a KeyShare<E, L>,
    execution_id: ExecutionId<E, L, D>,
    tracer: Option<&'a mut dyn Tracer>,
    hd_shift: Option<Scalar<E>>,
}

impl<'a, E, L, D> PresignBuilder<'a, E, L, D>
where
    E: Curve,
    L: SecurityLevel,
    D: Digest,
{
    pub fn new(key_share: &'a KeyShare<E, L>) -> Self {
        Self {
            key_share,
            execution_id: Default::default(),
            tracer: None,
            hd_shift: None,
        }
    }

    pub fn set_execution_id(self, execution_id: ExecutionId<E, L, D>) -> Self {
        Self { execution_id, ..self }
    }

    pub fn set_progress_tracer(mut self, tracer: &'a mut dyn Tracer) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// Applies a BIP32 derivation offset (spec.md §4.10) to this presignature.
    ///
    /// `delta` is the cumulative `Σ I_L mod q` of a non-hardened derivation
    /// path, e.g. from [`key_share::hd_wallet::derive_path`]. Every party in
    /// the session must be given the same `delta`; internally it's folded
    /// into the signing weight of whichever party ends up at index 0 of the
    /// *current* (post-[`KeyShare::subset`]) party ordering — the shares of
    /// the rest are left untouched, so the sum is still correct. Once this
    /// presignature signs, the result verifies against `Pubkey + delta·G`
    /// (the child key), not the root `Pubkey`.
    pub fn set_derivation_delta(mut self, delta: Scalar<E>) -> Self {
        self.hd_shift = Some(delta);
        self
    }

    pub async fn generate<R, M>(self, rng: &mut R, party: M) -> Result<PresignOutput<E>, PresignError<M::ReceiveError, M::SendError>>
    where
        R: RngCore + CryptoRng,
        M: Mpc<ProtocolMessage = Msg<E>>,
        D: Digest<OutputSize = digest::typenum::U32> + Clone + 'static,
    {
        run_presign(rng, party, self.key_share, self.execution_id, self.tracer, self.hd_shift).await
    }
}

/// This party's own signing weight and its public point, shifted by the HD
/// derivation delta if this party is index 0 (the convention
/// [`PresignBuilder::set_derivation_delta`] documents).
fn effective_weight_and_point<E: Curve, L>(key_share: &KeyShare<E, L>, hd_shift: Option<Scalar<E>>) -> (Scalar<E>, Point<E>) {
    let w = key_share.signer_weight();
    let point = key_share.public_weight(key_share.i());
    match (key_share.i(), hd_shift) {
        (0, Some(delta)) => (w + delta, point + Point::generator() * delta),
        _ => (w, point),
    }
}

/// The public point peers should expect party `idx`'s witness to open to,
/// shifted the same way [`effective_weight_and_point`] shifts party `idx`'s
/// own local witness.
fn effective_public_weight<E: Curve, L>(key_share: &KeyShare<E, L>, idx: u16, hd_shift: Option<Scalar<E>>) -> Point<E> {
    let point = key_share.public_weight(idx);
    match (idx, hd_shift) {
        (0, Some(delta)) => point + Point::generator() * delta,
        _ => point,
    }
}

/// Runs one ordered-pair MtA leg: proves (to `peer_aux`'s owner) that `D`/`F`
/// correctly affinely combine `c` (the peer's `K_j`) with `witness`, and
/// returns the mask this party keeps as its own additive share of the cross
/// term `k_j · witness`.
#[allow(clippy::too_many_arguments)]
fn mta_step<E: Curve, Dig: Digest, R: RngCore + CryptoRng>(
    rng: &mut R,
    transcript: Dig,
    peer_aux: &zk::Aux,
    n0: &BigNumber,
    n1: &BigNumber,
    c: &BigNumber,
    witness: &Scalar<E>,
    witness_point: &Point<E>,
    params: &zk::SecurityParams,
) -> Result<(BigNumber, BigNumber, BigNumber, zk::aff_g::Proof<E>), Bug> {
    let beta = zk::sample_pm(&zk::two_to(params.l + params.epsilon), rng);
    let y = BigNumber::zero() - &beta;

    let key0 = utils::encryption_key_from_n(n0);
    let key1 = utils::encryption_key_from_n(n1);
    let nonce = utils::sample_bigint_in_mult_group(rng, n0);
    let nonce_y = utils::sample_bigint_in_mult_group(rng, n1);

    let enc_y_n0 = key0.encrypt_with(&y, &nonce).map_err(|_| Bug::Paillier)?;
    let d = paillier::ct_add(n0, &paillier::ct_scale(n0, &scalar_to_bignumber(witness), c), &enc_y_n0);
    let f = key1.encrypt_with(&y, &nonce_y).map_err(|_| Bug::Paillier)?;

    let proof = zk::aff_g::prove(
        transcript,
        peer_aux,
        zk::aff_g::Data { n0, n1, c, d: &d, f: &f, x: witness_point },
        zk::aff_g::PrivateData { x: witness, y: &y, nonce: &nonce, nonce_y: &nonce_y },
        params,
        rng,
    )
    .map_err(Bug::PiAffG)?;

    Ok((d, f, beta, proof))
}

#[allow(clippy::too_many_arguments)]
async fn run_presign<R, M, E, L, D>(
    rng: &mut R,
    party: M,
    key_share: &KeyShare<E, L>,
    execution_id: ExecutionId<E, L, D>,
    mut tracer: Option<&mut dyn Tracer>,
    hd_shift: Option<Scalar<E>>,
) -> Result<PresignOutput<E>, PresignError<M::ReceiveError, M::SendError>>
where
    R: RngCore + CryptoRng,
    M: Mpc<ProtocolMessage = Msg<E>>,
    E: Curve,
    L: SecurityLevel,
    D: Digest<OutputSize = digest::typenum::U32> + Clone + 'static,
{
    tracer.protocol_begins();

    tracer.stage("Setup networking");
    let i = key_share.i();
    let n = key_share.n();
    let MpcParty { delivery, .. } = party.into_party();
    let (incomings, mut outgoings) = delivery.split();

    let mut rounds = RoundsRouter::<Msg<E>>::builder();
    let round1_bc = rounds.add_round(RoundInput::<MsgRound1Bcast>::broadcast(i, n));
    let round1_p2p = rounds.add_round(RoundInput::<MsgRound1P2p>::p2p(i, n));
    let round2_bc = rounds.add_round(RoundInput::<MsgRound2Bcast<E>>::broadcast(i, n));
    let round2_p2p = rounds.add_round(RoundInput::<MsgRound2P2p<E>>::p2p(i, n));
    let round3_bc = rounds.add_round(RoundInput::<MsgRound3Bcast<E>>::broadcast(i, n));
    let round3_p2p = rounds.add_round(RoundInput::<MsgRound3P2p<E>>::p2p(i, n));
    let mut rounds = rounds.listen(incomings);

    tracer.stage("Precompute execution id");
    let execution_id = execution_id.evaluate(ProtocolChoice::Presign);
    let sid = execution_id.as_slice();
    let parties_shared_state = D::new_with_prefix(&execution_id);

    let my_aux = &key_share.aux.parties()[usize::from(i)];
    let (p, q) = key_share.aux.primes();
    let dec_key = libpaillier::DecryptionKey::with_primes_unchecked(p, q).ok_or(Bug::PaillierKeyError)?;
    let params = zk::SecurityParams { l: L::ELL, epsilon: L::EPSILON };
    let (w_i, w_point) = effective_weight_and_point(key_share, hd_shift);

    // Round 1
    tracer.round_begins();

    tracer.stage("Sample k_i, gamma_i and encrypt them under our own Paillier key");
    let k_i = Scalar::<E>::random(rng);
    let gamma_i = Scalar::<E>::random(rng);
    let my_key = utils::encryption_key_from_n(&my_aux.N);
    let nonce_k = utils::sample_bigint_in_mult_group(rng, &my_aux.N);
    let nonce_g = utils::sample_bigint_in_mult_group(rng, &my_aux.N);
    let K_i = my_key.encrypt_with(&scalar_to_bignumber(&k_i), &nonce_k).map_err(|_| Bug::Paillier)?;
    let G_i = my_key.encrypt_with(&scalar_to_bignumber(&gamma_i), &nonce_g).map_err(|_| Bug::Paillier)?;

    tracer.send_msg();
    outgoings
        .send(Outgoing::broadcast(Msg::Round1Bcast(MsgRound1Bcast { K: K_i.clone(), G: G_i.clone() })))
        .await
        .map_err(PresignError::SendError)?;
    for j in utils::iter_peers(i, n) {
        let peer = &key_share.aux.parties()[usize::from(j)];
        let peer_aux = zk::Aux { s: peer.s.clone(), t: peer.t.clone(), rsa_modulo: peer.N.clone() };
        let enc_proof = zk::enc::prove(
            parties_shared_state.clone(),
            &peer_aux,
            zk::enc::Data { n: &my_aux.N, c: &K_i },
            zk::enc::PrivateData { k: &scalar_to_bignumber(&k_i), rho: &nonce_k },
            &params,
            rng,
        )
        .map_err(Bug::PiEnc)?;
        outgoings
            .send(Outgoing::p2p(j, Msg::Round1P2p(MsgRound1P2p { enc_proof })))
            .await
            .map_err(PresignError::SendError)?;
    }
    tracer.msg_sent();

    // Round 2
    tracer.round_begins();
    tracer.receive_msgs();
    let ciphertexts = rounds.complete(round1_bc).await.map_err(PresignError::ReceiveMessage)?;
    let enc_proofs = rounds.complete(round1_p2p).await.map_err(PresignError::ReceiveMessage)?;
    tracer.msgs_received();

    tracer.stage("Validate incoming enc proofs");
    let blame = utils::collect_blame(&enc_proofs, &ciphertexts, "round1", |j, msg, c| {
        if j == i {
            return false;
        }
        let peer = &key_share.aux.parties()[usize::from(j)];
        zk::enc::verify(
            parties_shared_state.clone(),
            &zk::Aux { s: my_aux.s.clone(), t: my_aux.t.clone(), rsa_modulo: my_aux.N.clone() },
            zk::enc::Data { n: &peer.N, c: &c.K },
            &params,
            &msg.enc_proof,
        )
        .is_err()
    });
    if !blame.is_empty() {
        return Err(PresignError::Aborted(ProtocolAborted::invalid_enc_proof(blame)));
    }

    tracer.stage("Broadcast Gamma_i");
    let Gamma_i = Point::<E>::generator() * gamma_i;
    outgoings
        .send(Outgoing::broadcast(Msg::Round2Bcast(MsgRound2Bcast { Gamma: Gamma_i })))
        .await
        .map_err(PresignError::SendError)?;

    tracer.stage("Run MtA with every peer for both the gamma and the w cross terms");
    let mut beta: Vec<Scalar<E>> = vec![Scalar::zero(); usize::from(n)];
    let mut beta_hat: Vec<Scalar<E>> = vec![Scalar::zero(); usize::from(n)];
    for j in utils::iter_peers(i, n) {
        let peer = &key_share.aux.parties()[usize::from(j)];
        let peer_aux = zk::Aux { s: peer.s.clone(), t: peer.t.clone(), rsa_modulo: peer.N.clone() };
        let c_j = &ciphertexts[usize::from(j)].K;

        let (D, F, beta_ij, psi) = mta_step(
            rng,
            parties_shared_state.clone(),
            &peer_aux,
            &peer.N,
            &my_aux.N,
            c_j,
            &gamma_i,
            &Gamma_i,
            &params,
        )?;
        let (D_hat, F_hat, beta_hat_ij, psi_hat) = mta_step(
            rng,
            parties_shared_state.clone(),
            &peer_aux,
            &peer.N,
            &my_aux.N,
            c_j,
            &w_i,
            &w_point,
            &params,
        )?;
        beta[usize::from(j)] = beta_ij.to_scalar();
        beta_hat[usize::from(j)] = beta_hat_ij.to_scalar();

        let psi_prime = zk::log_star::prove(
            parties_shared_state.clone(),
            &peer_aux,
            zk::log_star::Data { n: &my_aux.N, c: &G_i, x: &Gamma_i, b: Point::generator().into() },
            zk::log_star::PrivateData { x: &gamma_i, rho: &nonce_g },
            &params,
            rng,
        )
        .map_err(Bug::PiLogStar)?;

        outgoings
            .send(Outgoing::p2p(j, Msg::Round2P2p(MsgRound2P2p { D, F, D_hat, F_hat, psi, psi_hat, psi_prime })))
            .await
            .map_err(PresignError::SendError)?;
    }
    tracer.msg_sent();

    // Round 3
    tracer.round_begins();
    tracer.receive_msgs();
    let Gammas = rounds.complete(round2_bc).await.map_err(PresignError::ReceiveMessage)?;
    let mtas = rounds.complete(round2_p2p).await.map_err(PresignError::ReceiveMessage)?;
    tracer.msgs_received();

    tracer.stage("Validate incoming aff-g/aff-g-hat/log-star(gamma) proofs");
    let my_aux_for_verify = zk::Aux { s: my_aux.s.clone(), t: my_aux.t.clone(), rsa_modulo: my_aux.N.clone() };
    let blame = utils::try_collect_blame(&mtas, &Gammas, "round2", |j, msg, g| {
        if j == i {
            return Ok(false);
        }
        let peer = &key_share.aux.parties()[usize::from(j)];
        let d1 = zk::aff_g::verify(
            parties_shared_state.clone(),
            &my_aux_for_verify,
            zk::aff_g::Data { n0: &my_aux.N, n1: &peer.N, c: &K_i, d: &msg.D, f: &msg.F, x: &g.Gamma },
            &params,
            &msg.psi,
        )
        .is_err();
        let d2 = zk::aff_g::verify(
            parties_shared_state.clone(),
            &my_aux_for_verify,
            zk::aff_g::Data { n0: &my_aux.N, n1: &peer.N, c: &K_i, d: &msg.D_hat, f: &msg.F_hat, x: &effective_public_weight(key_share, j, hd_shift) },
            &params,
            &msg.psi_hat,
        )
        .is_err();
        let d3 = zk::log_star::verify(
            parties_shared_state.clone(),
            &my_aux_for_verify,
            zk::log_star::Data { n: &peer.N, c: &ciphertexts[usize::from(j)].G, x: &g.Gamma, b: Point::generator().into() },
            &params,
            &msg.psi_prime,
        )
        .is_err();
        Ok::<_, Bug>(d1 || d2 || d3)
    })?;
    if !blame.is_empty() {
        return Err(PresignError::Aborted(ProtocolAborted::invalid_mta_proof(blame)));
    }

    tracer.stage("Sum Gamma, decrypt MtA outputs, compute delta_i/chi_i/Delta_i");
    let Gamma = Gammas.iter().fold(Point::zero(), |acc, g| acc + g.Gamma);

    let mut delta_i = gamma_i * k_i;
    let mut chi_i = w_i * k_i;
    for j in utils::iter_peers(i, n) {
        let msg = &mtas[usize::from(j)];
        let alpha: Scalar<E> = paillier::decrypt_signed(&dec_key, &my_aux.N, &msg.D)
            .map_err(|_| Bug::Paillier)?
            .to_scalar();
        let alpha_hat: Scalar<E> = paillier::decrypt_signed(&dec_key, &my_aux.N, &msg.D_hat)
            .map_err(|_| Bug::Paillier)?
            .to_scalar();
        delta_i = delta_i + alpha + beta[usize::from(j)];
        chi_i = chi_i + alpha_hat + beta_hat[usize::from(j)];
    }
    let Delta_i = Gamma * k_i;

    tracer.stage("Prove log-star tying K_i, Delta_i and Gamma, broadcast delta_i/Delta_i");
    outgoings
        .send(Outgoing::broadcast(Msg::Round3Bcast(MsgRound3Bcast { delta: delta_i, Delta: Delta_i })))
        .await
        .map_err(PresignError::SendError)?;
    for j in utils::iter_peers(i, n) {
        let peer = &key_share.aux.parties()[usize::from(j)];
        let peer_aux = zk::Aux { s: peer.s.clone(), t: peer.t.clone(), rsa_modulo: peer.N.clone() };
        let psi_prime_prime = zk::log_star::prove(
            parties_shared_state.clone(),
            &peer_aux,
            zk::log_star::Data { n: &my_aux.N, c: &K_i, x: &Delta_i, b: Gamma },
            zk::log_star::PrivateData { x: &k_i, rho: &nonce_k },
            &params,
            rng,
        )
        .map_err(Bug::PiLogStar)?;
        outgoings
            .send(Outgoing::p2p(j, Msg::Round3P2p(MsgRound3P2p { psi_prime_prime })))
            .await
            .map_err(PresignError::SendError)?;
    }
    tracer.msg_sent();

    // Finalization
    tracer.round_begins();
    tracer.receive_msgs();
    let deltas = rounds.complete(round3_bc).await.map_err(PresignError::ReceiveMessage)?;
    let closings = rounds.complete(round3_p2p).await.map_err(PresignError::ReceiveMessage)?;
    tracer.msgs_received();

    tracer.stage("Validate incoming log-star(K, Delta) proofs");
    let blame = utils::collect_blame(&closings, &deltas, "round3", |j, msg, d| {
        if j == i {
            return false;
        }
        let peer = &key_share.aux.parties()[usize::from(j)];
        zk::log_star::verify(
            parties_shared_state.clone(),
            &my_aux_for_verify,
            zk::log_star::Data { n: &peer.N, c: &ciphertexts[usize::from(j)].K, x: &d.Delta, b: Gamma },
            &params,
            &msg.psi_prime_prime,
        )
        .is_err()
    });
    if !blame.is_empty() {
        return Err(PresignError::Aborted(ProtocolAborted::invalid_log_star_proof(blame)));
    }

    tracer.stage("Sum delta/Delta and check delta*G == Delta");
    let delta: Scalar<E> = deltas.iter().fold(Scalar::zero(), |acc, d| acc + d.delta);
    let Delta: Point<E> = deltas.iter().fold(Point::zero(), |acc, d| acc + d.Delta);
    if Point::<E>::generator() * delta != Delta {
        return Err(PresignError::Aborted(ProtocolAborted::delta_check_failed()));
    }

    tracer.stage("Derive R");
    let delta_inv = delta.invert().ok_or(Bug::ZeroDelta)?;
    let R = Gamma * delta_inv;

    tracer.protocol_ends();
    Ok(PresignOutput { k: k_i, chi: chi_i, R })
}

/// Error of the presignature-generation protocol
#[derive(Debug, Error)]
pub enum PresignError<IErr, OErr> {
    #[error("protocol was aborted by malicious party")]
    Aborted(#[source] ProtocolAborted),
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
    #[error("unexpected error constructing the paillier decryption key")]
    PaillierKeyError,
    #[error("paillier operation failed")]
    Paillier,
    #[error("couldn't prove an enc statement")]
    PiEnc(#[source] zk::ZkError),
    #[error("couldn't prove an aff-g statement")]
    PiAffG(#[source] zk::ZkError),
    #[error("couldn't prove a log-star statement")]
    PiLogStar(#[source] zk::ZkError),
    #[error("delta summed to zero, cannot invert")]
    ZeroDelta,
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
    #[error("provided invalid proof that K_i's plaintext is in range")]
    InvalidEncProof,
    #[error("provided invalid aff-g, aff-g-hat or log-star(gamma) proof")]
    InvalidMtaProof,
    #[error("provided invalid log-star(K, Delta) proof")]
    InvalidLogStarProof,
    #[error("delta*G != Delta; culprit identification requires a further fault-detection sub-protocol, out of scope")]
    DeltaCheckFailed,
}

macro_rules! make_factory {
    ($function:ident, $reason:ident) => {
        fn $function(parties: Vec<AbortBlame>) -> Self {
            Self { reason: ProtocolAbortReason::$reason, parties }
        }
    };
}
impl ProtocolAborted {
    make_factory!(invalid_enc_proof, InvalidEncProof);
    make_factory!(invalid_mta_proof, InvalidMtaProof);
    make_factory!(invalid_log_star_proof, InvalidLogStarProof);

    fn delta_check_failed() -> Self {
        Self { reason: ProtocolAbortReason::DeltaCheckFailed, parties: Vec::new() }
    }
}
