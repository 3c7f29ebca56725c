//! The CGGMP21 paper's own (non-FROST) EdDSA construction: reuses the same
//! Paillier-backed encrypted-nonce machinery as `cggmp21`'s ECDSA presign,
//! restated over Ed25519 arithmetic instead of `generic-ec` (which has no
//! Ed25519 implementation to generalize over) via `curve25519-dalek`, the
//! same crate [`crate::hd_wallet`] already uses directly for the same
//! reason.
//!
//! EdDSA's signature equation `s = k + e·x` is additive, unlike ECDSA's
//! multiplicative `s = k^{-1}(m + r·x)`, so there's no MtA conversion here:
//! each party only has to convince its peers that the nonce `k_i` it
//! committed to under its own Paillier key is the same `k_i` behind the
//! point `R_i = k_i·G` it reveals, using the exact same `enc` and `log-star`
//! Sigma protocols [`cggmp21::zk`] already implements for ECDSA presign
//! (`enc` is reused verbatim — it's pure Paillier arithmetic, no curve point
//! in its statement; `log-star` is restated in [`ed25519_log_star`] since
//! its statement does carry a curve point).
//!
//! Grounded on the original implementation's `protocols/cggmp/eddsa/sign`
//! and `cggmp/non_threshold/eddsa/sign` packages: one combined four-round
//! session (sample+encrypt → reveal+prove → combine+share → finalize)
//! rather than a separate presign/signing split, matching the non-threshold
//! path those packages implement. Only the non-threshold (`n`-of-`n`
//! additive) case is implemented — a genuine `t`-of-`n` threshold extension
//! would need a VSS/Feldman-shared [`KeyShare`] and a Lagrange-adjusted
//! signing weight the way `cggmp21::KeyShare::signer_weight` computes one
//! for ECDSA, which would in turn need a real DKG for this curve; see
//! DESIGN.md.

use cggmp21::key_share::{AuxInfo, PartyAux};
use cggmp21::security_level::SecurityLevel;
use cggmp21::zk;
use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;
use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::Identity;
use digest::Digest;
use paillier_zk::{libpaillier, unknown_order::BigNumber, SafePaillierEncryptionExt};
use rand_core::{CryptoRng, RngCore};
use round_based::{
    rounds_router::{simple_store::RoundInput, RoundsRouter},
    Delivery, Mpc, MpcParty, Outgoing, ProtocolMessage,
};
use sha2::Sha512;
use thiserror_no_std::Error;

use crate::execution_id::{ExecutionId, ProtocolChoice};
use crate::progress::Tracer;
use crate::utils::{iter_peers, AbortBlame};

/// Message of the signing protocol
#[derive(ProtocolMessage, Clone, serde::Serialize, serde::Deserialize)]
pub enum Msg {
    Round1Bcast(MsgRound1Bcast),
    Round1P2p(MsgRound1P2p),
    Round2Bcast(MsgRound2Bcast),
    Round2P2p(MsgRound2P2p),
    Round3Bcast(MsgRound3Bcast),
}

#[derive(Clone, serde::Serialize, serde::Deserialize)]
pub struct MsgRound1Bcast {
    K: BigNumber,
}

#[derive(Clone, serde::Serialize, serde::Deserialize)]
pub struct MsgRound1P2p {
    /// proof that `K_i`'s plaintext is in range, under the recipient's
    /// Ring-Pedersen parameters
    enc_proof: zk::enc::Proof,
}

#[derive(Clone, serde::Serialize, serde::Deserialize)]
pub struct MsgRound2Bcast {
    R: EdwardsPoint,
}

#[derive(Clone, serde::Serialize, serde::Deserialize)]
pub struct MsgRound2P2p {
    /// proof that `K_i`'s plaintext matches `R_i`'s discrete log, under the
    /// recipient's Ring-Pedersen parameters
    log_proof: ed25519_log_star::Proof,
}

#[derive(Clone, serde::Serialize, serde::Deserialize)]
pub struct MsgRound3Bcast {
    s: Scalar,
}

/// A party's share of this variant's non-threshold key material: an
/// additive Ed25519 secret share plus the same [`cggmp21::key_share::AuxInfo`]
/// ECDSA presign uses — Paillier/Ring-Pedersen material is curve-agnostic,
/// so a production deployment can run `cggmp21::auxiliary::AuxGenBuilder`
/// once (under any ECDSA curve, since the curve parameter there is only
/// used for transcript domain separation) and hand the resulting
/// [`AuxInfo`] to both this variant and the ECDSA side.
#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(bound = "")]
pub struct KeyShare<L> {
    i: u16,
    x: Scalar,
    public_shares: Vec<EdwardsPoint>,
    shared_public_key: EdwardsPoint,
    aux: AuxInfo<L>,
}

impl<L> KeyShare<L> {
    pub fn new(i: u16, x: Scalar, public_shares: Vec<EdwardsPoint>, aux: AuxInfo<L>) -> Result<Self, InvalidKeyShare> {
        if public_shares.len() != usize::from(aux.n()) {
            return Err(InvalidKeyShare::MismatchedPartyCount);
        }
        if usize::from(i) >= public_shares.len() {
            return Err(InvalidKeyShare::IndexOutOfRange);
        }
        let shared_public_key = public_shares.iter().fold(EdwardsPoint::identity(), |acc, p| acc + p);
        Ok(Self { i, x, public_shares, shared_public_key, aux })
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    pub fn n(&self) -> u16 {
        self.public_shares.len() as u16
    }

    /// The joint Ed25519 public key this share is a part of
    pub fn verifying_key(&self) -> &EdwardsPoint {
        &self.shared_public_key
    }

    /// This party's signing weight. Non-threshold only, so this is just the
    /// additive share `x_i`; a threshold extension would Lagrange-adjust it
    /// the way `cggmp21::KeyShare::signer_weight` does for ECDSA.
    fn signer_weight(&self) -> Scalar {
        self.x
    }
}

/// Invalid combination of key-share parts
#[derive(Debug, thiserror_no_std::Error)]
pub enum InvalidKeyShare {
    #[error("number of public shares doesn't match the auxiliary data's party count")]
    MismatchedPartyCount,
    #[error("this party's index is out of range")]
    IndexOutOfRange,
}

/// A complete, independently-verifiable Ed25519 signature
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub r: [u8; 32],
    pub s: [u8; 32],
}

impl Signature {
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.r);
        out[32..].copy_from_slice(&self.s);
        out
    }
}

/// `log-star` restated over Ed25519: Paillier ciphertext `C` encrypts the
/// discrete log `x` of `X = x·B`, with `x` bounded. The exact same Sigma
/// protocol as [`cggmp21::zk::log_star`] (see that module's doc comment),
/// just with `curve25519-dalek` arithmetic in place of `generic-ec`'s.
pub mod ed25519_log_star {
    use super::*;

    pub struct Data<'a> {
        pub n: &'a BigNumber,
        pub c: &'a BigNumber,
        pub x: &'a EdwardsPoint,
        pub b: EdwardsPoint,
    }
    pub struct PrivateData<'a> {
        pub x: &'a Scalar,
        pub rho: &'a BigNumber,
    }
    #[derive(Clone, serde::Serialize, serde::Deserialize)]
    pub struct Proof {
        a: BigNumber,
        y: EdwardsPoint,
        s: BigNumber,
        c: BigNumber,
        z1: Scalar,
        z2: BigNumber,
        z3: BigNumber,
    }

    pub fn prove<R: RngCore + CryptoRng>(
        transcript: Sha512,
        aux: &zk::Aux,
        data: Data,
        pdata: PrivateData,
        params: &zk::SecurityParams,
        rng: &mut R,
    ) -> Result<Proof, zk::ZkError> {
        let two_l = zk::two_to(params.l);
        let two_l_e = zk::two_to(params.l + params.epsilon);
        let key = libpaillier::EncryptionKey::from(data.n);

        let alpha = Scalar::random(rng);
        let mu = zk::sample_pm(&(&two_l * &aux.rsa_modulo), rng);
        let gamma = zk::sample_pm(&(&two_l_e * &aux.rsa_modulo), rng);
        let r = BigNumber::from_rng(data.n, rng);

        let a = key.encrypt_with(&scalar_to_bignumber(&alpha), &r).map_err(|_| zk::ZkError::Paillier)?;
        let y = alpha * data.b;
        let s = pedersen_commit(aux, &scalar_to_bignumber(pdata.x), &mu);
        let c = pedersen_commit(aux, &scalar_to_bignumber(&alpha), &gamma);

        let mut t = transcript;
        t.update(data.n.to_bytes());
        t.update(data.c.to_bytes());
        t.update(data.x.compress().as_bytes());
        t.update(a.to_bytes());
        t.update(y.compress().as_bytes());
        t.update(s.to_bytes());
        t.update(c.to_bytes());
        let e = challenge_scalar(t);
        let e_num = scalar_to_bignumber(&e);

        let z1 = alpha + e * pdata.x;
        let z2 = r.modmul(&pdata.rho.powmod(&e_num, data.n).unwrap_or_else(|_| BigNumber::one()), data.n);
        let z3 = gamma + &e_num * &mu;

        Ok(Proof { a, y, s, c, z1, z2, z3 })
    }

    pub fn verify(transcript: Sha512, aux: &zk::Aux, data: Data, _params: &zk::SecurityParams, proof: &Proof) -> Result<(), zk::ZkError> {
        let nn = data.n * data.n;
        let key = libpaillier::EncryptionKey::from(data.n);

        let mut t = transcript;
        t.update(data.n.to_bytes());
        t.update(data.c.to_bytes());
        t.update(data.x.compress().as_bytes());
        t.update(proof.a.to_bytes());
        t.update(proof.y.compress().as_bytes());
        t.update(proof.s.to_bytes());
        t.update(proof.c.to_bytes());
        let e = challenge_scalar(t);
        let e_num = scalar_to_bignumber(&e);

        let lhs = key.encrypt_with(&scalar_to_bignumber(&proof.z1), &proof.z2).map_err(|_| zk::ZkError::Paillier)?;
        let rhs = ct_add(&proof.a, &ct_scale(data.c, &e_num, &nn), &nn);
        if lhs != rhs {
            return Err(zk::ZkError::EquationCheckFailed);
        }

        if proof.z1 * data.b != proof.y + e * *data.x {
            return Err(zk::ZkError::EquationCheckFailed);
        }

        let lhs = pedersen_commit(aux, &scalar_to_bignumber(&proof.z1), &proof.z3);
        let rhs = combine(&proof.c, &BigNumber::one(), &proof.s, &e_num, &aux.rsa_modulo);
        if lhs != rhs {
            return Err(zk::ZkError::EquationCheckFailed);
        }

        Ok(())
    }
}

/// `s^a * t^b mod n`, mirroring `cggmp21::zk`'s private helper of the same
/// shape (duplicated rather than exposed since that module keeps its
/// arithmetic internals module-private).
fn combine(s: &BigNumber, a: &BigNumber, t: &BigNumber, b: &BigNumber, n: &BigNumber) -> BigNumber {
    s.powmod(a, n).unwrap_or_else(|_| BigNumber::one()).modmul(&t.powmod(b, n).unwrap_or_else(|_| BigNumber::one()), n)
}

fn pedersen_commit(aux: &zk::Aux, a: &BigNumber, b: &BigNumber) -> BigNumber {
    combine(&aux.s, a, &aux.t, b, &aux.rsa_modulo)
}

fn ct_add(c1: &BigNumber, c2: &BigNumber, nn: &BigNumber) -> BigNumber {
    c1.modmul(c2, nn)
}

fn ct_scale(c: &BigNumber, k: &BigNumber, nn: &BigNumber) -> BigNumber {
    c.powmod(k, nn).unwrap_or_else(|_| BigNumber::one())
}

/// Reduces a finalized SHA-512 transcript into an Ed25519 scalar, the same
/// "wide reduction" `curve25519-dalek` exposes for exactly this purpose.
fn challenge_scalar(transcript: Sha512) -> Scalar {
    let digest = transcript.finalize();
    let mut wide = [0u8; 64];
    wide.copy_from_slice(&digest);
    Scalar::from_bytes_mod_order_wide(&wide)
}

/// The standard Ed25519/EdDSA challenge `SHA512(R || A || M) mod L`.
fn eddsa_challenge(r: &EdwardsPoint, pubkey: &EdwardsPoint, message: &[u8]) -> Scalar {
    let mut h = Sha512::new();
    h.update(r.compress().as_bytes());
    h.update(pubkey.compress().as_bytes());
    h.update(message);
    challenge_scalar(h)
}

/// `8^{-1} mod L` then `* 8`: clears any small-order torsion component a
/// malicious peer could have injected into its revealed `R_j` without
/// disturbing the prime-order-subgroup component everyone actually cares
/// about, mirroring the original implementation's `EightInvEight`
/// adjustment (spec.md §4.9).
fn eight_inv_eight(p: EdwardsPoint) -> EdwardsPoint {
    let eight = Scalar::from(8u64);
    let eight_inv = eight.invert();
    eight * (eight_inv * p)
}

fn scalar_to_bignumber(s: &Scalar) -> BigNumber {
    let mut be = s.to_bytes();
    be.reverse();
    BigNumber::from_slice(be)
}

fn sample_bigint_in_mult_group<R: RngCore>(rng: &mut R, n: &BigNumber) -> BigNumber {
    loop {
        let r = BigNumber::from_rng(n, rng);
        if r.gcd(n) == BigNumber::one() {
            return r;
        }
    }
}

/// Blames every party `j` for which `is_bad(j, &a[j], &b[j])` is true.
/// Array-indexed (unlike `crate::utils::collect_blame`, which is keyed by
/// `frost_ed25519::Identifier` for the FROST path).
fn collect_blame<A, B>(a: &[A], b: &[B], round_name: &'static str, mut is_bad: impl FnMut(u16, &A, &B) -> bool) -> Vec<AbortBlame> {
    a.iter()
        .zip(b.iter())
        .enumerate()
        .filter_map(|(j, (x, y))| {
            let j = j as u16;
            is_bad(j, x, y).then(|| AbortBlame::new(j, round_name))
        })
        .collect()
}

/// Builds and drives the signing protocol
pub struct SigningBuilder<'a, L> {
    key_share: &'a KeyShare<L>,
    execution_id: ExecutionId<Sha512>,
    tracer: Option<&'a mut dyn Tracer>,
}

impl<'a, L: SecurityLevel> SigningBuilder<'a, L> {
    pub fn new(key_share: &'a KeyShare<L>) -> Self {
        Self {
            key_share,
            execution_id: Default::default(),
            tracer: None,
        }
    }

    pub fn set_execution_id(self, execution_id: ExecutionId<Sha512>) -> Self {
        Self { execution_id, ..self }
    }

    pub fn set_progress_tracer(mut self, tracer: &'a mut dyn Tracer) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub async fn sign<R, M>(self, rng: &mut R, party: M, message: &[u8]) -> Result<Signature, SigningError<M::ReceiveError, M::SendError>>
    where
        R: RngCore + CryptoRng,
        M: Mpc<ProtocolMessage = Msg>,
    {
        run_sign(rng, party, self.key_share, self.execution_id, message, self.tracer).await
    }
}

async fn run_sign<R, M, L>(
    rng: &mut R,
    party: M,
    key_share: &KeyShare<L>,
    execution_id: ExecutionId<Sha512>,
    message: &[u8],
    mut tracer: Option<&mut dyn Tracer>,
) -> Result<Signature, SigningError<M::ReceiveError, M::SendError>>
where
    R: RngCore + CryptoRng,
    M: Mpc<ProtocolMessage = Msg>,
    L: SecurityLevel,
{
    tracer.protocol_begins();

    tracer.stage("Setup networking");
    let i = key_share.i();
    let n = key_share.n();
    let MpcParty { delivery, .. } = party.into_party();
    let (incomings, mut outgoings) = delivery.split();

    let mut rounds = RoundsRouter::<Msg>::builder();
    let round1_bc = rounds.add_round(RoundInput::<MsgRound1Bcast>::broadcast(i, n));
    let round1_p2p = rounds.add_round(RoundInput::<MsgRound1P2p>::p2p(i, n));
    let round2_bc = rounds.add_round(RoundInput::<MsgRound2Bcast>::broadcast(i, n));
    let round2_p2p = rounds.add_round(RoundInput::<MsgRound2P2p>::p2p(i, n));
    let round3_bc = rounds.add_round(RoundInput::<MsgRound3Bcast>::broadcast(i, n));
    let mut rounds = rounds.listen(incomings);

    tracer.stage("Precompute execution id");
    let ssid = execution_id.evaluate(ProtocolChoice::CggmpVariantSign);
    let transcript_base = Sha512::new_with_prefix(&ssid);

    let my_aux = &key_share.aux.parties()[usize::from(i)];
    let params = zk::SecurityParams { l: L::ELL, epsilon: L::EPSILON };

    // Round 1
    tracer.round_begins();
    tracer.stage("Sample k_i and encrypt it under our own Paillier key");
    let k_i = Scalar::random(rng);
    let my_key = libpaillier::EncryptionKey::from(&my_aux.N);
    let nonce_k = sample_bigint_in_mult_group(rng, &my_aux.N);
    let K_i = my_key.encrypt_with(&scalar_to_bignumber(&k_i), &nonce_k).map_err(|_| Bug::Paillier)?;

    tracer.send_msg();
    outgoings
        .send(Outgoing::broadcast(Msg::Round1Bcast(MsgRound1Bcast { K: K_i.clone() })))
        .await
        .map_err(SigningError::SendError)?;
    for j in iter_peers(i, n) {
        let peer = &key_share.aux.parties()[usize::from(j)];
        let peer_aux = zk::Aux { s: peer.s.clone(), t: peer.t.clone(), rsa_modulo: peer.N.clone() };
        let enc_proof = zk::enc::prove(
            transcript_base.clone(),
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
            .map_err(SigningError::SendError)?;
    }
    tracer.msg_sent();

    // Round 2
    tracer.round_begins();
    tracer.receive_msgs();
    let ciphertexts = rounds.complete(round1_bc).await.map_err(SigningError::ReceiveMessage)?;
    let enc_proofs = rounds.complete(round1_p2p).await.map_err(SigningError::ReceiveMessage)?;
    tracer.msgs_received();

    tracer.stage("Validate incoming enc proofs");
    let my_aux_for_verify = zk::Aux { s: my_aux.s.clone(), t: my_aux.t.clone(), rsa_modulo: my_aux.N.clone() };
    let blame = collect_blame(&enc_proofs, &ciphertexts, "round1", |j, msg, c| {
        if j == i {
            return false;
        }
        let peer = &key_share.aux.parties()[usize::from(j)];
        zk::enc::verify(transcript_base.clone(), &my_aux_for_verify, zk::enc::Data { n: &peer.N, c: &c.K }, &params, &msg.enc_proof).is_err()
    });
    if !blame.is_empty() {
        return Err(SigningError::Aborted(ProtocolAborted::invalid_enc_proof(blame)));
    }

    tracer.stage("Compute R_i, broadcast it and prove log-star tying it to K_i");
    let R_i = k_i * ED25519_BASEPOINT_POINT;
    outgoings
        .send(Outgoing::broadcast(Msg::Round2Bcast(MsgRound2Bcast { R: R_i })))
        .await
        .map_err(SigningError::SendError)?;
    for j in iter_peers(i, n) {
        let peer = &key_share.aux.parties()[usize::from(j)];
        let peer_aux = zk::Aux { s: peer.s.clone(), t: peer.t.clone(), rsa_modulo: peer.N.clone() };
        let log_proof = ed25519_log_star::prove(
            transcript_base.clone(),
            &peer_aux,
            ed25519_log_star::Data { n: &my_aux.N, c: &K_i, x: &R_i, b: ED25519_BASEPOINT_POINT },
            ed25519_log_star::PrivateData { x: &k_i, rho: &nonce_k },
            &params,
            rng,
        )
        .map_err(Bug::PiLogStar)?;
        outgoings
            .send(Outgoing::p2p(j, Msg::Round2P2p(MsgRound2P2p { log_proof })))
            .await
            .map_err(SigningError::SendError)?;
    }
    tracer.msg_sent();

    // Round 3: combine the nonce commitments and compute this party's share
    tracer.round_begins();
    tracer.receive_msgs();
    let Rs = rounds.complete(round2_bc).await.map_err(SigningError::ReceiveMessage)?;
    let log_proofs = rounds.complete(round2_p2p).await.map_err(SigningError::ReceiveMessage)?;
    tracer.msgs_received();

    tracer.stage("Validate incoming log-star proofs");
    let blame = collect_blame(&log_proofs, &Rs, "round2", |j, msg, r| {
        if j == i {
            return false;
        }
        let peer = &key_share.aux.parties()[usize::from(j)];
        ed25519_log_star::verify(
            transcript_base.clone(),
            &my_aux_for_verify,
            ed25519_log_star::Data { n: &peer.N, c: &ciphertexts[usize::from(j)].K, x: &r.R, b: ED25519_BASEPOINT_POINT },
            &params,
            &msg.log_proof,
        )
        .is_err()
    });
    if !blame.is_empty() {
        return Err(SigningError::Aborted(ProtocolAborted::invalid_log_star_proof(blame)));
    }

    tracer.stage("Combine nonce commitments, clearing any injected torsion");
    let R: EdwardsPoint = Rs.iter().map(|r| eight_inv_eight(r.R)).fold(EdwardsPoint::identity(), |acc, p| acc + p);

    tracer.stage("Compute the EdDSA challenge and this party's signature share");
    let lambda = eddsa_challenge(&R, key_share.verifying_key(), message);
    let s_i = lambda * key_share.signer_weight() + k_i;

    tracer.send_msg();
    outgoings
        .send(Outgoing::broadcast(Msg::Round3Bcast(MsgRound3Bcast { s: s_i })))
        .await
        .map_err(SigningError::SendError)?;
    tracer.msg_sent();

    // Finalization
    tracer.round_begins();
    tracer.receive_msgs();
    let shares = rounds.complete(round3_bc).await.map_err(SigningError::ReceiveMessage)?;
    tracer.msgs_received();

    tracer.stage("Sum signature shares and self-verify against the joint public key");
    let s: Scalar = shares.iter().fold(Scalar::ZERO, |acc, m| acc + m.s);
    if s * ED25519_BASEPOINT_POINT != R + lambda * *key_share.verifying_key() {
        return Err(Bug::InvalidSignature.into());
    }

    tracer.protocol_ends();
    Ok(Signature { r: R.compress().to_bytes(), s: s.to_bytes() })
}

/// Error of the signing protocol
#[derive(Debug, Error)]
pub enum SigningError<IErr, OErr> {
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
    #[error("paillier operation failed")]
    Paillier,
    #[error("couldn't prove an enc statement")]
    PiEnc(#[source] zk::ZkError),
    #[error("couldn't prove a log-star statement")]
    PiLogStar(#[source] zk::ZkError),
    #[error("produced signature failed to verify; a share or a log-star proof must be corrupted")]
    InvalidSignature,
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
    #[error("provided invalid log-star proof tying K_i to R_i")]
    InvalidLogStarProof,
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
    make_factory!(invalid_log_star_proof, InvalidLogStarProof);
}

/// Trusted-dealer generation of non-threshold [`KeyShare`]s (gated behind
/// `spof`, same as [`crate::trusted_dealer`] and `cggmp21::trusted_dealer`):
/// one party locally samples every party's additive Ed25519 share and
/// Paillier/Ring-Pedersen material, instead of running a real DKG. This
/// variant has no `generic-ec` curve to drive `cggmp21_keygen`'s DKG with,
/// so unlike the FROST path there's no interactive keygen here at all yet —
/// see DESIGN.md.
#[cfg(feature = "spof")]
pub mod trusted_dealer {
    use super::*;

    /// Deals `n` non-threshold (`n`-of-`n`) additive Ed25519 shares, complete
    /// with auxiliary data.
    pub fn mock_keygen<L, R>(rng: &mut R, n: u16) -> Vec<KeyShare<L>>
    where
        L: SecurityLevel,
        R: RngCore + CryptoRng,
    {
        let shares: Vec<Scalar> = (0..n).map(|_| Scalar::random(rng)).collect();
        let public_shares: Vec<EdwardsPoint> = shares.iter().map(|x| *x * ED25519_BASEPOINT_POINT).collect();

        let generated: Vec<(BigNumber, BigNumber, PartyAux)> = (0..n).map(|_| generate_party_aux::<L, _>(rng)).collect();
        let public_aux: Vec<PartyAux> = generated.iter().map(|(_, _, aux)| aux.clone()).collect();

        shares
            .into_iter()
            .zip(generated)
            .enumerate()
            .map(|(i, (x, (p, q, _)))| {
                let aux = AuxInfo::new(p, q, public_aux.clone());
                KeyShare::new(i as u16, x, public_shares.clone(), aux).expect("dealer produces a valid key share by construction")
            })
            .collect()
    }

    /// Mirrors `cggmp21::trusted_dealer`'s private `generate_party_aux`:
    /// samples one party's Paillier primes and derives its Ring-Pedersen
    /// parameters without the commit-reveal or `prm` proof a real
    /// auxiliary-setup session would run.
    fn generate_party_aux<L: SecurityLevel, R: RngCore + CryptoRng>(rng: &mut R) -> (BigNumber, BigNumber, PartyAux) {
        let (p, q) = cggmp21::auxiliary::PregeneratedPrimes::<L>::generate(rng).split();
        let n = &p * &q;
        let phi_n = (&p - 1) * (&q - 1);
        let r = sample_bigint_in_mult_group(rng, &n);
        let lambda = BigNumber::from_rng(&phi_n, rng);
        let t = r.modmul(&r, &n);
        let s = t.powmod(&lambda, &n).expect("t invertible mod n, lambda sampled mod phi(n)");
        (p, q, PartyAux { N: n, s, t })
    }
}

#[cfg(all(test, feature = "spof"))]
mod tests {
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    use super::*;
    use cggmp21::security_level::DevLevel;

    #[test]
    fn trusted_dealer_produces_a_self_consistent_joint_key() {
        let mut rng = ChaCha20Rng::from_seed([9u8; 32]);
        let shares = trusted_dealer::mock_keygen::<DevLevel, _>(&mut rng, 3);
        assert_eq!(shares.len(), 3);

        let expected_pub = shares.iter().fold(EdwardsPoint::identity(), |acc, s| acc + s.public_shares[usize::from(s.i)]);
        for share in &shares {
            assert_eq!(*share.verifying_key(), expected_pub);
        }
    }
}
