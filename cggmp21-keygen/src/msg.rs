use digest::Digest;
use generic_ec::{Curve, Point, Scalar};
use generic_ec_zkp::{hash_commitment::HashCommit, schnorr_pok};
use round_based::ProtocolMessage;

/// Message of the key generation protocol (non-threshold and threshold share
/// the same round shape; threshold mode additionally populates
/// [`MsgRound2::vss_commitments`] with more than one point and sends
/// [`MsgRound2P2p`]).
#[derive(ProtocolMessage, Clone)]
pub enum Msg<E: Curve, D: Digest> {
    Round1(MsgRound1<D>),
    Round2Broadcast(MsgRound2<E, D>),
    Round2P2p(MsgRound2P2p<E>),
    Round3(MsgRound3<E>),
}

#[derive(Clone)]
pub struct MsgRound1<D: Digest> {
    pub commitment: HashCommit<D>,
}

/// Broadcast opening of round 1's commitment
///
/// Non-threshold: `vss_commitments` has exactly one point, the party's
/// public share `X_i`. Threshold: it holds the coefficient commitments
/// `v_0, ..., v_t` of the party's degree-`t` polynomial.
#[derive(Clone)]
pub struct MsgRound2<E: Curve, D: Digest> {
    pub vss_commitments: Vec<Point<E>>,
    pub sch_commit: schnorr_pok::Commit<E>,
    pub rid_bytes: Vec<u8>,
    pub chain_code_bytes: Vec<u8>,
    pub decommit: generic_ec_zkp::hash_commitment::DecommitNonce<D>,
}

/// Threshold-only: this party's VSS share evaluated at the recipient's id
#[derive(Clone)]
pub struct MsgRound2P2p<E: Curve> {
    pub share: Scalar<E>,
}

#[derive(Clone)]
pub struct MsgRound3<E: Curve> {
    pub sch_proof: schnorr_pok::Proof<E>,
}
