//! Wire messages for [`crate::keygen`]

use frost_ed25519::keys::dkg::{round1, round2};
use round_based::ProtocolMessage;

/// Keygen protocol message
#[derive(Clone, ProtocolMessage, serde::Serialize, serde::Deserialize)]
pub enum Msg {
    Round1(MsgRound1),
    Round2(MsgRound2P2p),
}

/// Round 1: broadcast commitment to the secret polynomial plus a
/// proof of knowledge of its constant term
#[derive(Clone, serde::Serialize, serde::Deserialize)]
pub struct MsgRound1 {
    pub package: round1::Package,
}

/// Round 2: point-to-point secret share of the sender's polynomial,
/// evaluated at the recipient's identifier
#[derive(Clone, serde::Serialize, serde::Deserialize)]
pub struct MsgRound2P2p {
    pub package: round2::Package,
}
