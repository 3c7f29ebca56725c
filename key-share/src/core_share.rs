use generic_ec::{Curve, Point, Scalar, SecretScalar};

/// A party's long-lived identity key, used both as the array index key and
/// as the VSS evaluation point for that party.
///
/// Kept around verbatim from keygen time so a later signing subset can find
/// each party's original slot.
pub type PartyId<E> = Scalar<E>;

/// VSS-specific data carried in a key share when keygen ran in threshold
/// (t-of-n) mode. Absent for non-threshold (n-of-n, additive) keygen.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = ""))]
pub struct VssSetup<E: Curve> {
    /// Reconstruction threshold `t+1`, i.e. the minimal number of shares
    /// that additively reconstruct the secret after Lagrange adjustment.
    pub min_signers: u16,
    /// Evaluation points `Ks[j]` of every party that took part in keygen,
    /// in keygen party-index order.
    pub ids: Vec<PartyId<E>>,
}

/// Output of the key generation protocol.
///
/// This is the "core" share: it contains everything needed to reconstruct
/// the joint private key and to verify individual shares, but it lacks the
/// Paillier/Ring-Pedersen auxiliary data a CGGMP21 signing protocol also
/// needs (that data lives in `cggmp21::key_share::KeyShare`, which wraps
/// one of these together with an `AuxInfo`).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = ""))]
pub struct IncompleteKeyShare<E: Curve> {
    /// Index of the local party among the `n` keygen participants
    pub i: u16,
    /// This party's identity key (`ShareID` in spec terms); for threshold
    /// keygen this doubles as the VSS evaluation point for `x`.
    pub share_id: PartyId<E>,
    /// Aggregated public key `Pubkey`
    pub shared_public_key: Point<E>,
    /// Public shares of every party, `PubXj[n]` in keygen order
    pub public_shares: Vec<Point<E>>,
    /// This party's secret share `PrivXi`: an additive share in
    /// non-threshold mode, a VSS share in threshold mode
    pub x: SecretScalar<E>,
    /// BIP32 chain code, shared by all parties
    pub chain_code: crate::ChainCode,
    /// `Some` iff keygen ran in threshold mode
    pub vss_setup: Option<VssSetup<E>>,
}

impl<E: Curve> IncompleteKeyShare<E> {
    /// Number of parties that took part in keygen
    pub fn n(&self) -> u16 {
        self.public_shares.len() as u16
    }

    /// Reconstruction threshold, or `n` for non-threshold shares
    pub fn min_signers(&self) -> u16 {
        self.vss_setup
            .as_ref()
            .map(|vss| vss.min_signers)
            .unwrap_or_else(|| self.n())
    }
}
