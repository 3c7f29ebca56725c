//! Key share types used by the CGGMP21 signing protocols
//!
//! Builds on top of `key_share::IncompleteKeyShare` (the curve-generic DKG
//! output) by adding the Paillier/Ring-Pedersen material auxiliary setup
//! produces. The two halves are generated by separate protocol runs (spec
//! §3: `KeygenSaveData` and `AuxSaveData` are distinct, long-lived
//! independently of each other) and combined locally before presigning.

use generic_ec::{Curve, Scalar};
pub use key_share::{evaluate_exponent_commitments, verify_vss_share, IncompleteKeyShare, InvalidKeyShare, PartyId, Valid, VssError, VssSetup};
use paillier_zk::unknown_order::BigNumber;

/// Per-party Paillier modulus and Ring-Pedersen parameters, as published
/// during auxiliary setup.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PartyAux {
    /// This party's Paillier public modulus
    pub N: BigNumber,
    /// Ring-Pedersen `s`
    pub s: BigNumber,
    /// Ring-Pedersen `t`
    pub t: BigNumber,
}

/// Output of auxiliary setup (spec §3 `AuxSaveData`): this party's Paillier
/// secret primes plus every party's public Paillier/Ring-Pedersen material,
/// in keygen party-index order. Reused across many signing sessions.
#[derive(Clone, serde::Serialize, serde::Deserialize)]
pub struct AuxInfo<L> {
    p: BigNumber,
    q: BigNumber,
    parties: Vec<PartyAux>,
    #[serde(skip)]
    _ph: core::marker::PhantomData<L>,
}

impl<L> AuxInfo<L> {
    pub fn new(p: BigNumber, q: BigNumber, parties: Vec<PartyAux>) -> Self {
        Self {
            p,
            q,
            parties,
            _ph: core::marker::PhantomData,
        }
    }

    /// This party's Paillier secret primes `(P, Q)`
    pub fn primes(&self) -> (&BigNumber, &BigNumber) {
        (&self.p, &self.q)
    }

    /// Every party's public Paillier/Ring-Pedersen material, keygen-index order
    pub fn parties(&self) -> &[PartyAux] {
        &self.parties
    }

    pub fn n(&self) -> u16 {
        self.parties.len() as u16
    }
}

/// A full key share: the DKG output plus the auxiliary (Paillier) material,
/// the input every presign/sign round needs.
#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(bound = "")]
pub struct KeyShare<E: Curve, L> {
    pub core: Valid<IncompleteKeyShare<E>>,
    pub aux: AuxInfo<L>,
}

impl<E: Curve, L> KeyShare<E, L> {
    pub fn new(core: Valid<IncompleteKeyShare<E>>, aux: AuxInfo<L>) -> Result<Self, InvalidCombinedShare> {
        if core.n() != aux.n() {
            return Err(InvalidCombinedShare::MismatchedPartyCount);
        }
        Ok(Self { core, aux })
    }

    pub fn i(&self) -> u16 {
        self.core.i
    }

    pub fn n(&self) -> u16 {
        self.core.n()
    }

    /// This party's Lagrange-adjusted signing weight `w_i`
    ///
    /// Non-threshold keygen: just the additive share `x_i`. Threshold
    /// keygen: `x_i` scaled by the Lagrange coefficient of this party's
    /// `share_id` within the full set of `share_id`s carried by this
    /// [`KeyShare`] (spec.md §4.3) — so callers must first narrow a
    /// threshold share down to exactly the signers taking part in this
    /// session with [`KeyShare::subset`].
    pub fn signer_weight(&self) -> Scalar<E> {
        match &self.core.vss_setup {
            None => *self.core.x.as_ref(),
            Some(vss) => {
                let my_id = self.core.share_id;
                let lambda = key_share::lagrange_coefficient(my_id, &vss.ids)
                    .expect("share ids are pairwise distinct, IncompleteKeyShare invariant");
                lambda * self.core.x.as_ref()
            }
        }
    }

    /// The public point `w_j·G` corresponding to [`KeyShare::signer_weight`]
    /// for an arbitrary signer `idx` (not just this party's own), computed
    /// from public data alone — used to state the `aff-g` MtA proofs the
    /// presign round runs against each peer's weighted share.
    pub fn public_weight(&self, idx: u16) -> generic_ec::Point<E> {
        let point = self.core.public_shares[usize::from(idx)];
        match &self.core.vss_setup {
            None => point,
            Some(vss) => {
                let id = vss.ids[usize::from(idx)];
                let lambda = key_share::lagrange_coefficient(id, &vss.ids)
                    .expect("share ids are pairwise distinct, IncompleteKeyShare invariant");
                point * lambda
            }
        }
    }

    /// Narrows this key share down to exactly the parties taking part in one
    /// signing session, identified by their *original keygen* indices.
    ///
    /// `signer_indices` must include this party's own original index and,
    /// for a threshold share, must have at least `min_signers` entries.
    /// Re-derives `i` as this party's position within `signer_indices` (the
    /// position the returned share, and every other signer's restricted
    /// share, will use as their round-based party index for the rest of the
    /// session).
    pub fn subset(&self, signer_indices: &[u16]) -> Result<Self, SubsetError> {
        let my_original_i = self.core.i;
        let Some(new_i) = signer_indices.iter().position(|&j| j == my_original_i) else {
            return Err(SubsetError::SelfNotIncluded);
        };
        if let Some(vss) = &self.core.vss_setup {
            if signer_indices.len() < usize::from(vss.min_signers) {
                return Err(SubsetError::NotEnoughSigners {
                    min_signers: vss.min_signers,
                    provided: signer_indices.len() as u16,
                });
            }
        }
        for &j in signer_indices {
            if usize::from(j) >= usize::from(self.core.n()) {
                return Err(SubsetError::IndexOutOfRange(j));
            }
        }

        let public_shares = signer_indices
            .iter()
            .map(|&j| self.core.public_shares[usize::from(j)])
            .collect();
        let vss_setup = self.core.vss_setup.as_ref().map(|vss| VssSetup {
            min_signers: vss.min_signers,
            ids: signer_indices.iter().map(|&j| vss.ids[usize::from(j)]).collect(),
        });
        let core = IncompleteKeyShare {
            i: new_i as u16,
            share_id: self.core.share_id,
            shared_public_key: self.core.shared_public_key,
            public_shares,
            x: {
                let mut x = *self.core.x.as_ref();
                generic_ec::SecretScalar::new(&mut x)
            },
            chain_code: self.core.chain_code,
            vss_setup,
        };
        let core: Valid<IncompleteKeyShare<E>> = if self.core.vss_setup.is_some() {
            // Threshold: the restricted `shared_public_key`/`public_shares`
            // invariant (`Σ == Pubkey`) only holds over the *full* keygen
            // set, not an arbitrary t+1 subset, so `TryFrom`'s generic check
            // doesn't apply here. The restricted share's own invariants
            // (own share matches own public point, distinct ids) still do.
            Valid::assume_valid(core)
        } else {
            core.try_into().map_err(SubsetError::InvalidRestrictedShare)?
        };

        let parties = signer_indices
            .iter()
            .map(|&j| self.aux.parties[usize::from(j)].clone())
            .collect();
        let aux = AuxInfo::new(self.aux.p.clone(), self.aux.q.clone(), parties);

        Ok(Self { core, aux })
    }
}

/// A [`KeyShare`] whose `core`/`aux` party counts disagree
#[derive(Debug, thiserror_no_std::Error)]
pub enum InvalidCombinedShare {
    #[error("core share and auxiliary info were generated for different party counts")]
    MismatchedPartyCount,
}

/// [`KeyShare::subset`] failure modes
#[derive(Debug, thiserror_no_std::Error)]
pub enum SubsetError {
    #[error("this party's own index isn't among the given signer indices")]
    SelfNotIncluded,
    #[error("not enough signers: need at least {min_signers}, got {provided}")]
    NotEnoughSigners { min_signers: u16, provided: u16 },
    #[error("signer index {0} is out of range")]
    IndexOutOfRange(u16),
    #[error("restricted share failed validation")]
    InvalidRestrictedShare(#[source] InvalidKeyShare),
}
