use core::ops::Deref;

use generic_ec::{Curve, Point, Scalar};

use crate::core_share::IncompleteKeyShare;

/// A value that has been checked to satisfy all invariants its type
/// documents. Only way to obtain one is [`TryFrom`]/[`TryInto`]; once
/// obtained it derefs to the wrapped value and cannot be invalidated.
#[derive(Clone, Debug)]
pub struct Valid<T>(T);

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for Valid<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for Valid<T>
where
    T: serde::Deserialize<'de>,
    Valid<T>: TryFrom<T>,
    <Valid<T> as TryFrom<T>>::Error: core::fmt::Display,
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let t = T::deserialize(deserializer)?;
        Valid::try_from(t).map_err(serde::de::Error::custom)
    }
}

impl<T> Deref for Valid<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> Valid<T> {
    /// Unwraps the validated value
    pub fn into_inner(self) -> T {
        self.0
    }

    /// Wraps `t` as [`Valid`] without running [`TryFrom`]'s checks.
    ///
    /// For values derived from an already-[`Valid`] one by a transformation
    /// that provably preserves the invariants `TryFrom` can't re-check on
    /// its own — e.g. [`crate::IncompleteKeyShare`] restricted to a signing
    /// subset, where `Σ public_shares == shared_public_key` no longer holds
    /// over the narrowed arrays by construction even though every
    /// individual share is still genuine.
    pub fn assume_valid(t: T) -> Valid<T> {
        Valid(t)
    }
}

/// Reasons an [`IncompleteKeyShare`] can fail validation
#[derive(Debug, thiserror_no_std::Error)]
pub enum InvalidKeyShare {
    /// `public_shares.len()` doesn't match the VSS setup's party count
    #[error("number of public shares doesn't match the VSS setup")]
    MismatchedShareCount,
    /// `Σ_i PubXj[i] != Pubkey`
    #[error("sum of public shares doesn't equal the claimed shared public key")]
    SharesDontSumToPublicKey,
    /// `PubXj[i] != PrivXi·G` (non-threshold) or the party's VSS
    /// reconstruction point doesn't match (threshold)
    #[error("party {0}'s public share doesn't match its secret share")]
    MismatchedOwnShare(u16),
    /// Two distinct parties were assigned the same VSS evaluation point,
    /// which would make a Lagrange denominator `k_j - k_i` zero
    #[error("two parties share the same identity key, Lagrange interpolation would divide by zero")]
    DuplicatePartyKeys,
    /// `i >= n`
    #[error("party index out of range")]
    InvalidIndex,
    /// Threshold `t+1 > n`
    #[error("threshold exceeds the number of parties")]
    InvalidThreshold,
}

impl<E: Curve> TryFrom<IncompleteKeyShare<E>> for Valid<IncompleteKeyShare<E>> {
    type Error = InvalidKeyShare;

    fn try_from(share: IncompleteKeyShare<E>) -> Result<Self, Self::Error> {
        let n = share.public_shares.len();
        if usize::from(share.i) >= n {
            return Err(InvalidKeyShare::InvalidIndex);
        }

        if let Some(vss) = &share.vss_setup {
            if vss.ids.len() != n {
                return Err(InvalidKeyShare::MismatchedShareCount);
            }
            if vss.min_signers == 0 || vss.min_signers > share.n() {
                return Err(InvalidKeyShare::InvalidThreshold);
            }
            for (idx, id) in vss.ids.iter().enumerate() {
                if vss.ids[..idx].iter().any(|other| other == id) {
                    return Err(InvalidKeyShare::DuplicatePartyKeys);
                }
            }
        }

        let sum: Point<E> = share.public_shares.iter().fold(Point::zero(), |a, p| a + p);
        if sum != share.shared_public_key {
            return Err(InvalidKeyShare::SharesDontSumToPublicKey);
        }

        let i = usize::from(share.i);
        // Whether additive (non-threshold) or a VSS evaluation (threshold),
        // a party's own public share is always the image of its own secret
        // share under the group generator.
        let expected_own_share = Point::generator() * &share.x;
        if expected_own_share != share.public_shares[i] {
            return Err(InvalidKeyShare::MismatchedOwnShare(share.i));
        }

        Ok(Valid(share))
    }
}

/// Errors that arise while verifying a single incoming VSS share against the
/// sender's published exponent commitments
#[derive(Debug, thiserror_no_std::Error)]
pub enum VssError {
    /// `share·G != Σ_c id^c · v_c`
    #[error("VSS share failed the exponent-commitment check")]
    InvalidShare,
}

/// Verifies a single VSS share `(id, f(id))` against the sender's published
/// coefficient commitments `v_0, ..., v_t` (`share·G ?= Σ_c id^c · v_c`).
pub fn verify_vss_share<E: Curve>(
    id: Scalar<E>,
    share: &Scalar<E>,
    commitments: &[Point<E>],
) -> Result<(), VssError> {
    let expected = Point::generator() * share;
    let reconstructed = evaluate_exponent_commitments(id, commitments);
    if reconstructed == expected {
        Ok(())
    } else {
        Err(VssError::InvalidShare)
    }
}

/// Evaluates `Σ_c id^c · v_c` via Horner's method, i.e. the public
/// counterpart of evaluating a degree-`t` polynomial at `id` without ever
/// learning its coefficients.
pub fn evaluate_exponent_commitments<E: Curve>(id: Scalar<E>, commitments: &[Point<E>]) -> Point<E> {
    commitments
        .iter()
        .rev()
        .fold(Point::zero(), |acc, v_c| acc * id + v_c)
}
