//! Lagrange coefficients for reconstructing/adjusting VSS shares
//!
//! A degree-`t` Shamir polynomial's constant term (the joint secret) is
//! `Σ_i λ_i · f(id_i)` for any `t+1` evaluation points `id_i`, where `λ_i`
//! is the Lagrange coefficient of `id_i` within that set. Threshold signing
//! never reconstructs the secret itself — instead each party multiplies its
//! own share by its own `λ_i` once, turning the set of VSS shares into an
//! additive sharing of the same secret for the rest of the signing
//! protocol (spec.md §4.3).

use generic_ec::{Curve, Scalar};

/// Computes `λ_i = Π_{j != i} id_j / (id_j - id_i)` for `id_i` against the
/// other points in `signers`.
///
/// Returns `None` if `signers` contains two equal points — which would make
/// some `id_j - id_i` zero — violating the pairwise-distinct-keys invariant
/// every key share is supposed to uphold.
pub fn lagrange_coefficient<E: Curve>(id_i: Scalar<E>, signers: &[Scalar<E>]) -> Option<Scalar<E>> {
    let mut num = Scalar::<E>::from(1);
    let mut den = Scalar::<E>::from(1);
    for &id_j in signers {
        if id_j == id_i {
            continue;
        }
        let diff = id_j - id_i;
        if diff.is_zero() {
            return None;
        }
        num = num * id_j;
        den = den * diff;
    }
    Some(num * den.invert()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use generic_ec::{Point, SecretScalar};
    use rand_core::OsRng;

    #[test]
    fn lagrange_reconstructs_secret() {
        type E = generic_ec::curves::Secp256k1;

        let t = 2usize;
        let n = 5usize;
        let mut secret = SecretScalar::<E>::random(&mut OsRng);
        let secret = *secret.as_mut();
        let mut coeffs = vec![secret];
        for _ in 1..=t {
            coeffs.push(Scalar::<E>::random(&mut OsRng));
        }
        let eval = |x: Scalar<E>| coeffs.iter().rev().fold(Scalar::<E>::zero(), |acc, c| acc * x + c);

        let ids: Vec<Scalar<E>> = (1..=n as u64).map(Scalar::from).collect();

        // Any t+1 = 3 shares reconstruct the secret.
        let subset = &ids[1..4];
        let shares: Vec<Scalar<E>> = subset.iter().map(|&id| eval(id)).collect();
        let reconstructed: Scalar<E> = subset
            .iter()
            .zip(&shares)
            .map(|(&id, &share)| lagrange_coefficient::<E>(id, subset).unwrap() * share)
            .fold(Scalar::zero(), |a, b| a + b);
        assert_eq!(reconstructed, secret);
        assert_eq!(Point::<E>::generator() * reconstructed, Point::generator() * secret);

        // t shares alone do not.
        let short_subset = &ids[1..3];
        let shares: Vec<Scalar<E>> = short_subset.iter().map(|&id| eval(id)).collect();
        let bad: Scalar<E> = short_subset
            .iter()
            .zip(&shares)
            .map(|(&id, &share)| lagrange_coefficient::<E>(id, short_subset).unwrap() * share)
            .fold(Scalar::zero(), |a, b| a + b);
        assert_ne!(bad, secret);
    }
}
