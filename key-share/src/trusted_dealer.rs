//! Trusted-dealer (single-point-of-failure) key generation
//!
//! Produces the exact same [`IncompleteKeyShare`] shape the interactive DKG
//! protocol outputs, but via one party locally sampling the joint secret and
//! handing out shares — useful for test fixtures and benchmarks where
//! running the full round-based protocol just to get key material is
//! unnecessary overhead. Gated behind the `spof` feature so it can't be
//! reached from a production build by accident: a dealer that ever saw the
//! joint secret is exactly the single point of failure threshold signing
//! exists to avoid.

use generic_ec::{Curve, Point, Scalar, SecretScalar};
use rand_core::{CryptoRng, RngCore};

use crate::{IncompleteKeyShare, PartyId, Valid, VssSetup};

/// Deals `n` non-threshold (additive) shares of a freshly sampled secret key
pub fn mock_keygen<E: Curve, R: RngCore + CryptoRng>(
    rng: &mut R,
    n: u16,
) -> Vec<Valid<IncompleteKeyShare<E>>> {
    let shares: Vec<Scalar<E>> = (0..n).map(|_| *SecretScalar::<E>::random(rng).as_ref()).collect();
    let public_shares: Vec<Point<E>> = shares.iter().map(|x| Point::generator() * x).collect();
    let shared_public_key = public_shares.iter().fold(Point::zero(), |a, p| a + p);

    shares
        .into_iter()
        .enumerate()
        .map(|(i, x)| {
            let mut x = x;
            let share = IncompleteKeyShare {
                i: i as u16,
                share_id: PartyId::<E>::from(u64::from(i as u16) + 1),
                shared_public_key,
                public_shares: public_shares.clone(),
                x: SecretScalar::new(&mut x),
                chain_code: Default::default(),
                vss_setup: None,
            };
            share.try_into().expect("dealer produces a valid share by construction")
        })
        .collect()
}

/// Deals `n` shares of a `min_signers`-of-`n` VSS sharing of a freshly
/// sampled secret key
pub fn mock_keygen_threshold<E: Curve, R: RngCore + CryptoRng>(
    rng: &mut R,
    n: u16,
    min_signers: u16,
) -> Vec<Valid<IncompleteKeyShare<E>>> {
    let ids: Vec<Scalar<E>> = (0..n).map(|i| Scalar::<E>::from(u64::from(i) + 1)).collect();

    let mut secret = SecretScalar::<E>::random(rng);
    let mut coefficients = vec![*secret.as_ref()];
    secret.invalidate();
    for _ in 1..min_signers {
        coefficients.push(Scalar::<E>::random(rng));
    }
    let commitments: Vec<Point<E>> = coefficients.iter().map(|c| Point::generator() * c).collect();

    let evaluate = |at: Scalar<E>| coefficients.iter().rev().fold(Scalar::<E>::zero(), |acc, c| acc * at + c);

    let public_shares: Vec<Point<E>> = ids.iter().map(|&id| crate::evaluate_exponent_commitments(id, &commitments)).collect();
    let shared_public_key = commitments[0];

    ids.iter()
        .enumerate()
        .map(|(i, &id)| {
            let mut x = evaluate(id);
            let share = IncompleteKeyShare {
                i: i as u16,
                share_id: id,
                shared_public_key,
                public_shares: public_shares.clone(),
                x: SecretScalar::new(&mut x),
                chain_code: Default::default(),
                vss_setup: Some(VssSetup { min_signers, ids: ids.clone() }),
            };
            share.try_into().expect("dealer produces a valid share by construction")
        })
        .collect()
}
