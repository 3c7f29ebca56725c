//! Trusted-dealer generation of full [`KeyShare`]s (gated behind `spof`).
//!
//! [`key_share::trusted_dealer`] already produces the DKG half of a key
//! share this way; this module adds the auxiliary (Paillier/Ring-Pedersen)
//! half the same way — one party locally sampling every party's primes
//! instead of running [`crate::auxiliary::AuxGenBuilder`]. Ring-Pedersen
//! parameters need no MPC at all even in the real protocol (each party
//! derives its own from its own Paillier primes), so the only thing this
//! actually skips versus a real session is the `prm`/`mod`/`fac` proofs that
//! let a party *prove* its parameters are well-formed to its peers — moot
//! when a single trusted process generated every party's primes anyway.
//!
//! Useful for test fixtures and benchmarks where running the full
//! `AuxGenBuilder` session for every test case would dominate the runtime.

use generic_ec::Curve;
use paillier_zk::{libpaillier, unknown_order::BigNumber};
use rand_core::{CryptoRng, RngCore};

use crate::key_share::{AuxInfo, InvalidCombinedShare, IncompleteKeyShare, KeyShare, PartyAux, Valid};
use crate::security_level::SecurityLevel;

/// Deals `n` non-threshold key shares, complete with auxiliary data.
pub fn mock_keygen<E, L, R>(rng: &mut R, n: u16) -> Result<Vec<KeyShare<E, L>>, TrustedDealerError>
where
    E: Curve,
    L: SecurityLevel,
    R: RngCore + CryptoRng,
{
    let cores = ::key_share::trusted_dealer::mock_keygen::<E, _>(rng, n);
    combine(cores, rng)
}

/// Deals `n` shares of a `min_signers`-of-`n` VSS sharing, complete with
/// auxiliary data.
pub fn mock_keygen_threshold<E, L, R>(
    rng: &mut R,
    n: u16,
    min_signers: u16,
) -> Result<Vec<KeyShare<E, L>>, TrustedDealerError>
where
    E: Curve,
    L: SecurityLevel,
    R: RngCore + CryptoRng,
{
    let cores = ::key_share::trusted_dealer::mock_keygen_threshold::<E, _>(rng, n, min_signers);
    combine(cores, rng)
}

fn combine<E, L, R>(cores: Vec<Valid<IncompleteKeyShare<E>>>, rng: &mut R) -> Result<Vec<KeyShare<E, L>>, TrustedDealerError>
where
    E: Curve,
    L: SecurityLevel,
    R: RngCore + CryptoRng,
{
    let n = cores.len() as u16;
    let generated: Vec<(BigNumber, BigNumber, PartyAux)> = (0..n).map(|_| generate_party_aux::<L, _>(rng)).collect();
    let public: Vec<PartyAux> = generated.iter().map(|(_, _, aux)| aux.clone()).collect();

    cores
        .into_iter()
        .zip(generated)
        .map(|(core, (p, q, _))| {
            let aux = AuxInfo::new(p, q, public.clone());
            KeyShare::new(core, aux).map_err(TrustedDealerError::Combine)
        })
        .collect()
}

/// Samples one party's Paillier primes and derives its Ring-Pedersen
/// parameters, mirroring [`crate::auxiliary`]'s round 1/2 logic without the
/// commit-reveal or the `prm` proof — there's no one to prove it to.
fn generate_party_aux<L: SecurityLevel, R: RngCore + CryptoRng>(rng: &mut R) -> (BigNumber, BigNumber, PartyAux) {
    let (p, q) = crate::auxiliary::PregeneratedPrimes::<L>::generate(rng).split();

    let n = &p * &q;
    let phi_n = (&p - 1) * (&q - 1);
    let _dec = libpaillier::DecryptionKey::with_primes_unchecked(&p, &q).expect("p, q freshly sampled safe primes");

    let r = crate::utils::sample_bigint_in_mult_group(rng, &n);
    let lambda = BigNumber::from_rng(&phi_n, rng);
    let t = r.modmul(&r, &n);
    let s = t.powmod(&lambda, &n).expect("t invertible mod n, lambda sampled mod phi(n)");

    (p, q, PartyAux { N: n, s, t })
}

/// Error dealing trusted-dealer key shares
#[derive(Debug, thiserror_no_std::Error)]
pub enum TrustedDealerError {
    #[error("combine core share with auxiliary data")]
    Combine(#[source] InvalidCombinedShare),
}
