//! Shared plumbing for the integration tests: drives keygen/auxiliary/
//! presign/signing through a [`round_based::simulation::Simulation`], one
//! `tokio::spawn`ed task per simulated party, the same shape the upstream
//! `round_based`-based test suites use (see e.g. the FROST blueprint example
//! this crate's retrieval pack contains).

use cggmp21::auxiliary::AuxGenBuilder;
use cggmp21::generic_ec::{hash_to_curve::FromHash, Curve, Scalar};
use cggmp21::key_share::{AuxInfo, IncompleteKeyShare, Valid};
use cggmp21::keygen::KeygenBuilder;
use cggmp21::presign::{PresignBuilder, PresignOutput};
use cggmp21::security_level::DevLevel;
use cggmp21::signing::{DataToSign, Signature, SigningBuilder};
use cggmp21::KeyShare;
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;
use round_based::simulation::Simulation;
use sha2::Sha256;

/// Runs the DKG for `n` parties, `threshold.is_some()` selecting the
/// VSS (t-of-n) path over the additive (n-of-n) one.
pub async fn run_keygen<E>(n: u16, threshold: Option<u16>) -> Vec<Valid<IncompleteKeyShare<E>>>
where
    E: Curve,
    Scalar<E>: FromHash,
{
    let mut simulation = Simulation::<cggmp21::keygen::Msg<E, Sha256>>::new();
    let mut tasks = Vec::with_capacity(usize::from(n));
    for i in 0..n {
        let party = simulation.add_party();
        let mut party_rng = ChaCha20Rng::seed_from_u64(u64::from(i) + 1);
        let builder = match threshold {
            Some(t) => KeygenBuilder::<E, DevLevel, Sha256>::new_threshold(i, n, t),
            None => KeygenBuilder::<E, DevLevel, Sha256>::new_non_threshold(i, n),
        };
        tasks.push(tokio::spawn(async move {
            builder.start(&mut party_rng, party).await.expect("keygen must succeed")
        }));
    }
    let mut out = Vec::with_capacity(usize::from(n));
    for t in tasks {
        out.push(t.await.expect("keygen task panicked"));
    }
    out
}

/// Runs auxiliary setup for `n` parties. Each party samples its own Paillier
/// primes at [`DevLevel`] security (fast) rather than going through the
/// slower production-sized [`cggmp21::security_level::ReasonablySecure`].
pub async fn run_aux_gen<E>(n: u16) -> Vec<AuxInfo<DevLevel>>
where
    E: Curve,
{
    let mut simulation = Simulation::<cggmp21::auxiliary::Msg<Sha256>>::new();
    let mut tasks = Vec::with_capacity(usize::from(n));
    for i in 0..n {
        let party = simulation.add_party();
        let mut party_rng = ChaCha20Rng::seed_from_u64(u64::from(i) + 1000);
        let pregenerated = cggmp21::auxiliary::PregeneratedPrimes::<DevLevel>::generate(&mut party_rng);
        let builder = AuxGenBuilder::<E, DevLevel, Sha256>::new(i, n).set_pregenerated_primes(pregenerated);
        tasks.push(tokio::spawn(async move {
            builder.start(&mut party_rng, party).await.expect("aux-gen must succeed")
        }));
    }
    let mut out = Vec::with_capacity(usize::from(n));
    for t in tasks {
        out.push(t.await.expect("aux-gen task panicked"));
    }
    out
}

/// Combines matching keygen/auxiliary outputs into full [`KeyShare`]s.
pub fn combine<E>(cores: Vec<Valid<IncompleteKeyShare<E>>>, auxes: Vec<AuxInfo<DevLevel>>) -> Vec<KeyShare<E, DevLevel>>
where
    E: Curve,
{
    cores
        .into_iter()
        .zip(auxes)
        .map(|(core, aux)| KeyShare::new(core, aux).expect("keygen and aux-gen outputs must be combinable"))
        .collect()
}

/// Runs a full DKG + auxiliary setup session for `n` parties and returns the
/// resulting [`KeyShare`]s, in party-index order.
pub async fn run_full_keygen<E>(n: u16, threshold: Option<u16>) -> Vec<KeyShare<E, DevLevel>>
where
    E: Curve,
    Scalar<E>: FromHash,
{
    let cores = run_keygen::<E>(n, threshold).await;
    let auxes = run_aux_gen::<E>(n).await;
    combine(cores, auxes)
}

/// Runs presign for every key share in `shares`, optionally applying the
/// same BIP32 `delta` shift to every party (scenario D).
pub async fn run_presign<E>(shares: &[KeyShare<E, DevLevel>], delta: Option<Scalar<E>>) -> Vec<PresignOutput<E>>
where
    E: Curve,
{
    let mut simulation = Simulation::<cggmp21::presign::Msg<E>>::new();
    let mut tasks = Vec::with_capacity(shares.len());
    for (idx, share) in shares.iter().enumerate() {
        let party = simulation.add_party();
        let mut party_rng = ChaCha20Rng::seed_from_u64(idx as u64 + 2000);
        let share = share.clone();
        let mut builder = PresignBuilder::<E, DevLevel, Sha256>::new(&share);
        if let Some(delta) = delta {
            builder = builder.set_derivation_delta(delta);
        }
        tasks.push(tokio::spawn(async move { builder.generate(&mut party_rng, party).await.expect("presign must succeed") }));
    }
    let mut out = Vec::with_capacity(shares.len());
    for t in tasks {
        out.push(t.await.expect("presign task panicked"));
    }
    out
}

/// Signs `message` using each party's presignature, returning every party's
/// independently computed signature.
pub async fn run_signing<E>(shares: &[KeyShare<E, DevLevel>], presigs: Vec<PresignOutput<E>>, message: DataToSign<E>) -> Vec<Signature<E>>
where
    E: Curve,
{
    let mut simulation = Simulation::<cggmp21::signing::Msg<E>>::new();
    let mut tasks = Vec::with_capacity(shares.len());
    for (share, presig) in shares.iter().zip(presigs) {
        let party = simulation.add_party();
        let share = share.clone();
        tasks.push(tokio::spawn(async move {
            SigningBuilder::new(&share).sign(party, presig, message).await.expect("signing must succeed")
        }));
    }
    let mut out = Vec::with_capacity(shares.len());
    for t in tasks {
        out.push(t.await.expect("signing task panicked"));
    }
    out
}
