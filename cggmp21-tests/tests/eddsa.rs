//! Full-pipeline FROST EdDSA integration test (spec.md scenario C): keygen
//! -> presign -> sign for a threshold subset of Ed25519 signers, plus the
//! CGGMP21 paper's own non-threshold EdDSA construction (spec.md §4.9).

use cggmp21::security_level::DevLevel;
use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;
use eddsa_frost::keygen::KeygenBuilder;
use eddsa_frost::presign::PresignBuilder;
use eddsa_frost::sign::SigningBuilder;
use eddsa_frost::KeyShare;
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;
use round_based::simulation::Simulation;
use sha2::Sha256;

async fn run_keygen(n: u16, min_signers: u16) -> Vec<KeyShare> {
    let mut simulation = Simulation::<eddsa_frost::keygen::Msg>::new();
    let mut tasks = Vec::with_capacity(usize::from(n));
    for i in 0..n {
        let party = simulation.add_party();
        let mut party_rng = ChaCha20Rng::seed_from_u64(u64::from(i) + 1);
        let builder = KeygenBuilder::<Sha256>::new_threshold(i, n, min_signers);
        tasks.push(tokio::spawn(async move {
            builder.start(&mut party_rng, party).await.expect("frost keygen must succeed")
        }));
    }
    let mut out = Vec::with_capacity(usize::from(n));
    for t in tasks {
        out.push(t.await.expect("frost keygen task panicked"));
    }
    out
}

async fn run_presign(signers: &[(u16, u16, &KeyShare)]) -> Vec<eddsa_frost::presign::PresignOutput> {
    let mut simulation = Simulation::<eddsa_frost::presign::Msg>::new();
    let mut tasks = Vec::with_capacity(signers.len());
    for &(i, n, share) in signers {
        let party = simulation.add_party();
        let mut party_rng = ChaCha20Rng::seed_from_u64(u64::from(i) + 2000);
        let key_package = share.key_package.clone();
        tasks.push(tokio::spawn(async move {
            PresignBuilder::new(i, n, &key_package)
                .generate(&mut party_rng, party)
                .await
                .expect("frost presign must succeed")
        }));
    }
    let mut out = Vec::with_capacity(signers.len());
    for t in tasks {
        out.push(t.await.expect("frost presign task panicked"));
    }
    out
}

async fn run_signing(
    signers: &[(u16, u16, &KeyShare)],
    presigs: Vec<eddsa_frost::presign::PresignOutput>,
    message: &'static [u8],
) -> Vec<frost_ed25519::Signature> {
    let mut simulation = Simulation::<eddsa_frost::sign::Msg>::new();
    let mut tasks = Vec::with_capacity(signers.len());
    for (&(i, n, share), presig) in signers.iter().zip(presigs) {
        let party = simulation.add_party();
        let key_package = share.key_package.clone();
        let public_key_package = share.public_key_package.clone();
        tasks.push(tokio::spawn(async move {
            SigningBuilder::new(i, n, &key_package, &public_key_package)
                .sign(party, presig, message)
                .await
                .expect("frost signing must succeed")
        }));
    }
    let mut out = Vec::with_capacity(signers.len());
    for t in tasks {
        out.push(t.await.expect("frost signing task panicked"));
    }
    out
}

#[tokio::test]
async fn threshold_frost_ed25519_signs_and_verifies() {
    let n = 5;
    let t = 3;
    let shares = run_keygen(n, t).await;
    let verifying_key = shares[0].verifying_key().clone();

    let signers: Vec<(u16, u16, &KeyShare)> = (0..t).map(|i| (i, t, &shares[usize::from(i)])).collect();
    let presigs = run_presign(&signers).await;
    let message: &'static [u8] = b"a frost-signed message";
    let signatures = run_signing(&signers, presigs, message).await;

    for sig in &signatures {
        verifying_key.verify(message, sig).expect("signature must verify against the joint verifying key");
    }
    for pair in signatures.windows(2) {
        assert_eq!(pair[0], pair[1], "frost aggregation must produce the same signature for every signer");
    }
}

#[tokio::test]
async fn cggmp_variant_eddsa_signs_and_verifies() {
    use eddsa_frost::cggmp_variant::{trusted_dealer, Msg, SigningBuilder};

    let n = 3;
    let mut dealer_rng = ChaCha20Rng::seed_from_u64(0xed25519);
    let shares = trusted_dealer::mock_keygen::<DevLevel, _>(&mut dealer_rng, n);
    let verifying_key = *shares[0].verifying_key();

    let message: &'static [u8] = b"a cggmp-variant-signed message";
    let mut simulation = Simulation::<Msg>::new();
    let mut tasks = Vec::with_capacity(usize::from(n));
    for share in &shares {
        let party = simulation.add_party();
        let mut party_rng = ChaCha20Rng::seed_from_u64(u64::from(share.i()) + 3000);
        let share = share.clone();
        tasks.push(tokio::spawn(async move {
            SigningBuilder::new(&share).sign(&mut party_rng, party, message).await.expect("cggmp-variant signing must succeed")
        }));
    }
    let mut signatures = Vec::with_capacity(usize::from(n));
    for t in tasks {
        signatures.push(t.await.expect("cggmp-variant signing task panicked"));
    }

    for sig in &signatures {
        let r = curve25519_dalek::edwards::CompressedEdwardsY(sig.r).decompress().expect("R must decompress");
        let s = curve25519_dalek::scalar::Scalar::from_bytes_mod_order(sig.s);
        let e = {
            use sha2::{Digest, Sha512};
            let mut h = Sha512::new();
            h.update(r.compress().as_bytes());
            h.update(verifying_key.compress().as_bytes());
            h.update(message);
            let digest = h.finalize();
            let mut wide = [0u8; 64];
            wide.copy_from_slice(&digest);
            curve25519_dalek::scalar::Scalar::from_bytes_mod_order_wide(&wide)
        };
        assert_eq!(s * ED25519_BASEPOINT_POINT, r + e * verifying_key, "signature must satisfy the EdDSA verification equation");
    }
    for pair in signatures.windows(2) {
        assert_eq!(pair[0].to_bytes(), pair[1].to_bytes(), "every party must derive the same joint signature");
    }
}
