//! Full-pipeline ECDSA integration tests: keygen -> auxiliary -> presign ->
//! sign, for both curve families the library carries, in both the
//! non-threshold and threshold (t-of-n) configurations.

mod common;

use cggmp21::signing::DataToSign;
use cggmp21::supported_curves::{Secp256k1, Secp256r1};
use sha2::{Digest as _, Sha256};

fn assert_all_agree_and_verify<E: cggmp21::generic_ec::Curve>(
    signatures: &[cggmp21::signing::Signature<E>],
    public_key: &cggmp21::generic_ec::Point<E>,
    message: &[u8],
) {
    let digest: [u8; 32] = Sha256::digest(message).into();
    let data_to_sign = DataToSign::<E>::from_digest(&digest);
    for sig in signatures {
        sig.verify(public_key, &data_to_sign).expect("signature must verify against the joint public key");
    }
    for pair in signatures.windows(2) {
        assert_eq!(pair[0].r, pair[1].r, "every party must agree on r");
        assert_eq!(pair[0].s, pair[1].s, "every party must agree on s");
    }
}

#[tokio::test]
async fn non_threshold_secp256k1_signs_and_verifies() {
    let n = 3;
    let shares = common::run_full_keygen::<Secp256k1>(n, None).await;
    let public_key = shares[0].core.shared_public_key;
    let presigs = common::run_presign(&shares, None).await;
    let digest: [u8; 32] = Sha256::digest(b"hello, cggmp21").into();
    let data_to_sign = DataToSign::<Secp256k1>::from_digest(&digest);
    let signatures = common::run_signing(&shares, presigs, data_to_sign).await;
    assert_all_agree_and_verify(&signatures, &public_key, b"hello, cggmp21");
}

#[tokio::test]
async fn threshold_secp256k1_subset_signs_and_verifies() {
    let n = 5;
    let t = 3;
    let shares = common::run_full_keygen::<Secp256k1>(n, Some(t)).await;
    let public_key = shares[0].core.shared_public_key;
    // Narrow down to the t signers actually taking part in this session;
    // `KeyShare::subset` re-derives each party's round-local index.
    let signer_indices: Vec<u16> = (0..t).collect();
    let signers: Vec<_> = shares[..usize::from(t)]
        .iter()
        .map(|share| share.subset(&signer_indices).expect("subset must include every signer's own index"))
        .collect();
    let presigs = common::run_presign(&signers, None).await;
    let digest: [u8; 32] = Sha256::digest(b"a threshold message").into();
    let data_to_sign = DataToSign::<Secp256k1>::from_digest(&digest);
    let signatures = common::run_signing(&signers, presigs, data_to_sign).await;
    assert_all_agree_and_verify(&signatures, &public_key, b"a threshold message");
}

#[tokio::test]
async fn non_threshold_secp256r1_signs_and_verifies() {
    let n = 3;
    let shares = common::run_full_keygen::<Secp256r1>(n, None).await;
    let public_key = shares[0].core.shared_public_key;
    let presigs = common::run_presign(&shares, None).await;
    let digest: [u8; 32] = Sha256::digest(b"p-256 message").into();
    let data_to_sign = DataToSign::<Secp256r1>::from_digest(&digest);
    let signatures = common::run_signing(&shares, presigs, data_to_sign).await;
    assert_all_agree_and_verify(&signatures, &public_key, b"p-256 message");
}

#[tokio::test]
async fn leading_zero_digest_signs_the_same_regardless_of_padding() {
    // spec.md scenario B: a digest with leading zero bytes must hash the
    // same whether or not an untrusted intermediary stripped them.
    let n = 3;
    let shares = common::run_full_keygen::<Secp256k1>(n, None).await;
    let public_key = shares[0].core.shared_public_key;

    let full_digest = [0u8, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30];
    let stripped = &full_digest[2..];

    let presigs_a = common::run_presign(&shares, None).await;
    let data_a = DataToSign::<Secp256k1>::from_digest(&full_digest);
    let signatures_a = common::run_signing(&shares, presigs_a, data_a).await;

    let presigs_b = common::run_presign(&shares, None).await;
    let data_b = DataToSign::<Secp256k1>::from_digest_with_length(stripped, full_digest.len());
    let signatures_b = common::run_signing(&shares, presigs_b, data_b).await;

    assert_eq!(signatures_a[0].r, signatures_b[0].r);
    assert_eq!(signatures_a[0].s, signatures_b[0].s);
    signatures_a[0].verify(&public_key, &data_a).unwrap();
    signatures_b[0].verify(&public_key, &data_b).unwrap();
}
