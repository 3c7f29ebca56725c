//! BIP32 (non-hardened) child key derivation combined with presign/sign
//! (spec.md scenario D): a signature produced against a derived delta must
//! verify against the derived child public key, not the root one.

mod common;

use cggmp21::key_share_core::hd_wallet::{derive_path, parse_path};
use cggmp21::signing::DataToSign;
use cggmp21::supported_curves::Secp256k1;
use sha2::{Digest as _, Sha256};

#[tokio::test]
async fn derived_share_signs_and_verifies_against_the_child_key() {
    let n = 3;
    let shares = common::run_full_keygen::<Secp256k1>(n, None).await;

    let root_public_key = shares[0].core.shared_public_key;
    let root_chain_code = shares[0].core.chain_code;
    // spec.md scenario D's literal path
    let path = parse_path("0/1/2/2/10").expect("path is well-formed");
    let shift = derive_path(root_public_key, root_chain_code, &path).expect("derivation must succeed for this path");

    let presigs = common::run_presign(&shares, Some(shift.delta)).await;
    let digest: [u8; 32] = Sha256::digest(b"pay to the derived child key").into();
    let data_to_sign = DataToSign::<Secp256k1>::from_digest(&digest);
    let signatures = common::run_signing(&shares, presigs, data_to_sign).await;

    for sig in &signatures {
        sig.verify(&shift.child_public_key, &data_to_sign)
            .expect("signature must verify against the derived child public key");
        assert!(
            sig.verify(&root_public_key, &data_to_sign).is_err(),
            "signature must not verify against the un-derived root public key"
        );
    }
}
