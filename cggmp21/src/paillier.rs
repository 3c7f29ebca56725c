//! Thin helpers around `paillier_zk`'s Paillier encryption/decryption so the
//! presign and signing rounds don't each re-derive nonce sampling and
//! ciphertext homomorphism (spec.md §4.1).
//!
//! `paillier_zk::libpaillier` already implements the cryptosystem itself
//! (`EncryptionKey`/`DecryptionKey` constructed from `N` or `(P, Q)`); this
//! module only adds the "encrypt with a freshly sampled nonce, return both"
//! convenience the spec's `encrypt(m, r) -> (c, r)` signature calls for, plus
//! the additive/multiplicative ciphertext combinators used by MtA.

use generic_ec::{Curve, Scalar};
use paillier_zk::{
    libpaillier, unknown_order::BigNumber, BigNumberExt, SafePaillierDecryptionExt, SafePaillierEncryptionExt,
};

use crate::utils::{sample_bigint_in_mult_group, scalar_to_bignumber};

/// A plaintext together with the ciphertext it encrypts to and the nonce
/// that was used, `(c, m, r)`.
pub struct Encrypted {
    pub ciphertext: BigNumber,
    pub nonce: BigNumber,
}

/// `encrypt(m, r) = (1+N)^m * r^N mod N^2`, sampling a fresh `r` uniformly
/// from `(Z/NZ)*`.
pub fn encrypt<R: rand_core::RngCore>(key: &libpaillier::EncryptionKey, n: &BigNumber, m: &BigNumber, rng: &mut R) -> Result<Encrypted, PaillierError> {
    let nonce = sample_bigint_in_mult_group(rng, n);
    let ciphertext = key.encrypt_with(m, &nonce).map_err(|_| PaillierError::MessageTooLong)?;
    Ok(Encrypted { ciphertext, nonce })
}

/// `encrypt` specialized to a curve scalar plaintext (presign's `k_i`,
/// `γ_i`, `x_i`).
pub fn encrypt_scalar<E: Curve, R: rand_core::RngCore>(
    key: &libpaillier::EncryptionKey,
    n: &BigNumber,
    m: &Scalar<E>,
    rng: &mut R,
) -> Result<Encrypted, PaillierError> {
    encrypt(key, n, &scalar_to_bignumber(m), rng)
}

/// `c1 ⊞ c2`: additive ciphertext combination, realized as multiplication
/// mod `N^2`.
pub fn ct_add(n: &BigNumber, c1: &BigNumber, c2: &BigNumber) -> BigNumber {
    let nn = n * n;
    c1.modmul(c2, &nn)
}

/// `m ⊡ c`: scalar ciphertext scaling, realized as exponentiation mod `N^2`.
pub fn ct_scale(n: &BigNumber, m: &BigNumber, c: &BigNumber) -> BigNumber {
    let nn = n * n;
    c.powmod(m, &nn).unwrap_or_else(|_| BigNumber::one())
}

/// Decrypts `c` and interprets the plaintext as a signed integer centered on
/// zero (CGGMP21's MtA shares are drawn from `±2^l`, not `[0, N)`, so the
/// raw `[0, N)` representative must be re-centered before use).
pub fn decrypt_signed(dec: &libpaillier::DecryptionKey, n: &BigNumber, c: &BigNumber) -> Result<BigNumber, PaillierError> {
    let m = dec.decrypt_to_bigint(c).map_err(|_| PaillierError::MessageMalformed)?;
    let half = n.clone() >> 1;
    Ok(if m > half { m - n } else { m })
}

/// [`decrypt_signed`] reduced mod the curve order into a [`Scalar`].
pub fn decrypt_to_scalar<E: Curve>(dec: &libpaillier::DecryptionKey, n: &BigNumber, c: &BigNumber) -> Result<Scalar<E>, PaillierError> {
    Ok(decrypt_signed(dec, n, c)?.to_scalar())
}

#[derive(Debug, thiserror_no_std::Error)]
pub enum PaillierError {
    #[error("message too long (outside [0, N))")]
    MessageTooLong,
    #[error("malformed ciphertext (gcd(c, N) != 1)")]
    MessageMalformed,
}
