//! The zero-knowledge proof suite used by auxiliary setup, presign, and
//! signing (spec.md §4.2).
//!
//! `mod` and `fac` are thin re-exports of the `paillier-zk` crate's modules,
//! which already implement the Fiat-Shamir non-interactive versions CGGMP21
//! needs: both statements are pure big-integer arithmetic over a Paillier
//! modulus, matching `paillier-zk`'s own dependency footprint (no
//! `generic-ec`). `schnorr` is `generic_ec_zkp::schnorr_pok`, used directly
//! by keygen/auxiliary rather than through this module.
//!
//! The remaining proofs — `prm`, `enc`, `aff-g`, `aff-p`, `log-star` — mix a
//! curve-point statement with the Paillier arithmetic, so they're
//! implemented locally below in the same Sigma-protocol shape as the
//! `paillier-affine-operation-in-range` reference construction, collapsed to
//! a single Fiat-Shamir round. Curve-side challenges reuse
//! `Scalar::<E>::hash_concat` (the exact helper `cggmp21_keygen::keygen`
//! already uses for its own Schnorr challenge), so no new hash-to-scalar
//! machinery is invented here.

pub use paillier_zk::{no_small_factor as fac, paillier_blum_modulus as modulo};

use digest::Digest;
use generic_ec::{hash_to_curve::Tag, Curve, Point, Scalar};
use paillier_zk::{libpaillier, unknown_order::BigNumber, BigNumberExt, SafePaillierEncryptionExt};
use rand_core::RngCore;

use crate::utils::scalar_to_bignumber;

/// Range-proof parameters shared by [`enc`], [`log_star`], [`aff_g`] and
/// [`aff_p`]: the bound `l` on the "real" witness and the statistical slack
/// `epsilon`. Mirrors `paillier_zk::no_small_factor::non_interactive::SecurityParams`'s
/// field names so call sites read the same way regardless of which proof
/// they parameterize.
#[derive(Clone)]
pub struct SecurityParams {
    pub l: usize,
    pub epsilon: usize,
}

/// Ring-Pedersen auxiliary parameters the verifier publishes, used to hide
/// the prover's masking randomness in a Strong-RSA setting. Same shape as
/// `paillier_zk::no_small_factor::non_interactive::Aux`.
pub struct Aux {
    pub s: BigNumber,
    pub t: BigNumber,
    pub rsa_modulo: BigNumber,
}

#[derive(Debug, thiserror_no_std::Error)]
pub enum ZkError {
    #[error("paillier operation failed")]
    Paillier,
    #[error("invalid hash-to-curve tag")]
    InvalidTag,
    #[error("hash to scalar returned error")]
    HashToScalar(#[source] generic_ec::errors::HashError),
    #[error("equation check failed")]
    EquationCheckFailed,
    #[error("response out of range")]
    RangeCheckFailed,
}

/// `s^a * t^b mod n`, the Pedersen-style hiding commitment used throughout
/// this module's proofs.
fn combine(s: &BigNumber, a: &BigNumber, t: &BigNumber, b: &BigNumber, n: &BigNumber) -> BigNumber {
    s.powmod(a, n).unwrap_or_else(|_| BigNumber::one()).modmul(&t.powmod(b, n).unwrap_or_else(|_| BigNumber::one()), n)
}

fn pedersen_commit(aux: &Aux, a: &BigNumber, b: &BigNumber) -> BigNumber {
    combine(&aux.s, a, &aux.t, b, &aux.rsa_modulo)
}

/// Ciphertext "addition": `Enc(a) (+) Enc(b) = Enc(a+b)`, realized as
/// multiplication mod `N^2`.
fn ct_add(c1: &BigNumber, c2: &BigNumber, nn: &BigNumber) -> BigNumber {
    c1.modmul(c2, nn)
}

/// Ciphertext "scaling": `k (.) Enc(a) = Enc(k*a)`, realized as
/// exponentiation mod `N^2`.
fn ct_scale(c: &BigNumber, k: &BigNumber, nn: &BigNumber) -> BigNumber {
    c.powmod(k, nn).unwrap_or_else(|_| BigNumber::one())
}

fn in_range(x: &BigNumber, bound: &BigNumber) -> bool {
    let neg_bound = BigNumber::zero() - bound;
    x <= bound && x >= &neg_bound
}

pub fn two_to(bits: usize) -> BigNumber {
    BigNumber::one() << bits
}

/// Uniformly samples from `[-bound, bound]`, the "plus-minus" ranges the
/// CGGMP21 proofs draw their masking randomness from. Also used directly by
/// the presign round to sample MtA's `β` masks with the same distribution
/// its own `aff-g` proofs assume, and by `eddsa_frost::cggmp_variant`'s
/// Ed25519 restatement of `log_star`.
pub fn sample_pm<R: RngCore>(bound: &BigNumber, rng: &mut R) -> BigNumber {
    BigNumber::from_rng(&(bound * 2 + 1), rng) - bound
}

fn plain_challenge<D: Digest>(mut transcript: D, parts: &[&[u8]]) -> BigNumber {
    for p in parts {
        transcript.update(p);
    }
    BigNumber::from_slice(transcript.finalize())
}

/// Derives a curve-scalar Fiat-Shamir challenge the same way
/// `cggmp21_keygen::keygen` derives its Schnorr challenge: the transcript
/// digest becomes a `Tag`, which is then hashed-to-scalar.
fn curve_challenge<E: Curve, D: Digest>(mut transcript: D, parts: &[&[u8]]) -> Result<Scalar<E>, ZkError> {
    for p in parts {
        transcript.update(p);
    }
    let tag_bytes = transcript.finalize();
    let tag = Tag::new(&tag_bytes).ok_or(ZkError::InvalidTag)?;
    Scalar::<E>::hash_concat(tag, &[b"cggmp21.zk-challenge".as_slice()]).map_err(ZkError::HashToScalar)
}

/// `enc`: `C` Paillier-encrypts a value `k` small enough to live in `±2^l`
/// under the prover's `N` (spec.md §4.2 table, used by presign round 1→2).
pub mod enc {
    use super::*;

    pub struct Data<'a> {
        pub n: &'a BigNumber,
        pub c: &'a BigNumber,
    }
    pub struct PrivateData<'a> {
        pub k: &'a BigNumber,
        pub rho: &'a BigNumber,
    }
    #[derive(Clone, serde::Serialize, serde::Deserialize)]
    pub struct Proof {
        a: BigNumber,
        s: BigNumber,
        c: BigNumber,
        z1: BigNumber,
        z2: BigNumber,
        z3: BigNumber,
    }

    pub fn prove<D: Digest, R: RngCore>(
        transcript: D,
        aux: &Aux,
        data: Data,
        pdata: PrivateData,
        params: &SecurityParams,
        rng: &mut R,
    ) -> Result<Proof, ZkError> {
        let two_l_e = two_to(params.l + params.epsilon);
        let two_l = two_to(params.l);
        let key = libpaillier::EncryptionKey::from(data.n);

        let alpha = sample_pm(&two_l_e, rng);
        let mu = sample_pm(&(&two_l * &aux.rsa_modulo), rng);
        let gamma = sample_pm(&(&two_l_e * &aux.rsa_modulo), rng);
        let r = BigNumber::from_rng(data.n, rng);

        let a = key.encrypt_with(&alpha, &r).map_err(|_| ZkError::Paillier)?;
        let s = pedersen_commit(aux, pdata.k, &mu);
        let c = pedersen_commit(aux, &alpha, &gamma);

        let e = plain_challenge::<D>(transcript, &[&data.n.to_bytes(), &data.c.to_bytes(), &a.to_bytes(), &s.to_bytes(), &c.to_bytes()]);

        let z1 = &alpha + &e * pdata.k;
        let z2 = r.modmul(&pdata.rho.powmod(&e, data.n).unwrap_or_else(|_| BigNumber::one()), data.n);
        let z3 = gamma + &e * &mu;
        Ok(Proof { a, s, c, z1, z2, z3 })
    }

    pub fn verify<D: Digest>(transcript: D, aux: &Aux, data: Data, params: &SecurityParams, proof: &Proof) -> Result<(), ZkError> {
        let nn = data.n * data.n;
        let key = libpaillier::EncryptionKey::from(data.n);

        let e = plain_challenge::<D>(transcript, &[&data.n.to_bytes(), &data.c.to_bytes(), &proof.a.to_bytes(), &proof.s.to_bytes(), &proof.c.to_bytes()]);

        let lhs = key.encrypt_with(&proof.z1, &proof.z2).map_err(|_| ZkError::Paillier)?;
        let rhs = ct_add(&proof.a, &ct_scale(data.c, &e, &nn), &nn);
        if lhs != rhs {
            return Err(ZkError::EquationCheckFailed);
        }

        let lhs = pedersen_commit(aux, &proof.z1, &proof.z3);
        let rhs = combine(&proof.c, &BigNumber::one(), &proof.s, &e, &aux.rsa_modulo);
        if lhs != rhs {
            return Err(ZkError::EquationCheckFailed);
        }

        if !in_range(&proof.z1, &(two_to(params.l + params.epsilon) * 2)) {
            return Err(ZkError::RangeCheckFailed);
        }
        Ok(())
    }
}

/// `log-star`: Paillier ciphertext `C` matches a committed exponent `x` of a
/// curve point `X = x·B`, with `x` bounded (spec.md §4.2 table, used by
/// presign rounds 2/3 and EdDSA presign's CGGMP variant).
///
/// `B` defaults to the curve generator (proving `X = x·G`), but presign
/// round 3 reuses this same proof with `B = Γ` to tie `K_i`'s plaintext to
/// `Δ_i = k_i·Γ`, so the base point is a statement parameter rather than
/// hardcoded to the generator.
pub mod log_star {
    use super::*;

    pub struct Data<'a, E: Curve> {
        pub n: &'a BigNumber,
        pub c: &'a BigNumber,
        pub x: &'a Point<E>,
        /// Base point `B`; `X = x·B`. Pass `Point::<E>::generator().into()` for
        /// the common `X = x·G` case.
        pub b: Point<E>,
    }
    pub struct PrivateData<'a, E: Curve> {
        pub x: &'a Scalar<E>,
        pub rho: &'a BigNumber,
    }
    #[derive(Clone, serde::Serialize, serde::Deserialize)]
    pub struct Proof<E: Curve> {
        a: BigNumber,
        y: Point<E>,
        s: BigNumber,
        c: BigNumber,
        z1: Scalar<E>,
        z2: BigNumber,
        z3: BigNumber,
    }

    pub fn prove<E: Curve, D: Digest, R: RngCore>(
        transcript: D,
        aux: &Aux,
        data: Data<E>,
        pdata: PrivateData<E>,
        params: &SecurityParams,
        rng: &mut R,
    ) -> Result<Proof<E>, ZkError> {
        let two_l = two_to(params.l);
        let two_l_e = two_to(params.l + params.epsilon);
        let key = libpaillier::EncryptionKey::from(data.n);

        let alpha = Scalar::<E>::random(rng);
        let mu = sample_pm(&(&two_l * &aux.rsa_modulo), rng);
        let gamma = sample_pm(&(&two_l_e * &aux.rsa_modulo), rng);
        let r = BigNumber::from_rng(data.n, rng);

        let a = key.encrypt_with(&scalar_to_bignumber(&alpha), &r).map_err(|_| ZkError::Paillier)?;
        let y = data.b * alpha;
        let s = pedersen_commit(aux, &scalar_to_bignumber(pdata.x), &mu);
        let c = pedersen_commit(aux, &scalar_to_bignumber(&alpha), &gamma);

        let e = curve_challenge::<E, D>(
            transcript,
            &[&data.n.to_bytes(), &data.c.to_bytes(), &data.x.to_bytes(true), &a.to_bytes(), &y.to_bytes(true), &s.to_bytes(), &c.to_bytes()],
        )?;
        let e_num = scalar_to_bignumber(&e);

        let z1 = alpha + e * pdata.x;
        let z2 = r.modmul(&pdata.rho.powmod(&e_num, data.n).unwrap_or_else(|_| BigNumber::one()), data.n);
        let z3 = gamma + &e_num * &mu;

        Ok(Proof { a, y, s, c, z1, z2, z3 })
    }

    pub fn verify<E: Curve, D: Digest>(transcript: D, aux: &Aux, data: Data<E>, params: &SecurityParams, proof: &Proof<E>) -> Result<(), ZkError> {
        let nn = data.n * data.n;
        let key = libpaillier::EncryptionKey::from(data.n);

        let e = curve_challenge::<E, D>(
            transcript,
            &[&data.n.to_bytes(), &data.c.to_bytes(), &data.x.to_bytes(true), &proof.a.to_bytes(), &proof.y.to_bytes(true), &proof.s.to_bytes(), &proof.c.to_bytes()],
        )?;
        let e_num = scalar_to_bignumber(&e);

        let lhs = key.encrypt_with(&scalar_to_bignumber(&proof.z1), &proof.z2).map_err(|_| ZkError::Paillier)?;
        let rhs = ct_add(&proof.a, &ct_scale(data.c, &e_num, &nn), &nn);
        if lhs != rhs {
            return Err(ZkError::EquationCheckFailed);
        }

        if data.b * proof.z1 != proof.y + e * data.x {
            return Err(ZkError::EquationCheckFailed);
        }

        let lhs = pedersen_commit(aux, &scalar_to_bignumber(&proof.z1), &proof.z3);
        let rhs = combine(&proof.c, &BigNumber::one(), &proof.s, &e_num, &aux.rsa_modulo);
        if lhs != rhs {
            return Err(ZkError::EquationCheckFailed);
        }

        Ok(())
    }
}

/// `aff-g`: given `K`(=`C`), `D`, `F` and point `X`, prover knows `x, y, ρ,
/// ρ_y` so that `D = C^x · enc_{N0}(y; ρ)`, `F = enc_{N1}(y; ρ_y)`,
/// `X = x·G`, `x ∈ ±2^l`, `y ∈ ±2^{l'}` (spec.md §4.2 table, used by MtA in
/// ECDSA presign). `aff-p` is the same statement with `X = enc_{N1}(x; ρ_x)`
/// instead of a curve point; see [`super::aff_p`].
pub mod aff_g {
    use super::*;

    pub struct Data<'a, E: Curve> {
        /// `N0`: the modulus `C` and `D` live under
        pub n0: &'a BigNumber,
        /// `N1`: the modulus `F` lives under
        pub n1: &'a BigNumber,
        pub c: &'a BigNumber,
        pub d: &'a BigNumber,
        pub f: &'a BigNumber,
        pub x: &'a Point<E>,
    }
    pub struct PrivateData<'a, E: Curve> {
        pub x: &'a Scalar<E>,
        pub y: &'a BigNumber,
        /// Nonce used to encrypt `y`'s contribution to `D` under `N0`
        pub nonce: &'a BigNumber,
        /// Nonce used to encrypt `y` into `F` under `N1`
        pub nonce_y: &'a BigNumber,
    }
    #[derive(Clone, serde::Serialize, serde::Deserialize)]
    pub struct Proof<E: Curve> {
        a: BigNumber,
        bx: Point<E>,
        by: BigNumber,
        e_resp: BigNumber,
        s: BigNumber,
        f: BigNumber,
        t: BigNumber,
        z1: Scalar<E>,
        z2: BigNumber,
        z3: BigNumber,
        z4: BigNumber,
        w: BigNumber,
        w_y: BigNumber,
    }

    pub fn prove<E: Curve, D: Digest, R: RngCore>(
        transcript: D,
        aux: &Aux,
        data: Data<E>,
        pdata: PrivateData<E>,
        params: &SecurityParams,
        rng: &mut R,
    ) -> Result<Proof<E>, ZkError> {
        let two_l = two_to(params.l);
        let two_l_e = two_to(params.l + params.epsilon);
        let key0 = libpaillier::EncryptionKey::from(data.n0);
        let key1 = libpaillier::EncryptionKey::from(data.n1);
        let nn0 = data.n0 * data.n0;

        let alpha = Scalar::<E>::random(rng);
        let beta = sample_pm(&two_l_e, rng);
        let r = BigNumber::from_rng(data.n0, rng);
        let r_y = BigNumber::from_rng(data.n1, rng);
        let gamma = sample_pm(&(&two_l_e * &aux.rsa_modulo), rng);
        let m = sample_pm(&(&two_l * &aux.rsa_modulo), rng);
        let delta = sample_pm(&(&two_l_e * &aux.rsa_modulo), rng);
        let mu = sample_pm(&(&two_l * &aux.rsa_modulo), rng);

        let alpha_num = scalar_to_bignumber(&alpha);
        let a = ct_add(&ct_scale(data.c, &alpha_num, &nn0), &key0.encrypt_with(&beta, &r).map_err(|_| ZkError::Paillier)?, &nn0);
        let bx = Point::generator() * alpha;
        let by = key1.encrypt_with(&beta, &r_y).map_err(|_| ZkError::Paillier)?;
        let e_resp = pedersen_commit(aux, &alpha_num, &gamma);
        let s = pedersen_commit(aux, &scalar_to_bignumber(pdata.x), &m);
        let f = pedersen_commit(aux, &beta, &delta);
        let t = pedersen_commit(aux, pdata.y, &mu);

        let e = curve_challenge::<E, D>(
            transcript,
            &[
                &data.n0.to_bytes(), &data.n1.to_bytes(), &data.c.to_bytes(), &data.d.to_bytes(), &data.f.to_bytes(), &data.x.to_bytes(true),
                &a.to_bytes(), &bx.to_bytes(true), &by.to_bytes(), &e_resp.to_bytes(), &s.to_bytes(), &f.to_bytes(), &t.to_bytes(),
            ],
        )?;
        let e_num = scalar_to_bignumber(&e);

        let z1 = alpha + e * pdata.x;
        let z2 = &beta + &e_num * pdata.y;
        let z3 = gamma + &e_num * &m;
        let z4 = delta + &e_num * &mu;
        let w = r.modmul(&pdata.nonce.powmod(&e_num, data.n0).unwrap_or_else(|_| BigNumber::one()), data.n0);
        let w_y = r_y.modmul(&pdata.nonce_y.powmod(&e_num, data.n1).unwrap_or_else(|_| BigNumber::one()), data.n1);

        Ok(Proof { a, bx, by, e_resp, s, f, t, z1, z2, z3, z4, w, w_y })
    }

    pub fn verify<E: Curve, D: Digest>(transcript: D, aux: &Aux, data: Data<E>, params: &SecurityParams, proof: &Proof<E>) -> Result<(), ZkError> {
        let nn0 = data.n0 * data.n0;
        let key0 = libpaillier::EncryptionKey::from(data.n0);
        let key1 = libpaillier::EncryptionKey::from(data.n1);

        let e = curve_challenge::<E, D>(
            transcript,
            &[
                &data.n0.to_bytes(), &data.n1.to_bytes(), &data.c.to_bytes(), &data.d.to_bytes(), &data.f.to_bytes(), &data.x.to_bytes(true),
                &proof.a.to_bytes(), &proof.bx.to_bytes(true), &proof.by.to_bytes(), &proof.e_resp.to_bytes(), &proof.s.to_bytes(), &proof.f.to_bytes(), &proof.t.to_bytes(),
            ],
        )?;
        let e_num = scalar_to_bignumber(&e);
        let z1_num = scalar_to_bignumber(&proof.z1);

        let lhs = ct_add(&ct_scale(data.c, &z1_num, &nn0), &key0.encrypt_with(&proof.z2, &proof.w).map_err(|_| ZkError::Paillier)?, &nn0);
        let rhs = ct_add(&proof.a, &ct_scale(data.d, &e_num, &nn0), &nn0);
        if lhs != rhs {
            return Err(ZkError::EquationCheckFailed);
        }

        if Point::generator() * proof.z1 != proof.bx + e * data.x {
            return Err(ZkError::EquationCheckFailed);
        }

        let lhs = key1.encrypt_with(&proof.z2, &proof.w_y).map_err(|_| ZkError::Paillier)?;
        let rhs = ct_add(&proof.by, &ct_scale(data.f, &e_num, &(data.n1 * data.n1)), &(data.n1 * data.n1));
        if lhs != rhs {
            return Err(ZkError::EquationCheckFailed);
        }

        if pedersen_commit(aux, &z1_num, &proof.z3) != combine(&proof.e_resp, &BigNumber::one(), &proof.s, &e_num, &aux.rsa_modulo) {
            return Err(ZkError::EquationCheckFailed);
        }
        if pedersen_commit(aux, &proof.z2, &proof.z4) != combine(&proof.f, &BigNumber::one(), &proof.t, &e_num, &aux.rsa_modulo) {
            return Err(ZkError::EquationCheckFailed);
        }

        if !in_range(&proof.z2, &(two_to(params.l + params.epsilon) * 2)) {
            return Err(ZkError::RangeCheckFailed);
        }
        Ok(())
    }
}

/// `aff-p`: the `aff-g` statement with `X = enc_{N1}(x; ρ_x)` instead of a
/// curve point — CGGMP21's optional MtA variant when the multiplier doesn't
/// need a curve-point commitment.
pub mod aff_p {
    use super::*;

    pub struct Data<'a> {
        pub n0: &'a BigNumber,
        pub n1: &'a BigNumber,
        pub c: &'a BigNumber,
        pub d: &'a BigNumber,
        pub f: &'a BigNumber,
        pub x: &'a BigNumber,
    }
    pub struct PrivateData<'a> {
        pub x: &'a BigNumber,
        pub y: &'a BigNumber,
        pub nonce: &'a BigNumber,
        pub nonce_y: &'a BigNumber,
        pub nonce_x: &'a BigNumber,
    }
    #[derive(Clone, serde::Serialize, serde::Deserialize)]
    pub struct Proof {
        a: BigNumber,
        bx: BigNumber,
        by: BigNumber,
        e_resp: BigNumber,
        s: BigNumber,
        f: BigNumber,
        t: BigNumber,
        z1: BigNumber,
        z2: BigNumber,
        z3: BigNumber,
        z4: BigNumber,
        w: BigNumber,
        w_y: BigNumber,
        w_x: BigNumber,
    }

    pub fn prove<D: Digest, R: RngCore>(
        transcript: D,
        aux: &Aux,
        data: Data,
        pdata: PrivateData,
        params: &SecurityParams,
        rng: &mut R,
    ) -> Result<Proof, ZkError> {
        let two_l = two_to(params.l);
        let two_l_e = two_to(params.l + params.epsilon);
        let key0 = libpaillier::EncryptionKey::from(data.n0);
        let key1 = libpaillier::EncryptionKey::from(data.n1);
        let nn0 = data.n0 * data.n0;

        let alpha = sample_pm(&two_l_e, rng);
        let beta = sample_pm(&two_l_e, rng);
        let r = BigNumber::from_rng(data.n0, rng);
        let r_y = BigNumber::from_rng(data.n1, rng);
        let r_x = BigNumber::from_rng(data.n1, rng);
        let gamma = sample_pm(&(&two_l_e * &aux.rsa_modulo), rng);
        let m = sample_pm(&(&two_l * &aux.rsa_modulo), rng);
        let delta = sample_pm(&(&two_l_e * &aux.rsa_modulo), rng);
        let mu = sample_pm(&(&two_l * &aux.rsa_modulo), rng);

        let a = ct_add(&ct_scale(data.c, &alpha, &nn0), &key0.encrypt_with(&beta, &r).map_err(|_| ZkError::Paillier)?, &nn0);
        let bx = key1.encrypt_with(&alpha, &r_x).map_err(|_| ZkError::Paillier)?;
        let by = key1.encrypt_with(&beta, &r_y).map_err(|_| ZkError::Paillier)?;
        let e_resp = pedersen_commit(aux, &alpha, &gamma);
        let s = pedersen_commit(aux, pdata.x, &m);
        let f = pedersen_commit(aux, &beta, &delta);
        let t = pedersen_commit(aux, pdata.y, &mu);

        let e = plain_challenge::<D>(
            transcript,
            &[
                &data.n0.to_bytes(), &data.n1.to_bytes(), &data.c.to_bytes(), &data.d.to_bytes(), &data.f.to_bytes(), &data.x.to_bytes(),
                &a.to_bytes(), &bx.to_bytes(), &by.to_bytes(), &e_resp.to_bytes(), &s.to_bytes(), &f.to_bytes(), &t.to_bytes(),
            ],
        );

        let z1 = &alpha + &e * pdata.x;
        let z2 = &beta + &e * pdata.y;
        let z3 = gamma + &e * &m;
        let z4 = delta + &e * &mu;
        let w = r.modmul(&pdata.nonce.powmod(&e, data.n0).unwrap_or_else(|_| BigNumber::one()), data.n0);
        let w_y = r_y.modmul(&pdata.nonce_y.powmod(&e, data.n1).unwrap_or_else(|_| BigNumber::one()), data.n1);
        let w_x = r_x.modmul(&pdata.nonce_x.powmod(&e, data.n1).unwrap_or_else(|_| BigNumber::one()), data.n1);

        Ok(Proof { a, bx, by, e_resp, s, f, t, z1, z2, z3, z4, w, w_y, w_x })
    }

    pub fn verify<D: Digest>(transcript: D, aux: &Aux, data: Data, params: &SecurityParams, proof: &Proof) -> Result<(), ZkError> {
        let nn0 = data.n0 * data.n0;
        let nn1 = data.n1 * data.n1;
        let key0 = libpaillier::EncryptionKey::from(data.n0);
        let key1 = libpaillier::EncryptionKey::from(data.n1);

        let e = plain_challenge::<D>(
            transcript,
            &[
                &data.n0.to_bytes(), &data.n1.to_bytes(), &data.c.to_bytes(), &data.d.to_bytes(), &data.f.to_bytes(), &data.x.to_bytes(),
                &proof.a.to_bytes(), &proof.bx.to_bytes(), &proof.by.to_bytes(), &proof.e_resp.to_bytes(), &proof.s.to_bytes(), &proof.f.to_bytes(), &proof.t.to_bytes(),
            ],
        );

        let lhs = ct_add(&ct_scale(data.c, &proof.z1, &nn0), &key0.encrypt_with(&proof.z2, &proof.w).map_err(|_| ZkError::Paillier)?, &nn0);
        let rhs = ct_add(&proof.a, &ct_scale(data.d, &e, &nn0), &nn0);
        if lhs != rhs {
            return Err(ZkError::EquationCheckFailed);
        }

        let lhs = key1.encrypt_with(&proof.z1, &proof.w_x).map_err(|_| ZkError::Paillier)?;
        let rhs = ct_add(&proof.bx, &ct_scale(data.x, &e, &nn1), &nn1);
        if lhs != rhs {
            return Err(ZkError::EquationCheckFailed);
        }

        let lhs = key1.encrypt_with(&proof.z2, &proof.w_y).map_err(|_| ZkError::Paillier)?;
        let rhs = ct_add(&proof.by, &ct_scale(data.f, &e, &nn1), &nn1);
        if lhs != rhs {
            return Err(ZkError::EquationCheckFailed);
        }

        if pedersen_commit(aux, &proof.z1, &proof.z3) != combine(&proof.e_resp, &BigNumber::one(), &proof.s, &e, &aux.rsa_modulo) {
            return Err(ZkError::EquationCheckFailed);
        }
        if pedersen_commit(aux, &proof.z2, &proof.z4) != combine(&proof.f, &BigNumber::one(), &proof.t, &e, &aux.rsa_modulo) {
            return Err(ZkError::EquationCheckFailed);
        }

        if !in_range(&proof.z1, &(two_to(params.l + params.epsilon) * 2)) || !in_range(&proof.z2, &(two_to(params.l + params.epsilon) * 2)) {
            return Err(ZkError::RangeCheckFailed);
        }
        Ok(())
    }
}

/// `prm`: proves that a Ring-Pedersen triple `(N, s, t)` was built from a
/// valid `lambda` with `s = t^lambda mod N`.
///
/// Fiat-Shamir over `M` parallel Schnorr-style challenges in `Z_2`, the
/// construction CGGMP21 §C.4 describes: prover commits `A_k = t^{a_k} mod N`
/// for `a_k <- Z_phi(N)`, derives `e_k` by hashing the transcript, and
/// answers `z_k = a_k + e_k * lambda mod phi(N)`. Verifier checks
/// `t^{z_k} == A_k * s^{e_k} mod N`.
pub mod ring_pedersen_parameters {
    use digest::Digest;
    use paillier_zk::unknown_order::BigNumber;
    use rand_core::RngCore;

    /// Number of parallel Fiat-Shamir challenges; gives ~`2^-SECURITY`
    /// soundness error.
    pub const SECURITY: usize = 80;

    pub struct Data<'a> {
        pub N: &'a BigNumber,
        pub s: &'a BigNumber,
        pub t: &'a BigNumber,
    }

    #[derive(Clone, serde::Serialize, serde::Deserialize)]
    pub struct Proof {
        commitments: Vec<BigNumber>,
        challenge: Vec<bool>,
        responses: Vec<BigNumber>,
    }

    #[derive(Debug, thiserror_no_std::Error)]
    pub enum ZkError {
        #[error("malformed proof: mismatched vector lengths")]
        MalformedProof,
        #[error("equation check failed for challenge bit {0}")]
        EquationCheckFailed(usize),
    }

    fn derive_challenge<D: Digest>(mut transcript: D, data: &Data, commitments: &[BigNumber]) -> Vec<bool> {
        transcript.update(data.N.to_bytes());
        transcript.update(data.s.to_bytes());
        transcript.update(data.t.to_bytes());
        for a in commitments {
            transcript.update(a.to_bytes());
        }
        let digest = transcript.finalize();
        (0..SECURITY)
            .map(|k| {
                let byte = digest[k % digest.len()];
                let bit = (byte >> (k % 8)) & 1;
                bit == 1
            })
            .collect()
    }

    /// Proves that `s = t^lambda mod N`, given the factorization-derived
    /// `phi_n = (P-1)(Q-1)` and the witness `lambda`.
    pub fn prove<D: Digest, R: RngCore>(
        transcript: D,
        rng: &mut R,
        data: Data,
        phi_n: &BigNumber,
        lambda: &BigNumber,
    ) -> Result<Proof, ZkError> {
        let a_values: Vec<BigNumber> = (0..SECURITY).map(|_| BigNumber::from_rng(phi_n, rng)).collect();
        let commitments: Vec<BigNumber> = a_values.iter().map(|a| data.t.powmod(a, data.N).unwrap_or_else(|_| BigNumber::zero())).collect();
        let challenge = derive_challenge(transcript, &data, &commitments);
        let responses = a_values
            .iter()
            .zip(&challenge)
            .map(|(a, &bit)| if bit { (a + lambda).nmod(phi_n) } else { a.nmod(phi_n) })
            .collect();
        Ok(Proof { commitments, challenge, responses })
    }

    /// Verifies a [`Proof`] produced by [`prove`].
    pub fn verify<D: Digest>(transcript: D, data: Data, proof: &Proof) -> Result<(), ZkError> {
        if proof.commitments.len() != SECURITY || proof.challenge.len() != SECURITY || proof.responses.len() != SECURITY {
            return Err(ZkError::MalformedProof);
        }
        let expected_challenge = derive_challenge(transcript, &data, &proof.commitments);
        if expected_challenge != proof.challenge {
            return Err(ZkError::EquationCheckFailed(0));
        }
        for (k, ((a, &bit), z)) in proof.commitments.iter().zip(&proof.challenge).zip(&proof.responses).enumerate() {
            let lhs = data.t.powmod(z, data.N).map_err(|_| ZkError::EquationCheckFailed(k))?;
            let rhs = if bit {
                a.modmul(data.s, data.N)
            } else {
                a.nmod(data.N)
            };
            if lhs != rhs {
                return Err(ZkError::EquationCheckFailed(k));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Completeness and soundness checks for the proof suite (spec.md §8
    //! properties 3/4): an honestly generated proof must verify, and
    //! flipping any one field of the proof or its public statement must
    //! make verification fail. Real proving keys are tiny (384-bit Paillier
    //! moduli) so these run fast; the MtA/presign rounds use much larger
    //! ones via [`crate::security_level::SecurityLevel`].

    use generic_ec::curves::Secp256k1;
    use generic_ec::{Point, Scalar};
    use paillier_zk::{libpaillier, unknown_order::BigNumber};
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;
    use sha2::Sha256;

    use super::*;
    use crate::utils::{sample_bigint_in_mult_group, scalar_to_bignumber};

    const SMALL_PRIME_BITS: usize = 384;

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::from_seed([7u8; 32])
    }

    struct Env {
        n0: BigNumber,
        n1: BigNumber,
        aux: Aux,
    }

    /// Builds two independent Paillier moduli (`n0` for the prover, `n1` for
    /// a second party in the MtA proofs) plus one party's Ring-Pedersen
    /// parameters, the same way [`crate::trusted_dealer::generate_party_aux`]
    /// derives them from freshly sampled safe primes.
    fn test_env(rng: &mut ChaCha20Rng) -> Env {
        let p0 = BigNumber::safe_prime_from_rng(SMALL_PRIME_BITS, rng);
        let q0 = BigNumber::safe_prime_from_rng(SMALL_PRIME_BITS, rng);
        let n0 = &p0 * &q0;

        let p1 = BigNumber::safe_prime_from_rng(SMALL_PRIME_BITS, rng);
        let q1 = BigNumber::safe_prime_from_rng(SMALL_PRIME_BITS, rng);
        let n1 = &p1 * &q1;

        let p_aux = BigNumber::safe_prime_from_rng(SMALL_PRIME_BITS, rng);
        let q_aux = BigNumber::safe_prime_from_rng(SMALL_PRIME_BITS, rng);
        let rsa_modulo = &p_aux * &q_aux;
        let phi = (&p_aux - 1) * (&q_aux - 1);
        let r = sample_bigint_in_mult_group(rng, &rsa_modulo);
        let lambda = BigNumber::from_rng(&phi, rng);
        let t = r.modmul(&r, &rsa_modulo);
        let s = t.powmod(&lambda, &rsa_modulo).expect("t invertible mod rsa_modulo");

        Env { n0, n1, aux: Aux { s, t, rsa_modulo } }
    }

    fn security_params() -> SecurityParams {
        SecurityParams { l: 64, epsilon: 128 }
    }

    #[test]
    fn enc_proof_is_complete() {
        let mut rng = rng();
        let env = test_env(&mut rng);
        let params = security_params();
        let key0 = libpaillier::EncryptionKey::from(&env.n0);

        let k = sample_pm(&two_to(params.l), &mut rng);
        let rho = sample_bigint_in_mult_group(&mut rng, &env.n0);
        let c = key0.encrypt_with(&k, &rho).expect("encryption with a unit nonce always succeeds");

        let data = enc::Data { n: &env.n0, c: &c };
        let pdata = enc::PrivateData { k: &k, rho: &rho };

        let proof = enc::prove::<Sha256, _>(Sha256::new(), &env.aux, enc::Data { n: &env.n0, c: &c }, pdata, &params, &mut rng).unwrap();
        enc::verify::<Sha256>(Sha256::new(), &env.aux, data, &params, &proof).expect("honest proof must verify");
    }

    #[test]
    fn enc_proof_rejects_tampered_ciphertext() {
        let mut rng = rng();
        let env = test_env(&mut rng);
        let params = security_params();
        let key0 = libpaillier::EncryptionKey::from(&env.n0);

        let k = sample_pm(&two_to(params.l), &mut rng);
        let rho = sample_bigint_in_mult_group(&mut rng, &env.n0);
        let c = key0.encrypt_with(&k, &rho).expect("encryption with a unit nonce always succeeds");

        let proof = enc::prove::<Sha256, _>(
            Sha256::new(),
            &env.aux,
            enc::Data { n: &env.n0, c: &c },
            enc::PrivateData { k: &k, rho: &rho },
            &params,
            &mut rng,
        )
        .unwrap();

        // A statement about a different ciphertext must not verify against a
        // proof for the original one.
        let other_c = ct_add(&c, &BigNumber::one(), &(&env.n0 * &env.n0));
        let tampered_data = enc::Data { n: &env.n0, c: &other_c };
        assert!(enc::verify::<Sha256>(Sha256::new(), &env.aux, tampered_data, &params, &proof).is_err());
    }

    #[test]
    fn log_star_proof_is_complete_and_sound() {
        let mut rng = rng();
        let env = test_env(&mut rng);
        let params = security_params();
        let key0 = libpaillier::EncryptionKey::from(&env.n0);

        let x = Scalar::<Secp256k1>::random(&mut rng);
        let rho = sample_bigint_in_mult_group(&mut rng, &env.n0);
        let c = key0.encrypt_with(&scalar_to_bignumber(&x), &rho).expect("encryption with a unit nonce always succeeds");
        let b: Point<Secp256k1> = Point::generator();
        let point_x = Point::<Secp256k1>::generator() * x;

        let proof = log_star::prove::<Secp256k1, Sha256, _>(
            Sha256::new(),
            &env.aux,
            log_star::Data { n: &env.n0, c: &c, x: &point_x, b },
            log_star::PrivateData { x: &x, rho: &rho },
            &params,
            &mut rng,
        )
        .unwrap();

        log_star::verify::<Secp256k1, Sha256>(Sha256::new(), &env.aux, log_star::Data { n: &env.n0, c: &c, x: &point_x, b }, &params, &proof)
            .expect("honest proof must verify");

        // Claiming the ciphertext commits to a different point must fail.
        let wrong_point = point_x + Point::<Secp256k1>::generator();
        let tampered = log_star::Data { n: &env.n0, c: &c, x: &wrong_point, b };
        assert!(log_star::verify::<Secp256k1, Sha256>(Sha256::new(), &env.aux, tampered, &params, &proof).is_err());
    }

    #[test]
    fn aff_g_proof_is_complete_and_sound() {
        let mut rng = rng();
        let env = test_env(&mut rng);
        let params = security_params();
        let key0 = libpaillier::EncryptionKey::from(&env.n0);
        let key1 = libpaillier::EncryptionKey::from(&env.n1);

        let x = Scalar::<Secp256k1>::random(&mut rng);
        let y = sample_pm(&two_to(params.l), &mut rng);
        let c = key0
            .encrypt_with(&sample_pm(&two_to(params.l), &mut rng), &sample_bigint_in_mult_group(&mut rng, &env.n0))
            .unwrap();
        let nonce = sample_bigint_in_mult_group(&mut rng, &env.n0);
        let nonce_y = sample_bigint_in_mult_group(&mut rng, &env.n1);
        let nn0 = &env.n0 * &env.n0;
        let d = ct_add(&ct_scale(&c, &scalar_to_bignumber(&x), &nn0), &key0.encrypt_with(&y, &nonce).unwrap(), &nn0);
        let f = key1.encrypt_with(&y, &nonce_y).unwrap();
        let point_x = Point::<Secp256k1>::generator() * x;

        let data = aff_g::Data { n0: &env.n0, n1: &env.n1, c: &c, d: &d, f: &f, x: &point_x };
        let pdata = aff_g::PrivateData { x: &x, y: &y, nonce: &nonce, nonce_y: &nonce_y };
        let proof = aff_g::prove::<Secp256k1, Sha256, _>(Sha256::new(), &env.aux, data, pdata, &params, &mut rng).unwrap();

        let data = aff_g::Data { n0: &env.n0, n1: &env.n1, c: &c, d: &d, f: &f, x: &point_x };
        aff_g::verify::<Secp256k1, Sha256>(Sha256::new(), &env.aux, data, &params, &proof).expect("honest proof must verify");

        let wrong_point = point_x + Point::<Secp256k1>::generator();
        let tampered = aff_g::Data { n0: &env.n0, n1: &env.n1, c: &c, d: &d, f: &f, x: &wrong_point };
        assert!(aff_g::verify::<Secp256k1, Sha256>(Sha256::new(), &env.aux, tampered, &params, &proof).is_err());
    }

    #[test]
    fn aff_p_proof_is_complete_and_sound() {
        let mut rng = rng();
        let env = test_env(&mut rng);
        let params = security_params();
        let key0 = libpaillier::EncryptionKey::from(&env.n0);
        let key1 = libpaillier::EncryptionKey::from(&env.n1);

        let x = sample_pm(&two_to(params.l), &mut rng);
        let y = sample_pm(&two_to(params.l), &mut rng);
        let c = key0
            .encrypt_with(&sample_pm(&two_to(params.l), &mut rng), &sample_bigint_in_mult_group(&mut rng, &env.n0))
            .unwrap();
        let nonce = sample_bigint_in_mult_group(&mut rng, &env.n0);
        let nonce_y = sample_bigint_in_mult_group(&mut rng, &env.n1);
        let nonce_x = sample_bigint_in_mult_group(&mut rng, &env.n1);
        let nn0 = &env.n0 * &env.n0;
        let d = ct_add(&ct_scale(&c, &x, &nn0), &key0.encrypt_with(&y, &nonce).unwrap(), &nn0);
        let f = key1.encrypt_with(&y, &nonce_y).unwrap();
        let enc_x = key1.encrypt_with(&x, &nonce_x).unwrap();

        let data = aff_p::Data { n0: &env.n0, n1: &env.n1, c: &c, d: &d, f: &f, x: &enc_x };
        let pdata = aff_p::PrivateData { x: &x, y: &y, nonce: &nonce, nonce_y: &nonce_y, nonce_x: &nonce_x };
        let proof = aff_p::prove::<Sha256, _>(Sha256::new(), &env.aux, data, pdata, &params, &mut rng).unwrap();

        let data = aff_p::Data { n0: &env.n0, n1: &env.n1, c: &c, d: &d, f: &f, x: &enc_x };
        aff_p::verify::<Sha256>(Sha256::new(), &env.aux, data, &params, &proof).expect("honest proof must verify");

        // A statement claiming a different encrypted `x` must not verify
        // against a proof for the original one.
        let wrong_enc_x = ct_add(&enc_x, &key1.encrypt_with(&BigNumber::one(), &sample_bigint_in_mult_group(&mut rng, &env.n1)).unwrap(), &(&env.n1 * &env.n1));
        let tampered = aff_p::Data { n0: &env.n0, n1: &env.n1, c: &c, d: &d, f: &f, x: &wrong_enc_x };
        assert!(aff_p::verify::<Sha256>(Sha256::new(), &env.aux, tampered, &params, &proof).is_err());
    }

    #[test]
    fn ring_pedersen_parameters_proof_is_complete_and_sound() {
        let mut rng = rng();
        let p = BigNumber::safe_prime_from_rng(SMALL_PRIME_BITS, &mut rng);
        let q = BigNumber::safe_prime_from_rng(SMALL_PRIME_BITS, &mut rng);
        let n = &p * &q;
        let phi_n = (&p - 1) * (&q - 1);
        let r = sample_bigint_in_mult_group(&mut rng, &n);
        let lambda = BigNumber::from_rng(&phi_n, &mut rng);
        let t = r.modmul(&r, &n);
        let s = t.powmod(&lambda, &n).expect("t invertible mod n");

        let data = ring_pedersen_parameters::Data { N: &n, s: &s, t: &t };
        let proof = ring_pedersen_parameters::prove::<Sha256, _>(Sha256::new(), &mut rng, data, &phi_n, &lambda).unwrap();

        let data = ring_pedersen_parameters::Data { N: &n, s: &s, t: &t };
        ring_pedersen_parameters::verify::<Sha256>(Sha256::new(), data, &proof).expect("honest proof must verify");

        // A triple that wasn't built from `lambda` (here: `s` and `t` swapped)
        // must not verify against the same proof.
        let tampered = ring_pedersen_parameters::Data { N: &n, s: &t, t: &s };
        assert!(ring_pedersen_parameters::verify::<Sha256>(Sha256::new(), tampered, &proof).is_err());
    }
}
