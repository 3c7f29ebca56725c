//! Security level of a protocol instance
//!
//! A [`SecurityLevel`] fixes the constants shared by every round of a
//! protocol run: how many bytes of randomness each party contributes to the
//! session nonce (`SECURITY_BYTES`/`SECURITY_BITS`), and — for the CGGMP21
//! zero-knowledge proofs used downstream in `cggmp21` — the statistical
//! security parameter `ε` and the range bound `l`.

/// Defines a security level for a protocol
///
/// Implementors fix the constants used by an MPC session: how much entropy
/// each party mixes into commitments (the "256-bit random" `srid`, `rho`,
/// `u` values) and, for the ZK proof suite used by the `cggmp21` crate, the
/// bound `l` and statistical security `epsilon`.
pub trait SecurityLevel: Clone + Send + Sync + 'static {
    /// Number of bits of security, e.g. 128
    const SECURITY_BITS: usize;
    /// Number of bytes of security, `SECURITY_BITS / 8`
    const SECURITY_BYTES: usize;

    /// Range bound `l` used by the CGGMP21 zero-knowledge range proofs
    const ELL: usize;
    /// Statistical security parameter `epsilon` used by the same proofs
    const EPSILON: usize;

    /// Upper bound used by the Fiat-Shamir rejection-sampling step of the
    /// `fac`/`mod` zero-knowledge proofs.
    ///
    /// `SecurityLevel` has no curve type parameter (it's shared between the
    /// curve-generic DKG and the Paillier-only proofs), so this can't
    /// literally be "the curve order" for every caller; it's fixed to a
    /// constant comfortably larger than any supported curve's order instead,
    /// matching how the CGGMP21 proofs use `q` purely as a bound on honestly
    /// sampled randomness rather than as the group order itself.
    fn q() -> paillier_zk::unknown_order::BigNumber {
        paillier_zk::unknown_order::BigNumber::one() << 384
    }
}

/// 128-bit statistical security, as recommended for production use by CGGMP21
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReasonablySecure;

impl SecurityLevel for ReasonablySecure {
    const SECURITY_BITS: usize = 384;
    const SECURITY_BYTES: usize = 384 / 8;
    const ELL: usize = 256;
    const EPSILON: usize = 384;
}

/// Lower security suitable only for tests: much faster safe-prime generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DevLevel;

impl SecurityLevel for DevLevel {
    const SECURITY_BITS: usize = 32;
    const SECURITY_BYTES: usize = 32 / 8;
    const ELL: usize = 32;
    const EPSILON: usize = 32;
}
