//! Test fixtures shared by the `cggmp21`/`eddsa-frost` integration tests and
//! the `precompute_shares` binary: a JSON-serializable cache of trusted-dealer
//! key shares and a batch of pregenerated Paillier primes, so a full test run
//! doesn't have to regenerate 2048-bit safe primes (slow) or run the DKG
//! (comparatively fast, but still wasted work when the fixture never
//! changes).

use std::collections::BTreeMap;

use cggmp21::generic_ec::Curve;
use cggmp21::paillier_zk::unknown_order::BigNumber;
use cggmp21::security_level::SecurityLevel;
use rand_core::{CryptoRng, RngCore};

/// A cache of pregenerated [`cggmp21::KeyShare`]s, keyed by curve and party
/// count. Serialized as JSON so it can be committed as a fixture file rather
/// than regenerated by every test run; see `src/bin/precompute_shares.rs`.
#[derive(Default, serde::Serialize, serde::Deserialize)]
pub struct PrecomputedKeyShares {
    shares: BTreeMap<String, BTreeMap<u16, Vec<serde_json::Value>>>,
}

impl PrecomputedKeyShares {
    /// An empty cache, to be filled via [`PrecomputedKeyShares::add_shares`].
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds one `n`-party set of key shares to the cache, keyed by curve type
    /// and `n`.
    pub fn add_shares<E, L>(&mut self, n: u16, shares: &[cggmp21::KeyShare<E, L>]) -> serde_json::Result<()>
    where
        E: Curve,
        L: SecurityLevel,
    {
        let encoded = shares
            .iter()
            .map(serde_json::to_value)
            .collect::<serde_json::Result<Vec<_>>>()?;
        self.shares.entry(curve_key::<E>()).or_default().insert(n, encoded);
        Ok(())
    }

    /// Loads the cached `n`-party set of key shares for curve `E`.
    pub fn load_shares<E, L>(&self, n: u16) -> Result<Vec<cggmp21::KeyShare<E, L>>, LoadError>
    where
        E: Curve,
        L: SecurityLevel,
    {
        let per_curve = self.shares.get(&curve_key::<E>()).ok_or(LoadError::NoSharesForCurve)?;
        let values = per_curve.get(&n).ok_or(LoadError::NoSharesForPartyCount)?;
        values
            .iter()
            .cloned()
            .map(|v| serde_json::from_value(v).map_err(LoadError::Deserialize))
            .collect()
    }

    /// Serializes the whole cache to a pretty-printed JSON string.
    pub fn to_serialized(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a cache previously produced by [`PrecomputedKeyShares::to_serialized`].
    pub fn from_serialized(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

fn curve_key<E: Curve>() -> String {
    std::any::type_name::<E>().to_string()
}

/// A [`PrecomputedKeyShares`] lookup failure
#[derive(Debug, thiserror_no_std::Error)]
pub enum LoadError {
    /// No shares were ever cached for this curve
    #[error("no pregenerated shares for this curve")]
    NoSharesForCurve,
    /// Shares exist for this curve, but not for this exact party count
    #[error("no pregenerated shares for this party count")]
    NoSharesForPartyCount,
    /// A cached entry failed to deserialize back into a key share
    #[error("deserialize cached share")]
    Deserialize(#[source] serde_json::Error),
}

/// A batch of pregenerated Paillier safe-prime pairs, handed out one pair at
/// a time to [`cggmp21::auxiliary::AuxGenBuilder::set_pregenerated_primes`]
/// or [`eddsa_frost`]'s equivalent — sampling 1024-bit safe primes is the
/// slowest part of a test run, so a batch is front-loaded once and reused
/// across many aux-gen sessions in the same test suite.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct PregeneratedPrimes {
    primes: Vec<(BigNumber, BigNumber)>,
}

impl PregeneratedPrimes {
    /// Samples `count` pairs of safe primes at security level `L`.
    pub fn generate<R, L>(count: usize, rng: &mut R) -> Self
    where
        R: RngCore + CryptoRng,
        L: SecurityLevel,
    {
        let primes = (0..count)
            .map(|_| cggmp21::auxiliary::PregeneratedPrimes::<L>::generate(rng).split())
            .collect();
        Self { primes }
    }

    /// How many pairs remain in the batch.
    pub fn len(&self) -> usize {
        self.primes.len()
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.primes.is_empty()
    }

    /// Takes the `i`-th pair out of the batch, for security level `L`.
    pub fn get<L: SecurityLevel>(&self, i: usize) -> Option<cggmp21::auxiliary::PregeneratedPrimes<L>> {
        self.primes
            .get(i)
            .map(|(p, q)| cggmp21::auxiliary::PregeneratedPrimes::new(p.clone(), q.clone()))
    }

    /// Serializes the batch to a JSON string.
    pub fn to_serialized(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a batch previously produced by [`PregeneratedPrimes::to_serialized`].
    pub fn from_serialized(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
