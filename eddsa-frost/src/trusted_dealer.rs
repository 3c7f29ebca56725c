//! Trusted-dealer generation of [`KeyShare`]s (gated behind `spof`), for test
//! fixtures and benchmarks that don't need to exercise the DKG round engine.
//!
//! `frost_ed25519::keys::generate_with_dealer` already implements exactly
//! this: one party samples the whole secret-sharing polynomial and hands out
//! `KeyPackage`s directly, no commit-reveal or proof of knowledge needed
//! since there's no one to prove anything to.

use frost_ed25519::keys::{generate_with_dealer, IdentifierList};
use rand_core::{CryptoRng, RngCore};

use crate::key_share::KeyShare;
use crate::utils::identifier;

/// Deals `n` non-threshold (`n`-of-`n`) key shares.
pub fn mock_keygen<R>(rng: &mut R, n: u16) -> Result<Vec<KeyShare>, TrustedDealerError>
where
    R: RngCore + CryptoRng,
{
    mock_keygen_threshold(rng, n, n)
}

/// Deals `n` shares of a `min_signers`-of-`n` FROST sharing.
pub fn mock_keygen_threshold<R>(rng: &mut R, n: u16, min_signers: u16) -> Result<Vec<KeyShare>, TrustedDealerError>
where
    R: RngCore + CryptoRng,
{
    let identifiers: Vec<_> = (0..n).map(identifier).collect();
    let (shares, public_key_package) =
        generate_with_dealer(n, min_signers, IdentifierList::Custom(&identifiers), rng).map_err(TrustedDealerError::Dkg)?;

    identifiers
        .iter()
        .map(|id| {
            let secret_share = shares.get(id).ok_or(TrustedDealerError::MissingShare)?;
            let key_package = frost_ed25519::keys::KeyPackage::try_from(secret_share.clone()).map_err(TrustedDealerError::Dkg)?;
            #[cfg(feature = "hd-wallets")]
            let chain_code = {
                let mut cc = [0u8; 32];
                rng.fill_bytes(&mut cc);
                cc
            };
            Ok(KeyShare {
                key_package,
                public_key_package: public_key_package.clone(),
                #[cfg(feature = "hd-wallets")]
                chain_code,
            })
        })
        .collect()
}

/// Error dealing trusted-dealer key shares
#[derive(Debug, thiserror_no_std::Error)]
pub enum TrustedDealerError {
    #[error("frost dealer keygen failed")]
    Dkg(#[source] frost_ed25519::Error),
    #[error("dealer did not hand out a share for this identifier")]
    MissingShare,
}
