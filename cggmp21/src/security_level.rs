//! Security level of a protocol instance
//!
//! Re-exports [`cggmp21_keygen::security_level`] so the whole signing stack
//! (keygen, auxiliary, presign, signing) shares one set of security
//! constants.

pub use cggmp21_keygen::security_level::{DevLevel, ReasonablySecure, SecurityLevel};
