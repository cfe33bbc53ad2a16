//! TLS 1.2 PRF with SHA-256 (RFC 5246 §5).
//!
//! ```text
//! PRF(secret, label, seed) = P_SHA256(secret, label + seed)
//!
//! P_hash(secret, seed) = HMAC_hash(secret, A(1) + seed) ||
//!                        HMAC_hash(secret, A(2) + seed) || ...
//! A(0) = seed
//! A(i) = HMAC_hash(secret, A(i-1))
//! ```

use super::CryptoError;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Fills `output` with `PRF(secret, label, seed)`.
pub fn prf(secret: &[u8], label: &[u8], seed: &[u8], output: &mut [u8]) -> Result<(), CryptoError> {
    let mut label_seed = Vec::with_capacity(label.len() + seed.len());
    label_seed.extend_from_slice(label);
    label_seed.extend_from_slice(seed);
    p_sha256(secret, &label_seed, output)
}

fn p_sha256(secret: &[u8], seed: &[u8], output: &mut [u8]) -> Result<(), CryptoError> {
    let keyed = HmacSha256::new_from_slice(secret).map_err(|_| CryptoError::InvalidKeyLength)?;

    // A(0) = seed
    let mut a = seed.to_vec();
    let mut filled = 0;
    while filled < output.len() {
        let mut mac = keyed.clone();
        mac.update(&a);
        a = mac.finalize().into_bytes().to_vec();

        let mut mac = keyed.clone();
        mac.update(&a);
        mac.update(seed);
        let block = mac.finalize().into_bytes();

        let take = block.len().min(output.len() - filled);
        output[filled..filled + take].copy_from_slice(&block[..take]);
        filled += take;
    }
    Ok(())
}
