//! # Transformación del Password
//! src/jobs/transform.rs
//!
//! SHA-512 del password codificado en base64 estándar (con padding).
//! Es la parte CPU-bound del job; no tiene estado ni puede fallar.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha512};

/// Calcula el digest de un password
///
/// ```
/// use hash_server::jobs::transform;
///
/// let digest = transform("angryMonkey");
/// assert_eq!(digest.len(), 88);
/// assert_eq!(digest, transform("angryMonkey"));
/// ```
pub fn transform(input: &str) -> String {
    let hash = Sha512::digest(input.as_bytes());
    STANDARD.encode(hash)
}
