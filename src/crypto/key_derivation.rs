//! Key derivation using Argon2id
//!
//! Derives the store key from a user passphrase. The salt and cost
//! parameters live in the settings file next to the verification blob.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Algorithm, Argon2, Params, Version,
};
use serde::{Deserialize, Serialize};

use crate::error::{MinexError, MinexResult};

/// Parameters for key derivation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyDerivationParams {
    /// Salt for key derivation (base64 encoded)
    pub salt: String,
    /// Memory cost in KiB
    pub memory_cost: u32,
    /// Time cost (iterations)
    pub time_cost: u32,
    /// Parallelism degree
    pub parallelism: u32,
}

fn fresh_salt() -> String {
    SaltString::generate(&mut OsRng).to_string()
}

impl KeyDerivationParams {
    /// 64 MiB, 3 passes, 4 lanes, random salt
    pub fn new() -> Self {
        Self::with_values(fresh_salt(), 64 * 1024, 3, 4)
    }

    pub fn with_values(salt: String, memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            salt,
            memory_cost,
            time_cost,
            parallelism,
        }
    }

    /// Cheap parameters with a fresh salt, for tests only
    #[cfg(test)]
    pub(crate) fn fast() -> Self {
        Self::with_values(fresh_salt(), 1024, 1, 1)
    }
}

impl Default for KeyDerivationParams {
    fn default() -> Self {
        Self::new()
    }
}

const KEY_LEN: usize = 32;

/// A derived AES-256 key, zeroed on drop
pub struct DerivedKey {
    key: [u8; KEY_LEN],
}

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.key.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Longest salt `SaltString` accepts, in decoded bytes
const MAX_SALT_LEN: usize = 64;

/// Derive the store key from a passphrase
///
/// The same passphrase and parameters always yield the same key.
pub fn derive_key(passphrase: &str, params: &KeyDerivationParams) -> MinexResult<DerivedKey> {
    let salt = SaltString::from_b64(&params.salt)
        .map_err(|e| MinexError::Encryption(format!("Invalid salt: {}", e)))?;
    let mut salt_buf = [0u8; MAX_SALT_LEN];
    let salt_bytes = salt
        .decode_b64(&mut salt_buf)
        .map_err(|e| MinexError::Encryption(format!("Invalid salt: {}", e)))?;

    let cost = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| MinexError::Encryption(format!("Invalid Argon2 parameters: {}", e)))?;

    let mut key = DerivedKey {
        key: [0u8; KEY_LEN],
    };
    Argon2::new(Algorithm::Argon2id, Version::V0x13, cost)
        .hash_password_into(passphrase.as_bytes(), salt_bytes, &mut key.key)
        .map_err(|e| MinexError::Encryption(format!("Key derivation failed: {}", e)))?;

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_passphrase_same_key() {
        let params = KeyDerivationParams::fast();
        let key1 = derive_key("test_passphrase", &params).unwrap();
        let key2 = derive_key("test_passphrase", &params).unwrap();
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_passphrase_different_key() {
        let params = KeyDerivationParams::fast();
        let key1 = derive_key("passphrase1", &params).unwrap();
        let key2 = derive_key("passphrase2", &params).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let key1 = derive_key("same_passphrase", &KeyDerivationParams::fast()).unwrap();
        let key2 = derive_key("same_passphrase", &KeyDerivationParams::fast()).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_invalid_salt_rejected() {
        let params = KeyDerivationParams::with_values("!".into(), 1024, 1, 1);
        let err = derive_key("x", &params).unwrap_err();
        assert!(matches!(err, MinexError::Encryption(_)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let key = derive_key("secret", &KeyDerivationParams::fast()).unwrap();
        assert_eq!(format!("{:?}", key), "DerivedKey([REDACTED])");
    }
}
