//! AES-256-GCM encryption/decryption
//!
//! The expense store is written as a single `EncryptedData` envelope when
//! encryption is enabled. Each encryption uses a fresh random nonce.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use crate::error::{MinexError, MinexResult};

use super::DerivedKey;

/// Size of the AES-GCM nonce in bytes (96 bits)
const NONCE_SIZE: usize = 12;

/// Known plaintext encrypted into the settings file to check passphrases
const VERIFICATION_PLAINTEXT: &str = "minex_verify";

/// Encrypted data with associated metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedData {
    /// The nonce used for this encryption (base64 encoded)
    pub nonce: String,
    /// The encrypted ciphertext with authentication tag (base64 encoded)
    pub ciphertext: String,
    /// Version for future algorithm upgrades
    #[serde(default = "default_version")]
    pub version: u8,
}

fn default_version() -> u8 {
    1
}

impl EncryptedData {
    fn new(nonce: &[u8], ciphertext: &[u8]) -> Self {
        Self {
            nonce: STANDARD.encode(nonce),
            ciphertext: STANDARD.encode(ciphertext),
            version: 1,
        }
    }

    fn decode_nonce(&self) -> MinexResult<Vec<u8>> {
        STANDARD
            .decode(&self.nonce)
            .map_err(|e| MinexError::Encryption(format!("Invalid nonce encoding: {}", e)))
    }

    fn decode_ciphertext(&self) -> MinexResult<Vec<u8>> {
        STANDARD
            .decode(&self.ciphertext)
            .map_err(|e| MinexError::Encryption(format!("Invalid ciphertext encoding: {}", e)))
    }
}

/// Encrypt plaintext data using AES-256-GCM
pub fn encrypt(plaintext: &[u8], key: &DerivedKey) -> MinexResult<EncryptedData> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| MinexError::Encryption(format!("Failed to create cipher: {}", e)))?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| MinexError::Encryption(format!("Encryption failed: {}", e)))?;

    Ok(EncryptedData::new(&nonce_bytes, &ciphertext))
}

/// Decrypt ciphertext using AES-256-GCM
pub fn decrypt(encrypted: &EncryptedData, key: &DerivedKey) -> MinexResult<Vec<u8>> {
    if encrypted.version != 1 {
        return Err(MinexError::Encryption(format!(
            "Unsupported encryption version: {}",
            encrypted.version
        )));
    }

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| MinexError::Encryption(format!("Failed to create cipher: {}", e)))?;

    let nonce_bytes = encrypted.decode_nonce()?;
    if nonce_bytes.len() != NONCE_SIZE {
        return Err(MinexError::Encryption(format!(
            "Invalid nonce size: expected {}, got {}",
            NONCE_SIZE,
            nonce_bytes.len()
        )));
    }
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = encrypted.decode_ciphertext()?;

    cipher.decrypt(nonce, ciphertext.as_ref()).map_err(|_| {
        MinexError::Encryption("Decryption failed: invalid key or corrupted data".to_string())
    })
}

/// Encrypt a string
pub fn encrypt_string(plaintext: &str, key: &DerivedKey) -> MinexResult<EncryptedData> {
    encrypt(plaintext.as_bytes(), key)
}

/// Decrypt to a string
pub fn decrypt_string(encrypted: &EncryptedData, key: &DerivedKey) -> MinexResult<String> {
    let plaintext = decrypt(encrypted, key)?;
    String::from_utf8(plaintext)
        .map_err(|e| MinexError::Encryption(format!("Invalid UTF-8 in decrypted data: {}", e)))
}

/// Build the verification blob stored in the settings file
pub fn create_verification(key: &DerivedKey) -> MinexResult<String> {
    let encrypted = encrypt_string(VERIFICATION_PLAINTEXT, key)?;
    Ok(serde_json::to_string(&encrypted)?)
}

/// Check a derived key against a verification blob
pub fn verify_key(key: &DerivedKey, verification: &str) -> bool {
    serde_json::from_str::<EncryptedData>(verification)
        .ok()
        .and_then(|encrypted| decrypt_string(&encrypted, key).ok())
        .is_some_and(|plaintext| plaintext == VERIFICATION_PLAINTEXT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key_derivation::{derive_key, KeyDerivationParams};

    fn test_key(passphrase: &str) -> DerivedKey {
        derive_key(passphrase, &KeyDerivationParams::fast()).unwrap()
    }

    #[test]
    fn test_encrypt_decrypt_string() {
        let key = test_key("test_passphrase");
        let encrypted = encrypt_string(r#"{"all_expenses":""}"#, &key).unwrap();
        let decrypted = decrypt_string(&encrypted, &key).unwrap();
        assert_eq!(decrypted, r#"{"all_expenses":""}"#);
    }

    #[test]
    fn test_different_nonces() {
        let key = test_key("test_passphrase");
        let encrypted1 = encrypt(b"Coffee", &key).unwrap();
        let encrypted2 = encrypt(b"Coffee", &key).unwrap();

        assert_ne!(encrypted1.nonce, encrypted2.nonce);
        assert_ne!(encrypted1.ciphertext, encrypted2.ciphertext);
    }

    #[test]
    fn test_wrong_key_fails() {
        let key1 = test_key("right");
        let key2 = test_key("wrong");

        let encrypted = encrypt(b"Salary", &key1).unwrap();
        assert!(decrypt(&encrypted, &key2).is_err());
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = test_key("test_passphrase");
        let mut encrypted = encrypt(b"Salary", &key).unwrap();

        let mut ciphertext = STANDARD.decode(&encrypted.ciphertext).unwrap();
        ciphertext[0] ^= 0xFF;
        encrypted.ciphertext = STANDARD.encode(&ciphertext);

        assert!(decrypt(&encrypted, &key).is_err());
    }

    #[test]
    fn test_unsupported_version() {
        let key = test_key("test_passphrase");
        let mut encrypted = encrypt(b"x", &key).unwrap();
        encrypted.version = 2;
        assert!(decrypt(&encrypted, &key).is_err());
    }

    #[test]
    fn test_verification_round_trip() {
        let params = KeyDerivationParams::fast();
        let key = derive_key("hunter2", &params).unwrap();
        let verification = create_verification(&key).unwrap();

        assert!(verify_key(&derive_key("hunter2", &params).unwrap(), &verification));
        assert!(!verify_key(&derive_key("hunter3", &params).unwrap(), &verification));
        assert!(!verify_key(&key, "not json"));
    }
}
