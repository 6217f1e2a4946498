//! Cryptographic functions for minex
//!
//! Provides AES-256-GCM encryption with Argon2id key derivation
//! for optional at-rest encryption of the expense store.

pub mod encryption;
pub mod key_derivation;
pub mod passphrase;

pub use encryption::{
    create_verification, decrypt, decrypt_string, encrypt, encrypt_string, verify_key,
    EncryptedData,
};
pub use key_derivation::{derive_key, DerivedKey, KeyDerivationParams};
pub use passphrase::{read_new_passphrase, read_passphrase, Passphrase};
