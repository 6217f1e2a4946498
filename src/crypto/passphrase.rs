//! Passphrase input
//!
//! Passphrases are read once per process, either from `MINEX_PASSPHRASE`
//! (scripts and tests) or from an interactive prompt, and wiped from memory
//! when dropped.

use std::fmt;
use std::ops::Deref;

use crate::error::{MinexError, MinexResult};

/// Environment variable consulted before prompting
pub const PASSPHRASE_ENV: &str = "MINEX_PASSPHRASE";

/// A passphrase whose bytes are zeroed on drop
pub struct Passphrase {
    inner: String,
}

impl Passphrase {
    pub fn new(s: impl Into<String>) -> Self {
        Self { inner: s.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl Drop for Passphrase {
    fn drop(&mut self) {
        // SAFETY: every byte is overwritten with 0, which keeps the String valid UTF-8
        unsafe {
            for byte in self.inner.as_bytes_mut().iter_mut() {
                std::ptr::write_volatile(byte, 0);
            }
        }
        self.inner.clear();
    }
}

impl Deref for Passphrase {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Passphrase([REDACTED {} bytes])", self.inner.len())
    }
}

/// Read a passphrase from the environment or the terminal
pub fn read_passphrase(prompt: &str) -> MinexResult<Passphrase> {
    if let Ok(value) = std::env::var(PASSPHRASE_ENV) {
        return non_empty(value);
    }

    let value = rpassword::prompt_password(prompt)
        .map_err(|e| MinexError::Io(format!("Failed to read passphrase: {}", e)))?;
    non_empty(value)
}

/// Prompt twice and require both entries to match
pub fn read_new_passphrase() -> MinexResult<Passphrase> {
    if std::env::var(PASSPHRASE_ENV).is_ok() {
        return read_passphrase("");
    }

    let first = read_passphrase("New passphrase: ")?;
    let second = read_passphrase("Confirm passphrase: ")?;
    if first.as_str() != second.as_str() {
        return Err(MinexError::Validation("Passphrases do not match".into()));
    }
    Ok(first)
}

fn non_empty(value: String) -> MinexResult<Passphrase> {
    if value.is_empty() {
        return Err(MinexError::Validation("Passphrase cannot be empty".into()));
    }
    Ok(Passphrase::new(value))
}
