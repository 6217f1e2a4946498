//! Encryption CLI commands
//!
//! Enabling, disabling and re-keying at-rest encryption of the expense
//! store. The passphrase is read from `MINEX_PASSPHRASE` when set, otherwise
//! from the terminal.

use clap::Subcommand;
use log::info;

use crate::config::{paths::MinexPaths, settings::Settings};
use crate::crypto::{
    create_verification, derive_key, read_new_passphrase, read_passphrase, verify_key,
    DerivedKey, KeyDerivationParams,
};
use crate::error::{MinexError, MinexResult};
use crate::storage::Storage;

/// Encryption management commands
#[derive(Subcommand)]
pub enum EncryptCommands {
    /// Encrypt the expense store with a passphrase
    Enable,

    /// Store expenses unencrypted again
    Disable,

    /// Change the encryption passphrase
    #[command(alias = "change")]
    ChangePassphrase,

    /// Show encryption status
    Status,
}

/// Ask for the passphrase and derive the key for an encrypted store
pub fn unlock_key(settings: &Settings) -> MinexResult<DerivedKey> {
    let key_params = settings
        .encryption
        .key_params
        .as_ref()
        .ok_or_else(|| MinexError::Encryption("No key parameters found".to_string()))?;
    let verification = settings
        .encryption
        .verification_hash
        .as_ref()
        .ok_or_else(|| MinexError::Encryption("No verification hash found".to_string()))?;

    let passphrase = read_passphrase("Passphrase: ")?;
    let key = derive_key(&passphrase, key_params)?;

    if !verify_key(&key, verification) {
        return Err(MinexError::Encryption("Invalid passphrase".to_string()));
    }
    Ok(key)
}

/// Handle encryption commands
pub fn handle_encrypt_command(
    paths: &MinexPaths,
    settings: &mut Settings,
    storage: &Storage,
    cmd: EncryptCommands,
) -> MinexResult<()> {
    match cmd {
        EncryptCommands::Enable => enable_encryption(paths, settings, storage),
        EncryptCommands::Disable => disable_encryption(paths, settings, storage),
        EncryptCommands::ChangePassphrase => change_passphrase(paths, settings, storage),
        EncryptCommands::Status => show_status(settings, storage),
    }
}

/// Derive a fresh key and rewrite the store with it
fn rekey(paths: &MinexPaths, settings: &mut Settings, storage: &Storage) -> MinexResult<()> {
    let passphrase = read_new_passphrase()?;
    let key_params = KeyDerivationParams::new();

    println!("Deriving encryption key...");
    let key = derive_key(&passphrase, &key_params)?;
    let verification = create_verification(&key)?;

    storage.set_key(Some(key))?;

    settings.encryption.enabled = true;
    settings.encryption.key_params = Some(key_params);
    settings.encryption.verification_hash = Some(verification);
    settings.save(paths)
}

fn enable_encryption(
    paths: &MinexPaths,
    settings: &mut Settings,
    storage: &Storage,
) -> MinexResult<()> {
    if settings.is_encryption_enabled() {
        println!("Encryption is already enabled.");
        println!("Use 'minex encrypt change-passphrase' to change your passphrase.");
        return Ok(());
    }

    println!("Your expenses will be encrypted with AES-256-GCM.");
    println!("If you forget your passphrase, your data cannot be recovered!");

    rekey(paths, settings, storage)?;
    info!("event=encryption_enabled");

    println!("Encryption enabled.");
    Ok(())
}

fn disable_encryption(
    paths: &MinexPaths,
    settings: &mut Settings,
    storage: &Storage,
) -> MinexResult<()> {
    if !settings.is_encryption_enabled() {
        println!("Encryption is not enabled.");
        return Ok(());
    }

    // The store was unlocked with the verified passphrase at startup
    storage.set_key(None)?;

    settings.encryption.enabled = false;
    settings.encryption.key_params = None;
    settings.encryption.verification_hash = None;
    settings.save(paths)?;
    info!("event=encryption_disabled");

    println!("Encryption disabled. Your expenses are now stored unencrypted.");
    Ok(())
}

fn change_passphrase(
    paths: &MinexPaths,
    settings: &mut Settings,
    storage: &Storage,
) -> MinexResult<()> {
    if !settings.is_encryption_enabled() {
        println!("Encryption is not enabled.");
        println!("Use 'minex encrypt enable' to enable encryption first.");
        return Ok(());
    }

    rekey(paths, settings, storage)?;
    info!("event=passphrase_changed");

    println!("Passphrase changed.");
    Ok(())
}

fn show_status(settings: &Settings, storage: &Storage) -> MinexResult<()> {
    if settings.is_encryption_enabled() && storage.is_encrypted()? {
        println!("Encryption: ENABLED");
        if let Some(params) = &settings.encryption.key_params {
            println!("  Algorithm:   Argon2id + AES-256-GCM");
            println!("  Memory Cost: {} KiB", params.memory_cost);
            println!("  Time Cost:   {} iterations", params.time_cost);
            println!("  Parallelism: {} threads", params.parallelism);
        }
    } else {
        println!("Encryption: DISABLED");
        println!("Run 'minex encrypt enable' to enable encryption.");
    }
    Ok(())
}
