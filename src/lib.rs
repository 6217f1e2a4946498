//! minex - a minimal personal expense tracker
//!
//! Expenses are signed amounts (negative means income) with labels, an
//! optional note and timestamps. The library keeps them in a local,
//! optionally encrypted key-value store and computes the filtered, sorted
//! list and its running sum.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Paths, settings and the file logger
//! - `error`: Custom error types
//! - `models`: Expenses, money, labels, filters, sorting and date helpers
//! - `storage`: The key-value store and the repositories on top of it
//! - `services`: Record editing, the label vocabulary and the filter/sort engine
//! - `crypto`: Argon2id key derivation and AES-256-GCM encryption
//! - `display`: Plain-text formatting
//! - `cli`: Command handlers for the `minex` binary
//!
//! # Example
//!
//! ```rust
//! use minex::models::Money;
//! use minex::services::{ExpenseBrowser, ExpenseDraft};
//! use minex::storage::Storage;
//!
//! let storage = Storage::in_memory();
//! let mut browser = ExpenseBrowser::load(&storage)?;
//! browser.add(ExpenseDraft::new("Coffee", Money::from_cents(350)))?;
//! browser.add(ExpenseDraft::new("Salary", Money::from_cents(-200000)))?;
//!
//! assert_eq!(browser.visible().sum, Money::from_cents(-199650));
//! # Ok::<(), minex::MinexError>(())
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{MinexError, MinexResult};
