//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod encrypt;
pub mod expense;
pub mod filter;

pub use encrypt::{handle_encrypt_command, unlock_key, EncryptCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use filter::{handle_filter_command, handle_sort_command, FilterCommands, SortKey};
