//! Configuration module for minex
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - File logger bootstrap

pub mod logging;
pub mod paths;
pub mod settings;

pub use logging::init_logging;
pub use paths::MinexPaths;
pub use settings::Settings;
