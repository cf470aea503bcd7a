//! Papertrawl Core - Foundation crate for the papertrawl harvester.
//!
//! This crate provides the shared types, error handling, and configuration
//! management that the other papertrawl crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared domain types (`EntryKey`, `EntryDescriptor`)
//!
//! # Example
//!
//! ```rust
//! use papertrawl_core::{EntryKey, HarvestConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HarvestConfig::default();
//! assert!(config.harvest.workers > 0);
//!
//! let key = EntryKey::new("Learning to Harvest")?;
//! assert_eq!(key.as_str(), "Learning to Harvest");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{HarvestConfig, HarvestSection, HttpSection};
pub use error::{ConfigError, ConfigResult, CoreError, Result};
pub use types::{EntryDescriptor, EntryFields, EntryKey};
