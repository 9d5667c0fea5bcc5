//! Spectral Core - Foundation crate for the Spectral breach lookup tools.
//!
//! This crate provides shared types, error handling and configuration
//! management that the other Spectral crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes (`EventId`, `EmailAddress`, `Timestamp`)
//!
//! # Example
//!
//! ```rust
//! use spectral_core::{AppConfig, EmailAddress};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.breach.max_pages, None);
//!
//! let email = EmailAddress::new("someone@example.com")?;
//! assert_eq!(email.domain(), "example.com");
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
pub use config::{AppConfig, BreachConfig, ScanningConfig};
pub use error::{ConfigError, ConfigResult, SpectralError};
pub use types::{EmailAddress, EventId, Timestamp};
