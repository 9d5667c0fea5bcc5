//! Spectral Breach - Dehashed breach lookups for discovered email addresses.
//!
//! This crate takes email addresses found elsewhere in a scan, searches the
//! Dehashed breach database for them page by page, and emits the findings
//! as scan events: compromised emails, plaintext passwords, password hashes
//! and the raw records they came from.
//!
//! # Features
//!
//! - One query per distinct input per scan run
//! - Sequential pagination driven by a swappable continuation policy
//! - Breach source carried forward across records that omit it
//! - Per-page failures (401, empty or malformed payloads) end that input's
//!   lookup without affecting later inputs
//! - A missing account email or API key halts the module for the run
//!
//! # Example
//!
//! ```rust,ignore
//! use spectral_breach::{DehashedModule, EventKind, MemorySink, ModuleOptions, ScanEvent};
//! use std::sync::Arc;
//!
//! let options = ModuleOptions::from_config(&config)?;
//! let sink = Arc::new(MemorySink::new());
//! let mut module = DehashedModule::connect(options, sink.clone())?;
//!
//! let event = ScanEvent::root(EventKind::EmailAddr, "x@example.com", "email-finder");
//! module.handle_event(&event).await;
//!
//! for finding in sink.data_of(EventKind::PasswordCompromised) {
//!     println!("{finding}");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod auth;
pub mod client;
pub mod error;
pub mod event;
pub mod extract;
pub mod module;
pub mod pagination;
pub mod record;
pub mod sink;

// Re-export commonly used types
pub use auth::{basic_authorization, Credentials};
pub use client::{interpret_response, DehashedClient, PageFetcher, FETCH_TIMEOUT_SECS};
pub use error::{BreachError, Result};
pub use event::{EventKind, Provenance, ScanEvent};
pub use extract::{extract, BreachContext, DerivedFact, Extraction, RecordExtractor};
pub use module::{
    DehashedModule, DispatchSummary, HandleOutcome, ModuleInfo, ModuleOptions, QueryPhase,
    MODULE_INFO, MODULE_NAME,
};
pub use pagination::{
    collect_pages, FullPagePolicy, PagePolicy, PageWalk, StopReason, DEHASHED_PAGE_SIZE,
};
pub use record::{BreachRecord, ResultBatch, SearchResponse};
pub use sink::{ChannelSink, EventSink, MemorySink};
