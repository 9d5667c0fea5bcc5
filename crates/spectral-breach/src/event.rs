//! Scan events consumed and produced by the breach module.

use serde::{Deserialize, Serialize};
use spectral_core::{EventId, Timestamp};
use std::fmt;

/// Event types the breach module deals with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// An email address found elsewhere in the scan
    #[serde(rename = "EMAILADDR")]
    EmailAddr,
    /// An email address present in breach data
    #[serde(rename = "EMAILADDR_COMPROMISED")]
    EmailAddrCompromised,
    /// A plaintext password present in breach data
    #[serde(rename = "PASSWORD_COMPROMISED")]
    PasswordCompromised,
    /// A password hash present in breach data
    #[serde(rename = "HASH_COMPROMISED")]
    HashCompromised,
    /// A raw record from a third-party source
    #[serde(rename = "RAW_RIR_DATA")]
    RawRirData,
}

impl EventKind {
    /// Wire name of the event type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmailAddr => "EMAILADDR",
            Self::EmailAddrCompromised => "EMAILADDR_COMPROMISED",
            Self::PasswordCompromised => "PASSWORD_COMPROMISED",
            Self::HashCompromised => "HASH_COMPROMISED",
            Self::RawRirData => "RAW_RIR_DATA",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an event came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Module that produced the parent event
    pub module: String,
    /// ID of the parent event
    pub event_id: EventId,
}

/// A single event on the scan bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    /// Unique event ID
    pub id: EventId,
    /// Event type
    pub kind: EventKind,
    /// Payload
    pub data: String,
    /// Module that produced this event
    pub module: String,
    /// Parent event, `None` for scan roots
    pub source: Option<Provenance>,
    /// Upstream data source label, inherited from the parent
    pub data_source: Option<String>,
    /// When the event was created
    pub created_at: Timestamp,
}

impl ScanEvent {
    /// Create an event with no parent.
    #[must_use]
    pub fn root(kind: EventKind, data: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            id: EventId::generate(),
            kind,
            data: data.into(),
            module: module.into(),
            source: None,
            data_source: None,
            created_at: Timestamp::now(),
        }
    }

    /// Create an event derived from `parent`.
    ///
    /// The parent's module and ID become the provenance, and its data
    /// source label is copied unchanged.
    #[must_use]
    pub fn derived(
        kind: EventKind,
        data: impl Into<String>,
        module: impl Into<String>,
        parent: &ScanEvent,
    ) -> Self {
        Self {
            id: EventId::generate(),
            kind,
            data: data.into(),
            module: module.into(),
            source: Some(Provenance {
                module: parent.module.clone(),
                event_id: parent.id,
            }),
            data_source: parent.data_source.clone(),
            created_at: Timestamp::now(),
        }
    }

    /// Set the data source label.
    #[must_use]
    pub fn with_data_source(mut self, data_source: impl Into<String>) -> Self {
        self.data_source = Some(data_source.into());
        self
    }
}
