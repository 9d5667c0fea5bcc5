//! The Dehashed scan module.
//!
//! One [`DehashedModule`] serves one scan run. It owns the set of inputs
//! already queried and the halted flag, so nothing is shared between scans.
//! Each inbound `EMAILADDR` event moves through
//! `Unseen -> Querying -> Extracting -> Dispatched`; a missing account
//! email or API key sends the module to `ErrorHalt` for the rest of the run.

use crate::auth::Credentials;
use crate::client::{DehashedClient, PageFetcher};
use crate::error::{BreachError, Result};
use crate::event::{EventKind, ScanEvent};
use crate::extract::RecordExtractor;
use crate::pagination::{collect_pages, FullPagePolicy, PagePolicy, StopReason};
use crate::sink::EventSink;
use spectral_core::AppConfig;
use std::collections::{HashMap, HashSet};
use tokio_util::sync::CancellationToken;

/// Name this module stamps on the events it produces.
pub const MODULE_NAME: &str = "dehashed";

/// Static description of the module for the host registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Display name
    pub name: &'static str,
    /// One-line summary
    pub summary: &'static str,
    /// Use cases the module is enabled for
    pub use_cases: &'static [&'static str],
    /// Category in the module list
    pub category: &'static str,
    /// Whether the module needs an API key
    pub requires_api_key: bool,
}

/// Registry description of the Dehashed module.
pub const MODULE_INFO: ModuleInfo = ModuleInfo {
    name: "Dehashed",
    summary: "Gather compromised emails, passwords, hashes and other data",
    use_cases: &["Footprint", "Investigate", "Passive"],
    category: "Leaks and Breaches",
    requires_api_key: true,
};

/// Option names and descriptions understood by [`ModuleOptions::from_registry`].
pub const OPTION_DESCRIPTIONS: &[(&str, &str)] = &[
    ("email", "Email for accessing Dehashed API"),
    ("api_key", "Dehashed API Key."),
    ("max_pages", "Maximum number of pages to query"),
];

const USER_AGENT_OPTION: &str = "_useragent";

/// Operator-supplied settings for one module instance.
#[derive(Debug, Clone)]
pub struct ModuleOptions {
    /// Dehashed account credentials
    pub credentials: Credentials,
    /// Page ceiling per input
    pub max_pages: u32,
    /// User agent sent with every request
    pub user_agent: String,
    /// Search endpoint
    pub endpoint: String,
}

impl ModuleOptions {
    /// Build options from the application configuration.
    ///
    /// Credentials may be empty here; that is caught per event and halts
    /// the module. A missing or zero page ceiling is rejected immediately.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            credentials: Credentials::new(&config.breach.email, &config.breach.api_key),
            max_pages: config.breach.page_ceiling()?,
            user_agent: config.scanning.user_agent.clone(),
            endpoint: config.breach.endpoint.clone(),
        })
    }

    /// Build options from a host option registry of string values.
    ///
    /// # Errors
    /// Returns [`BreachError::InvalidOption`] when `max_pages` is absent,
    /// not a number, or zero.
    pub fn from_registry(options: &HashMap<String, String>) -> Result<Self> {
        let get = |name: &str| options.get(name).cloned().unwrap_or_default();

        let raw_pages = options
            .get("max_pages")
            .ok_or_else(|| BreachError::InvalidOption {
                option: "max_pages".to_string(),
                reason: "not set".to_string(),
            })?;
        let max_pages = raw_pages
            .trim()
            .parse::<u32>()
            .map_err(|e| BreachError::InvalidOption {
                option: "max_pages".to_string(),
                reason: format!("{raw_pages:?} is not a number: {e}"),
            })?;
        if max_pages == 0 {
            return Err(BreachError::InvalidOption {
                option: "max_pages".to_string(),
                reason: "must be a positive integer".to_string(),
            });
        }

        let defaults = AppConfig::default();
        let user_agent = options
            .get(USER_AGENT_OPTION)
            .cloned()
            .unwrap_or(defaults.scanning.user_agent);

        Ok(Self {
            credentials: Credentials::new(get("email"), get("api_key")),
            max_pages,
            user_agent,
            endpoint: defaults.breach.endpoint,
        })
    }
}

/// Lifecycle of one inbound query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    /// Not yet processed
    Unseen,
    /// Pages are being fetched
    Querying,
    /// Records are being turned into facts
    Extracting,
    /// All events emitted
    Dispatched,
    /// The module is misconfigured and will not query again
    ErrorHalt,
}

/// Counts for one dispatched query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Page requests issued
    pub pages_fetched: u32,
    /// Raw record events emitted
    pub raw_records: usize,
    /// Email leak events emitted
    pub email_leaks: usize,
    /// Password leak events emitted
    pub password_leaks: usize,
    /// Hash leak events emitted
    pub hash_leaks: usize,
    /// Why pagination ended
    pub stop: StopReason,
}

/// What happened to an inbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleOutcome {
    /// Not an event type this module watches, or an empty payload
    Ignored,
    /// Module is in `ErrorHalt`; nothing was done
    Halted,
    /// The scan was asked to stop; nothing was done
    Cancelled,
    /// This input was already queried during the run
    AlreadySeen,
    /// The input was queried and its findings emitted
    Dispatched(DispatchSummary),
}

/// Dehashed lookup module for a single scan run.
pub struct DehashedModule<F, S> {
    options: ModuleOptions,
    fetcher: F,
    sink: S,
    policy: Box<dyn PagePolicy>,
    seen: HashSet<String>,
    halted: bool,
    cancel: CancellationToken,
}

impl<S: EventSink> DehashedModule<DehashedClient, S> {
    /// Create a module that talks to the real Dehashed API.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn connect(options: ModuleOptions, sink: S) -> Result<Self> {
        let client = DehashedClient::new(options.credentials.clone(), &options.user_agent)?
            .with_endpoint(options.endpoint.clone());
        Ok(Self::new(options, client, sink))
    }
}

impl<F: PageFetcher, S: EventSink> DehashedModule<F, S> {
    /// Create a module with an explicit page source.
    #[must_use]
    pub fn new(options: ModuleOptions, fetcher: F, sink: S) -> Self {
        Self {
            options,
            fetcher,
            sink,
            policy: Box::new(FullPagePolicy::default()),
            seen: HashSet::new(),
            halted: false,
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the page continuation policy.
    #[must_use]
    pub fn with_policy(mut self, policy: impl PagePolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Tie the module to the scan's cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops the module once cancelled.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Event types this module consumes.
    #[must_use]
    pub fn watched_events() -> &'static [EventKind] {
        &[EventKind::EmailAddr]
    }

    /// Event types this module emits.
    #[must_use]
    pub fn produced_events() -> &'static [EventKind] {
        &[
            EventKind::EmailAddrCompromised,
            EventKind::PasswordCompromised,
            EventKind::HashCompromised,
            EventKind::RawRirData,
        ]
    }

    /// Whether the module has halted on a configuration error.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Number of distinct inputs queried so far.
    #[must_use]
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// The configured options.
    #[must_use]
    pub fn options(&self) -> &ModuleOptions {
        &self.options
    }

    /// The event sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Process one inbound event. Never fails; the outcome says what happened.
    ///
    /// The trimmed input is both the dedup key and the query sent.
    pub async fn handle_event(&mut self, event: &ScanEvent) -> HandleOutcome {
        if self.halted {
            return HandleOutcome::Halted;
        }

        if self.cancel.is_cancelled() {
            tracing::debug!("Scan stopping, skipping {}", event.data);
            return HandleOutcome::Cancelled;
        }

        if !Self::watched_events().contains(&event.kind) {
            return HandleOutcome::Ignored;
        }

        tracing::debug!("Received event, {}, from {}", event.kind, event.module);

        if !self.options.credentials.is_complete() {
            tracing::error!("Dehashed module enabled but no account email or API key is set");
            self.halted = true;
            trace_phase(&event.data, QueryPhase::ErrorHalt);
            return HandleOutcome::Halted;
        }

        let query = event.data.trim();
        if query.is_empty() {
            return HandleOutcome::Ignored;
        }

        if !self.seen.insert(query.to_string()) {
            tracing::debug!("Skipping {} as already mapped", query);
            return HandleOutcome::AlreadySeen;
        }

        trace_phase(query, QueryPhase::Querying);
        let walk = collect_pages(
            &self.fetcher,
            self.policy.as_ref(),
            query,
            self.options.max_pages,
        )
        .await;

        trace_phase(query, QueryPhase::Extracting);
        let mut extractor = RecordExtractor::new();
        for record in &walk.records {
            if !extractor.push(record) {
                tracing::debug!("Record without email in results for {}", query);
            }
            self.emit(EventKind::RawRirData, record.to_raw_text(), event);
        }
        let extraction = extractor.finish();

        for fact in extraction.facts() {
            self.emit(fact.event_kind(), fact.to_string(), event);
        }

        trace_phase(query, QueryPhase::Dispatched);
        let summary = DispatchSummary {
            pages_fetched: walk.pages_fetched,
            raw_records: walk.records.len(),
            email_leaks: extraction.emails.len(),
            password_leaks: extraction.passwords.len(),
            hash_leaks: extraction.hashes.len(),
            stop: walk.stop,
        };
        tracing::info!(
            "Dehashed lookup for {} emitted {} findings from {} records",
            query,
            extraction.len(),
            summary.raw_records
        );

        if self.cancel.is_cancelled() {
            tracing::info!("Scan stop requested, Dehashed module will skip further inputs");
        }

        HandleOutcome::Dispatched(summary)
    }

    fn emit(&self, kind: EventKind, data: String, parent: &ScanEvent) {
        self.sink
            .notify(ScanEvent::derived(kind, data, MODULE_NAME, parent));
    }
}

fn trace_phase(query: &str, phase: QueryPhase) {
    tracing::trace!(query, ?phase, "Dehashed query phase");
}
