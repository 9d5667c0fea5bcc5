//! Derive leak findings from breach records.
//!
//! Records are processed in order. The most recent non-blank
//! `obtained_from` is carried forward to later records that lack one.
//! The rendered strings are matched on by downstream consumers, so their
//! spacing and brackets must not change.

use crate::event::EventKind;
use crate::record::BreachRecord;
use std::fmt;

/// A normalized finding derived from one breach record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerivedFact {
    /// The address appears in a breach
    EmailLeak {
        /// Leaked address
        email: String,
        /// Breach source
        source: String,
    },
    /// A plaintext password was exposed
    PasswordLeak {
        /// Leaked address
        email: String,
        /// Plaintext password
        password: String,
        /// Breach source
        source: String,
    },
    /// A password hash was exposed
    HashLeak {
        /// Leaked address
        email: String,
        /// Password hash
        hash: String,
        /// Plaintext password from the same record, if any
        password: Option<String>,
        /// Breach source
        source: String,
    },
}

impl DerivedFact {
    /// Event type this fact is dispatched as.
    #[must_use]
    pub fn event_kind(&self) -> EventKind {
        match self {
            Self::EmailLeak { .. } => EventKind::EmailAddrCompromised,
            Self::PasswordLeak { .. } => EventKind::PasswordCompromised,
            Self::HashLeak { .. } => EventKind::HashCompromised,
        }
    }
}

impl fmt::Display for DerivedFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmailLeak { email, source } => write!(f, "{email} : [{source}]"),
            Self::PasswordLeak {
                email,
                password,
                source,
            } => write!(f, "{email} : {password} [{source}]"),
            Self::HashLeak {
                email,
                hash,
                password: Some(password),
                source,
            } => write!(f, "{email} : {hash}(Password : {password}) [{source}]"),
            Self::HashLeak {
                email,
                hash,
                password: None,
                source,
            } => write!(f, "{email} : {hash} [ {source}]"),
        }
    }
}

/// The carried-forward breach source for one extraction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreachContext {
    source: String,
}

impl BreachContext {
    /// Adopt `obtained_from` if present, then return the current source.
    pub fn observe(&mut self, obtained_from: Option<&str>) -> &str {
        if let Some(source) = obtained_from {
            source.clone_into(&mut self.source);
        }
        &self.source
    }

    /// Current source; empty until a record supplies one.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Derived facts grouped by kind, each in record order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Email leak facts
    pub emails: Vec<DerivedFact>,
    /// Password leak facts
    pub passwords: Vec<DerivedFact>,
    /// Hash leak facts
    pub hashes: Vec<DerivedFact>,
}

impl Extraction {
    /// All facts: emails, then passwords, then hashes.
    pub fn facts(&self) -> impl Iterator<Item = &DerivedFact> {
        self.emails
            .iter()
            .chain(&self.passwords)
            .chain(&self.hashes)
    }

    /// Total number of facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.emails.len() + self.passwords.len() + self.hashes.len()
    }

    /// Whether nothing was derived.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Incremental extractor over one query's record set.
#[derive(Debug, Default)]
pub struct RecordExtractor {
    context: BreachContext,
    extraction: Extraction,
}

impl RecordExtractor {
    /// Create an extractor with an empty breach context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive facts from the next record.
    ///
    /// Returns `false` when the record has no usable email and was skipped;
    /// a skipped record leaves the breach context untouched.
    pub fn push(&mut self, record: &BreachRecord) -> bool {
        let Some(email) = record.email() else {
            return false;
        };

        let source = self.context.observe(record.obtained_from()).to_string();

        self.extraction.emails.push(DerivedFact::EmailLeak {
            email: email.to_string(),
            source: source.clone(),
        });

        let password = record.password();
        if let Some(password) = password {
            self.extraction.passwords.push(DerivedFact::PasswordLeak {
                email: email.to_string(),
                password: password.to_string(),
                source: source.clone(),
            });
        }

        if let Some(hash) = record.hashed_password() {
            self.extraction.hashes.push(DerivedFact::HashLeak {
                email: email.to_string(),
                hash: hash.to_string(),
                password: password.map(str::to_string),
                source,
            });
        }

        true
    }

    /// Current breach context.
    #[must_use]
    pub fn context(&self) -> &BreachContext {
        &self.context
    }

    /// Finish the pass and return the grouped facts.
    #[must_use]
    pub fn finish(self) -> Extraction {
        self.extraction
    }
}

/// Run a full extraction pass over `records`.
#[must_use]
pub fn extract(records: &[BreachRecord]) -> Extraction {
    let mut extractor = RecordExtractor::new();
    for record in records {
        extractor.push(record);
    }
    extractor.finish()
}
