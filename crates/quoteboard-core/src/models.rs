//! Data models for Quoteboard
//!
//! Defines the core records: `Quote` and `Conflict`.

use serde::{Deserialize, Serialize};

/// Category assigned to quotes that come from the remote source
pub const SERVER_CATEGORY: &str = "Server";

/// A quote with its category
///
/// Quotes have no identifier beyond their text. Two quotes are considered
/// the same quote when their lowercased text matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Quote {
    /// The quote itself
    #[serde(default)]
    pub text: String,
    /// Free-form category label
    #[serde(default)]
    pub category: String,
}

impl Quote {
    /// Create a new quote
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Identity key used for matching and deduplication
    pub fn key(&self) -> String {
        self.text.to_lowercase()
    }

    /// Whether this quote refers to the same text as `other` (case-insensitive)
    pub fn same_text(&self, other: &Quote) -> bool {
        self.key() == other.key()
    }
}

/// A local and a server quote sharing the same text but not the same category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Conflict {
    pub local: Quote,
    pub server: Quote,
}

impl Conflict {
    pub fn new(local: Quote, server: Quote) -> Self {
        Self { local, server }
    }
}

/// Quotes used when nothing (or nothing readable) has been persisted yet
pub fn default_quotes() -> Vec<Quote> {
    vec![
        Quote::new(
            "The best way to predict the future is to invent it.",
            "Motivation",
        ),
        Quote::new("Simplicity is the soul of efficiency.", "Technology"),
        Quote::new("Do or do not. There is no try.", "Wisdom"),
        Quote::new(
            "Innovation distinguishes between a leader and a follower.",
            "Technology",
        ),
    ]
}
