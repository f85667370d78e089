//! Conflict detection
//!
//! A conflict is a remote quote whose text matches a local quote
//! (case-insensitively) while the categories differ. Remote quotes with no
//! local match are additions, not conflicts.

use crate::models::{Conflict, Quote};

/// Compare a local quote list with a freshly fetched remote one
///
/// Output follows remote order. Each remote quote is matched against the
/// first local quote with the same lowercased text.
pub fn detect_conflicts(local: &[Quote], remote: &[Quote]) -> Vec<Conflict> {
    remote
        .iter()
        .filter_map(|server| {
            let key = server.key();
            local
                .iter()
                .find(|l| l.key() == key)
                .filter(|l| l.category != server.category)
                .map(|l| Conflict::new(l.clone(), server.clone()))
        })
        .collect()
}
