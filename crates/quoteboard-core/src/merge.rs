//! Server-wins merge
//!
//! Remote quotes missing locally are appended. Remote quotes matching a local
//! quote (case-insensitive text) overwrite the local category. The local
//! category is lost once the result is saved.
//!
//! The result is then deduplicated by lowercased text: local entries are
//! inserted first, then remote entries, and a later entry replaces an earlier
//! one while keeping the earlier one's position. After a merge no two quotes
//! share the same lowercased text.

use std::collections::HashMap;

use crate::models::Quote;

/// Result of a merge with counts for status reporting
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MergeReport {
    /// The merged, deduplicated quote list
    pub quotes: Vec<Quote>,
    /// Remote quotes appended because no local quote matched
    pub added: usize,
    /// Local quotes whose category was overwritten
    pub updated: usize,
}

/// Merge `remote` into `local` using the server-wins policy
pub fn merge(local: &[Quote], remote: &[Quote]) -> Vec<Quote> {
    merge_with_report(local, remote).quotes
}

/// Same as [`merge`] but also reports what changed
pub fn merge_with_report(local: &[Quote], remote: &[Quote]) -> MergeReport {
    let mut merged = local.to_vec();
    let mut added = 0;
    let mut updated = 0;

    for server in remote {
        let key = server.key();
        match merged.iter_mut().find(|q| q.key() == key) {
            Some(existing) => {
                if existing.category != server.category {
                    existing.category = server.category.clone();
                    updated += 1;
                }
            }
            None => {
                merged.push(server.clone());
                added += 1;
            }
        }
    }

    MergeReport {
        quotes: dedup_by_text(merged.iter().chain(remote.iter())),
        added,
        updated,
    }
}

/// Collapse quotes sharing the same lowercased text, last one wins
fn dedup_by_text<'a>(quotes: impl Iterator<Item = &'a Quote>) -> Vec<Quote> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut result: Vec<Quote> = Vec::new();

    for quote in quotes {
        match positions.get(&quote.key()) {
            Some(&index) => result[index] = quote.clone(),
            None => {
                positions.insert(quote.key(), result.len());
                result.push(quote.clone());
            }
        }
    }

    result
}
