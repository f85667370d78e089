//! Quote store
//!
//! The `QuoteStore` owns the in-memory quote list and persists it to a
//! `KeyValueStore` after every mutation.
//!
//! ## Loading
//!
//! On open the `quotes` key is read. A missing or unreadable value falls back
//! to the built-in default quotes; decode failures are logged and otherwise
//! ignored.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = QuoteStore::open(Box::new(SqliteKv::open(&path)?));
//!
//! store.add_quote("Stay hungry, stay foolish.", "Motivation")?;
//! let json = store.export_json()?;
//! ```

use std::path::Path;

use rand::seq::IndexedRandom;
use tracing::{debug, info, warn};

use crate::categories::{filter_quotes, populate_categories, CategoryFilter};
use crate::error::{QuoteError, QuoteResult};
use crate::models::{default_quotes, Quote};
use crate::storage::{
    KeyValueStore, MemoryKv, StorageResult, LAST_CATEGORY_KEY, LAST_FILTER_KEY, LAST_QUOTE_KEY,
    QUOTES_KEY,
};

/// Ordered quote list with persistence
pub struct QuoteStore {
    quotes: Vec<Quote>,
    /// Persistent values (quotes, preferences)
    kv: Box<dyn KeyValueStore>,
    /// Values that only live for the current session
    session: Box<dyn KeyValueStore>,
}

impl QuoteStore {
    /// Open the store, loading persisted quotes or the defaults
    pub fn open(kv: Box<dyn KeyValueStore>) -> Self {
        Self::with_session(kv, Box::new(MemoryKv::new()))
    }

    /// Open the store with an explicit session store
    pub fn with_session(kv: Box<dyn KeyValueStore>, session: Box<dyn KeyValueStore>) -> Self {
        let quotes = load_quotes(kv.as_ref());
        debug!("Loaded {} quote(s)", quotes.len());
        Self {
            quotes,
            kv,
            session,
        }
    }

    // ==================== Queries ====================

    /// All quotes in store order
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Distinct categories, first-seen order
    pub fn categories(&self) -> Vec<String> {
        populate_categories(&self.quotes)
    }

    /// Quotes matching a filter
    pub fn filtered(&self, filter: &CategoryFilter) -> Vec<&Quote> {
        filter_quotes(&self.quotes, filter)
    }

    /// Quotes in a single category
    pub fn quotes_in_category(&self, category: &str) -> Vec<&Quote> {
        self.filtered(&CategoryFilter::Category(category.to_string()))
    }

    /// First quote with the given text (case-insensitive)
    pub fn find(&self, text: &str) -> Option<&Quote> {
        let key = text.to_lowercase();
        self.quotes.iter().find(|q| q.key() == key)
    }

    /// Pick a random quote from a category
    ///
    /// Remembers the category as the last selected one and the quote text as
    /// the last displayed quote for this session. Returns `None` when the
    /// category has no quotes.
    pub fn random_quote(&mut self, category: &str) -> Option<Quote> {
        let quote = {
            let candidates = self.quotes_in_category(category);
            candidates.choose(&mut rand::rng()).map(|q| (*q).clone())
        };

        if let Err(e) = self.kv.set(LAST_CATEGORY_KEY, category) {
            warn!("Failed to remember last category: {}", e);
        }

        if let Some(ref quote) = quote {
            if let Err(e) = self.session.set(LAST_QUOTE_KEY, &quote.text) {
                warn!("Failed to remember last quote: {}", e);
            }
        }

        quote
    }

    /// Text of the last quote shown in this session
    pub fn last_quote(&self) -> Option<String> {
        self.session.get(LAST_QUOTE_KEY).ok().flatten()
    }

    pub fn last_category(&self) -> Option<String> {
        self.kv.get(LAST_CATEGORY_KEY).ok().flatten()
    }

    pub fn set_last_category(&mut self, category: &str) -> StorageResult<()> {
        self.kv.set(LAST_CATEGORY_KEY, category)
    }

    /// Last applied filter, `All` when none was saved
    pub fn last_filter(&self) -> CategoryFilter {
        self.kv
            .get(LAST_FILTER_KEY)
            .ok()
            .flatten()
            .map(|value| CategoryFilter::parse(&value))
            .unwrap_or_default()
    }

    pub fn set_last_filter(&mut self, filter: &CategoryFilter) -> StorageResult<()> {
        self.kv.set(LAST_FILTER_KEY, &filter.to_string())
    }

    // ==================== Mutations ====================

    /// Add a quote after trimming both fields
    ///
    /// Fails with `QuoteError::EmptyField` without touching the store if
    /// either field is empty.
    pub fn add_quote(&mut self, text: &str, category: &str) -> QuoteResult<Quote> {
        let text = text.trim();
        let category = category.trim();

        if text.is_empty() || category.is_empty() {
            return Err(QuoteError::EmptyField);
        }

        let quote = Quote::new(text, category);
        let mut quotes = self.quotes.clone();
        quotes.push(quote.clone());
        self.commit(quotes)?;

        info!("Added quote in category '{}'", category);
        Ok(quote)
    }

    /// Append quotes from a JSON document
    ///
    /// The document must be an array. Entries are appended as-is, without
    /// deduplication. Nothing is appended if parsing fails.
    pub fn import_json(&mut self, content: &str) -> QuoteResult<usize> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        if !value.is_array() {
            return Err(QuoteError::ImportFormat);
        }

        let imported: Vec<Quote> = serde_json::from_value(value)?;
        let count = imported.len();
        let mut quotes = self.quotes.clone();
        quotes.extend(imported);
        self.commit(quotes)?;

        info!("Imported {} quote(s)", count);
        Ok(count)
    }

    /// Import quotes from a JSON file
    pub fn import_from_file(&mut self, path: &Path) -> QuoteResult<usize> {
        let content = std::fs::read_to_string(path).map_err(|source| QuoteError::File {
            path: path.to_path_buf(),
            source,
        })?;
        self.import_json(&content)
    }

    /// Serialize all quotes as a pretty-printed JSON array
    pub fn export_json(&self) -> QuoteResult<String> {
        Ok(serde_json::to_string_pretty(&self.quotes)?)
    }

    /// Write the JSON export to a file
    pub fn export_to_file(&self, path: &Path) -> QuoteResult<()> {
        let json = self.export_json()?;
        std::fs::write(path, json).map_err(|source| QuoteError::File {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Exported {} quote(s) to {:?}", self.quotes.len(), path);
        Ok(())
    }

    /// Replace the whole list (used after a merge)
    pub fn replace_all(&mut self, quotes: Vec<Quote>) -> QuoteResult<()> {
        self.commit(quotes)
    }

    /// Overwrite the category of the first quote with matching text
    ///
    /// Returns whether a quote matched.
    pub fn set_category(&mut self, text: &str, category: &str) -> QuoteResult<bool> {
        let key = text.to_lowercase();
        let Some(pos) = self.quotes.iter().position(|q| q.key() == key) else {
            return Ok(false);
        };

        if self.quotes[pos].category != category {
            let mut quotes = self.quotes.clone();
            quotes[pos].category = category.to_string();
            self.commit(quotes)?;
        }
        Ok(true)
    }

    /// Direct access to the persistent key-value store
    pub fn kv(&self) -> &dyn KeyValueStore {
        self.kv.as_ref()
    }

    pub fn kv_mut(&mut self) -> &mut dyn KeyValueStore {
        self.kv.as_mut()
    }

    /// Persist the quote list
    pub fn save(&mut self) -> QuoteResult<()> {
        write_quotes(self.kv.as_mut(), &self.quotes)
    }

    /// Persist `quotes`, then adopt them as the store contents
    ///
    /// On a failed write the in-memory list is left as it was.
    fn commit(&mut self, quotes: Vec<Quote>) -> QuoteResult<()> {
        write_quotes(self.kv.as_mut(), &quotes)?;
        self.quotes = quotes;
        Ok(())
    }
}

fn write_quotes(kv: &mut dyn KeyValueStore, quotes: &[Quote]) -> QuoteResult<()> {
    let json = serde_json::to_string(quotes)?;
    kv.set(QUOTES_KEY, &json)?;
    Ok(())
}

/// Read the persisted quote list, falling back to the defaults
fn load_quotes(kv: &dyn KeyValueStore) -> Vec<Quote> {
    match kv.get(QUOTES_KEY) {
        Ok(Some(json)) => match serde_json::from_str::<Vec<Quote>>(&json) {
            Ok(quotes) => quotes,
            Err(e) => {
                warn!("Stored quotes are unreadable, using defaults: {}", e);
                default_quotes()
            }
        },
        Ok(None) => default_quotes(),
        Err(e) => {
            warn!("Failed to read stored quotes, using defaults: {}", e);
            default_quotes()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv::testing::FlakyKv;
    use crate::storage::SqliteKv;
    use tempfile::TempDir;

    fn empty_store() -> (QuoteStore, MemoryKv) {
        let kv = MemoryKv::with_values([(QUOTES_KEY, "[]")]);
        (QuoteStore::open(Box::new(kv.clone())), kv)
    }

    fn store_with(quotes: &[Quote]) -> (QuoteStore, MemoryKv) {
        let json = serde_json::to_string(quotes).unwrap();
        let kv = MemoryKv::with_values([(QUOTES_KEY, json)]);
        (QuoteStore::open(Box::new(kv.clone())), kv)
    }

    fn persisted(kv: &MemoryKv) -> Vec<Quote> {
        serde_json::from_str(&kv.get(QUOTES_KEY).unwrap().unwrap()).unwrap()
    }

    #[test]
    fn test_open_uses_defaults_when_nothing_stored() {
        let store = QuoteStore::open(Box::new(MemoryKv::new()));
        assert_eq!(store.quotes(), default_quotes().as_slice());
    }

    #[test]
    fn test_open_uses_defaults_when_stored_value_is_malformed() {
        let kv = MemoryKv::with_values([(QUOTES_KEY, "{not json")]);
        let store = QuoteStore::open(Box::new(kv));
        assert_eq!(store.len(), default_quotes().len());
    }

    #[test]
    fn test_open_keeps_stored_empty_list() {
        let (store, _) = empty_store();
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_quote_appends_and_persists() {
        let (mut store, kv) = store_with(&[Quote::new("Existing", "Old")]);

        let added = store.add_quote("  New quote  ", " Fresh ").unwrap();
        assert_eq!(added, Quote::new("New quote", "Fresh"));
        assert_eq!(store.len(), 2);
        assert_eq!(store.quotes()[0], Quote::new("Existing", "Old"));
        assert_eq!(persisted(&kv), store.quotes());
    }

    #[test]
    fn test_add_quote_rejects_empty_fields() {
        let (mut store, kv) = store_with(&[Quote::new("Existing", "Old")]);

        assert!(matches!(
            store.add_quote("", "Category"),
            Err(QuoteError::EmptyField)
        ));
        assert!(matches!(
            store.add_quote("Text", "   "),
            Err(QuoteError::EmptyField)
        ));

        assert_eq!(store.quotes(), &[Quote::new("Existing", "Old")]);
        assert_eq!(persisted(&kv), vec![Quote::new("Existing", "Old")]);
    }

    #[test]
    fn test_add_quote_allows_duplicate_text() {
        let (mut store, _) = store_with(&[Quote::new("Same", "A")]);
        store.add_quote("same", "B").unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_import_appends_without_dedup() {
        let (mut store, kv) = store_with(&[Quote::new("A", "C1")]);

        let count = store
            .import_json(r#"[{"text": "A", "category": "C1"}, {"text": "B", "category": "C2"}]"#)
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(store.len(), 3);
        assert_eq!(persisted(&kv).len(), 3);
    }

    #[test]
    fn test_import_rejects_non_array() {
        let (mut store, _) = store_with(&[Quote::new("A", "C1")]);

        let err = store.import_json("{}").unwrap_err();
        assert!(matches!(err, QuoteError::ImportFormat));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_import_rejects_invalid_json() {
        let (mut store, _) = store_with(&[Quote::new("A", "C1")]);

        let err = store.import_json("[{").unwrap_err();
        assert!(matches!(err, QuoteError::InvalidJson(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_import_does_not_validate_entry_fields() {
        let (mut store, _) = empty_store();

        let count = store.import_json(r#"[{"text": "No category"}, {}]"#).unwrap();
        assert_eq!(count, 2);
        assert_eq!(store.quotes()[0].category, "");
        assert_eq!(store.quotes()[1], Quote::new("", ""));
    }

    #[test]
    fn test_export_json_preserves_order() {
        let (store, _) = store_with(&[Quote::new("A", "C1"), Quote::new("B", "C2")]);

        let json = store.export_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"text": "A", "category": "C1"},
                {"text": "B", "category": "C2"}
            ])
        );
        // Two-space indentation
        assert!(json.contains("\n  {\n    \"text\": \"A\""));
    }

    #[test]
    fn test_export_and_import_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("quotes.json");

        let (source, _) = store_with(&[Quote::new("A", "C1"), Quote::new("B", "C2")]);
        source.export_to_file(&path).unwrap();

        let (mut target, _) = empty_store();
        assert_eq!(target.import_from_file(&path).unwrap(), 2);
        assert_eq!(target.quotes(), source.quotes());
    }

    #[test]
    fn test_import_missing_file() {
        let (mut store, _) = empty_store();
        let err = store
            .import_from_file(Path::new("/nonexistent/quotes.json"))
            .unwrap_err();
        assert!(matches!(err, QuoteError::File { .. }));
    }

    #[test]
    fn test_categories_follow_store() {
        let (mut store, _) = store_with(&[Quote::new("A", "C1")]);
        store.add_quote("B", "C2").unwrap();
        store.add_quote("C", "C1").unwrap();
        assert_eq!(store.categories(), vec!["C1", "C2"]);
    }

    #[test]
    fn test_random_quote_from_category() {
        let (mut store, kv) = store_with(&[
            Quote::new("A", "C1"),
            Quote::new("B", "C2"),
            Quote::new("C", "C1"),
        ]);

        for _ in 0..20 {
            let quote = store.random_quote("C1").unwrap();
            assert_eq!(quote.category, "C1");
            assert_eq!(store.last_quote().as_deref(), Some(quote.text.as_str()));
        }
        assert_eq!(kv.get(LAST_CATEGORY_KEY).unwrap().as_deref(), Some("C1"));
    }

    #[test]
    fn test_random_quote_empty_category() {
        let (mut store, _) = store_with(&[Quote::new("A", "C1")]);
        assert!(store.random_quote("Missing").is_none());
        assert!(store.last_quote().is_none());
    }

    #[test]
    fn test_last_quote_is_session_only() {
        let kv = MemoryKv::with_values([(QUOTES_KEY, r#"[{"text":"A","category":"C"}]"#)]);

        let mut store = QuoteStore::open(Box::new(kv.clone()));
        store.random_quote("C").unwrap();
        assert!(store.last_quote().is_some());

        let reopened = QuoteStore::open(Box::new(kv));
        assert!(reopened.last_quote().is_none());
        assert_eq!(reopened.last_category().as_deref(), Some("C"));
    }

    #[test]
    fn test_last_filter_roundtrip() {
        let (mut store, _) = empty_store();
        assert_eq!(store.last_filter(), CategoryFilter::All);

        let filter = CategoryFilter::Category("Wisdom".to_string());
        store.set_last_filter(&filter).unwrap();
        assert_eq!(store.last_filter(), filter);
    }

    #[test]
    fn test_set_category() {
        let (mut store, kv) = store_with(&[Quote::new("Hello", "A")]);

        assert!(store.set_category("HELLO", "B").unwrap());
        assert_eq!(store.quotes()[0].category, "B");
        assert_eq!(persisted(&kv)[0].category, "B");

        assert!(!store.set_category("missing", "B").unwrap());
    }

    #[test]
    fn test_data_persists_across_reopens() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("quoteboard.db");

        {
            let kv = SqliteKv::open(&path).unwrap();
            let mut store = QuoteStore::open(Box::new(kv));
            store.add_quote("Persistent", "Disk").unwrap();
        }

        let store = QuoteStore::open(Box::new(SqliteKv::open(&path).unwrap()));
        assert_eq!(store.len(), default_quotes().len() + 1);
        assert!(store.find("persistent").is_some());
    }
    #[test]
    fn test_failed_write_leaves_store_unchanged() {
        let kv = FlakyKv::new(MemoryKv::with_values([(
            QUOTES_KEY,
            r#"[{"text":"Hello","category":"A"}]"#,
        )]));
        let mut store = QuoteStore::open(Box::new(kv.clone()));
        let before = store.quotes().to_vec();

        kv.fail_writes(true);

        let err = store.add_quote("New", "B").unwrap_err();
        assert!(matches!(err, QuoteError::Storage(_)));
        assert_eq!(store.quotes(), before.as_slice());

        assert!(store
            .import_json(r#"[{"text": "X", "category": "Y"}]"#)
            .is_err());
        assert!(store.set_category("hello", "Z").is_err());
        assert!(store.replace_all(Vec::new()).is_err());

        assert_eq!(store.quotes(), before.as_slice());
        assert_eq!(persisted(&kv.inner), before);

        // Writes work again once the backend recovers
        kv.fail_writes(false);
        store.add_quote("New", "B").unwrap();
        assert_eq!(persisted(&kv.inner).len(), 2);
    }
}
