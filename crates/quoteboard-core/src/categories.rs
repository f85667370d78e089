//! Category index
//!
//! Categories are derived from the quote list, never stored on their own.

use std::collections::HashSet;
use std::fmt;

use crate::models::Quote;

/// Distinct categories in first-seen order
pub fn populate_categories(quotes: &[Quote]) -> Vec<String> {
    let mut seen = HashSet::new();
    quotes
        .iter()
        .filter(|q| seen.insert(q.category.as_str()))
        .map(|q| q.category.clone())
        .collect()
}

/// Filter applied when listing quotes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every quote
    #[default]
    All,
    /// Only quotes whose category matches exactly
    Category(String),
}

impl CategoryFilter {
    /// Persisted form of the "all" filter
    pub const ALL: &'static str = "all";

    /// Parse the persisted representation
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == Self::ALL {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(value.to_string())
        }
    }

    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(category) => &quote.category == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(Self::ALL),
            CategoryFilter::Category(category) => f.write_str(category),
        }
    }
}

/// Quotes matching the filter, in store order
pub fn filter_quotes<'a>(quotes: &'a [Quote], filter: &CategoryFilter) -> Vec<&'a Quote> {
    quotes.iter().filter(|q| filter.matches(q)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn quotes() -> Vec<Quote> {
        vec![
            Quote::new("a", "Wisdom"),
            Quote::new("b", "Technology"),
            Quote::new("c", "Wisdom"),
            Quote::new("d", "Humor"),
        ]
    }

    #[test]
    fn test_populate_categories_distinct_in_order() {
        let categories = populate_categories(&quotes());
        assert_eq!(categories, vec!["Wisdom", "Technology", "Humor"]);
    }

    #[test]
    fn test_populate_categories_matches_set_of_categories() {
        let quotes = quotes();
        let expected: BTreeSet<_> = quotes.iter().map(|q| q.category.clone()).collect();
        let categories = populate_categories(&quotes);
        let actual: BTreeSet<_> = categories.iter().cloned().collect();

        assert_eq!(actual, expected);
        assert_eq!(categories.len(), actual.len());
    }

    #[test]
    fn test_populate_categories_empty() {
        assert!(populate_categories(&[]).is_empty());
    }

    #[test]
    fn test_categories_are_case_sensitive() {
        let quotes = vec![Quote::new("a", "wisdom"), Quote::new("b", "Wisdom")];
        assert_eq!(populate_categories(&quotes).len(), 2);
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(""), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse(" Wisdom "),
            CategoryFilter::Category("Wisdom".to_string())
        );
        assert_eq!(CategoryFilter::All.to_string(), "all");
    }

    #[test]
    fn test_filter_quotes() {
        let quotes = quotes();

        let all = filter_quotes(&quotes, &CategoryFilter::All);
        assert_eq!(all.len(), 4);

        let wisdom = filter_quotes(&quotes, &CategoryFilter::Category("Wisdom".into()));
        let texts: Vec<_> = wisdom.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c"]);

        let none = filter_quotes(&quotes, &CategoryFilter::Category("Missing".into()));
        assert!(none.is_empty());
    }
}
