//! Conjunctive substring search over collection items.
//!
//! A query is lowercased and split on whitespace into terms. An item matches
//! when every term is a substring of at least one configured field. Results
//! keep the collection's order; there is no ranking.

pub mod engine;

pub use engine::QueryEngine;

use crate::Item;

/// A parsed, non-empty search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    terms: Vec<String>,
}

impl Query {
    /// Parse user input. Returns `None` for empty or whitespace-only input.
    pub fn parse(text: &str) -> Option<Self> {
        let lowered = text.to_lowercase();
        let mut terms: Vec<String> = Vec::new();
        for term in lowered.split_whitespace() {
            if !terms.iter().any(|t| t == term) {
                terms.push(term.to_string());
            }
        }

        if terms.is_empty() { None } else { Some(Self { terms }) }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Whether every term occurs in at least one of `fields` on `item`.
    pub fn matches(&self, item: &Item, fields: &[String]) -> bool {
        let haystacks: Vec<String> =
            fields.iter().filter_map(|field| item.field_text(field)).map(|text| text.to_lowercase()).collect();

        self.terms.iter().all(|term| haystacks.iter().any(|h| h.contains(term.as_str())))
    }
}

/// Stable filter of `items` by `query`.
pub fn filter_items(items: &[Item], query: &Query, fields: &[String]) -> Vec<Item> {
    items.iter().filter(|item| query.matches(item, fields)).cloned().collect()
}
