//! Company mention extraction and the single-company gate.
//!
//! Three recognizers run on every query and their results are unioned:
//! suffix-anchored phrases (`Acme Ltd`), capitalized phrases of up to four
//! tokens, and, when a model was loaded at startup, named-entity ORG spans.
//! More than one distinct mention means the query has to be narrowed before
//! a report is generated.
//!
//! The capitalized recognizer over-counts on purpose: `Apple Inc` and
//! `Apple` in the same query are two mentions.

pub mod capitalized;
pub mod ner;
pub mod suffix;
pub mod tokens;

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

pub use ner::{EntityRecognizer, SpacyRecognizer};
pub use suffix::SuffixList;

/// Distinct, case-preserved mentions found in one query.
pub type CompanyMentionSet = BTreeSet<String>;

/// The gate rule: more than one distinct mention.
pub fn names_multiple_companies(mentions: &CompanyMentionSet) -> bool {
    mentions.len() > 1
}

#[derive(Clone, Default)]
pub struct CompanyMentionExtractor {
    suffixes: SuffixList,
    recognizer: Option<Arc<dyn EntityRecognizer>>,
}

impl CompanyMentionExtractor {
    /// Default suffix vocabulary, no entity model.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_suffixes(mut self, suffixes: SuffixList) -> Self {
        self.suffixes = suffixes;
        self
    }

    pub fn with_entity_recognizer(mut self, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn has_entity_recognizer(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn suffixes(&self) -> &SuffixList {
        &self.suffixes
    }

    /// Union of all recognizers. Never fails; blank input gives an empty set.
    pub fn extract(&self, text: &str) -> CompanyMentionSet {
        if text.trim().is_empty() {
            return CompanyMentionSet::new();
        }

        let by_suffix = suffix::suffix_phrases(text, &self.suffixes);
        let by_case = capitalized::capitalized_phrases(text);
        let by_model: Vec<String> = self
            .recognizer
            .as_ref()
            .map(|r| r.organizations(text))
            .unwrap_or_default();

        debug!(
            suffix = by_suffix.len(),
            capitalized = by_case.len(),
            entities = by_model.len(),
            "company mentions"
        );

        let mut mentions = by_suffix;
        mentions.extend(by_case);
        mentions.extend(
            by_model
                .into_iter()
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty()),
        );
        mentions
    }

    /// More than one distinct mention: ask the user to pick one company.
    pub fn is_multi_company_query(&self, text: &str) -> bool {
        names_multiple_companies(&self.extract(text))
    }
}

impl std::fmt::Debug for CompanyMentionExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompanyMentionExtractor")
            .field("suffixes", &self.suffixes.len())
            .field("entity_recognizer", &self.has_entity_recognizer())
            .finish()
    }
}
