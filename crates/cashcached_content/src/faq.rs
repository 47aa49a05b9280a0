use std::collections::HashSet;

use cashcached_core::{DisclosureItem, DisclosureList};
use serde::Deserialize;
use tracing::debug;

use crate::ContentError;

pub const MAX_FAQ_ENTRIES: usize = 256;

const BUILTIN_FAQ: &str = include_str!("../content/faq.yaml");

/// One catalog entry. `key` defaults to `item-<index>`.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct FaqEntry {
    #[serde(default)]
    pub key: Option<String>,
    pub question: String,
    pub answer: String,
}

/// Validated, ordered FAQ catalog
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaqCatalog {
    entries: Vec<FaqEntry>,
}

impl FaqCatalog {
    /// The catalog shipped with the site
    pub fn builtin() -> Result<Self, ContentError> {
        Self::parse(BUILTIN_FAQ)
    }

    /// Parse a YAML sequence of `{key?, question, answer}` mappings
    pub fn parse(src: &str) -> Result<Self, ContentError> {
        let mut entries: Vec<FaqEntry> = serde_yaml::from_str(src)?;

        if entries.is_empty() {
            return Err(ContentError::Empty);
        }
        if entries.len() > MAX_FAQ_ENTRIES {
            return Err(ContentError::TooManyEntries {
                count: entries.len(),
                max: MAX_FAQ_ENTRIES,
            });
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for (index, entry) in entries.iter_mut().enumerate() {
            if entry.question.trim().is_empty() {
                return Err(ContentError::EmptyField {
                    index,
                    field: "question",
                });
            }
            if entry.answer.trim().is_empty() {
                return Err(ContentError::EmptyField {
                    index,
                    field: "answer",
                });
            }
            let key = entry
                .key
                .get_or_insert_with(|| format!("item-{index}"))
                .clone();
            if !seen.insert(key.clone()) {
                return Err(ContentError::DuplicateKey(key));
            }
        }

        debug!("loaded FAQ catalog with {} entries", entries.len());
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Disclosure list with every item collapsed
    pub fn to_disclosure_list(&self) -> DisclosureList {
        DisclosureList::new(self.entries.iter().enumerate().map(|(index, entry)| {
            let key = entry
                .key
                .clone()
                .unwrap_or_else(|| format!("item-{index}"));
            DisclosureItem::new(key, entry.question.clone(), entry.answer.clone())
        }))
    }
}
