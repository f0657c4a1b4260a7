//! Citation markers, resolved footnotes, and the lookup contract.

pub mod resolver;

pub use resolver::CitationResolver;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::Result;

/// A stored reference record as returned by the lookup collaborator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Reference {
    pub game_id: String,
    pub reference_id: String,
    /// Reference kind, e.g. "rulebook" or "faq".
    pub kind: String,
    pub title: String,
    pub section: String,
    /// Default page text used when the marker carries no explicit page.
    pub page_reference: String,
    pub url: String,
}

/// A resolved, numbered footnote in a processed response.
///
/// Ids are contiguous starting at 1 in order of first appearance in the
/// generated text.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReferenceInfo {
    pub id: usize,
    pub title: String,
    pub section: String,
    pub page: String,
    pub url: String,
}

/// Generated text with citation markers rewritten to footnote glyphs,
/// plus the ordered footnote list (empty when no markers were found).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProcessedResponse {
    pub response: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<ReferenceInfo>,
}

/// One parsed occurrence of a `[[ID]]` / `[[ID,PAGE]]` marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Citation {
    pub reference_id: String,
    pub page: Option<String>,
    /// Byte span of the whole marker in the source text.
    pub start: usize,
    pub end: usize,
}

impl Citation {
    /// Dedup key: reference id, plus page when present.
    pub(crate) fn key(&self) -> String {
        match &self.page {
            Some(page) => format!("{},{}", self.reference_id, page),
            None => self.reference_id.clone(),
        }
    }
}

/// Resolves a reference id for a game to its stored metadata.
///
/// A failed lookup must not abort citation processing; the resolver
/// downgrades it to a placeholder footnote.
#[async_trait]
pub trait ReferenceLookup: Send + Sync {
    async fn reference(&self, game_id: &str, reference_id: &str) -> Result<Reference>;
}
