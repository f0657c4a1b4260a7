//! Rewrites `[[REFERENCE-ID]]` markers into footnote glyphs.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use crate::citations::{Citation, ProcessedResponse, Reference, ReferenceInfo, ReferenceLookup};

/// Unicode superscript glyphs for the first twenty footnotes.
const FOOTNOTE_GLYPHS: [&str; 20] = [
    "¹", "²", "³", "⁴", "⁵", "⁶", "⁷", "⁸", "⁹", "¹⁰", "¹¹", "¹²", "¹³", "¹⁴", "¹⁵", "¹⁶", "¹⁷",
    "¹⁸", "¹⁹", "²⁰",
];

/// Shown when a reference id cannot be resolved.
const MISSING_REFERENCE_TITLE: &str = "[Reference not found]";

fn citation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\[\[([A-Z0-9\-_]+)(?:,(\d+))?\]\]").expect("citation pattern is valid")
    })
}

/// Turns inline citation markers in generated text into de-duplicated,
/// ordered footnotes with resolved metadata.
///
/// Processing runs Extract → Deduplicate/Assign → Rewrite → Resolve with
/// no state kept between responses. Text that doesn't match the marker
/// pattern is left verbatim, and a marker whose reference id cannot be
/// looked up still gets a glyph plus a placeholder footnote entry.
pub struct CitationResolver {
    lookup: Arc<dyn ReferenceLookup>,
}

impl CitationResolver {
    pub fn new(lookup: Arc<dyn ReferenceLookup>) -> Self {
        Self { lookup }
    }

    pub async fn process(&self, game_id: &str, response_text: &str) -> ProcessedResponse {
        let citations = extract_citations(response_text);
        if citations.is_empty() {
            debug!(game = game_id, "no citation markers in response");
            return ProcessedResponse {
                response: response_text.to_string(),
                references: Vec::new(),
            };
        }
        debug!(game = game_id, markers = citations.len(), "processing citation markers");

        let (glyphs, references) = self.assign_footnotes(game_id, &citations).await;
        let response = rewrite_with_glyphs(response_text, &citations, &glyphs);

        debug!(
            game = game_id,
            footnotes = references.len(),
            "citation processing complete"
        );
        ProcessedResponse {
            response,
            references,
        }
    }

    /// Walks citations in text order, assigning the next glyph on first
    /// sight of each dedup key and resolving its metadata.
    async fn assign_footnotes(
        &self,
        game_id: &str,
        citations: &[Citation],
    ) -> (FxHashMap<String, String>, Vec<ReferenceInfo>) {
        let mut glyphs: FxHashMap<String, String> = FxHashMap::default();
        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut references = Vec::new();
        let mut counter = 0usize;

        for citation in citations {
            let key = citation.key();
            if !seen.insert(key.clone()) {
                continue;
            }
            counter += 1;

            let glyph = match FOOTNOTE_GLYPHS.get(counter - 1) {
                Some(glyph) => (*glyph).to_string(),
                None => {
                    warn!(footnote = counter, "footnote glyphs exhausted, using caret fallback");
                    format!("^{counter}")
                }
            };
            glyphs.insert(key, glyph);

            match self.lookup.reference(game_id, &citation.reference_id).await {
                Ok(reference) => references.push(resolved_info(counter, citation, reference)),
                Err(err) => {
                    warn!(
                        reference_id = %citation.reference_id,
                        error = %err,
                        "reference lookup failed, emitting placeholder"
                    );
                    references.push(ReferenceInfo {
                        id: counter,
                        title: MISSING_REFERENCE_TITLE.to_string(),
                        section: String::new(),
                        page: citation.page.clone().unwrap_or_default(),
                        url: String::new(),
                    });
                }
            }
        }

        (glyphs, references)
    }
}

fn resolved_info(id: usize, citation: &Citation, reference: Reference) -> ReferenceInfo {
    // An explicit page on the marker overrides the stored page text.
    let page = match &citation.page {
        Some(page) => format!("p.{page}"),
        None => reference.page_reference,
    };
    ReferenceInfo {
        id,
        title: reference.title,
        section: reference.section,
        page,
        url: reference.url,
    }
}

/// Finds all well-formed markers left to right, recording their byte
/// spans. Malformed brackets simply don't match and stay in the text.
fn extract_citations(text: &str) -> Vec<Citation> {
    citation_pattern()
        .captures_iter(text)
        .map(|captures| {
            let whole = captures.get(0).expect("match has a whole-pattern group");
            Citation {
                reference_id: captures[1].to_string(),
                page: captures.get(2).map(|page| page.as_str().to_string()),
                start: whole.start(),
                end: whole.end(),
            }
        })
        .collect()
}

/// Builds the rewritten text in one left-to-right pass: untouched runs
/// are copied and each marker span is replaced by its assigned glyph.
/// Spans never overlap, so recorded offsets stay valid throughout.
fn rewrite_with_glyphs(
    text: &str,
    citations: &[Citation],
    glyphs: &FxHashMap<String, String>,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0usize;
    for citation in citations {
        out.push_str(&text[cursor..citation.start]);
        match glyphs.get(&citation.key()) {
            Some(glyph) => out.push_str(glyph),
            // Every extracted citation was assigned a glyph; keep the
            // marker verbatim if that ever stops holding.
            None => out.push_str(&text[citation.start..citation.end]),
        }
        cursor = citation.end;
    }
    out.push_str(&text[cursor..]);
    out
}
