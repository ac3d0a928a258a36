//! Response adapter: splits the institutional-analysis block out of analysis
//! responses and turns grounding references into renderable links.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::{Citation, ExtractedResult, SourceLink};
use crate::prompts::{INSTITUTIONAL_CLOSE, INSTITUTIONAL_OPEN};

/// Shown when the model did not emit a delimited institutional analysis.
pub const NO_INSTITUTIONAL_ANALYSIS: &str = "Nincs elérhető intézményi elemzés.";

static INSTITUTIONAL_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?s){}(.*?){}",
        regex::escape(INSTITUTIONAL_OPEN),
        regex::escape(INSTITUTIONAL_CLOSE)
    ))
    .expect("valid institutional analysis regex")
});

/// Split `raw_text` into the institutional analysis and everything else.
///
/// Only the first delimited block is honoured; any later block stays in the
/// remainder as-is.
pub fn extract(raw_text: &str) -> ExtractedResult {
    match INSTITUTIONAL_BLOCK_RE.captures(raw_text) {
        Some(caps) => {
            let span = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
            let body = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let mut remainder = String::with_capacity(raw_text.len());
            remainder.push_str(&raw_text[..span.start]);
            remainder.push_str(&raw_text[span.end..]);
            ExtractedResult {
                institutional_analysis: body.trim().to_string(),
                remainder_text: remainder.trim().to_string(),
            }
        }
        None => {
            tracing::warn!("No institutional analysis block in response, using placeholder");
            ExtractedResult {
                institutional_analysis: NO_INSTITUTIONAL_ANALYSIS.to_string(),
                remainder_text: raw_text.trim().to_string(),
            }
        }
    }
}

/// Ordered (title, link) pairs; entries missing either part are skipped.
pub fn citation_list(citations: &[Citation]) -> Vec<SourceLink> {
    citations
        .iter()
        .filter_map(|c| {
            let title = c.title.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
            let uri = c.uri.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
            Some(SourceLink {
                title: title.to_string(),
                uri: uri.to_string(),
            })
        })
        .collect()
}
