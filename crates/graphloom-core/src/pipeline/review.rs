//! Completeness review of a candidate graph against its source text
//!
//! The checker delegates the actual text comparison to an opaque oracle
//! capability and owns the contract around it: the verdict format, the
//! ordered missing-item list, and the rule that a malformed oracle
//! response is a failure with a synthetic missing item, never an error
//! raised upward.

use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::graph::{TripleGraph, turtle};
use crate::llm::TextGenerator;

use super::extract::TextPreview;
use super::session::ReviewStatus;

/// How much of a malformed oracle response to quote back in the
/// synthetic missing item
const VERDICT_QUOTE_CHARS: usize = 120;

/// Result of a completeness check
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Pass iff nothing is missing
    pub status: ReviewStatus,
    /// Missing entities/relations in order of first appearance in the
    /// source; empty on pass
    pub missing_items: Vec<String>,
}

impl CheckResult {
    /// Build a passing result
    pub fn pass() -> Self {
        Self {
            status: ReviewStatus::Pass,
            missing_items: Vec::new(),
        }
    }

    /// Build a failing result with the given missing items
    pub fn fail(missing_items: Vec<String>) -> Self {
        Self {
            status: ReviewStatus::Fail,
            missing_items,
        }
    }

    /// Whether the candidate covered everything
    pub fn passed(&self) -> bool {
        self.status == ReviewStatus::Pass
    }
}

/// Completeness checker backed by an oracle capability
pub struct CompletenessChecker {
    oracle: Arc<dyn TextGenerator>,
    preview_chars: usize,
}

impl CompletenessChecker {
    /// Create a new checker
    pub fn new(oracle: Arc<dyn TextGenerator>) -> Self {
        Self {
            oracle,
            preview_chars: super::extract::TEXT_PREVIEW_CHARS,
        }
    }

    /// Override the preview truncation boundary
    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    /// Check a candidate graph against the source text
    ///
    /// Returns `Err` only when the oracle capability itself fails; a
    /// malformed verdict is a `fail` result, not an error.
    pub async fn check(&self, source_text: &str, candidate: &TripleGraph) -> Result<CheckResult> {
        let preview = TextPreview::of(source_text, self.preview_chars);
        let prompt = build_review_prompt(&preview, candidate);

        let raw = self.oracle.generate(&prompt).await?;
        let result = parse_verdict(&raw);

        debug!(
            status = %result.status,
            missing = result.missing_items.len(),
            "Completeness review finished"
        );
        Ok(result)
    }
}

/// Build the review prompt
fn build_review_prompt(preview: &TextPreview, candidate: &TripleGraph) -> String {
    format!(
        r#"Compare the source text with the knowledge graph below.
Check whether every entity and relationship from the text is present in the graph.
If everything is captured, output the single word 'pass'.
If something is missing, output 'fail' on the first line, followed by one missing item per line, in the order the items first appear in the text.

SOURCE TEXT:
{source}

KNOWLEDGE GRAPH (Turtle):
{graph}
"#,
        source = preview.text,
        graph = turtle::serialize(candidate),
    )
}

/// Parse an oracle response into a check result
///
/// A response that starts with neither `pass` nor `fail` is treated as a
/// failure with one synthetic missing item quoting the response.
pub(crate) fn parse_verdict(raw: &str) -> CheckResult {
    let trimmed = raw.trim();
    let mut lines = trimmed.lines();
    let first = lines.next().unwrap_or("").trim().to_lowercase();

    if first.starts_with("pass") {
        return CheckResult::pass();
    }

    if let Some(remainder) = first_line_remainder(&first, trimmed) {
        let mut missing_items = Vec::new();
        if !remainder.is_empty() {
            missing_items.push(remainder);
        }
        for line in lines {
            let item = strip_list_marker(line);
            if !item.is_empty() {
                missing_items.push(item.to_string());
            }
        }
        return CheckResult::fail(missing_items);
    }

    let quoted: String = trimmed.chars().take(VERDICT_QUOTE_CHARS).collect();
    CheckResult::fail(vec![format!(
        "completeness review returned an unreadable verdict: {}",
        quoted
    )])
}

/// For a `fail` first line, return whatever follows the keyword (may be
/// an inline first missing item); `None` when the line is not a failure
fn first_line_remainder(lowered_first: &str, trimmed: &str) -> Option<String> {
    if !lowered_first.starts_with("fail") {
        return None;
    }
    let original_first = trimmed.lines().next().unwrap_or("");
    let after = &original_first.trim()[4..];
    let after = after.trim_start_matches(['e', 'd']); // "failed" verdicts
    let after = after.trim().trim_start_matches([':', ',', '.']).trim();
    Some(strip_list_marker(after).to_string())
}

/// Strip leading list markers from a missing-item line
fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    let line = line
        .trim_start_matches(['-', '*', '•'])
        .trim_start();
    // numbered lists: "1." or "2)"
    let mut chars = line.char_indices().peekable();
    let mut digits_end = 0;
    while let Some((i, c)) = chars.peek().copied() {
        if c.is_ascii_digit() {
            digits_end = i + c.len_utf8();
            chars.next();
        } else {
            break;
        }
    }
    if digits_end > 0 {
        if let Some((_, c)) = chars.peek()
            && (*c == '.' || *c == ')')
        {
            return line[digits_end + 1..].trim_start();
        }
    }
    line
}
