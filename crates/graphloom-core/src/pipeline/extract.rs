//! Graph extraction from unstructured text using the LLM capability
//!
//! Builds the extraction prompt (with a bounded text preview and any
//! missing-item feedback from the previous review), invokes the
//! text-generation capability and strips markdown fences from the raw
//! candidate it returns. Parsing the candidate is the caller's job.

use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::llm::TextGenerator;

/// Characters of the source document handed to the extraction capability
pub const TEXT_PREVIEW_CHARS: usize = 6000;

/// A bounded view of the source text
#[derive(Debug, Clone)]
pub struct TextPreview {
    /// The (possibly truncated) text
    pub text: String,
    /// Whether truncation occurred
    pub truncated: bool,
    /// Total characters in the full document
    pub total_chars: usize,
}

impl TextPreview {
    /// Take up to `limit` characters from the start of `text`
    pub fn of(text: &str, limit: usize) -> Self {
        let total_chars = text.chars().count();
        if total_chars <= limit {
            Self {
                text: text.to_string(),
                truncated: false,
                total_chars,
            }
        } else {
            Self {
                text: text.chars().take(limit).collect(),
                truncated: true,
                total_chars,
            }
        }
    }
}

/// Turtle knowledge-graph extractor backed by a text-generation capability
pub struct GraphExtractor {
    generator: Arc<dyn TextGenerator>,
    preview_chars: usize,
}

impl GraphExtractor {
    /// Create a new extractor
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            preview_chars: TEXT_PREVIEW_CHARS,
        }
    }

    /// Override the preview truncation boundary
    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    /// Produce a raw candidate graph for the source text
    ///
    /// `missing_items` carries the previous review's feedback; pass an
    /// empty slice on the first attempt. The returned string is the
    /// capability's response with any markdown fences removed, not yet
    /// parsed.
    pub async fn extract(&self, source_text: &str, missing_items: &[String]) -> Result<String> {
        let preview = TextPreview::of(source_text, self.preview_chars);
        let prompt = build_extraction_prompt(&preview, missing_items);

        debug!(
            preview_chars = preview.text.chars().count(),
            truncated = preview.truncated,
            missing_items = missing_items.len(),
            "Requesting graph extraction"
        );

        let response = self.generator.generate(&prompt).await?;
        Ok(strip_fences(&response).to_string())
    }
}

/// Build the extraction prompt for a text preview
fn build_extraction_prompt(preview: &TextPreview, missing_items: &[String]) -> String {
    let mut prompt = String::from(EXTRACTION_INSTRUCTIONS);

    if !missing_items.is_empty() {
        prompt.push_str(
            "\nA previous attempt was reviewed and found incomplete. \
             Be sure the graph also covers:\n",
        );
        for item in missing_items {
            prompt.push_str("- ");
            prompt.push_str(item);
            prompt.push('\n');
        }
    }

    prompt.push_str("\nDOCUMENT:\n");
    prompt.push_str(&preview.text);
    if preview.truncated {
        prompt.push_str(&format!(
            "\n\n(The document was truncated to the first {} characters; total length {} characters.)",
            preview.text.chars().count(),
            preview.total_chars
        ));
    }
    prompt
}

/// Instructions for the extraction capability
const EXTRACTION_INSTRUCTIONS: &str = r#"You are an RDF engineer. Convert the document below into a knowledge graph in Turtle format covering every entity and relationship mentioned.

Guidelines:
- Define appropriate prefixes at the beginning (e.g. @prefix : <http://example.org/> .)
- Use meaningful URIs for resources (e.g. :Ada_Lovelace, :Google)
- Use standard vocabularies where applicable (foaf:, schema:)
- Include rdf:type statements for entities
- Extract relationships between entities
- Add literal properties (names, dates, descriptions)

Output ONLY the Turtle graph, nothing else.
"#;

/// Strip markdown code fences from a capability response
///
/// Handles ```turtle fences, anonymous ``` fences, and unfenced text.
pub(crate) fn strip_fences(response: &str) -> &str {
    if let Some(start) = response.find("```turtle") {
        let body_start = start + "```turtle".len();
        if let Some(end) = response[body_start..].find("```") {
            return response[body_start..body_start + end].trim();
        }
    }

    if let Some(start) = response.find("```") {
        let after_fence = start + 3;
        if let Some(newline) = response[after_fence..].find('\n') {
            let body_start = after_fence + newline + 1;
            if let Some(end) = response[body_start..].find("```") {
                return response[body_start..body_start + end].trim();
            }
        }
    }

    response.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_untruncated() {
        let preview = TextPreview::of("Ada was born in London.", 6000);
        assert!(!preview.truncated);
        assert_eq!(preview.text, "Ada was born in London.");
        assert_eq!(preview.total_chars, 23);
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let text = "é".repeat(100);
        let preview = TextPreview::of(&text, 10);
        assert!(preview.truncated);
        assert_eq!(preview.text.chars().count(), 10);
        assert_eq!(preview.total_chars, 100);
    }

    #[test]
    fn test_prompt_includes_missing_items() {
        let preview = TextPreview::of("some text", 6000);
        let missing = vec!["the founding year".to_string(), "Sergey Brin".to_string()];
        let prompt = build_extraction_prompt(&preview, &missing);
        assert!(prompt.contains("- the founding year"));
        assert!(prompt.contains("- Sergey Brin"));
    }

    #[test]
    fn test_prompt_notes_truncation() {
        let text = "x".repeat(50);
        let preview = TextPreview::of(&text, 10);
        let prompt = build_extraction_prompt(&preview, &[]);
        assert!(prompt.contains("truncated to the first 10 characters"));
    }

    #[test]
    fn test_strip_turtle_fence() {
        let response = "Here is the graph:\n```turtle\n:a :b :c .\n```\nDone.";
        assert_eq!(strip_fences(response), ":a :b :c .");
    }

    #[test]
    fn test_strip_anonymous_fence() {
        let response = "```\n:a :b :c .\n```";
        assert_eq!(strip_fences(response), ":a :b :c .");
    }

    #[test]
    fn test_strip_unfenced_passthrough() {
        let response = "  :a :b :c .\n";
        assert_eq!(strip_fences(response), ":a :b :c .");
    }
}
