//! Prompt templates for chat queries
//!
//! Both the context-aware and the bare-question prompts use the same
//! `{{name}}` placeholder syntax.

use std::collections::HashMap;

use crate::errors::RagChatError;
use crate::errors::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// Template for generating prompts
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
    variables: Vec<String>,
}

impl PromptTemplate {
    /// Create a new prompt template
    pub fn new(template: impl AsRef<str>) -> Self {
        let segments = parse_segments(template.as_ref());
        let mut variables: Vec<String> = Vec::new();
        for segment in &segments {
            if let Segment::Variable(name) = segment {
                if !variables.contains(name) {
                    variables.push(name.clone());
                }
            }
        }
        Self {
            segments,
            variables,
        }
    }

    /// Fill in the template with variables
    ///
    /// Substitution is a single pass, so values containing `{{...}}` are
    /// inserted verbatim.
    pub fn render(&self, values: &HashMap<&str, String>) -> Result<String> {
        let mut result = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => result.push_str(text),
                Segment::Variable(name) => {
                    let value = values.get(name.as_str()).ok_or_else(|| {
                        RagChatError::Template(format!("no value for placeholder '{name}'"))
                    })?;
                    result.push_str(value);
                }
            }
        }
        Ok(result)
    }

    /// Get required variables
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }
}

/// Split a template into literal text and `{{name}}` placeholders
///
/// An opening `{{` without a matching `}}` is kept as literal text.
fn parse_segments(template: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            break;
        };
        if start > 0 {
            segments.push(Segment::Literal(rest[..start].to_string()));
        }
        let name = after_open[..end].trim();
        if name.is_empty() {
            segments.push(Segment::Literal(rest[start..start + 4 + end].to_string()));
        } else {
            segments.push(Segment::Variable(name.to_string()));
        }
        rest = &after_open[end + 2..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Literal(rest.to_string()));
    }
    segments
}

/// Prompt templates used by the chat pipeline
pub struct ChatPrompts;

impl ChatPrompts {
    /// Answer from retrieved context where possible
    #[must_use]
    pub fn context_qa() -> PromptTemplate {
        PromptTemplate::new(
            "可能な限り、検索によって得られたコンテキスト情報を使って質問に回答してください。\n\
             コンテキスト: {{context}}\n\
             ---\n\
             質問: {{query}}",
        )
    }

    /// The question alone
    #[must_use]
    pub fn bare_question() -> PromptTemplate {
        PromptTemplate::new("質問: {{query}}")
    }
}
