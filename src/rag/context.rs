//! Context assembly from retrieved passages

use tracing::warn;

use crate::models::Passage;

/// Default upper bound on the context slot, in characters
pub const DEFAULT_MAX_CONTEXT_LENGTH: usize = 16_000;

/// Assembler for creating context from search results
pub struct ContextAssembler {
    max_context_length: usize,
}

impl ContextAssembler {
    /// Create a new context assembler
    #[must_use]
    pub const fn new(max_context_length: usize) -> Self {
        Self { max_context_length }
    }

    /// Number each passage in rank order
    ///
    /// The passage that reaches the limit is cut at a character boundary;
    /// any after it are left out and reported.
    #[must_use]
    pub fn assemble(&self, passages: &[Passage]) -> String {
        let mut context = String::new();
        let mut total_length = 0;

        for (idx, passage) in passages.iter().enumerate() {
            let text = passage.text.trim();
            let header = format!("\n[{}] ", idx + 1);
            let entry_length = header.chars().count() + text.chars().count() + 1;
            let remaining = self.max_context_length - total_length;

            if entry_length > remaining {
                let room = remaining.saturating_sub(header.chars().count() + 1);
                let mut included = idx;
                if room > 0 {
                    context.push_str(&header);
                    context.extend(text.chars().take(room));
                    context.push('\n');
                    included += 1;
                }
                warn!(
                    "Context limit of {} chars reached: passage {} truncated, {} of {} passage(s) dropped",
                    self.max_context_length,
                    idx + 1,
                    passages.len() - included,
                    passages.len()
                );
                break;
            }

            context.push_str(&header);
            context.push_str(text);
            context.push('\n');
            total_length += entry_length;
        }

        context
    }
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONTEXT_LENGTH)
    }
}
