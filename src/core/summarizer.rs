//! Seam for the optional natural-language summarisation oracle.
//!
//! Summaries are attached after resolution so a dependency summary can see
//! both inward and outward edges. An oracle that cannot answer returns
//! `None`; that never fails a run.

/// Number of dependency names shown before the list is cut short.
pub const DEPENDENCY_PREVIEW_LIMIT: usize = 20;

pub trait Summarizer: Send + Sync {
    /// Describe what `code` does; `context` is a label like `"class Parser"`.
    fn summarize_code(&self, code: &str, context: &str) -> Option<String>;

    /// Describe what an entity uses (`inward`) and what uses it (`outward`).
    fn summarize_dependencies(
        &self,
        inward: &[String],
        outward: &[String],
        context: &str,
    ) -> Option<String>;
}

/// Summarizer that is never available.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSummarizer;

impl Summarizer for NoopSummarizer {
    fn summarize_code(&self, _code: &str, _context: &str) -> Option<String> {
        None
    }

    fn summarize_dependencies(
        &self,
        _inward: &[String],
        _outward: &[String],
        _context: &str,
    ) -> Option<String> {
        None
    }
}

/// Render a dependency list for a prompt: `a, b, c (and 4 more)` or `none`.
pub fn describe_dependencies(dependencies: &[String], limit: usize) -> String {
    if dependencies.is_empty() {
        return "none".to_string();
    }
    let shown = dependencies
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if dependencies.len() > limit {
        format!("{} (and {} more)", shown, dependencies.len() - limit)
    } else {
        shown
    }
}
