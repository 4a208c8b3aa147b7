//! Diagnostic records surfaced by the analyzer's degraded-but-tolerable
//! findings (§7). Fatal errors use `goindex_core::errors::AnalysisError`
//! instead — these are only for the "logged and skipped" half of §7.

use crate::span::Position;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Warning,
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub position: Position,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn warning(position: Position, message: impl Into<String>) -> Self {
        Self { category: DiagnosticCategory::Warning, position, message: message.into() }
    }

    #[must_use]
    pub fn message(position: Position, message: impl Into<String>) -> Self {
        Self { category: DiagnosticCategory::Message, position, message: message.into() }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.position, self.message)
    }
}
