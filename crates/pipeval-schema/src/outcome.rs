//! Accumulated result of one validation pass.

/// Warnings and errors collected during one validation call.
///
/// A fresh outcome is created per call and never shared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// Fatal findings; any entry fails the pass.
    pub errors: Vec<String>,
    /// Non-fatal findings; logged and otherwise ignored.
    pub warnings: Vec<String>,
}

impl ValidationOutcome {
    /// An empty outcome.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no errors were recorded.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record an error.
    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Record a warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}
