// ABOUTME: Diagnostics accumulator for non-fatal warnings during a rollback.
// ABOUTME: Collects warnings that shouldn't fail the command but should be shown to users.

/// Collects non-fatal warnings during rollback operations.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during a rollback.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// Create a chat delivery warning.
    pub fn chat_delivery(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::ChatDelivery,
            message: message.into(),
        }
    }

    /// Create a settings warning.
    pub fn settings(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Settings,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during a rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A chat notification could not be delivered.
    ChatDelivery,
    /// A settings value was ignored or fell back to a default.
    Settings,
}
