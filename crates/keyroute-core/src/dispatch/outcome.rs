//! Classified attempt outcomes

use super::classifier::FailureClass;

/// Result of one provider call after classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success { text: String },
    Transient { error: String },
    Permanent { error: String },
    Unknown { error: String },
}

impl AttemptOutcome {
    pub fn success(text: impl Into<String>) -> Self {
        AttemptOutcome::Success { text: text.into() }
    }

    /// Failure outcome of a known class
    pub fn failure(class: FailureClass, error: impl Into<String>) -> Self {
        let error = error.into();
        match class {
            FailureClass::Transient => AttemptOutcome::Transient { error },
            FailureClass::Permanent => AttemptOutcome::Permanent { error },
            FailureClass::Unknown => AttemptOutcome::Unknown { error },
        }
    }

    /// Sanitized error text of a failure
    pub fn error_message(&self) -> Option<&str> {
        match self {
            AttemptOutcome::Success { .. } => None,
            AttemptOutcome::Transient { error }
            | AttemptOutcome::Permanent { error }
            | AttemptOutcome::Unknown { error } => Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success { .. })
    }
}
