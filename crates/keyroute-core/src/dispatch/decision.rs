//! Per-attempt control decisions and the iteration cursor

use super::outcome::AttemptOutcome;

/// What the dispatcher does after one attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptDecision {
    /// Try the next model with the same credential
    Continue,
    /// Skip the remaining models of this credential
    NextCredential,
    /// Stop and return the generated text
    Succeed(String),
    /// Nothing left to try
    ExhaustAll,
}

impl AttemptDecision {
    /// Decision implied by a classified outcome
    pub fn for_outcome(outcome: AttemptOutcome) -> Self {
        match outcome {
            AttemptOutcome::Success { text } => AttemptDecision::Succeed(text),
            AttemptOutcome::Transient { .. } | AttemptOutcome::Unknown { .. } => {
                AttemptDecision::Continue
            }
            AttemptOutcome::Permanent { .. } => AttemptDecision::NextCredential,
        }
    }
}

/// Indices of the (credential, model) pair to attempt next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptPosition {
    pub credential: usize,
    pub model: usize,
}

/// Row-major cursor over the credential × model grid
#[derive(Debug, Clone)]
pub struct AttemptCursor {
    credentials: usize,
    models: usize,
    position: Option<AttemptPosition>,
}

impl AttemptCursor {
    pub fn new(credentials: usize, models: usize) -> Self {
        let position = (credentials > 0 && models > 0).then_some(AttemptPosition {
            credential: 0,
            model: 0,
        });
        Self {
            credentials,
            models,
            position,
        }
    }

    /// Pair to attempt, `None` once exhausted
    pub fn position(&self) -> Option<AttemptPosition> {
        self.position
    }

    /// Move according to `decision`.
    ///
    /// Returns the decision the caller acts on: `Continue` and
    /// `NextCredential` become `ExhaustAll` when the grid runs out.
    pub fn advance(&mut self, decision: AttemptDecision) -> AttemptDecision {
        let Some(current) = self.position else {
            return match decision {
                AttemptDecision::Succeed(text) => AttemptDecision::Succeed(text),
                _ => AttemptDecision::ExhaustAll,
            };
        };

        self.position = match &decision {
            AttemptDecision::Continue if current.model + 1 < self.models => Some(AttemptPosition {
                credential: current.credential,
                model: current.model + 1,
            }),
            AttemptDecision::Continue | AttemptDecision::NextCredential => {
                self.next_credential(current.credential)
            }
            AttemptDecision::Succeed(_) | AttemptDecision::ExhaustAll => None,
        };

        match decision {
            AttemptDecision::Succeed(text) => AttemptDecision::Succeed(text),
            _ if self.position.is_none() => AttemptDecision::ExhaustAll,
            other => other,
        }
    }

    fn next_credential(&self, credential: usize) -> Option<AttemptPosition> {
        (credential + 1 < self.credentials).then_some(AttemptPosition {
            credential: credential + 1,
            model: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(credential: usize, model: usize) -> Option<AttemptPosition> {
        Some(AttemptPosition { credential, model })
    }

    #[test]
    fn test_decision_for_outcomes() {
        assert_eq!(
            AttemptDecision::for_outcome(AttemptOutcome::success("t")),
            AttemptDecision::Succeed("t".to_string())
        );
        assert_eq!(
            AttemptDecision::for_outcome(AttemptOutcome::Transient { error: "q".into() }),
            AttemptDecision::Continue
        );
        assert_eq!(
            AttemptDecision::for_outcome(AttemptOutcome::Unknown { error: "?".into() }),
            AttemptDecision::Continue
        );
        assert_eq!(
            AttemptDecision::for_outcome(AttemptOutcome::Permanent { error: "k".into() }),
            AttemptDecision::NextCredential
        );
    }

    #[test]
    fn test_empty_grid_is_exhausted() {
        assert!(AttemptCursor::new(0, 3).position().is_none());
        assert!(AttemptCursor::new(2, 0).position().is_none());
        let mut cursor = AttemptCursor::new(0, 0);
        assert_eq!(
            cursor.advance(AttemptDecision::Continue),
            AttemptDecision::ExhaustAll
        );
    }

    #[test]
    fn test_continue_walks_models_then_credentials() {
        let mut cursor = AttemptCursor::new(2, 2);
        assert_eq!(cursor.position(), pos(0, 0));
        assert_eq!(
            cursor.advance(AttemptDecision::Continue),
            AttemptDecision::Continue
        );
        assert_eq!(cursor.position(), pos(0, 1));
        cursor.advance(AttemptDecision::Continue);
        assert_eq!(cursor.position(), pos(1, 0));
        cursor.advance(AttemptDecision::Continue);
        assert_eq!(cursor.position(), pos(1, 1));
        assert_eq!(
            cursor.advance(AttemptDecision::Continue),
            AttemptDecision::ExhaustAll
        );
        assert!(cursor.position().is_none());
    }

    #[test]
    fn test_next_credential_skips_remaining_models() {
        let mut cursor = AttemptCursor::new(2, 3);
        assert_eq!(
            cursor.advance(AttemptDecision::NextCredential),
            AttemptDecision::NextCredential
        );
        assert_eq!(cursor.position(), pos(1, 0));
        assert_eq!(
            cursor.advance(AttemptDecision::NextCredential),
            AttemptDecision::ExhaustAll
        );
    }

    #[test]
    fn test_succeed_stops() {
        let mut cursor = AttemptCursor::new(3, 3);
        assert_eq!(
            cursor.advance(AttemptDecision::Succeed("done".into())),
            AttemptDecision::Succeed("done".into())
        );
        assert!(cursor.position().is_none());
    }
}
