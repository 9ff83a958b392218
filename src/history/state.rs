// ABOUTME: Deployment history records and the ordered view over them.
// ABOUTME: The last record is the current state, the one before it is the previous state.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Revision;

/// One entry in a service's deployment history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentState {
    /// Task definition revision that was live after this entry was recorded.
    pub revision: Revision,
    /// Why the entry was recorded, e.g. `deploy` or `rollback: 7 -> 6`.
    pub message: String,
    /// When the entry was written. Ordering never depends on it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl DeploymentState {
    pub fn new(revision: Revision, message: impl Into<String>) -> Self {
        Self {
            revision,
            message: message.into(),
            recorded_at: None,
        }
    }

    /// Stamp the record with the current time, to the second.
    pub fn recorded_now(mut self) -> Self {
        self.recorded_at = Some(Utc::now().trunc_subsecs(0));
        self
    }
}

/// A pulled history log, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    states: Vec<DeploymentState>,
}

impl History {
    pub fn new(states: Vec<DeploymentState>) -> Self {
        Self { states }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The live state: the last entry.
    pub fn current(&self) -> Option<&DeploymentState> {
        self.states.last()
    }

    /// The state a rollback returns to: the second-to-last entry.
    pub fn previous(&self) -> Option<&DeploymentState> {
        self.states.len().checked_sub(2).map(|i| &self.states[i])
    }

    pub fn states(&self) -> &[DeploymentState] {
        &self.states
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(rev: u32) -> DeploymentState {
        DeploymentState::new(Revision::new(rev).unwrap(), "deploy")
    }

    #[test]
    fn empty_history_has_no_current_or_previous() {
        let history = History::default();
        assert!(history.current().is_none());
        assert!(history.previous().is_none());
    }

    #[test]
    fn single_entry_has_no_previous() {
        let history = History::new(vec![state(5)]);
        assert_eq!(history.current().unwrap().revision.get(), 5);
        assert!(history.previous().is_none());
    }

    #[test]
    fn previous_is_second_to_last() {
        let history = History::new(vec![state(3), state(5), state(7)]);
        assert_eq!(history.current().unwrap().revision.get(), 7);
        assert_eq!(history.previous().unwrap().revision.get(), 5);
    }

    #[test]
    fn timestamp_is_optional_on_the_wire() {
        let parsed: DeploymentState =
            serde_json::from_str(r#"{"revision":4,"message":"deploy"}"#).unwrap();
        assert_eq!(parsed, state(4));
        assert!(!serde_json::to_string(&parsed).unwrap().contains("recorded_at"));
    }

    #[test]
    fn timestamps_are_whole_seconds() {
        let stamped = state(4).recorded_now();
        let json = serde_json::to_string(&stamped).unwrap();
        let at = stamped.recorded_at.unwrap();
        assert_eq!(at.timestamp_subsec_nanos(), 0);
        assert!(json.contains(&format!("\"{}\"", at.format("%Y-%m-%dT%H:%M:%SZ"))), "{json}");
    }
}
