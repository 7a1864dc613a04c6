use semindex_core::{Error, IndexerState};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum TransitionError {
  #[error("start rejected: indexer is not enabled and configured")]
  NotConfigured,
  #[error("invalid transition from {from:?} via {event}")]
  Invalid { from: IndexerState, event: &'static str },
}

/// Drives the `Standby -> Indexing -> Indexed -> Watching` lifecycle plus
/// the `Error` sink reachable from any stage-fatal failure.
pub struct IndexerStateMachine {
  state: IndexerState,
  last_error: Option<String>,
}

impl Default for IndexerStateMachine {
  fn default() -> Self {
    Self::new()
  }
}

impl IndexerStateMachine {
  pub fn new() -> Self {
    Self {
      state: IndexerState::Standby,
      last_error: None,
    }
  }

  pub fn state(&self) -> IndexerState {
    self.state
  }

  pub fn last_error(&self) -> Option<&str> {
    self.last_error.as_deref()
  }

  /// `start` is rejected unless the controller reports the indexer is both
  /// enabled and configured.
  pub fn start(&mut self, enabled_and_configured: bool) -> Result<(), TransitionError> {
    if !enabled_and_configured {
      return Err(TransitionError::NotConfigured);
    }
    if self.state != IndexerState::Standby {
      return Err(TransitionError::Invalid {
        from: self.state,
        event: "start",
      });
    }
    self.state = IndexerState::Indexing;
    self.last_error = None;
    Ok(())
  }

  pub fn finish(&mut self) -> Result<(), TransitionError> {
    if self.state != IndexerState::Indexing {
      return Err(TransitionError::Invalid {
        from: self.state,
        event: "finish",
      });
    }
    self.state = IndexerState::Indexed;
    Ok(())
  }

  pub fn arm_watch(&mut self) -> Result<(), TransitionError> {
    if self.state != IndexerState::Indexed {
      return Err(TransitionError::Invalid {
        from: self.state,
        event: "armWatch",
      });
    }
    self.state = IndexerState::Watching;
    Ok(())
  }

  /// Any stage-fatal error moves the machine to `Error` from any
  /// non-Standby state, retaining the error for inspection.
  pub fn fail(&mut self, error: &Error) {
    self.last_error = Some(error.to_string());
    self.state = IndexerState::Error;
  }

  /// `stop` returns the machine from `Error` back to `Standby` so a fresh
  /// `start` can be attempted (possibly after a config fix).
  pub fn stop(&mut self) -> Result<(), TransitionError> {
    if self.state != IndexerState::Error {
      return Err(TransitionError::Invalid {
        from: self.state,
        event: "stop",
      });
    }
    self.state = IndexerState::Standby;
    Ok(())
  }

  /// Applies a `requiresRestart` signal: drops back to Standby so the
  /// caller's subsequent `start` performs a full rescan. A no-op from
  /// Standby itself.
  pub fn restart_for_config_change(&mut self) {
    if self.state == IndexerState::Standby {
      return;
    }
    self.state = IndexerState::Standby;
    self.last_error = None;
  }

  /// `dispose` is valid from any state and always lands in `Standby`.
  pub fn dispose(&mut self) {
    self.state = IndexerState::Standby;
    self.last_error = None;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn start_rejected_when_not_configured() {
    let mut machine = IndexerStateMachine::new();
    assert_eq!(machine.start(false), Err(TransitionError::NotConfigured));
    assert_eq!(machine.state(), IndexerState::Standby);
  }

  #[test]
  fn full_lifecycle_reaches_watching() {
    let mut machine = IndexerStateMachine::new();
    machine.start(true).unwrap();
    assert_eq!(machine.state(), IndexerState::Indexing);
    machine.finish().unwrap();
    assert_eq!(machine.state(), IndexerState::Indexed);
    machine.arm_watch().unwrap();
    assert_eq!(machine.state(), IndexerState::Watching);
  }

  #[test]
  fn fatal_error_moves_to_error_and_retains_message() {
    let mut machine = IndexerStateMachine::new();
    machine.start(true).unwrap();
    machine.fail(&Error::VectorStorePermanent("boom".to_string()));
    assert_eq!(machine.state(), IndexerState::Error);
    assert!(machine.last_error().unwrap().contains("boom"));
  }

  #[test]
  fn stop_returns_from_error_to_standby() {
    let mut machine = IndexerStateMachine::new();
    machine.start(true).unwrap();
    machine.fail(&Error::Io(std::io::Error::other("disk full")));
    machine.stop().unwrap();
    assert_eq!(machine.state(), IndexerState::Standby);
  }

  #[test]
  fn dispose_is_valid_from_any_state() {
    let mut machine = IndexerStateMachine::new();
    machine.start(true).unwrap();
    machine.dispose();
    assert_eq!(machine.state(), IndexerState::Standby);
  }

  #[test]
  fn config_change_from_watching_returns_to_standby_for_a_fresh_start() {
    let mut machine = IndexerStateMachine::new();
    machine.start(true).unwrap();
    machine.finish().unwrap();
    machine.arm_watch().unwrap();
    machine.restart_for_config_change();
    assert_eq!(machine.state(), IndexerState::Standby);
    // the whole point of returning to Standby: the caller can now drive a
    // real rescan instead of being wedged behind an invalid transition.
    machine.start(true).unwrap();
    assert_eq!(machine.state(), IndexerState::Indexing);
  }

  #[test]
  fn config_change_from_standby_is_a_no_op() {
    let mut machine = IndexerStateMachine::new();
    machine.restart_for_config_change();
    assert_eq!(machine.state(), IndexerState::Standby);
  }
}
