use std::fmt::{Display, Formatter};

use crate::actor::actor::{ActorError, Address};

/// Why a process left the registry.
#[derive(Debug, Clone)]
pub enum StopReason {
  /// `ActorRef::stop`, `ReceiveContext::stop` or system shutdown.
  Stopped,
  /// A `PoisonPill` was processed.
  Poisoned,
  /// `prestart` or `receive` returned an error or panicked.
  Failed(ActorError),
  /// A reply process completed or was abandoned.
  Retired,
  /// The address was not registered and no stop is remembered for it.
  Unknown,
}

impl StopReason {
  pub fn is_failure(&self) -> bool {
    matches!(self, StopReason::Failed(_))
  }

  pub fn error(&self) -> Option<&ActorError> {
    match self {
      StopReason::Failed(error) => Some(error),
      _ => None,
    }
  }
}

impl Display for StopReason {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      StopReason::Stopped => write!(f, "stopped"),
      StopReason::Poisoned => write!(f, "poisoned"),
      StopReason::Failed(error) => write!(f, "failed: {}", error),
      StopReason::Retired => write!(f, "retired"),
      StopReason::Unknown => write!(f, "unknown"),
    }
  }
}

/// Termination notification delivered to watchers and used to fulfill `Life` promises.
#[derive(Debug, Clone)]
pub struct Stopped {
  address: Address,
  reason: StopReason,
}

impl Stopped {
  pub fn new(address: Address, reason: StopReason) -> Self {
    Self { address, reason }
  }

  pub fn address(&self) -> &Address {
    &self.address
  }

  pub fn reason(&self) -> &StopReason {
    &self.reason
  }
}
