use std::any::Any;

use thiserror::Error;

use crate::actor::actor::ErrorReason;

#[derive(Debug, Clone, Error)]
pub enum ActorError {
  #[error("Receive error: {0}")]
  ReceiveError(ErrorReason),
  #[error("Prestart error: {0}")]
  PrestartError(ErrorReason),
  #[error("PostStop error: {0}")]
  PostStopError(ErrorReason),
  #[error("Actor panicked: {0}")]
  Panicked(String),
}

impl ActorError {
  pub fn of_receive_error(reason: impl Into<ErrorReason>) -> Self {
    ActorError::ReceiveError(reason.into())
  }

  pub fn reason(&self) -> Option<&ErrorReason> {
    match self {
      ActorError::ReceiveError(r) | ActorError::PrestartError(r) | ActorError::PostStopError(r) => Some(r),
      ActorError::Panicked(_) => None,
    }
  }

  pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
      s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
      s.clone()
    } else {
      "non-string panic payload".to_string()
    };
    ActorError::Panicked(message)
  }
}

static_assertions::assert_impl_all!(ActorError: Send, Sync);
