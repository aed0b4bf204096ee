use std::error::Error;
use std::fmt::{Debug, Display};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ErrorReason {
  message: String,
  cause: Option<Arc<dyn Error + Send + Sync>>,
}

impl ErrorReason {
  pub fn new<E: Error + Send + Sync + 'static>(error: E) -> Self {
    Self {
      message: error.to_string(),
      cause: Some(Arc::new(error)),
    }
  }

  pub fn from_message(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
      cause: None,
    }
  }

  pub fn message(&self) -> &str {
    &self.message
  }

  pub fn cause(&self) -> Option<&(dyn Error + Send + Sync)> {
    self.cause.as_deref()
  }
}

impl Display for ErrorReason {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.message)
  }
}

impl Error for ErrorReason {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match &self.cause {
      Some(cause) => Some(cause.as_ref()),
      None => None,
    }
  }
}

impl From<&str> for ErrorReason {
  fn from(message: &str) -> Self {
    Self::from_message(message)
  }
}

impl From<String> for ErrorReason {
  fn from(message: String) -> Self {
    Self::from_message(message)
  }
}
