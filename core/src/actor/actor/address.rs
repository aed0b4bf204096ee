use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Registry key of a process. Unique within the actor system that assigned it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(Arc<str>);

impl Address {
  pub fn new(id: impl AsRef<str>) -> Self {
    Address(Arc::from(id.as_ref()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl Display for Address {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for Address {
  fn from(id: &str) -> Self {
    Address::new(id)
  }
}

impl From<String> for Address {
  fn from(id: String) -> Self {
    Address(Arc::from(id))
  }
}

impl AsRef<str> for Address {
  fn as_ref(&self) -> &str {
    &self.0
  }
}
