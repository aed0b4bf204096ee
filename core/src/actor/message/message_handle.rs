use std::any::Any;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

use crate::actor::message::Message;


/// Type-erased, immutable, cheaply cloneable message payload.
#[derive(Debug, Clone)]
pub struct MessageHandle(Arc<dyn Message>);

impl MessageHandle {
  pub fn new<M: Message>(message: M) -> Self {
    if let Some(handle) = (&message as &dyn Any).downcast_ref::<MessageHandle>() {
      return handle.clone();
    }
    MessageHandle(Arc::new(message))
  }

  pub fn get_type_name(&self) -> String {
    self.message().get_type_name()
  }

  /// The payload itself, not the `Arc` around it.
  pub fn message(&self) -> &dyn Message {
    &*self.0
  }

  pub fn is_typed<T: 'static>(&self) -> bool {
    self.message().as_any().is::<T>()
  }

  pub fn as_typed<T: 'static>(&self) -> Option<&T> {
    self.message().as_any().downcast_ref::<T>()
  }

  pub fn to_typed<T: Clone + 'static>(&self) -> Option<T> {
    self.as_typed::<T>().cloned()
  }
}

impl Display for MessageHandle {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:?}", self.0)
  }
}

static_assertions::assert_impl_all!(MessageHandle: Send, Sync);
