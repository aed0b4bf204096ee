use std::any::Any;
use std::fmt::Debug;

/// A value that can be delivered to an actor.
///
/// Every `Debug + Send + Sync + 'static` type is a message; receivers recover the concrete
/// type through [`crate::actor::message::MessageHandle::to_typed`].
pub trait Message: Debug + Send + Sync + 'static {
  fn as_any(&self) -> &(dyn Any + Send + Sync + 'static);

  fn get_type_name(&self) -> String;
}

impl<T> Message for T
where
  T: Debug + Send + Sync + 'static,
{
  fn as_any(&self) -> &(dyn Any + Send + Sync + 'static) {
    self
  }

  fn get_type_name(&self) -> String {
    std::any::type_name::<T>().to_string()
  }
}
