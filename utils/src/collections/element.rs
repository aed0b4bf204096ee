use std::fmt::Debug;
use std::sync::Arc;

/// Constraints for values stored in the runtime's queues.
///
/// Requiring `Debug + Send + Sync + 'static` keeps every element safe to move between worker threads.
pub trait Element: Debug + Send + Sync + 'static {}

macro_rules! impl_element_for_primitives {
  ($($ty:ty),* $(,)?) => {
    $(impl Element for $ty {})*
  };
}

impl_element_for_primitives!(i8, i16, i32, i64, isize);
impl_element_for_primitives!(u8, u16, u32, u64, usize);
impl_element_for_primitives!(f32, f64, bool, char);

impl Element for String {}

impl<T> Element for Box<T> where T: Debug + Send + Sync + 'static {}

impl<T> Element for Arc<T> where T: Debug + Send + Sync + 'static {}

impl<T> Element for Option<T> where T: Debug + Send + Sync + 'static {}
