use std::fmt::Debug;

use async_trait::async_trait;

use crate::actor::actor::ActorError;
use crate::actor::context::{Context, ReceiveContext};
use crate::actor::message::MessageHandle;

/// User logic hosted by the runtime.
///
/// The runtime never calls two methods of the same actor concurrently: `prestart` runs once
/// before the first `receive`, every `receive` runs to completion before the next one starts,
/// and `post_stop` runs once after the last.
///
/// Returning an error (or panicking) from `prestart` or `receive` stops the actor with
/// [`crate::actor::message::StopReason::Failed`].
#[async_trait]
pub trait Actor: Debug + Send + 'static {
  async fn prestart(&mut self, _ctx: &Context) -> Result<(), ActorError> {
    Ok(())
  }

  async fn receive(&mut self, ctx: &mut ReceiveContext, message_handle: MessageHandle) -> Result<(), ActorError>;

  async fn post_stop(&mut self, _ctx: &Context) -> Result<(), ActorError> {
    Ok(())
  }
}
