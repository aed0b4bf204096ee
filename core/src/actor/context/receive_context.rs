use std::ops::Deref;

use crate::actor::actor::ActorRef;
use crate::actor::context::Context;
use crate::actor::message::{Message, MessageEnvelope, MessageHandle};

/// [`Context`] for a single `receive` call.
#[derive(Debug)]
pub struct ReceiveContext {
  context: Context,
  reply_to: Option<ActorRef>,
  stop_requested: bool,
}

impl ReceiveContext {
  pub(crate) fn new(context: Context, reply_to: Option<ActorRef>) -> Self {
    Self {
      context,
      reply_to,
      stop_requested: false,
    }
  }

  pub fn reply_to(&self) -> Option<&ActorRef> {
    self.reply_to.as_ref()
  }

  /// Sends `message` to the reply address of the current message.
  ///
  /// Without a reply address the response is recorded as a dead letter.
  pub fn respond<M: Message>(&self, message: M) {
    match &self.reply_to {
      Some(reply_to) => reply_to.send(Some(self.context.self_ref()), message),
      None => {
        if let Some(system) = self.context.system() {
          let envelope = MessageEnvelope::new(MessageHandle::new(message));
          system.dead_letter(self.context.address(), envelope);
        }
      }
    }
  }

  /// Stops the actor once the current `receive` returns.
  pub fn stop(&mut self) {
    self.stop_requested = true;
  }

  pub(crate) fn is_stop_requested(&self) -> bool {
    self.stop_requested
  }
}

impl Deref for ReceiveContext {
  type Target = Context;

  fn deref(&self) -> &Self::Target {
    &self.context
  }
}
