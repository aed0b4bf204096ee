use spider_actor_utils_rs::collections::Element;

use crate::actor::actor::ActorRef;
use crate::actor::message::MessageHandle;

/// A message together with the optional reference replies should go to.
#[derive(Debug, Clone)]
pub struct MessageEnvelope {
  message: MessageHandle,
  reply_to: Option<ActorRef>,
}

impl Element for MessageEnvelope {}

impl MessageEnvelope {
  pub fn new(message: MessageHandle) -> Self {
    Self {
      message,
      reply_to: None,
    }
  }

  pub fn with_reply_to(mut self, reply_to: Option<ActorRef>) -> Self {
    self.reply_to = reply_to;
    self
  }

  pub fn message(&self) -> &MessageHandle {
    &self.message
  }

  pub fn reply_to(&self) -> Option<&ActorRef> {
    self.reply_to.as_ref()
  }

  pub fn into_parts(self) -> (MessageHandle, Option<ActorRef>) {
    (self.message, self.reply_to)
  }
}
