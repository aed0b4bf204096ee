use std::fmt::Debug;

use async_trait::async_trait;

use crate::actor::message::{MessageEnvelope, SystemMessage};

/// Receiver side of a mailbox. The mailbox never calls it concurrently with itself.
#[async_trait]
pub(crate) trait MessageInvoker: Debug + Send + Sync {
  async fn invoke_system_message(&self, message: SystemMessage);
  async fn invoke_user_message(&self, envelope: MessageEnvelope);
}
