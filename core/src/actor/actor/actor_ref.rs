use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::runtime::Handle;

use crate::actor::actor::{current_actor, Address};
use crate::actor::actor_system::{ActorSystem, WeakActorSystem};
use crate::actor::message::{Message, MessageEnvelope, MessageHandle, PoisonPill, StopReason, Stopped};
use crate::actor::process::{ProcessHandle, Promise, PromiseError, ReadOnlyPromise, ReplyProcess};

#[derive(Debug, Clone, Error)]
pub enum AskError {
  #[error("no reply within {0:?}")]
  Timeout(Duration),
  #[error("actor not found: {0}")]
  ActorNotFound(Address),
  #[error("actor {0} asked itself")]
  SelfAsk(Address),
  #[error("ask_blocking called from within a tokio runtime")]
  BlockingInRuntime,
}

static_assertions::assert_impl_all!(AskError: Send, Sync);

/// A weak handle to a process.
///
/// Operations on a reference whose process has stopped are harmless: sends become dead letters,
/// asks fail with [`AskError::ActorNotFound`] and watchers are notified right away.
#[derive(Clone)]
pub struct ActorRef {
  address: Address,
  system: WeakActorSystem,
}

impl Debug for ActorRef {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ActorRef").field("address", &self.address).finish()
  }
}

impl PartialEq for ActorRef {
  fn eq(&self, other: &Self) -> bool {
    self.address == other.address
  }
}

impl Eq for ActorRef {}

impl Hash for ActorRef {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.address.hash(state);
  }
}

impl ActorRef {
  pub(crate) fn new(address: Address, system: WeakActorSystem) -> Self {
    Self { address, system }
  }

  pub fn address(&self) -> &Address {
    &self.address
  }

  fn process(&self) -> Option<(ActorSystem, Option<ProcessHandle>)> {
    let system = self.system.upgrade()?;
    let process = system.registry().get_process(&self.address);
    Some((system, process))
  }

  /// Enqueues `message` without waiting. Undeliverable messages are counted as dead letters.
  pub fn send<M: Message>(&self, reply_to: Option<&ActorRef>, message: M) {
    let envelope = MessageEnvelope::new(MessageHandle::new(message)).with_reply_to(reply_to.cloned());
    self.send_envelope(envelope);
  }

  pub fn tell<M: Message>(&self, message: M) {
    self.send(None, message);
  }

  pub(crate) fn send_envelope(&self, envelope: MessageEnvelope) {
    match self.process() {
      Some((system, Some(process))) => {
        if let Err(envelope) = process.send_user_message(envelope) {
          system.dead_letter(&self.address, envelope);
        }
      }
      Some((system, None)) => system.dead_letter(&self.address, envelope),
      None => tracing::debug!(address = %self.address, "actor system dropped, message discarded"),
    }
  }

  fn start_ask<M: Message>(&self, message: M) -> Result<Arc<ReplyProcess>, AskError> {
    if current_actor().as_ref() == Some(&self.address) {
      return Err(AskError::SelfAsk(self.address.clone()));
    }
    let not_found = || AskError::ActorNotFound(self.address.clone());
    let (system, process) = self.process().ok_or_else(not_found)?;
    let process = process.filter(|p| !p.is_stopped()).ok_or_else(not_found)?;

    let reply = ReplyProcess::spawn(&system).map_err(|_| not_found())?;
    let envelope = MessageEnvelope::new(MessageHandle::new(message)).with_reply_to(Some(reply.self_ref()));
    if let Err(envelope) = process.send_user_message(envelope) {
      reply.retire();
      system.dead_letter(&self.address, envelope);
      return Err(not_found());
    }
    Ok(reply)
  }

  fn finish_ask(
    &self,
    reply: &ReplyProcess,
    result: Result<MessageHandle, PromiseError>,
  ) -> Result<MessageHandle, AskError> {
    match result {
      Ok(message) => Ok(message),
      Err(PromiseError::Timeout(timeout)) => {
        reply.abandon();
        // The reply may have landed between the deadline and the cancellation.
        reply.promise().try_get().ok_or(AskError::Timeout(timeout))
      }
      Err(PromiseError::Cancelled) => Err(AskError::ActorNotFound(self.address.clone())),
    }
  }

  /// Sends `message` with a one-shot reply address and waits up to `timeout` for the answer.
  pub async fn ask<M: Message>(&self, message: M, timeout: Duration) -> Result<MessageHandle, AskError> {
    let reply = self.start_ask(message)?;
    let result = reply.promise().wait(timeout).await;
    self.finish_ask(&reply, result)
  }

  /// Like [`ActorRef::ask`], but parks the calling OS thread.
  ///
  /// Must not be called from a tokio runtime thread.
  pub fn ask_blocking<M: Message>(&self, message: M, timeout: Duration) -> Result<MessageHandle, AskError> {
    if Handle::try_current().is_ok() {
      return Err(AskError::BlockingInRuntime);
    }
    let reply = self.start_ask(message)?;
    let result = reply.promise().wait_blocking(timeout);
    self.finish_ask(&reply, result)
  }

  /// Registers `watcher` to receive a [`Stopped`] message when this process stops.
  ///
  /// If the process has already stopped or is unknown, the notification is sent immediately.
  /// Registering the same watcher again never produces a second notification.
  pub fn add_watcher(&self, watcher: &ActorRef) {
    let Some((system, process)) = self.process() else {
      return;
    };
    let stopped = match process {
      Some(process) => match process.add_watcher(watcher.clone()) {
        Ok(()) => return,
        Err(stopped) => stopped,
      },
      None => Stopped::new(self.address.clone(), StopReason::Unknown),
    };
    if let Some(stopped) = system.stop_record().notify(watcher, stopped) {
      watcher.tell(stopped);
    }
  }

  pub fn remove_watcher(&self, watcher: &ActorRef) {
    if let Some((_, Some(process))) = self.process() {
      process.remove_watcher(watcher);
    }
  }

  /// Resolves once the process stops. For an address that is no longer registered it is
  /// already resolved, with the recorded reason when the stop is still remembered.
  pub fn life(&self) -> ReadOnlyPromise<Stopped> {
    let recorded = match self.process() {
      Some((_, Some(process))) => return process.life(),
      Some((system, None)) => system.stop_record().stopped(&self.address),
      None => None,
    };
    let stopped = recorded.unwrap_or_else(|| Stopped::new(self.address.clone(), StopReason::Unknown));
    Promise::fulfilled(stopped).read_only()
  }

  /// Stops the process ahead of any queued user messages.
  pub fn stop(&self) {
    if let Some((_, Some(process))) = self.process() {
      process.stop();
    }
  }

  /// Stops the actor after the messages already in its mailbox.
  pub fn poison(&self) {
    self.tell(PoisonPill);
  }

  pub fn is_alive(&self) -> bool {
    matches!(self.process(), Some((_, Some(process))) if !process.is_stopped())
  }
}

static_assertions::assert_impl_all!(ActorRef: Send, Sync);
