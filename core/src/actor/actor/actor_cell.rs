use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;

use crate::actor::actor::{Actor, ActorError, ActorRef, Address, WatcherSet};
use crate::actor::actor_system::WeakActorSystem;
use crate::actor::context::{Context, ReceiveContext};
use crate::actor::dispatch::{Mailbox, MailboxError, MessageInvoker};
use crate::actor::message::{MessageEnvelope, PoisonPill, StopReason, Stopped, SystemMessage};
use crate::actor::process::{Process, Promise, ReadOnlyPromise};

tokio::task_local! {
  static CURRENT_ACTOR: Address;
}

/// Address of the actor whose `prestart` or `receive` is running on the current task.
pub(crate) fn current_actor() -> Option<Address> {
  CURRENT_ACTOR.try_with(|address| address.clone()).ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum CellState {
  Created = 0,
  Running = 1,
  Stopped = 2,
}

impl From<u8> for CellState {
  fn from(value: u8) -> Self {
    match value {
      0 => CellState::Created,
      1 => CellState::Running,
      _ => CellState::Stopped,
    }
  }
}

/// Runtime-side owner of one user actor.
///
/// All invocations arrive through the mailbox, one at a time, so the actor lock below is never
/// contended; it only lets `receive` borrow the actor mutably across awaits.
#[derive(Debug)]
pub(crate) struct ActorCell {
  self_ref: ActorRef,
  system: WeakActorSystem,
  actor: tokio::sync::Mutex<Option<Box<dyn Actor>>>,
  mailbox: Arc<Mailbox>,
  state: AtomicU8,
  watchers: WatcherSet,
  life: Promise<Stopped>,
}

impl ActorCell {
  pub(crate) fn new(
    self_ref: ActorRef,
    system: WeakActorSystem,
    actor: Box<dyn Actor>,
    mailbox: Arc<Mailbox>,
  ) -> Arc<Self> {
    Arc::new(Self {
      self_ref,
      system,
      actor: tokio::sync::Mutex::new(Some(actor)),
      mailbox,
      state: AtomicU8::new(CellState::Created as u8),
      watchers: WatcherSet::new(),
      life: Promise::new(),
    })
  }

  pub(crate) fn address(&self) -> &Address {
    self.self_ref.address()
  }

  pub(crate) fn state(&self) -> CellState {
    CellState::from(self.state.load(Ordering::SeqCst))
  }

  fn context(&self) -> Context {
    Context::new(self.self_ref.clone(), self.system.clone())
  }

  fn dead_letter(&self, envelope: MessageEnvelope) {
    if let Some(system) = self.system.upgrade() {
      system.dead_letter(self.address(), envelope);
    }
  }

  async fn start(&self) {
    if self.state() != CellState::Created {
      return;
    }
    let ctx = self.context();
    let result = {
      let mut actor_mg = self.actor.lock().await;
      let Some(actor) = actor_mg.as_mut() else {
        return;
      };
      CURRENT_ACTOR
        .scope(self.address().clone(), AssertUnwindSafe(actor.prestart(&ctx)).catch_unwind())
        .await
    };
    match result {
      Ok(Ok(())) => {
        let _ = self.state.compare_exchange(
          CellState::Created as u8,
          CellState::Running as u8,
          Ordering::SeqCst,
          Ordering::SeqCst,
        );
        tracing::debug!(address = %self.address(), "actor started");
      }
      Ok(Err(error)) => {
        tracing::error!(address = %self.address(), error = %error, "prestart failed");
        self.terminate(StopReason::Failed(error)).await;
      }
      Err(payload) => {
        let error = ActorError::from_panic(payload);
        tracing::error!(address = %self.address(), error = %error, "prestart panicked");
        self.terminate(StopReason::Failed(error)).await;
      }
    }
  }

  async fn handle_user_message(&self, envelope: MessageEnvelope) {
    if self.state() != CellState::Running {
      self.dead_letter(envelope);
      return;
    }
    if envelope.message().is_typed::<PoisonPill>() {
      self.terminate(StopReason::Poisoned).await;
      return;
    }

    let (message, reply_to) = envelope.into_parts();
    let mut ctx = ReceiveContext::new(self.context(), reply_to);
    let result = {
      let mut actor_mg = self.actor.lock().await;
      let Some(actor) = actor_mg.as_mut() else {
        return;
      };
      CURRENT_ACTOR
        .scope(
          self.address().clone(),
          AssertUnwindSafe(actor.receive(&mut ctx, message)).catch_unwind(),
        )
        .await
    };

    match result {
      Ok(Ok(())) => {
        if ctx.is_stop_requested() {
          self.terminate(StopReason::Stopped).await;
        }
      }
      Ok(Err(error)) => {
        tracing::error!(address = %self.address(), error = %error, "receive failed");
        self.terminate(StopReason::Failed(error)).await;
      }
      Err(payload) => {
        let error = ActorError::from_panic(payload);
        tracing::error!(address = %self.address(), error = %error, "receive panicked");
        self.terminate(StopReason::Failed(error)).await;
      }
    }
  }

  /// Moves the cell to `Stopped`. Only the first call has any effect.
  async fn terminate(&self, reason: StopReason) {
    let previous = self.state.swap(CellState::Stopped as u8, Ordering::SeqCst);
    if CellState::from(previous) == CellState::Stopped {
      return;
    }
    tracing::debug!(address = %self.address(), reason = %reason, "actor stopping");

    for envelope in self.mailbox.close() {
      self.dead_letter(envelope);
    }

    let actor = self.actor.lock().await.take();
    if let Some(mut actor) = actor {
      let ctx = self.context();
      match AssertUnwindSafe(actor.post_stop(&ctx)).catch_unwind().await {
        Ok(Ok(())) => {}
        Ok(Err(error)) => tracing::warn!(address = %self.address(), error = %error, "post_stop failed"),
        Err(payload) => {
          let error = ActorError::from_panic(payload);
          tracing::warn!(address = %self.address(), error = %error, "post_stop panicked");
        }
      }
      drop(actor);
    }

    // Recorded before unregistering, so a late watcher always finds either the cell or the record.
    let stopped = Stopped::new(self.address().clone(), reason);
    let watchers = self.watchers.close(stopped.clone());
    let system = self.system.upgrade();
    let watchers = match &system {
      Some(system) => system.stop_record().record(&stopped, watchers),
      None => watchers,
    };
    if let Some(system) = &system {
      system.registry().remove_process(self.address());
    }

    let _ = self.life.fulfill(stopped.clone());
    for watcher in watchers {
      watcher.tell(stopped.clone());
    }
    tracing::debug!(address = %self.address(), "actor stopped");
  }
}

#[async_trait]
impl MessageInvoker for ActorCell {
  async fn invoke_system_message(&self, message: SystemMessage) {
    match message {
      SystemMessage::Start => self.start().await,
      SystemMessage::Stop => self.terminate(StopReason::Stopped).await,
    }
  }

  async fn invoke_user_message(&self, envelope: MessageEnvelope) {
    self.handle_user_message(envelope).await;
  }
}

impl Process for ActorCell {
  fn send_user_message(&self, envelope: MessageEnvelope) -> Result<(), MessageEnvelope> {
    if self.state() == CellState::Stopped {
      return Err(envelope);
    }
    match self.mailbox.post_user_message(envelope) {
      Ok(()) => Ok(()),
      Err(MailboxError::Closed(envelope)) => Err(envelope),
      Err(MailboxError::Disconnected) => {
        tracing::warn!(address = %self.address(), "mailbox disconnected, message lost");
        Ok(())
      }
    }
  }

  fn stop(&self) {
    if self.mailbox.post_system_message(SystemMessage::Stop).is_err() {
      tracing::debug!(address = %self.address(), "stop requested on a closed mailbox");
    }
  }

  fn add_watcher(&self, watcher: ActorRef) -> Result<(), Stopped> {
    self.watchers.add(watcher)
  }

  fn remove_watcher(&self, watcher: &ActorRef) {
    self.watchers.remove(watcher);
  }

  fn life(&self) -> ReadOnlyPromise<Stopped> {
    self.life.read_only()
  }

  fn is_stopped(&self) -> bool {
    self.state() == CellState::Stopped
  }
}
