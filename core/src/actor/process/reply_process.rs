use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::actor::actor::{ActorRef, Address, WatcherSet};
use crate::actor::actor_system::{ActorSystem, SpawnError, WeakActorSystem};
use crate::actor::message::{MessageEnvelope, MessageHandle, StopReason, Stopped};
use crate::actor::process::{Process, Promise, ReadOnlyPromise, REPLY_PROCESS_PREFIX};


/// Anonymous single-use process that receives the answer to an ask.
///
/// The first message fulfills the promise and retires the process; anything arriving afterwards
/// is rejected and ends up as a dead letter.
#[derive(Debug)]
pub(crate) struct ReplyProcess {
  self_ref: ActorRef,
  system: WeakActorSystem,
  promise: Promise<MessageHandle>,
  retired: AtomicBool,
  watchers: WatcherSet,
  life: Promise<Stopped>,
}

impl ReplyProcess {
  pub(crate) fn spawn(system: &ActorSystem) -> Result<Arc<Self>, SpawnError> {
    let address = Address::from(format!("{}{}", REPLY_PROCESS_PREFIX, system.registry().next_id()));
    let process = Arc::new(Self {
      self_ref: ActorRef::new(address.clone(), system.downgrade()),
      system: system.downgrade(),
      promise: Promise::new(),
      retired: AtomicBool::new(false),
      watchers: WatcherSet::new(),
      life: Promise::new(),
    });
    system.registry().add_process(address, process.clone())?;
    Ok(process)
  }

  pub(crate) fn self_ref(&self) -> ActorRef {
    self.self_ref.clone()
  }

  pub(crate) fn promise(&self) -> &Promise<MessageHandle> {
    &self.promise
  }

  /// Unregisters the process and notifies its watchers. Only the first call has any effect.
  pub(crate) fn retire(&self) {
    if self.retired.swap(true, Ordering::SeqCst) {
      return;
    }
    let stopped = Stopped::new(self.self_ref.address().clone(), StopReason::Retired);
    let watchers = self.watchers.close(stopped.clone());
    let system = self.system.upgrade();
    let watchers = match &system {
      Some(system) if !watchers.is_empty() => system.stop_record().record(&stopped, watchers),
      _ => watchers,
    };
    if let Some(system) = &system {
      system.registry().remove_process(stopped.address());
    }
    let _ = self.life.fulfill(stopped.clone());
    for watcher in watchers {
      watcher.tell(stopped.clone());
    }
  }

  /// Gives up waiting: a reply arriving later is discarded.
  pub(crate) fn abandon(&self) {
    self.promise.cancel();
    self.retire();
  }
}

impl Process for ReplyProcess {
  fn send_user_message(&self, envelope: MessageEnvelope) -> Result<(), MessageEnvelope> {
    if self.retired.load(Ordering::SeqCst) {
      return Err(envelope);
    }
    let (message, reply_to) = envelope.into_parts();
    let result = self
      .promise
      .fulfill(message)
      .map_err(|message| MessageEnvelope::new(message).with_reply_to(reply_to));
    self.retire();
    result
  }

  fn stop(&self) {
    self.abandon();
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
    self.retired.load(Ordering::SeqCst)
  }
}
