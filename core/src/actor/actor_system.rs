use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use thiserror::Error;
use tokio::runtime::Handle;
use uuid::Uuid;

use crate::actor::actor::{Actor, ActorCell, ActorRef, Address};
use crate::actor::dispatch::{Dispatcher, DispatcherHandle, Mailbox, MessageInvoker, WorkerPoolDispatcher};
use crate::actor::message::{MessageEnvelope, SystemMessage};
use crate::actor::process::{is_reserved_name, DeadLetterProcess, ProcessRegistry, StopRecord};
use crate::actor::{Config, ConfigOption};

#[derive(Debug, Clone, Error)]
pub enum SpawnError {
  #[error("address already registered: {0}")]
  NameExists(Address),
  #[error("name is reserved for generated addresses: {0}")]
  ReservedName(Address),
  #[error("actor system is shut down")]
  SystemShutdown,
}

#[derive(Debug, Clone, Error)]
pub enum ActorSystemError {
  #[error("no tokio runtime available")]
  RuntimeUnavailable,
  #[error("shutdown did not finish within {0:?}; {1} processes still running")]
  ShutdownTimeout(Duration, usize),
}

static_assertions::assert_impl_all!(SpawnError: Send, Sync);
static_assertions::assert_impl_all!(ActorSystemError: Send, Sync);

#[derive(Debug)]
struct ActorSystemInner {
  id: Uuid,
  config: Config,
  registry: ProcessRegistry,
  dispatcher: DispatcherHandle,
  dead_letter: DeadLetterProcess,
  stop_record: StopRecord,
  is_shutdown: AtomicBool,
}

/// Owner of the registry, the dispatcher and the dead-letter sink.
///
/// Cheap to clone. Actor references only hold a [`WeakActorSystem`], so dropping every
/// `ActorSystem` handle releases the registered actors.
#[derive(Debug, Clone)]
pub struct ActorSystem {
  inner: Arc<ActorSystemInner>,
}

#[derive(Debug, Clone, Default)]
pub struct WeakActorSystem {
  inner: Weak<ActorSystemInner>,
}

impl WeakActorSystem {
  pub fn upgrade(&self) -> Option<ActorSystem> {
    self.inner.upgrade().map(|inner| ActorSystem { inner })
  }
}

impl ActorSystem {
  /// Creates an actor system on the current tokio runtime.
  pub fn new() -> Result<Self, ActorSystemError> {
    Self::new_with_config(Config::default())
  }

  pub fn new_config_options(options: impl IntoIterator<Item = ConfigOption>) -> Result<Self, ActorSystemError> {
    Self::new_with_config(Config::from(options))
  }

  pub fn new_with_config(config: Config) -> Result<Self, ActorSystemError> {
    let runtime = Handle::try_current().map_err(|_| ActorSystemError::RuntimeUnavailable)?;
    let dispatcher = match &config.dispatcher {
      Some(dispatcher) => dispatcher.clone(),
      None => DispatcherHandle::new(WorkerPoolDispatcher::new(
        &runtime,
        config.worker_count,
        config.dispatcher_throughput,
      )),
    };
    let dead_letter = DeadLetterProcess::new(
      &runtime,
      config.dead_letter_logging,
      config.dead_letter_throttle_count,
      config.dead_letter_throttle_interval,
    );
    let stop_record = StopRecord::new(config.stop_record_capacity);
    let id = Uuid::new_v4();
    tracing::debug!(id = %id, workers = config.worker_count, "actor system started");
    Ok(Self {
      inner: Arc::new(ActorSystemInner {
        id,
        config,
        registry: ProcessRegistry::new(),
        dispatcher,
        dead_letter,
        stop_record,
        is_shutdown: AtomicBool::new(false),
      }),
    })
  }

  pub fn id(&self) -> Uuid {
    self.inner.id
  }

  pub fn config(&self) -> &Config {
    &self.inner.config
  }

  pub fn downgrade(&self) -> WeakActorSystem {
    WeakActorSystem {
      inner: Arc::downgrade(&self.inner),
    }
  }

  pub(crate) fn registry(&self) -> &ProcessRegistry {
    &self.inner.registry
  }

  pub(crate) fn stop_record(&self) -> &StopRecord {
    &self.inner.stop_record
  }

  pub(crate) fn dead_letter(&self, target: &Address, envelope: MessageEnvelope) {
    self.inner.dead_letter.send(target, envelope);
  }

  /// Messages that could not be delivered since the system started.
  pub fn dead_letter_count(&self) -> u64 {
    self.inner.dead_letter.count()
  }

  /// Registered processes, including pending ask replies.
  pub fn process_count(&self) -> usize {
    self.inner.registry.len()
  }

  pub fn is_shutdown(&self) -> bool {
    self.inner.is_shutdown.load(Ordering::SeqCst)
  }

  /// Returns a reference for `address`, whether or not it is registered.
  pub fn actor_ref(&self, address: impl Into<Address>) -> ActorRef {
    ActorRef::new(address.into(), self.downgrade())
  }

  pub fn spawn<A: Actor>(&self, actor: A) -> Result<ActorRef, SpawnError> {
    let address = Address::from(self.inner.registry.next_id());
    self.spawn_at(address, Box::new(actor))
  }

  /// Spawns at a chosen address. Names starting with `$` or `future$` are reserved.
  pub fn spawn_named<A: Actor>(&self, name: &str, actor: A) -> Result<ActorRef, SpawnError> {
    if is_reserved_name(name) {
      return Err(SpawnError::ReservedName(Address::from(name)));
    }
    self.spawn_at(Address::from(name), Box::new(actor))
  }

  fn spawn_at(&self, address: Address, actor: Box<dyn Actor>) -> Result<ActorRef, SpawnError> {
    if self.is_shutdown() {
      return Err(SpawnError::SystemShutdown);
    }
    let mailbox = Mailbox::new(self.inner.dispatcher.clone());
    let self_ref = ActorRef::new(address.clone(), self.downgrade());
    let cell = ActorCell::new(self_ref.clone(), self.downgrade(), actor, mailbox.clone());
    let invoker: Arc<dyn MessageInvoker> = cell.clone();
    mailbox.register_invoker(Arc::downgrade(&invoker));

    // Start sits ahead of any user message before the address becomes visible.
    if mailbox.enqueue_system_message(SystemMessage::Start).is_err() {
      return Err(SpawnError::SystemShutdown);
    }
    self.inner.registry.add_process(address.clone(), cell)?;
    self.inner.stop_record.forget(&address);
    mailbox.schedule();
    tracing::debug!(address = %address, "actor spawned");
    Ok(self_ref)
  }

  /// Stops every process and waits up to `Config::shutdown_timeout` for them to finish.
  ///
  /// Spawning fails with [`SpawnError::SystemShutdown`] once this has been called.
  pub async fn shutdown(&self) -> Result<(), ActorSystemError> {
    if self.inner.is_shutdown.swap(true, Ordering::SeqCst) {
      return Ok(());
    }
    let timeout = self.inner.config.shutdown_timeout;
    let lives = self
      .inner
      .registry
      .processes()
      .into_iter()
      .map(|process| {
        process.stop();
        process.life()
      })
      .collect::<Vec<_>>();
    tracing::debug!(id = %self.inner.id, processes = lives.len(), "actor system shutting down");

    let stopped = tokio::time::timeout(timeout, futures::future::join_all(lives.iter().map(|life| life.result()))).await;
    if stopped.is_err() {
      let remaining = lives.iter().filter(|life| !life.is_completed()).count();
      tracing::warn!(remaining, "actors did not stop in time");
      return Err(ActorSystemError::ShutdownTimeout(timeout, remaining));
    }

    if tokio::time::timeout(timeout, self.inner.dispatcher.shutdown()).await.is_err() {
      tracing::warn!("dispatcher did not stop in time");
      return Err(ActorSystemError::ShutdownTimeout(timeout, 0));
    }
    tracing::debug!(id = %self.inner.id, "actor system stopped");
    Ok(())
  }
}

static_assertions::assert_impl_all!(ActorSystem: Send, Sync);
