use crate::actor::actor::{Actor, ActorRef, Address};
use crate::actor::actor_system::{ActorSystem, SpawnError, WeakActorSystem};

/// What an actor knows about itself while the runtime is calling into it.
#[derive(Debug, Clone)]
pub struct Context {
  self_ref: ActorRef,
  system: WeakActorSystem,
}

impl Context {
  pub(crate) fn new(self_ref: ActorRef, system: WeakActorSystem) -> Self {
    Self { self_ref, system }
  }

  pub fn self_ref(&self) -> &ActorRef {
    &self.self_ref
  }

  pub fn address(&self) -> &Address {
    self.self_ref.address()
  }

  /// `None` once the actor system has been dropped.
  pub fn system(&self) -> Option<ActorSystem> {
    self.system.upgrade()
  }

  pub fn spawn<A: Actor>(&self, actor: A) -> Result<ActorRef, SpawnError> {
    self.system().ok_or(SpawnError::SystemShutdown)?.spawn(actor)
  }

  pub fn spawn_named<A: Actor>(&self, name: &str, actor: A) -> Result<ActorRef, SpawnError> {
    self.system().ok_or(SpawnError::SystemShutdown)?.spawn_named(name, actor)
  }

  /// Asks for a [`crate::actor::message::Stopped`] message when `target` stops.
  pub fn watch(&self, target: &ActorRef) {
    target.add_watcher(&self.self_ref);
  }

  pub fn unwatch(&self, target: &ActorRef) {
    target.remove_watcher(&self.self_ref);
  }
}
