use std::fmt::Debug;
use std::sync::Arc;

use crate::actor::actor::ActorRef;
use crate::actor::message::{MessageEnvelope, Stopped};

mod dead_letter_process;
mod process_registry;
mod promise;
mod reply_process;
mod stop_record;

pub(crate) use self::{dead_letter_process::*, process_registry::*, reply_process::*, stop_record::*};
pub use self::promise::*;

/// Anything an [`ActorRef`] can resolve to.
pub(crate) trait Process: Debug + Send + Sync + 'static {
  /// Hands the envelope back when the process no longer accepts messages.
  fn send_user_message(&self, envelope: MessageEnvelope) -> Result<(), MessageEnvelope>;

  fn stop(&self);

  /// Hands back the termination notice when the process has already stopped.
  fn add_watcher(&self, watcher: ActorRef) -> Result<(), Stopped>;

  fn remove_watcher(&self, watcher: &ActorRef);

  fn life(&self) -> ReadOnlyPromise<Stopped>;

  fn is_stopped(&self) -> bool;
}

pub(crate) type ProcessHandle = Arc<dyn Process>;
