use parking_lot::Mutex;

use crate::actor::actor::ActorRef;
use crate::actor::message::Stopped;


#[derive(Debug, Default)]
struct WatcherSetInner {
  watchers: Vec<ActorRef>,
  terminated: Option<Stopped>,
}

/// References to notify when a process stops.
///
/// Once closed, `add` hands back the termination notice so the caller can deliver it directly;
/// every watcher is therefore notified exactly once whichever side of the stop it registered on.
#[derive(Debug, Default)]
pub(crate) struct WatcherSet {
  inner: Mutex<WatcherSetInner>,
}

impl WatcherSet {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  pub(crate) fn add(&self, watcher: ActorRef) -> Result<(), Stopped> {
    let mut inner = self.inner.lock();
    if let Some(stopped) = &inner.terminated {
      return Err(stopped.clone());
    }
    if !inner.watchers.contains(&watcher) {
      inner.watchers.push(watcher);
    }
    Ok(())
  }

  pub(crate) fn remove(&self, watcher: &ActorRef) -> bool {
    let mut inner = self.inner.lock();
    let before = inner.watchers.len();
    inner.watchers.retain(|w| w != watcher);
    inner.watchers.len() != before
  }

  #[cfg(test)]
  pub(crate) fn len(&self) -> usize {
    self.inner.lock().watchers.len()
  }

  #[cfg(test)]
  pub(crate) fn is_closed(&self) -> bool {
    self.inner.lock().terminated.is_some()
  }

  /// Marks the set terminated and returns the watchers registered so far.
  pub(crate) fn close(&self, stopped: Stopped) -> Vec<ActorRef> {
    let mut inner = self.inner.lock();
    inner.terminated = Some(stopped);
    std::mem::take(&mut inner.watchers)
  }
}
