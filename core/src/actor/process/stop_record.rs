use std::collections::{HashMap, HashSet, VecDeque};

use parking_lot::Mutex;

use crate::actor::actor::{ActorRef, Address};
use crate::actor::message::Stopped;


#[derive(Debug)]
struct Tombstone {
  stopped: Stopped,
  notified: HashSet<ActorRef>,
}

#[derive(Debug, Default)]
struct StopRecordInner {
  tombstones: HashMap<Address, Tombstone>,
  order: VecDeque<Address>,
}

impl StopRecordInner {
  fn tombstone(&mut self, stopped: &Stopped) -> &mut Tombstone {
    let address = stopped.address();
    if !self.tombstones.contains_key(address) {
      self.order.push_back(address.clone());
    }
    self.tombstones.entry(address.clone()).or_insert_with(|| Tombstone {
      stopped: stopped.clone(),
      notified: HashSet::new(),
    })
  }

  fn evict(&mut self, capacity: usize) {
    while self.order.len() > capacity {
      if let Some(address) = self.order.pop_front() {
        self.tombstones.remove(&address);
      }
    }
  }
}

/// Recently stopped addresses with the watchers already told about each stop.
///
/// Every notice to a watcher goes through here once its process has closed its watcher set, so
/// a watcher hears about a stop once however often it registers. The oldest entries are
/// evicted past `capacity`; after that the address is answered as `StopReason::Unknown`.
#[derive(Debug)]
pub(crate) struct StopRecord {
  capacity: usize,
  inner: Mutex<StopRecordInner>,
}

impl StopRecord {
  pub(crate) fn new(capacity: usize) -> Self {
    Self {
      capacity,
      inner: Mutex::new(StopRecordInner::default()),
    }
  }

  /// Records the stop and returns the watchers that have not been told yet.
  pub(crate) fn record(&self, stopped: &Stopped, watchers: Vec<ActorRef>) -> Vec<ActorRef> {
    let mut inner = self.inner.lock();
    let tombstone = inner.tombstone(stopped);
    tombstone.stopped = stopped.clone();
    let pending = watchers
      .into_iter()
      .filter(|watcher| tombstone.notified.insert(watcher.clone()))
      .collect();
    inner.evict(self.capacity);
    pending
  }

  /// Returns the notice `watcher` should get, or `None` if it already got one.
  ///
  /// `fallback` is recorded when nothing is known about the address yet.
  pub(crate) fn notify(&self, watcher: &ActorRef, fallback: Stopped) -> Option<Stopped> {
    let mut inner = self.inner.lock();
    let tombstone = inner.tombstone(&fallback);
    let notice = tombstone
      .notified
      .insert(watcher.clone())
      .then(|| tombstone.stopped.clone());
    inner.evict(self.capacity);
    notice
  }

  pub(crate) fn stopped(&self, address: &Address) -> Option<Stopped> {
    self
      .inner
      .lock()
      .tombstones
      .get(address)
      .map(|tombstone| tombstone.stopped.clone())
  }

  /// Drops the entry for an address that has been registered again.
  pub(crate) fn forget(&self, address: &Address) {
    let mut inner = self.inner.lock();
    if inner.tombstones.remove(address).is_some() {
      inner.order.retain(|a| a != address);
    }
  }

  #[cfg(test)]
  pub(crate) fn len(&self) -> usize {
    self.inner.lock().tombstones.len()
  }
}
