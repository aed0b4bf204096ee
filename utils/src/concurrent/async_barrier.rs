use std::sync::Arc;

use tokio::sync::{Mutex, Notify};


/// Releases a fixed number of tasks together, once.
///
/// Used to start concurrent producers at the same moment. The last task to arrive is the leader.
#[derive(Debug, Clone)]
pub struct AsyncBarrier {
  parties: usize,
  waiting: Arc<Mutex<usize>>,
  released: Arc<Notify>,
}

impl AsyncBarrier {
  pub fn new(parties: usize) -> Self {
    AsyncBarrier {
      parties,
      waiting: Arc::new(Mutex::new(parties)),
      released: Arc::new(Notify::new()),
    }
  }

  pub fn parties(&self) -> usize {
    self.parties
  }

  /// Waits for the other parties. Returns `true` for the task that released the rest.
  pub async fn wait(&self) -> bool {
    let mut waiting = self.waiting.lock().await;
    *waiting = waiting.saturating_sub(1);
    if *waiting == 0 {
      self.released.notify_waiters();
      return true;
    }
    // Registered before the lock is released so the leader's notify cannot be missed.
    let released = self.released.notified();
    tokio::pin!(released);
    released.as_mut().enable();
    drop(waiting);
    released.await;
    false
  }
}
