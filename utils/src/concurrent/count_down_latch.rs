use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_condvar::Condvar;


/// Opens once `count_down` has been called as many times as the initial count.
///
/// Tests use it to wait for a known number of runnables or messages without polling.
#[derive(Clone)]
pub struct CountDownLatch {
  remaining: Arc<Mutex<usize>>,
  opened: Arc<Condvar>,
}

impl Debug for CountDownLatch {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CountDownLatch").finish_non_exhaustive()
  }
}

impl Default for CountDownLatch {
  fn default() -> Self {
    Self::new(0)
  }
}

impl CountDownLatch {
  pub fn new(count: usize) -> Self {
    Self {
      remaining: Arc::new(Mutex::new(count)),
      opened: Arc::new(Condvar::new()),
    }
  }

  /// Extra calls after the latch opened are ignored.
  pub async fn count_down(&self) {
    let mut remaining = self.remaining.lock().await;
    if *remaining == 0 {
      return;
    }
    *remaining -= 1;
    if *remaining == 0 {
      self.opened.notify_all();
    }
  }

  pub async fn count(&self) -> usize {
    *self.remaining.lock().await
  }

  pub async fn wait(&self) {
    let mut remaining = self.remaining.lock().await;
    while *remaining > 0 {
      remaining = self.opened.wait(remaining).await;
    }
  }

  /// Returns `false` if the latch is still closed after `timeout`.
  pub async fn wait_timeout(&self, timeout: Duration) -> bool {
    tokio::time::timeout(timeout, self.wait()).await.is_ok()
  }
}
