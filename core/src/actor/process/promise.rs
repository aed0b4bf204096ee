use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use thiserror::Error;
use tokio::sync::Notify;


#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromiseError {
  #[error("promise not completed within {0:?}")]
  Timeout(Duration),
  #[error("promise cancelled")]
  Cancelled,
}

static_assertions::assert_impl_all!(PromiseError: Send, Sync);

#[derive(Debug)]
enum PromiseState<T> {
  Pending,
  Fulfilled(T),
  Cancelled,
}

#[derive(Debug)]
struct PromiseInner<T> {
  state: Mutex<PromiseState<T>>,
  notify: Notify,
  condvar: Condvar,
}

/// Single-assignment value that any number of tasks or threads can wait on.
#[derive(Debug)]
pub struct Promise<T> {
  inner: Arc<PromiseInner<T>>,
}

impl<T> Clone for Promise<T> {
  fn clone(&self) -> Self {
    Self {
      inner: Arc::clone(&self.inner),
    }
  }
}

impl<T: Clone + Send + 'static> Default for Promise<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: Clone + Send + 'static> Promise<T> {
  pub fn new() -> Self {
    Self {
      inner: Arc::new(PromiseInner {
        state: Mutex::new(PromiseState::Pending),
        notify: Notify::new(),
        condvar: Condvar::new(),
      }),
    }
  }

  pub fn fulfilled(value: T) -> Self {
    let promise = Self::new();
    let _ = promise.fulfill(value);
    promise
  }

  fn wake_waiters(&self) {
    self.inner.notify.notify_waiters();
    self.inner.condvar.notify_all();
  }

  /// Stores `value` if the promise is still pending; otherwise hands it back.
  pub fn fulfill(&self, value: T) -> Result<(), T> {
    {
      let mut state = self.inner.state.lock();
      if !matches!(*state, PromiseState::Pending) {
        return Err(value);
      }
      *state = PromiseState::Fulfilled(value);
    }
    self.wake_waiters();
    Ok(())
  }

  /// Moves a pending promise to the cancelled state. Returns `false` if it was already completed.
  pub fn cancel(&self) -> bool {
    {
      let mut state = self.inner.state.lock();
      if !matches!(*state, PromiseState::Pending) {
        return false;
      }
      *state = PromiseState::Cancelled;
    }
    self.wake_waiters();
    true
  }

  fn current(&self) -> Option<Result<T, PromiseError>> {
    match &*self.inner.state.lock() {
      PromiseState::Pending => None,
      PromiseState::Fulfilled(value) => Some(Ok(value.clone())),
      PromiseState::Cancelled => Some(Err(PromiseError::Cancelled)),
    }
  }

  pub fn try_get(&self) -> Option<T> {
    self.current().and_then(Result::ok)
  }

  pub fn is_fulfilled(&self) -> bool {
    matches!(*self.inner.state.lock(), PromiseState::Fulfilled(_))
  }

  pub fn is_cancelled(&self) -> bool {
    matches!(*self.inner.state.lock(), PromiseState::Cancelled)
  }

  pub fn is_completed(&self) -> bool {
    !matches!(*self.inner.state.lock(), PromiseState::Pending)
  }

  /// Waits without a deadline.
  pub async fn result(&self) -> Result<T, PromiseError> {
    loop {
      let notified = self.inner.notify.notified();
      tokio::pin!(notified);
      notified.as_mut().enable();
      if let Some(result) = self.current() {
        return result;
      }
      notified.await;
    }
  }

  /// Waits up to `timeout`. A timed-out wait leaves the promise untouched.
  pub async fn wait(&self, timeout: Duration) -> Result<T, PromiseError> {
    match tokio::time::timeout(timeout, self.result()).await {
      Ok(result) => result,
      Err(_) => Err(PromiseError::Timeout(timeout)),
    }
  }

  /// Parks the calling OS thread for up to `timeout`.
  pub fn wait_blocking(&self, timeout: Duration) -> Result<T, PromiseError> {
    let deadline = Instant::now().checked_add(timeout);
    let mut state = self.inner.state.lock();
    loop {
      match &*state {
        PromiseState::Fulfilled(value) => return Ok(value.clone()),
        PromiseState::Cancelled => return Err(PromiseError::Cancelled),
        PromiseState::Pending => {}
      }
      match deadline {
        Some(deadline) => {
          if self.inner.condvar.wait_until(&mut state, deadline).timed_out() {
            return match &*state {
              PromiseState::Fulfilled(value) => Ok(value.clone()),
              PromiseState::Cancelled => Err(PromiseError::Cancelled),
              PromiseState::Pending => Err(PromiseError::Timeout(timeout)),
            };
          }
        }
        None => self.inner.condvar.wait(&mut state),
      }
    }
  }

  pub fn read_only(&self) -> ReadOnlyPromise<T> {
    ReadOnlyPromise { promise: self.clone() }
  }
}

/// The waiting half of a [`Promise`].
#[derive(Debug, Clone)]
pub struct ReadOnlyPromise<T> {
  promise: Promise<T>,
}

impl<T: Clone + Send + 'static> ReadOnlyPromise<T> {
  pub fn try_get(&self) -> Option<T> {
    self.promise.try_get()
  }

  pub fn is_completed(&self) -> bool {
    self.promise.is_completed()
  }

  pub async fn result(&self) -> Result<T, PromiseError> {
    self.promise.result().await
  }

  pub async fn wait(&self, timeout: Duration) -> Result<T, PromiseError> {
    self.promise.wait(timeout).await
  }

  pub fn wait_blocking(&self, timeout: Duration) -> Result<T, PromiseError> {
    self.promise.wait_blocking(timeout)
  }
}
