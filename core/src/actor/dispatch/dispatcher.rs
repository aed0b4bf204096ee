use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use tokio::runtime::{Handle, TryCurrentError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::actor::actor::ActorError;

#[cfg(test)]
mod tests;

pub struct Runnable(Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send + 'static>);

impl Debug for Runnable {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str("Runnable")
  }
}

impl Runnable {
  pub fn new<F, Fut>(f: F) -> Self
  where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static, {
    Self(Box::new(move || Box::pin(f()) as BoxFuture<'static, ()>))
  }

  pub async fn run(self) {
    (self.0)().await;
  }
}

/// Executes mailbox turns.
#[async_trait]
pub trait Dispatcher: Debug + Send + Sync + 'static {
  /// Queues `runner` for execution. Must not block.
  fn schedule(&self, runner: Runnable);

  /// Maximum number of messages a mailbox processes per turn.
  fn throughput(&self) -> usize;

  /// Stops accepting work and waits for the work already accepted.
  async fn shutdown(&self) {}
}

#[derive(Debug, Clone)]
pub struct DispatcherHandle(Arc<dyn Dispatcher>);

impl DispatcherHandle {
  pub fn new_arc(dispatcher: Arc<dyn Dispatcher>) -> Self {
    Self(dispatcher)
  }

  pub fn new(dispatcher: impl Dispatcher + 'static) -> Self {
    Self(Arc::new(dispatcher))
  }
}

#[async_trait]
impl Dispatcher for DispatcherHandle {
  fn schedule(&self, runner: Runnable) {
    self.0.schedule(runner);
  }

  fn throughput(&self) -> usize {
    self.0.throughput()
  }

  async fn shutdown(&self) {
    self.0.shutdown().await;
  }
}

// --- WorkerPoolDispatcher implementation

#[derive(Debug)]
struct WorkerPoolInner {
  sender: Mutex<Option<mpsc::UnboundedSender<Runnable>>>,
  workers: Mutex<Vec<JoinHandle<()>>>,
  worker_count: usize,
  throughput: usize,
}

/// A fixed number of tokio tasks pulling runnables from one shared ready queue.
///
/// At most `worker_count` runnables execute at any moment. A panicking runnable is logged and
/// the worker moves on to the next one.
#[derive(Debug, Clone)]
pub struct WorkerPoolDispatcher {
  inner: Arc<WorkerPoolInner>,
}

impl WorkerPoolDispatcher {
  pub fn new(runtime: &Handle, worker_count: usize, throughput: usize) -> Self {
    let worker_count = worker_count.max(1);
    let (sender, receiver) = mpsc::unbounded_channel::<Runnable>();
    let receiver = Arc::new(tokio::sync::Mutex::new(receiver));
    let workers = (0..worker_count)
      .map(|worker_id| {
        let receiver = receiver.clone();
        runtime.spawn(async move {
          loop {
            let runner = {
              let mut receiver_mg = receiver.lock().await;
              receiver_mg.recv().await
            };
            let Some(runner) = runner else {
              break;
            };
            if let Err(payload) = AssertUnwindSafe(runner.run()).catch_unwind().await {
              let error = ActorError::from_panic(payload);
              tracing::error!(worker_id, error = %error, "runnable panicked");
            }
          }
          tracing::debug!(worker_id, "worker stopped");
        })
      })
      .collect::<Vec<_>>();
    Self {
      inner: Arc::new(WorkerPoolInner {
        sender: Mutex::new(Some(sender)),
        workers: Mutex::new(workers),
        worker_count,
        throughput: throughput.max(1),
      }),
    }
  }

  pub fn worker_count(&self) -> usize {
    self.inner.worker_count
  }
}

#[async_trait]
impl Dispatcher for WorkerPoolDispatcher {
  fn schedule(&self, runner: Runnable) {
    let sender_mg = self.inner.sender.lock();
    match sender_mg.as_ref() {
      Some(sender) => {
        if sender.send(runner).is_err() {
          tracing::warn!("all workers are gone, runnable dropped");
        }
      }
      None => tracing::warn!("dispatcher is shut down, runnable dropped"),
    }
  }

  fn throughput(&self) -> usize {
    self.inner.throughput
  }

  async fn shutdown(&self) {
    drop(self.inner.sender.lock().take());
    let workers = std::mem::take(&mut *self.inner.workers.lock());
    for result in futures::future::join_all(workers).await {
      if let Err(error) = result {
        tracing::warn!(error = %error, "worker ended abnormally");
      }
    }
  }
}

// --- TokioRuntimeContextDispatcher implementation

/// Spawns one tokio task per mailbox turn on the captured runtime.
#[derive(Debug, Clone)]
pub struct TokioRuntimeContextDispatcher {
  runtime: Handle,
  throughput: usize,
}

impl TokioRuntimeContextDispatcher {
  pub fn new() -> Result<Self, TryCurrentError> {
    Ok(Self::with_handle(Handle::try_current()?))
  }

  pub fn with_handle(runtime: Handle) -> Self {
    Self { runtime, throughput: 1 }
  }

  pub fn with_throughput(mut self, throughput: usize) -> Self {
    self.throughput = throughput.max(1);
    self
  }
}

#[async_trait]
impl Dispatcher for TokioRuntimeContextDispatcher {
  fn schedule(&self, runner: Runnable) {
    self.runtime.spawn(runner.run());
  }

  fn throughput(&self) -> usize {
    self.throughput
  }
}
