use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use crate::collections::{Element, QueueBase, QueueError, QueueRw, QueueSize};


struct MpscUnboundedQueueInner<E> {
  receiver: Mutex<mpsc::UnboundedReceiver<E>>,
  count: AtomicUsize,
  is_closed: AtomicBool,
}

/// Unbounded multi-producer/single-consumer FIFO queue.
///
/// `offer` only touches the channel's lock-free sender and two atomics, so producers never wait on
/// each other or on the consumer. `poll` takes a mutex around the receiver, which is uncontended as
/// long as a single consumer drains the queue.
#[derive(Clone)]
pub struct MpscUnboundedQueue<E> {
  sender: mpsc::UnboundedSender<E>,
  inner: Arc<MpscUnboundedQueueInner<E>>,
}

impl<E> Debug for MpscUnboundedQueue<E> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MpscUnboundedQueue")
      .field("count", &self.inner.count.load(Ordering::SeqCst))
      .field("is_closed", &self.inner.is_closed.load(Ordering::SeqCst))
      .finish()
  }
}

impl<E> Default for MpscUnboundedQueue<E> {
  fn default() -> Self {
    Self::new()
  }
}

impl<E> MpscUnboundedQueue<E> {
  pub fn new() -> Self {
    let (sender, receiver) = mpsc::unbounded_channel();
    Self {
      sender,
      inner: Arc::new(MpscUnboundedQueueInner {
        receiver: Mutex::new(receiver),
        count: AtomicUsize::new(0),
        is_closed: AtomicBool::new(false),
      }),
    }
  }

  pub fn is_closed(&self) -> bool {
    self.inner.is_closed.load(Ordering::SeqCst)
  }

  /// Closes the queue and returns the elements that were still buffered, in FIFO order.
  ///
  /// Offers racing with the close either fail with `QueueError::Closed` or land in the returned vector.
  pub fn close(&self) -> Vec<E> {
    self.inner.is_closed.store(true, Ordering::SeqCst);
    let mut receiver = self.inner.receiver.lock();
    receiver.close();
    let mut drained = Vec::new();
    while let Ok(element) = receiver.try_recv() {
      drained.push(element);
    }
    self.inner.count.store(0, Ordering::SeqCst);
    tracing::trace!(drained = drained.len(), "MpscUnboundedQueue closed");
    drained
  }
}

impl<E: Element> QueueBase<E> for MpscUnboundedQueue<E> {
  fn len(&self) -> QueueSize {
    QueueSize::Limited(self.inner.count.load(Ordering::SeqCst))
  }

  fn capacity(&self) -> QueueSize {
    QueueSize::Limitless
  }
}

impl<E: Element> QueueRw<E> for MpscUnboundedQueue<E> {
  fn offer(&self, element: E) -> Result<(), QueueError<E>> {
    if self.is_closed() {
      return Err(QueueError::Closed(element));
    }
    // Count first so a concurrent poll never observes an element it has not been told about.
    self.inner.count.fetch_add(1, Ordering::SeqCst);
    match self.sender.send(element) {
      Ok(()) => Ok(()),
      Err(mpsc::error::SendError(element)) => {
        self.inner.count.fetch_sub(1, Ordering::SeqCst);
        Err(QueueError::Closed(element))
      }
    }
  }

  fn poll(&self) -> Result<Option<E>, QueueError<E>> {
    if self.is_closed() {
      return Err(QueueError::Disconnected);
    }
    let mut receiver = self.inner.receiver.lock();
    match receiver.try_recv() {
      Ok(element) => {
        let _ = self
          .inner
          .count
          .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| Some(c.saturating_sub(1)));
        Ok(Some(element))
      }
      Err(TryRecvError::Empty) => Ok(None),
      Err(TryRecvError::Disconnected) => Err(QueueError::Disconnected),
    }
  }

  fn clean_up(&self) {
    let _ = self.close();
  }
}
