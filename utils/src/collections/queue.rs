use std::cmp::Ordering;
use std::fmt::Debug;
use std::ops::Add;

use thiserror::Error;

mod mpsc_unbounded_queue;

pub use self::mpsc_unbounded_queue::*;

/// An error that occurs when a queue operation fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError<E> {
  #[error("Failed to offer an element: {0:?}")]
  OfferError(E),
  #[error("Queue is closed: {0:?}")]
  Closed(E),
  #[error("Queue is disconnected")]
  Disconnected,
}

impl<E> QueueError<E> {
  /// Returns the element that could not be enqueued, if any.
  pub fn into_element(self) -> Option<E> {
    match self {
      QueueError::OfferError(e) | QueueError::Closed(e) => Some(e),
      QueueError::Disconnected => None,
    }
  }
}

/// The size of the queue.
#[derive(Debug, Clone, Copy)]
pub enum QueueSize {
  /// The queue has no capacity limit.
  Limitless,
  /// The queue holds (or can hold) the given number of elements.
  Limited(usize),
}

impl QueueSize {
  pub fn is_limitless(&self) -> bool {
    matches!(self, QueueSize::Limitless)
  }

  /// `None` when limitless.
  pub fn to_option(&self) -> Option<usize> {
    match self {
      QueueSize::Limitless => None,
      QueueSize::Limited(c) => Some(*c),
    }
  }

  /// `usize::MAX` when limitless.
  pub fn to_usize(&self) -> usize {
    match self {
      QueueSize::Limitless => usize::MAX,
      QueueSize::Limited(c) => *c,
    }
  }
}

impl Add for QueueSize {
  type Output = QueueSize;

  fn add(self, other: QueueSize) -> QueueSize {
    match (self, other) {
      (QueueSize::Limitless, _) | (_, QueueSize::Limitless) => QueueSize::Limitless,
      (QueueSize::Limited(a), QueueSize::Limited(b)) => QueueSize::Limited(a + b),
    }
  }
}

impl PartialEq<Self> for QueueSize {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (QueueSize::Limitless, QueueSize::Limitless) => true,
      (QueueSize::Limited(l), QueueSize::Limited(r)) => l == r,
      _ => false,
    }
  }
}

impl PartialOrd<Self> for QueueSize {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    match (self, other) {
      (QueueSize::Limitless, QueueSize::Limitless) => Some(Ordering::Equal),
      (QueueSize::Limitless, _) => Some(Ordering::Greater),
      (_, QueueSize::Limitless) => Some(Ordering::Less),
      (QueueSize::Limited(l), QueueSize::Limited(r)) => l.partial_cmp(r),
    }
  }
}

/// Size information shared by every queue.
pub trait QueueBase<E>: Debug + Send + Sync {
  /// Returns the number of queued elements.
  fn len(&self) -> QueueSize;

  /// Returns the capacity; `QueueSize::Limitless` for unbounded queues.
  fn capacity(&self) -> QueueSize;

  fn is_empty(&self) -> bool {
    self.len() == QueueSize::Limited(0)
  }

  fn non_empty(&self) -> bool {
    !self.is_empty()
  }
}

/// Read/write operations through a shared reference.
///
/// Implementations synchronize internally so that any number of threads may call [`QueueRw::offer`].
/// [`QueueRw::poll`] is meant for a single consumer at a time.
pub trait QueueRw<E>: QueueBase<E> {
  /// Inserts `element` without blocking.
  ///
  /// # Returns
  ///
  /// * `Ok(())` - the element was enqueued
  /// * `Err(QueueError::Closed(element))` - the queue no longer accepts elements
  fn offer(&self, element: E) -> Result<(), QueueError<E>>;

  /// Removes the head of the queue.
  ///
  /// # Returns
  ///
  /// * `Ok(Some(element))` - the head element
  /// * `Ok(None)` - the queue is empty
  /// * `Err(QueueError::Disconnected)` - the queue was closed
  fn poll(&self) -> Result<Option<E>, QueueError<E>>;

  /// Closes the queue and discards anything still buffered.
  fn clean_up(&self);
}
