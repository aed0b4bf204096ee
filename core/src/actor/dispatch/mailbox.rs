use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use spider_actor_utils_rs::collections::{MpscUnboundedQueue, QueueError, QueueRw};
use thiserror::Error;

use crate::actor::dispatch::{Dispatcher, DispatcherHandle, MessageInvoker, Runnable};
use crate::actor::message::{MessageEnvelope, SystemMessage};


#[derive(Debug, Error)]
pub(crate) enum MailboxError {
  #[error("mailbox is closed")]
  Closed(MessageEnvelope),
  #[error("mailbox is disconnected")]
  Disconnected,
}

/// Per-actor pair of FIFO queues plus the flag that keeps at most one turn in flight.
///
/// Producers bump the pending counter before offering, and the consumer re-reads the counters
/// after clearing `scheduler_status`, so a message posted while a turn is ending always gets a
/// new turn.
#[derive(Debug)]
pub(crate) struct Mailbox {
  user_mailbox: MpscUnboundedQueue<MessageEnvelope>,
  system_mailbox: MpscUnboundedQueue<SystemMessage>,
  scheduler_status: AtomicBool,
  user_messages_count: AtomicUsize,
  system_messages_count: AtomicUsize,
  closed: AtomicBool,
  invoker: OnceLock<Weak<dyn MessageInvoker>>,
  dispatcher: DispatcherHandle,
}

fn decrement(counter: &AtomicUsize) {
  let _ = counter.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| Some(c.saturating_sub(1)));
}

impl Mailbox {
  pub(crate) fn new(dispatcher: DispatcherHandle) -> Arc<Self> {
    Arc::new(Self {
      user_mailbox: MpscUnboundedQueue::new(),
      system_mailbox: MpscUnboundedQueue::new(),
      scheduler_status: AtomicBool::new(false),
      user_messages_count: AtomicUsize::new(0),
      system_messages_count: AtomicUsize::new(0),
      closed: AtomicBool::new(false),
      invoker: OnceLock::new(),
      dispatcher,
    })
  }

  /// Sets the receiver. Only the first registration takes effect.
  pub(crate) fn register_invoker(&self, invoker: Weak<dyn MessageInvoker>) {
    if self.invoker.set(invoker).is_err() {
      tracing::warn!("mailbox invoker already registered");
    }
  }

  pub(crate) fn is_closed(&self) -> bool {
    self.closed.load(Ordering::SeqCst)
  }

  pub(crate) fn user_messages_count(&self) -> usize {
    self.user_messages_count.load(Ordering::SeqCst)
  }

  pub(crate) fn system_messages_count(&self) -> usize {
    self.system_messages_count.load(Ordering::SeqCst)
  }

  pub(crate) fn post_user_message(self: &Arc<Self>, envelope: MessageEnvelope) -> Result<(), MailboxError> {
    if self.is_closed() {
      return Err(MailboxError::Closed(envelope));
    }
    self.user_messages_count.fetch_add(1, Ordering::SeqCst);
    if let Err(error) = self.user_mailbox.offer(envelope) {
      decrement(&self.user_messages_count);
      return match error.into_element() {
        Some(envelope) => Err(MailboxError::Closed(envelope)),
        None => Err(MailboxError::Disconnected),
      };
    }
    self.schedule();
    Ok(())
  }

  /// Queues a system message without scheduling a turn.
  pub(crate) fn enqueue_system_message(&self, message: SystemMessage) -> Result<(), QueueError<SystemMessage>> {
    if self.is_closed() {
      return Err(QueueError::Closed(message));
    }
    self.system_messages_count.fetch_add(1, Ordering::SeqCst);
    self.system_mailbox.offer(message).inspect_err(|_| {
      decrement(&self.system_messages_count);
    })
  }

  pub(crate) fn post_system_message(self: &Arc<Self>, message: SystemMessage) -> Result<(), QueueError<SystemMessage>> {
    self.enqueue_system_message(message)?;
    self.schedule();
    Ok(())
  }

  /// Hands a turn to the dispatcher unless one is already queued or running.
  pub(crate) fn schedule(self: &Arc<Self>) {
    if self
      .scheduler_status
      .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
      .is_ok()
    {
      self.dispatch_turn();
    }
  }

  fn dispatch_turn(self: &Arc<Self>) {
    let mailbox = Arc::clone(self);
    self.dispatcher.schedule(Runnable::new(move || async move {
      mailbox.process_messages().await;
    }));
  }

  fn has_pending_messages(&self) -> bool {
    self.system_messages_count() > 0 || (!self.is_closed() && self.user_messages_count() > 0)
  }

  async fn process_messages(self: Arc<Self>) {
    self.run().await;
    self.scheduler_status.store(false, Ordering::SeqCst);
    if self.has_pending_messages()
      && self
        .scheduler_status
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_ok()
    {
      // Back of the ready queue, behind every other runnable mailbox.
      self.dispatch_turn();
    }
  }

  async fn run(&self) {
    let Some(invoker) = self.invoker.get().and_then(Weak::upgrade) else {
      return;
    };
    let throughput = self.dispatcher.throughput().max(1);
    let mut processed = 0;

    while processed < throughput {
      if let Ok(Some(message)) = self.system_mailbox.poll() {
        decrement(&self.system_messages_count);
        invoker.invoke_system_message(message).await;
        processed += 1;
        continue;
      }
      if self.is_closed() {
        break;
      }
      match self.user_mailbox.poll() {
        Ok(Some(envelope)) => {
          decrement(&self.user_messages_count);
          invoker.invoke_user_message(envelope).await;
          processed += 1;
        }
        Ok(None) | Err(_) => break,
      }
    }
  }

  /// Rejects further posts and returns the user messages that were never delivered.
  pub(crate) fn close(&self) -> Vec<MessageEnvelope> {
    self.closed.store(true, Ordering::SeqCst);
    let undelivered = self.user_mailbox.close();
    self.user_messages_count.store(0, Ordering::SeqCst);
    let _ = self.system_mailbox.close();
    self.system_messages_count.store(0, Ordering::SeqCst);
    undelivered
  }
}
