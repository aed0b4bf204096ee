use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::actor::actor::Address;
use crate::actor::dispatch::throttler::{Throttle, Valve};
use crate::actor::message::MessageEnvelope;

/// Final destination of undeliverable messages: counts them and logs them, rate limited.
#[derive(Debug)]
pub(crate) struct DeadLetterProcess {
  count: AtomicU64,
  logging: bool,
  throttle: Arc<Throttle>,
}

impl DeadLetterProcess {
  pub(crate) fn new(runtime: &Handle, logging: bool, throttle_count: usize, throttle_interval: Duration) -> Self {
    let throttle = Throttle::new(runtime, throttle_count, throttle_interval, |dropped| {
      tracing::info!(dropped, "dead letter logging throttled");
    });
    Self {
      count: AtomicU64::new(0),
      logging,
      throttle,
    }
  }

  pub(crate) fn count(&self) -> u64 {
    self.count.load(Ordering::SeqCst)
  }

  pub(crate) fn send(&self, target: &Address, envelope: MessageEnvelope) {
    self.count.fetch_add(1, Ordering::SeqCst);
    if !self.logging {
      return;
    }
    match self.throttle.should_throttle() {
      Valve::Open => {
        tracing::info!(
          target_address = %target,
          message_type = %envelope.message().get_type_name(),
          reply_to = ?envelope.reply_to().map(|r| r.address().clone()),
          "dead letter"
        );
      }
      Valve::Closing => {
        tracing::info!(
          target_address = %target,
          message_type = %envelope.message().get_type_name(),
          "dead letter; further dead letters in this period are throttled"
        );
      }
      Valve::Closed => {}
    }
  }
}
