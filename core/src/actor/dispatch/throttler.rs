use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::time::{interval, Duration, MissedTickBehavior};


#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Valve {
  Open,
  Closing,
  Closed,
}

/// Counts events per period; callers stop reporting once the valve closes.
#[derive(Debug)]
pub struct Throttle {
  current_events: AtomicUsize,
  max_events_in_period: usize,
}

impl Throttle {
  /// Creates a throttle whose counter is reset every `period` by a task on `runtime`.
  ///
  /// `throttled_callback` receives the number of events suppressed during the period that just
  /// ended. The reset task ends when the throttle is dropped.
  pub fn new<F>(runtime: &Handle, max_events_in_period: usize, period: Duration, throttled_callback: F) -> Arc<Self>
  where
    F: Fn(usize) + Send + 'static, {
    let throttle = Arc::new(Self {
      current_events: AtomicUsize::new(0),
      max_events_in_period,
    });

    let weak = Arc::downgrade(&throttle);
    let period = period.max(Duration::from_millis(1));
    runtime.spawn(async move {
      let mut interval = interval(period);
      interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
      interval.tick().await;
      loop {
        interval.tick().await;
        let Some(throttle) = weak.upgrade() else {
          break;
        };
        let times_called = throttle.current_events.swap(0, Ordering::SeqCst);
        if times_called > max_events_in_period {
          throttled_callback(times_called - max_events_in_period);
        }
      }
    });

    throttle
  }

  pub fn should_throttle(&self) -> Valve {
    let tries = self.current_events.fetch_add(1, Ordering::SeqCst) + 1;
    if tries == self.max_events_in_period {
      Valve::Closing
    } else if tries > self.max_events_in_period {
      Valve::Closed
    } else {
      Valve::Open
    }
  }
}
