use std::time::Duration;

use crate::actor::dispatch::DispatcherHandle;
use crate::actor::Config;


#[derive(Debug, Clone)]
pub enum ConfigOption {
  SetWorkerCount(usize),
  SetDispatcherThroughput(usize),
  SetDispatcher(DispatcherHandle),
  SetDeadLetterLogging(bool),
  SetDeadLetterThrottleCount(usize),
  SetDeadLetterThrottleInterval(Duration),
  SetShutdownTimeout(Duration),
  SetStopRecordCapacity(usize),
}

impl ConfigOption {
  pub fn apply(&self, config: &mut Config) {
    match self {
      ConfigOption::SetWorkerCount(count) => {
        config.worker_count = (*count).max(1);
      }
      ConfigOption::SetDispatcherThroughput(throughput) => {
        config.dispatcher_throughput = (*throughput).max(1);
      }
      ConfigOption::SetDispatcher(dispatcher) => {
        config.dispatcher = Some(dispatcher.clone());
      }
      ConfigOption::SetDeadLetterLogging(enabled) => {
        config.dead_letter_logging = *enabled;
      }
      ConfigOption::SetDeadLetterThrottleCount(count) => {
        config.dead_letter_throttle_count = *count;
      }
      ConfigOption::SetDeadLetterThrottleInterval(interval) => {
        config.dead_letter_throttle_interval = *interval;
      }
      ConfigOption::SetShutdownTimeout(timeout) => {
        config.shutdown_timeout = *timeout;
      }
      ConfigOption::SetStopRecordCapacity(capacity) => {
        config.stop_record_capacity = *capacity;
      }
    }
  }

  pub fn with_worker_count(count: usize) -> ConfigOption {
    ConfigOption::SetWorkerCount(count)
  }

  pub fn with_dispatcher_throughput(throughput: usize) -> ConfigOption {
    ConfigOption::SetDispatcherThroughput(throughput)
  }

  pub fn with_dispatcher(dispatcher: DispatcherHandle) -> ConfigOption {
    ConfigOption::SetDispatcher(dispatcher)
  }

  pub fn with_dead_letter_logging(enabled: bool) -> ConfigOption {
    ConfigOption::SetDeadLetterLogging(enabled)
  }

  pub fn with_dead_letter_throttle_count(count: usize) -> ConfigOption {
    ConfigOption::SetDeadLetterThrottleCount(count)
  }

  pub fn with_dead_letter_throttle_interval(interval: Duration) -> ConfigOption {
    ConfigOption::SetDeadLetterThrottleInterval(interval)
  }

  pub fn with_shutdown_timeout(timeout: Duration) -> ConfigOption {
    ConfigOption::SetShutdownTimeout(timeout)
  }

  pub fn with_stop_record_capacity(capacity: usize) -> ConfigOption {
    ConfigOption::SetStopRecordCapacity(capacity)
  }
}
