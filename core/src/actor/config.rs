use std::time::Duration;

use crate::actor::dispatch::DispatcherHandle;
use crate::actor::ConfigOption;

#[derive(Debug, Clone)]
pub struct Config {
  /// Workers of the default worker-pool dispatcher.
  pub worker_count: usize,
  /// Messages a mailbox processes per turn before yielding its worker.
  pub dispatcher_throughput: usize,
  /// Replaces the default worker-pool dispatcher when set.
  pub dispatcher: Option<DispatcherHandle>,
  pub dead_letter_logging: bool,
  pub dead_letter_throttle_count: usize,
  pub dead_letter_throttle_interval: Duration,
  /// Upper bound for `ActorSystem::shutdown`.
  pub shutdown_timeout: Duration,
  /// Stopped addresses remembered so late watchers get one notice with the real reason.
  pub stop_record_capacity: usize,
}

impl Default for Config {
  fn default() -> Self {
    let worker_count = std::thread::available_parallelism()
      .map(|n| n.get())
      .unwrap_or(2)
      .max(2);
    Config {
      worker_count,
      dispatcher_throughput: 1,
      dispatcher: None,
      dead_letter_logging: true,
      dead_letter_throttle_count: 10,
      dead_letter_throttle_interval: Duration::from_secs(1),
      shutdown_timeout: Duration::from_secs(5),
      stop_record_capacity: 1024,
    }
  }
}

impl Config {
  pub fn from(options: impl IntoIterator<Item = ConfigOption>) -> Config {
    let mut config = Config::default();
    for option in options {
      option.apply(&mut config);
    }
    config
  }
}
