use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rstest::rstest;
use spider_actor_utils_rs::concurrent::CountDownLatch;
use tokio::runtime::Handle;

use crate::actor::dispatch::{Dispatcher, DispatcherHandle, Runnable, TokioRuntimeContextDispatcher, WorkerPoolDispatcher};

#[rstest]
#[case(1)]
#[case(2)]
#[case(4)]
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_worker_pool_bounds_concurrency(#[case] worker_count: usize) {
  let dispatcher = WorkerPoolDispatcher::new(&Handle::current(), worker_count, 1);
  let running = Arc::new(AtomicUsize::new(0));
  let peak = Arc::new(AtomicUsize::new(0));
  let latch = CountDownLatch::new(16);

  for _ in 0..16 {
    let running = running.clone();
    let peak = peak.clone();
    let latch = latch.clone();
    dispatcher.schedule(Runnable::new(move || async move {
      let now = running.fetch_add(1, Ordering::SeqCst) + 1;
      peak.fetch_max(now, Ordering::SeqCst);
      tokio::time::sleep(Duration::from_millis(10)).await;
      running.fetch_sub(1, Ordering::SeqCst);
      latch.count_down().await;
    }));
  }

  assert!(latch.wait_timeout(Duration::from_secs(5)).await, "all runnables should complete");
  assert!(peak.load(Ordering::SeqCst) <= worker_count);
  assert_eq!(dispatcher.worker_count(), worker_count);
}

#[tokio::test]
async fn test_panicking_runnable_does_not_kill_the_worker() {
  let dispatcher = WorkerPoolDispatcher::new(&Handle::current(), 1, 1);
  let latch = CountDownLatch::new(1);

  dispatcher.schedule(Runnable::new(|| async {
    panic!("boom");
  }));
  let cloned = latch.clone();
  dispatcher.schedule(Runnable::new(move || async move {
    cloned.count_down().await;
  }));

  assert!(latch.wait_timeout(Duration::from_secs(5)).await, "the worker should survive the panic");
}

#[tokio::test]
async fn test_shutdown_drains_accepted_work() {
  let dispatcher = DispatcherHandle::new(WorkerPoolDispatcher::new(&Handle::current(), 2, 1));
  let done = Arc::new(AtomicUsize::new(0));

  for _ in 0..10 {
    let done = done.clone();
    dispatcher.schedule(Runnable::new(move || async move {
      done.fetch_add(1, Ordering::SeqCst);
    }));
  }
  tokio::time::timeout(Duration::from_secs(5), dispatcher.shutdown())
    .await
    .expect("shutdown should finish");
  assert_eq!(done.load(Ordering::SeqCst), 10);

  dispatcher.schedule(Runnable::new(|| async {
    panic!("must not run after shutdown");
  }));
}

#[tokio::test]
async fn test_tokio_runtime_context_dispatcher_runs_runnables() {
  let dispatcher = TokioRuntimeContextDispatcher::new().unwrap().with_throughput(5);
  assert_eq!(dispatcher.throughput(), 5);
  let latch = CountDownLatch::new(3);
  for _ in 0..3 {
    let latch = latch.clone();
    dispatcher.schedule(Runnable::new(move || async move {
      latch.count_down().await;
    }));
  }
  assert!(latch.wait_timeout(Duration::from_secs(5)).await);
}
