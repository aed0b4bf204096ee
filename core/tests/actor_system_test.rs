use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rstest::rstest;
use spider_actor_core_rs::actor::actor::{Actor, ActorError, ActorRef, AskError, ErrorReason};
use spider_actor_core_rs::actor::actor_system::{ActorSystem, SpawnError};
use spider_actor_core_rs::actor::context::{Context, ReceiveContext};
use spider_actor_core_rs::actor::dispatch::{DispatcherHandle, TokioRuntimeContextDispatcher};
use spider_actor_core_rs::actor::message::{MessageHandle, StopReason, Stopped};
use spider_actor_core_rs::actor::ConfigOption;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

const WAIT: Duration = Duration::from_secs(5);

fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .try_init();
}

async fn wait_until<F: Fn() -> bool>(condition: F) {
  tokio::time::timeout(WAIT, async {
    while !condition() {
      tokio::time::sleep(Duration::from_millis(5)).await;
    }
  })
  .await
  .expect("condition not reached in time");
}

#[derive(Debug, Default, Clone)]
struct Journal {
  entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
  fn push(&self, entry: impl Into<String>) {
    self.entries.lock().unwrap().push(entry.into());
  }

  fn entries(&self) -> Vec<String> {
    self.entries.lock().unwrap().clone()
  }

  fn len(&self) -> usize {
    self.entries.lock().unwrap().len()
  }
}

#[derive(Debug)]
struct Recorder {
  journal: Journal,
  in_flight: Arc<AtomicBool>,
  overlaps: Arc<AtomicUsize>,
}

impl Recorder {
  fn new(journal: Journal) -> Self {
    Self {
      journal,
      in_flight: Arc::new(AtomicBool::new(false)),
      overlaps: Arc::new(AtomicUsize::new(0)),
    }
  }
}

#[async_trait]
impl Actor for Recorder {
  async fn receive(&mut self, _: &mut ReceiveContext, message: MessageHandle) -> Result<(), ActorError> {
    if self.in_flight.swap(true, Ordering::SeqCst) {
      self.overlaps.fetch_add(1, Ordering::SeqCst);
    }
    tokio::task::yield_now().await;
    if let Some(n) = message.to_typed::<u32>() {
      self.journal.push(n.to_string());
    }
    self.in_flight.store(false, Ordering::SeqCst);
    Ok(())
  }
}

#[derive(Debug)]
struct Echo;

#[async_trait]
impl Actor for Echo {
  async fn receive(&mut self, ctx: &mut ReceiveContext, message: MessageHandle) -> Result<(), ActorError> {
    ctx.respond(message);
    Ok(())
  }
}

#[derive(Debug)]
struct Silent;

#[async_trait]
impl Actor for Silent {
  async fn receive(&mut self, _: &mut ReceiveContext, _: MessageHandle) -> Result<(), ActorError> {
    Ok(())
  }
}

#[derive(Debug)]
struct Watcher {
  tx: mpsc::UnboundedSender<Stopped>,
}

#[async_trait]
impl Actor for Watcher {
  async fn receive(&mut self, _: &mut ReceiveContext, message: MessageHandle) -> Result<(), ActorError> {
    if let Some(stopped) = message.to_typed::<Stopped>() {
      let _ = self.tx.send(stopped);
    }
    Ok(())
  }
}

fn spawn_watcher(system: &ActorSystem) -> (ActorRef, mpsc::UnboundedReceiver<Stopped>) {
  let (tx, rx) = mpsc::unbounded_channel();
  (system.spawn(Watcher { tx }).unwrap(), rx)
}

async fn expect_exactly_one(rx: &mut mpsc::UnboundedReceiver<Stopped>) -> Stopped {
  let stopped = tokio::time::timeout(WAIT, rx.recv())
    .await
    .expect("no Stopped notification")
    .expect("watcher channel closed");
  tokio::time::sleep(Duration::from_millis(100)).await;
  assert!(rx.try_recv().is_err(), "more than one Stopped notification");
  stopped
}

#[rstest]
#[case::worker_pool_throughput_1(1, false)]
#[case::worker_pool_throughput_16(16, false)]
#[case::tokio_context_dispatcher(1, true)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_messages_from_one_sender_arrive_in_send_order(#[case] throughput: usize, #[case] tokio_dispatcher: bool) {
  init_tracing();
  let mut options = vec![ConfigOption::with_dispatcher_throughput(throughput)];
  if tokio_dispatcher {
    let dispatcher = TokioRuntimeContextDispatcher::new().unwrap().with_throughput(throughput);
    options.push(ConfigOption::with_dispatcher(DispatcherHandle::new(dispatcher)));
  }
  let system = ActorSystem::new_config_options(options).unwrap();
  let journal = Journal::default();
  let recorder = system.spawn(Recorder::new(journal.clone())).unwrap();

  for n in 0..1000u32 {
    recorder.tell(n);
  }

  wait_until(|| journal.len() == 1000).await;
  let expected = (0..1000u32).map(|n| n.to_string()).collect::<Vec<_>>();
  assert_eq!(journal.entries(), expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_receive_is_never_concurrent() {
  let system = ActorSystem::new_config_options([ConfigOption::with_worker_count(8)]).unwrap();
  let journal = Journal::default();
  let actor = Recorder::new(journal.clone());
  let overlaps = actor.overlaps.clone();
  let recorder = system.spawn(actor).unwrap();

  let senders = (0..8u32)
    .map(|s| {
      let recorder = recorder.clone();
      tokio::spawn(async move {
        for n in 0..100u32 {
          recorder.tell(s * 1000 + n);
          tokio::task::yield_now().await;
        }
      })
    })
    .collect::<Vec<_>>();
  for sender in senders {
    sender.await.unwrap();
  }

  wait_until(|| journal.len() == 800).await;
  assert_eq!(overlaps.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_ask_returns_the_reply() {
  let system = ActorSystem::new().unwrap();
  let echo = system.spawn(Echo).unwrap();

  let reply = echo.ask("hello".to_string(), WAIT).await.unwrap();
  assert_eq!(reply.to_typed::<String>(), Some("hello".to_string()));

  wait_until(|| system.process_count() == 1).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_ask_times_out_within_bounds() {
  let system = ActorSystem::new().unwrap();
  let silent = system.spawn(Silent).unwrap();

  let timeout = Duration::from_millis(100);
  let started = Instant::now();
  let result = silent.ask(1u32, timeout).await;
  let elapsed = started.elapsed();

  assert!(matches!(result, Err(AskError::Timeout(t)) if t == timeout));
  assert!(elapsed >= timeout, "returned after {:?}", elapsed);
  assert!(elapsed < timeout + Duration::from_millis(500), "returned after {:?}", elapsed);
  assert_eq!(system.process_count(), 1);
}

#[tokio::test]
async fn test_ask_unknown_address_fails_immediately() {
  let system = ActorSystem::new().unwrap();
  let nobody = system.actor_ref("nobody");

  let started = Instant::now();
  let result = nobody.ask(1u32, WAIT).await;
  assert!(matches!(result, Err(AskError::ActorNotFound(ref a)) if a.as_str() == "nobody"));
  assert!(started.elapsed() < Duration::from_millis(500));
  assert!(!nobody.is_alive());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_ask_stopped_actor_fails() {
  let system = ActorSystem::new().unwrap();
  let echo = system.spawn(Echo).unwrap();
  echo.stop();
  echo.life().wait(WAIT).await.unwrap();

  assert!(matches!(echo.ask(1u32, WAIT).await, Err(AskError::ActorNotFound(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_watcher_added_before_stop_is_notified_once() {
  let system = ActorSystem::new().unwrap();
  let target = system.spawn(Silent).unwrap();
  let (watcher, mut rx) = spawn_watcher(&system);

  target.add_watcher(&watcher);
  target.add_watcher(&watcher);
  target.stop();

  let stopped = expect_exactly_one(&mut rx).await;
  assert_eq!(stopped.address(), target.address());
  assert!(matches!(stopped.reason(), StopReason::Stopped));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_watcher_added_after_stop_is_notified_once() {
  let system = ActorSystem::new().unwrap();
  let target = system.spawn(Silent).unwrap();
  let (watcher, mut rx) = spawn_watcher(&system);

  target.stop();
  target.life().wait(WAIT).await.unwrap();
  target.add_watcher(&watcher);

  let stopped = expect_exactly_one(&mut rx).await;
  assert_eq!(stopped.address(), target.address());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_removed_watcher_is_not_notified() {
  let system = ActorSystem::new().unwrap();
  let target = system.spawn(Silent).unwrap();
  let (watcher, mut rx) = spawn_watcher(&system);

  target.add_watcher(&watcher);
  target.remove_watcher(&watcher);
  target.stop();
  target.life().wait(WAIT).await.unwrap();

  tokio::time::sleep(Duration::from_millis(100)).await;
  assert!(rx.try_recv().is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_repeated_watch_after_stop_is_notified_once() {
  let system = ActorSystem::new().unwrap();
  let target = system.spawn(Silent).unwrap();
  let (watcher, mut rx) = spawn_watcher(&system);

  target.stop();
  target.life().wait(WAIT).await.unwrap();
  target.add_watcher(&watcher);
  target.add_watcher(&watcher);

  let stopped = expect_exactly_one(&mut rx).await;
  assert!(matches!(stopped.reason(), StopReason::Stopped));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_watch_before_and_after_stop_is_notified_once() {
  let system = ActorSystem::new().unwrap();
  let target = system.spawn(Silent).unwrap();
  let (watcher, mut rx) = spawn_watcher(&system);

  target.add_watcher(&watcher);
  target.stop();
  target.life().wait(WAIT).await.unwrap();
  target.add_watcher(&watcher);

  expect_exactly_one(&mut rx).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_late_watcher_sees_the_real_stop_reason() {
  let system = ActorSystem::new().unwrap();
  let panics = system.spawn(Panics).unwrap();
  let (watcher, mut rx) = spawn_watcher(&system);

  panics.tell(1u32);
  panics.life().wait(WAIT).await.unwrap();
  panics.add_watcher(&watcher);

  let stopped = expect_exactly_one(&mut rx).await;
  assert!(matches!(stopped.reason(), StopReason::Failed(ActorError::Panicked(_))));
  let life = panics.life().try_get().unwrap();
  assert!(life.reason().is_failure());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_watch_unknown_address_is_notified_once() {
  let system = ActorSystem::new().unwrap();
  let (watcher, mut rx) = spawn_watcher(&system);
  let ghost = system.actor_ref("ghost");

  ghost.add_watcher(&watcher);
  ghost.add_watcher(&watcher);

  let stopped = expect_exactly_one(&mut rx).await;
  assert!(matches!(stopped.reason(), StopReason::Unknown));
}

#[derive(Debug)]
struct SlowCounter {
  processed: Arc<AtomicUsize>,
  in_receive: Arc<AtomicBool>,
}

#[async_trait]
impl Actor for SlowCounter {
  async fn receive(&mut self, _: &mut ReceiveContext, _: MessageHandle) -> Result<(), ActorError> {
    self.in_receive.store(true, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(30)).await;
    self.processed.fetch_add(1, Ordering::SeqCst);
    self.in_receive.store(false, Ordering::SeqCst);
    Ok(())
  }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_life_resolves_after_the_last_receive() {
  let system = ActorSystem::new().unwrap();
  let processed = Arc::new(AtomicUsize::new(0));
  let in_receive = Arc::new(AtomicBool::new(false));
  let actor = system
    .spawn(SlowCounter {
      processed: processed.clone(),
      in_receive: in_receive.clone(),
    })
    .unwrap();
  let life = actor.life();
  assert!(!life.is_completed());

  for n in 0..3u32 {
    actor.tell(n);
  }
  actor.poison();

  let stopped = life.wait(WAIT).await.unwrap();
  assert!(matches!(stopped.reason(), StopReason::Poisoned));
  assert_eq!(processed.load(Ordering::SeqCst), 3);
  assert!(!in_receive.load(Ordering::SeqCst));
  assert!(!actor.is_alive());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_stop_overtakes_queued_messages() {
  let system = ActorSystem::new().unwrap();
  let processed = Arc::new(AtomicUsize::new(0));
  let actor = system
    .spawn(SlowCounter {
      processed: processed.clone(),
      in_receive: Arc::new(AtomicBool::new(false)),
    })
    .unwrap();

  for n in 0..10u32 {
    actor.tell(n);
  }
  actor.stop();

  let stopped = actor.life().wait(WAIT).await.unwrap();
  assert!(matches!(stopped.reason(), StopReason::Stopped));
  assert!(processed.load(Ordering::SeqCst) < 10);
}

#[derive(Debug)]
struct FailsOnThird {
  processed: Arc<AtomicUsize>,
}

#[async_trait]
impl Actor for FailsOnThird {
  async fn receive(&mut self, _: &mut ReceiveContext, _: MessageHandle) -> Result<(), ActorError> {
    let n = self.processed.fetch_add(1, Ordering::SeqCst) + 1;
    if n == 3 {
      return Err(ActorError::of_receive_error("third message"));
    }
    Ok(())
  }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_failing_actor_stops_and_notifies_watcher() {
  init_tracing();
  let system = ActorSystem::new().unwrap();
  let processed = Arc::new(AtomicUsize::new(0));
  let b = system
    .spawn(FailsOnThird {
      processed: processed.clone(),
    })
    .unwrap();
  let (c, mut rx) = spawn_watcher(&system);
  b.add_watcher(&c);

  for n in 0..5u32 {
    b.tell(n);
  }

  let stopped = expect_exactly_one(&mut rx).await;
  assert_eq!(stopped.address(), b.address());
  match stopped.reason() {
    StopReason::Failed(ActorError::ReceiveError(reason)) => assert_eq!(reason.message(), "third message"),
    other => panic!("unexpected reason: {}", other),
  }
  assert!(!b.is_alive());
  assert_eq!(processed.load(Ordering::SeqCst), 3);

  let dead_letters = system.dead_letter_count();
  for n in 0..3u32 {
    b.tell(n);
  }
  tokio::time::sleep(Duration::from_millis(50)).await;
  assert_eq!(processed.load(Ordering::SeqCst), 3);
  assert_eq!(system.dead_letter_count(), dead_letters + 3);
}

#[derive(Debug)]
struct Panics;

#[async_trait]
impl Actor for Panics {
  async fn receive(&mut self, _: &mut ReceiveContext, _: MessageHandle) -> Result<(), ActorError> {
    panic!("boom");
  }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_panic_in_receive_stops_only_that_actor() {
  let system = ActorSystem::new_config_options([ConfigOption::with_worker_count(2)]).unwrap();
  let panics = system.spawn(Panics).unwrap();
  let echo = system.spawn(Echo).unwrap();

  panics.tell(1u32);
  let stopped = panics.life().wait(WAIT).await.unwrap();
  match stopped.reason() {
    StopReason::Failed(ActorError::Panicked(message)) => assert_eq!(message, "boom"),
    other => panic!("unexpected reason: {}", other),
  }

  let reply = echo.ask(7u32, WAIT).await.unwrap();
  assert_eq!(reply.to_typed::<u32>(), Some(7));
}

#[derive(Debug)]
struct SelfTalker {
  journal: Journal,
}

#[async_trait]
impl Actor for SelfTalker {
  async fn prestart(&mut self, ctx: &Context) -> Result<(), ActorError> {
    self.journal.push("prestart");
    ctx.self_ref().tell("from-prestart".to_string());
    Ok(())
  }

  async fn receive(&mut self, _: &mut ReceiveContext, message: MessageHandle) -> Result<(), ActorError> {
    if let Some(text) = message.to_typed::<String>() {
      self.journal.push(text);
    }
    Ok(())
  }

  async fn post_stop(&mut self, _: &Context) -> Result<(), ActorError> {
    self.journal.push("post_stop");
    Ok(())
  }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_prestart_runs_before_any_receive() {
  let system = ActorSystem::new().unwrap();
  let journal = Journal::default();
  let actor = system.spawn(SelfTalker {
    journal: journal.clone(),
  })
  .unwrap();
  actor.tell("external".to_string());

  wait_until(|| journal.len() == 3).await;
  actor.stop();
  actor.life().wait(WAIT).await.unwrap();

  let entries = journal.entries();
  assert_eq!(entries[0], "prestart");
  assert!(entries.contains(&"from-prestart".to_string()));
  assert!(entries.contains(&"external".to_string()));
  assert_eq!(entries.last().map(String::as_str), Some("post_stop"));
}

#[derive(Debug)]
struct FailsToStart;

#[async_trait]
impl Actor for FailsToStart {
  async fn prestart(&mut self, _: &Context) -> Result<(), ActorError> {
    Err(ActorError::PrestartError(ErrorReason::from("not today")))
  }

  async fn receive(&mut self, _: &mut ReceiveContext, _: MessageHandle) -> Result<(), ActorError> {
    panic!("receive must not run after a failed prestart");
  }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_failed_prestart_stops_the_actor() {
  let system = ActorSystem::new().unwrap();
  let actor = system.spawn(FailsToStart).unwrap();
  actor.tell(1u32);

  let stopped = actor.life().wait(WAIT).await.unwrap();
  assert!(matches!(stopped.reason(), StopReason::Failed(ActorError::PrestartError(_))));
  assert!(!actor.is_alive());
}

#[derive(Debug)]
struct AsksItself;

#[async_trait]
impl Actor for AsksItself {
  async fn receive(&mut self, ctx: &mut ReceiveContext, message: MessageHandle) -> Result<(), ActorError> {
    if message.is_typed::<String>() {
      let result = ctx.self_ref().ask(1u32, WAIT).await;
      ctx.respond(matches!(result, Err(AskError::SelfAsk(_))));
    }
    Ok(())
  }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_self_ask_fails_fast() {
  let system = ActorSystem::new().unwrap();
  let actor = system.spawn(AsksItself).unwrap();

  let started = Instant::now();
  let reply = actor.ask("go".to_string(), WAIT).await.unwrap();
  assert_eq!(reply.to_typed::<bool>(), Some(true));
  assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_ask_blocking_from_an_os_thread() {
  let runtime = tokio::runtime::Builder::new_multi_thread()
    .worker_threads(2)
    .enable_all()
    .build()
    .unwrap();
  let (system, echo) = {
    let _guard = runtime.enter();
    let system = ActorSystem::new().unwrap();
    let echo = system.spawn(Echo).unwrap();
    (system, echo)
  };

  let reply = echo.ask_blocking(5u32, WAIT).unwrap();
  assert_eq!(reply.to_typed::<u32>(), Some(5));

  let from_runtime = runtime.block_on(async { echo.ask_blocking(5u32, WAIT) });
  assert!(matches!(from_runtime, Err(AskError::BlockingInRuntime)));

  runtime.block_on(system.shutdown()).unwrap();
}

#[test]
fn test_actor_system_requires_a_runtime() {
  assert!(ActorSystem::new().is_err());
}

#[derive(Debug)]
struct SlowEcho;

#[async_trait]
impl Actor for SlowEcho {
  async fn receive(&mut self, ctx: &mut ReceiveContext, message: MessageHandle) -> Result<(), ActorError> {
    tokio::time::sleep(Duration::from_millis(200)).await;
    ctx.respond(message);
    Ok(())
  }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_late_reply_is_discarded() {
  let system = ActorSystem::new().unwrap();
  let slow = system.spawn(SlowEcho).unwrap();

  let result = slow.ask(1u32, Duration::from_millis(50)).await;
  assert!(matches!(result, Err(AskError::Timeout(_))));
  let dead_letters = system.dead_letter_count();

  tokio::time::sleep(Duration::from_millis(300)).await;
  assert_eq!(system.dead_letter_count(), dead_letters + 1);
  assert_eq!(system.process_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_respond_without_reply_to_is_a_dead_letter() {
  let system = ActorSystem::new().unwrap();
  let echo = system.spawn(Echo).unwrap();
  let before = system.dead_letter_count();

  echo.tell(1u32);
  wait_until(|| system.dead_letter_count() == before + 1).await;
}

#[tokio::test]
async fn test_spawn_named_rejects_duplicates() {
  let system = ActorSystem::new().unwrap();
  let first = system.spawn_named("unique", Silent).unwrap();
  assert_eq!(first.address().as_str(), "unique");

  let second = system.spawn_named("unique", Silent);
  assert!(matches!(second, Err(SpawnError::NameExists(ref a)) if a.as_str() == "unique"));
  assert_eq!(system.process_count(), 1);
}

#[rstest]
#[case::generated_id("$0")]
#[case::reply_address("future$1")]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_spawn_named_rejects_generated_names(#[case] name: &str) {
  let system = ActorSystem::new().unwrap();
  let result = system.spawn_named(name, Silent);
  assert!(matches!(result, Err(SpawnError::ReservedName(ref a)) if a.as_str() == name));
  assert_eq!(system.process_count(), 0);

  let echo = system.spawn(Echo).unwrap();
  let reply = echo.ask(7u32, WAIT).await.unwrap();
  assert_eq!(reply.to_typed::<u32>(), Some(7));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_name_can_be_reused_after_stop() {
  let system = ActorSystem::new().unwrap();
  let first = system.spawn_named("worker", Silent).unwrap();
  first.stop();
  first.life().wait(WAIT).await.unwrap();

  let second = system.spawn_named("worker", Echo).unwrap();
  let (watcher, mut rx) = spawn_watcher(&system);
  second.add_watcher(&watcher);
  assert!(second.is_alive());
  assert!(tokio::time::timeout(Duration::from_millis(100), rx.recv()).await.is_err());

  second.stop();
  let stopped = expect_exactly_one(&mut rx).await;
  assert!(matches!(stopped.reason(), StopReason::Stopped));
}

#[derive(Debug)]
struct Parent;

#[async_trait]
impl Actor for Parent {
  async fn receive(&mut self, ctx: &mut ReceiveContext, _: MessageHandle) -> Result<(), ActorError> {
    match ctx.spawn(Echo) {
      Ok(child) => {
        ctx.watch(&child);
        ctx.respond(child);
        Ok(())
      }
      Err(error) => Err(ActorError::of_receive_error(ErrorReason::new(error))),
    }
  }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_context_spawns_children() {
  let system = ActorSystem::new().unwrap();
  let parent = system.spawn(Parent).unwrap();

  let child = parent.ask((), WAIT).await.unwrap().to_typed::<ActorRef>().unwrap();
  assert!(child.is_alive());
  let reply = child.ask(3u32, WAIT).await.unwrap();
  assert_eq!(reply.to_typed::<u32>(), Some(3));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shutdown_stops_every_actor() {
  let system = ActorSystem::new().unwrap();
  let actors = (0..10).map(|_| system.spawn(Silent).unwrap()).collect::<Vec<_>>();
  let lives = actors.iter().map(|a| a.life()).collect::<Vec<_>>();

  system.shutdown().await.unwrap();

  for life in lives {
    assert!(life.is_completed());
  }
  assert!(actors.iter().all(|a| !a.is_alive()));
  assert_eq!(system.process_count(), 0);
  assert!(system.is_shutdown());
  assert!(matches!(system.spawn(Silent), Err(SpawnError::SystemShutdown)));
  system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_life_of_unknown_address_is_already_resolved() {
  let system = ActorSystem::new().unwrap();
  let life = system.actor_ref("ghost").life();
  let stopped = life.try_get().unwrap();
  assert!(matches!(stopped.reason(), StopReason::Unknown));
}
