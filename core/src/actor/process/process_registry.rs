use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use spider_actor_utils_rs::collections::DashMapExtension;

use crate::actor::actor::Address;
use crate::actor::actor_system::SpawnError;
use crate::actor::process::ProcessHandle;


const ID_PREFIX: char = '$';

/// Reply processes are registered as `future` followed by a generated id.
pub(crate) const REPLY_PROCESS_PREFIX: &str = "future";

/// Names that could collide with a generated address.
pub(crate) fn is_reserved_name(name: &str) -> bool {
  name.starts_with(ID_PREFIX)
    || name
      .strip_prefix(REPLY_PROCESS_PREFIX)
      .is_some_and(|rest| rest.starts_with(ID_PREFIX))
}

/// Address to process mapping of one actor system.
#[derive(Debug, Default)]
pub(crate) struct ProcessRegistry {
  sequence_id: AtomicU64,
  processes: DashMap<Address, ProcessHandle>,
}

impl ProcessRegistry {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  pub(crate) fn next_id(&self) -> String {
    let counter = self.sequence_id.fetch_add(1, Ordering::SeqCst);
    uint64_to_id(counter)
  }

  /// Registers `process` unless `address` is taken; an existing entry is never replaced.
  pub(crate) fn add_process(&self, address: Address, process: ProcessHandle) -> Result<(), SpawnError> {
    let (_, loaded) = self.processes.load_or_store(address.clone(), process);
    if loaded {
      return Err(SpawnError::NameExists(address));
    }
    Ok(())
  }

  pub(crate) fn remove_process(&self, address: &Address) -> Option<ProcessHandle> {
    self.processes.remove(address).map(|(_, process)| process)
  }

  pub(crate) fn get_process(&self, address: &Address) -> Option<ProcessHandle> {
    self.processes.get(address).map(|entry| entry.value().clone())
  }

  pub(crate) fn len(&self) -> usize {
    self.processes.len()
  }

  /// Snapshot of the registered processes.
  pub(crate) fn processes(&self) -> Vec<ProcessHandle> {
    self.processes.iter().map(|entry| entry.value().clone()).collect()
  }
}

pub(crate) fn uint64_to_id(u: u64) -> String {
  const DIGITS: &[u8; 64] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ~+";
  let mut digits = Vec::with_capacity(12);
  let mut u = u;
  loop {
    digits.push(DIGITS[(u & 0x3f) as usize] as char);
    u >>= 6;
    if u == 0 {
      break;
    }
  }
  let mut id = String::with_capacity(digits.len() + 1);
  id.push(ID_PREFIX);
  id.extend(digits.iter().rev());
  id
}
