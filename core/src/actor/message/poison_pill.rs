/// Stops the receiving actor once every message queued before it has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoisonPill;
