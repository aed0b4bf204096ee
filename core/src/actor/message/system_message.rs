use spider_actor_utils_rs::collections::Element;

/// Lifecycle messages, always processed ahead of user messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SystemMessage {
  Start,
  Stop,
}

impl Element for SystemMessage {}
