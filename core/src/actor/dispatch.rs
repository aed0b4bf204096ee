mod dispatcher;
mod mailbox;
mod message_invoker;
pub mod throttler;

pub use self::dispatcher::*;
pub(crate) use self::{mailbox::*, message_invoker::*};
