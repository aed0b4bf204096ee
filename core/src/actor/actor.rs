mod actor;
mod actor_cell;
mod actor_error;
mod actor_ref;
mod address;
mod error_reason;
mod watcher_set;

pub use self::{actor::*, actor_error::*, actor_ref::*, address::*, error_reason::*};
pub(crate) use self::{actor_cell::*, watcher_set::*};
