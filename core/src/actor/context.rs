mod context;
mod receive_context;

pub use self::{context::*, receive_context::*};
