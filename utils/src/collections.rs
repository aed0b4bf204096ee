mod dash_map_ext;
mod element;
mod queue;

pub use self::{dash_map_ext::*, element::*, queue::*};
