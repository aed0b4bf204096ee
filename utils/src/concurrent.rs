mod async_barrier;
mod count_down_latch;

pub use self::{async_barrier::*, count_down_latch::*};
