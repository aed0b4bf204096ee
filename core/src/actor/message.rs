mod message;
mod message_envelope;
mod message_handle;
mod poison_pill;
mod stopped;
mod system_message;

pub use self::{message::*, message_envelope::*, message_handle::*, poison_pill::*, stopped::*};
pub(crate) use self::system_message::*;
