pub mod actor;
pub mod actor_system;
mod config;
mod config_option;
pub mod context;
pub mod dispatch;
pub mod message;
pub mod process;

pub use {self::config::*, self::config_option::*};
