//! Chat surface: command parsing, reply texts, and the message dispatcher.

pub mod command;
pub mod dispatcher;
pub mod reply;

pub use command::{Command, parse_command};
pub use dispatcher::{ChatDispatcher, ChatMessage};
