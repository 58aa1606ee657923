mod controller;
mod hooks;
mod session_command;
mod session_loop;

pub use controller::SessionController;
pub use hooks::{LocalMediaSource, SessionHooks};

pub(crate) use session_command::SessionCommand;
pub(crate) use session_loop::Session;
