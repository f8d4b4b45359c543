mod admin;
mod cli;
mod command;
mod environment;
mod error;
mod install;
mod lock;
mod paths;
mod platform;
mod prompt;
mod python;

pub use cli::InstallArgs;
pub use error::{ErrorKind, InstallError, Result};
pub use install::{run, InstallOutcome};
