//! Remote command helper over SSH

mod remote;

pub use remote::{run_command, run_command_async, CommandOutput};
