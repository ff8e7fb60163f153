pub mod args;
pub mod meetings;

pub use args::{Cli, CliCommand};
pub use meetings::{
    handle_diagnose_command, handle_end_command, handle_live_command, handle_meetings_command,
    handle_start_command,
};
