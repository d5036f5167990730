pub mod commands;
pub mod output;
mod shell;

pub use shell::{run_cli, ShellContext};
