pub mod config;
pub mod view;
pub mod watch;

pub type CliResult = leetboard_core::error::Result<()>;
