//! CLI subcommands.

pub mod compare;
pub mod init;
pub mod run;
