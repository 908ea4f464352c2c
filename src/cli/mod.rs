//! Command-line interface for running and comparing tournaments.

pub mod commands;
pub mod output;
