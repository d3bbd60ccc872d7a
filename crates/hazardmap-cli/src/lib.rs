//! Hazard map CLI library.
//!
//! Subcommand handlers, logging setup and output formatting for the
//! `hazardmap-cli` binary.

pub mod commands;
pub mod logging;
pub mod output;
