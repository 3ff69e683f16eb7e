//! CLI subcommand implementations.

pub mod poll;
pub mod preview;
pub mod sensors;
