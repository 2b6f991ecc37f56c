//! Cable routing CLI library.
//!
//! This crate provides the command handlers of the `cableroute` binary along
//! with terminal styling and human-readable output formatting.

pub mod commands;
pub mod output;
pub mod terminal;
