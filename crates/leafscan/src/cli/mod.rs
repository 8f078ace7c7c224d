//! Command handlers for the leafscan CLI.

pub mod config;
pub mod run;
