//! Command line front end for the Heurist flattening engine.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
