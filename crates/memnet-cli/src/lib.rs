//! memnet CLI crate
//!
//! Purpose:
//! - Provide a command-line front end to the memnet associative memory
//!   network engine.
//! - Expose the experiment-file parser, the experiment model, and the
//!   trace buffer as a library so they can be exercised directly in tests
//!   and downstream automation.
//!
//! Major commands (see [commands]):
//! - run: parse an experiment file, replay its activation schedule
//!   against a live network on the wall clock, and export the sampled
//!   activation trace as CSV.
//! - inspect: parse an experiment file and print its summary.
//!
//! Notes:
//! - The binary (src/main.rs) wires up logging and argument parsing,
//!   calling MemnetCli::execute().

pub mod commands;
pub mod error;
pub mod experiment;
pub mod parser;
pub mod trace;

pub use commands::MemnetCli;
