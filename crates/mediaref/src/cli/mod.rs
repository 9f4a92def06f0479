//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the mediaref binary.

mod commands;
mod encode;
mod media;

pub use commands::{Cli, Commands};
pub use encode::{encode_file, print_mime};
pub use media::{handle_hydrate, handle_resolve};
