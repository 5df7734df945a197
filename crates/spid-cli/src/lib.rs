//! # spid-cli
//!
//! The `spid-check` command-line tool.
//!
//! - Offline compliance check of a captured, already parsed SAML response
//! - SP metadata generation from a configuration file
//! - Listing of the AgID attribute consuming services

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;

pub use cli::Cli;
pub use config::CliConfig;
pub use error::{CliError, CliResult};
