//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::OutputFormat;

/// spid-check - SPID SAML response compliance checker.
#[derive(Debug, Parser)]
#[command(name = "spid-check")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to ~/.spid/spid-check.toml).
    #[arg(short, long, global = true, env = "SPID_CHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a parsed SAML response against the SPID rules.
    Check(CheckArgs),

    /// Render SP metadata from the `[metadata]` configuration table.
    Metadata(MetadataArgs),

    /// List the AgID attribute consuming services.
    AttributeSets,
}

/// Arguments of `check`.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// JSON rendering of the parsed response.
    #[arg(short, long)]
    pub response: PathBuf,

    /// Trusted IdP certificate (PEM); repeat for key rollover.
    #[arg(long = "cert", required = true, num_args = 1..)]
    pub certs: Vec<PathBuf>,

    /// SP private key (PKCS#8 PEM) for encrypted assertions.
    #[arg(short, long)]
    pub key: Option<PathBuf>,

    /// Expected destination (overrides config).
    #[arg(long)]
    pub destination: Option<String>,

    /// IdP entity ID (overrides config).
    #[arg(long)]
    pub idp_entity_id: Option<String>,

    /// SP entity ID (overrides config).
    #[arg(long)]
    pub sp_entity_id: Option<String>,

    /// Requested attribute names (overrides config).
    #[arg(long, value_delimiter = ',')]
    pub attributes: Vec<String>,

    /// AgID attribute consuming service index (overrides config).
    #[arg(long)]
    pub attribute_set: Option<u16>,

    /// Minimum SPID level, 1 to 3 (overrides config).
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
    pub min_level: Option<u8>,

    /// Clock skew tolerance in milliseconds (overrides config).
    #[arg(long)]
    pub tolerance_ms: Option<u64>,

    /// Accept RSA-SHA1 signatures.
    #[arg(long)]
    pub allow_sha1: bool,
}

/// Arguments of `metadata`.
#[derive(Debug, Args)]
pub struct MetadataArgs {
    /// Write the document to this file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// SP signing certificate (PEM), added to the configured ones.
    #[arg(long)]
    pub signing_cert: Vec<PathBuf>,

    /// SP encryption certificate (PEM), added to the configured ones.
    #[arg(long)]
    pub encryption_cert: Vec<PathBuf>,
}
