//! SP metadata generation.

use spid_saml::metadata::certificate_body;

use super::read_file;
use crate::cli::MetadataArgs;
use crate::output::success;
use crate::{CliConfig, CliError, CliResult};

/// Runs `metadata`.
pub fn run_metadata(args: MetadataArgs, config: &CliConfig) -> CliResult<()> {
    let mut builder = config
        .metadata
        .clone()
        .ok_or_else(|| CliError::Config("no [metadata] table in configuration".to_string()))?;

    for path in &args.signing_cert {
        builder = builder.with_signing_certificate(certificate_body(&read_file(path)?)?);
    }
    for path in &args.encryption_cert {
        builder = builder.with_encryption_certificate(certificate_body(&read_file(path)?)?);
    }

    let xml = builder.build()?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, xml)?;
            success(&format!("metadata for {} written to {}", builder.entity_id, path.display()));
        }
        None => println!("{xml}"),
    }
    Ok(())
}
