//! Command implementations.

pub mod attribute_sets;
pub mod check;
pub mod metadata;

pub use attribute_sets::run_attribute_sets;
pub use check::{run_check, Verdict};
pub use metadata::run_metadata;

use std::path::Path;

use crate::{CliError, CliResult};

/// Reads a text file, naming it in the error.
pub(crate) fn read_file(path: &Path) -> CliResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        CliError::InvalidArgument(format!("cannot read {}: {e}", path.display()))
    })
}
