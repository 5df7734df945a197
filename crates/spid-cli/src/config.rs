//! CLI configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use spid_saml::metadata::{attribute_sets, SpMetadataBuilder};
use spid_saml::{ComplianceContext, SpidLevel};

use crate::cli::CheckArgs;
use crate::{CliError, CliResult};

/// CLI configuration, read from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Output format.
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Expectations used by `check`.
    #[serde(default)]
    pub compliance: ComplianceConfig,

    /// SP description used by `metadata`.
    pub metadata: Option<SpMetadataBuilder>,
}

/// The `[compliance]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComplianceConfig {
    /// Assertion consumer service URL.
    pub destination: Option<String>,

    /// IdP entity ID.
    pub idp_entity_id: Option<String>,

    /// SP entity ID.
    pub sp_entity_id: Option<String>,

    /// Clock skew tolerance in milliseconds.
    pub tolerance_ms: Option<u64>,

    /// Minimum SPID level, 1 to 3.
    pub min_level: Option<u8>,

    /// Requested attribute names.
    #[serde(default)]
    pub requested_attributes: Vec<String>,

    /// AgID attribute consuming service index, used when no names are listed.
    pub attribute_set: Option<u16>,
}

impl CliConfig {
    /// Loads configuration from `path`, or from the default location.
    ///
    /// A missing default file yields the default configuration; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        let (config_path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::config_path()?, false),
        };

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::parse(&content)?
        } else if explicit {
            return Err(CliError::Config(format!(
                "config file not found: {}",
                config_path.display()
            )));
        } else {
            Self::default()
        };

        config.compliance.apply_env();
        Ok(config)
    }

    /// Parses a TOML document.
    pub fn parse(content: &str) -> CliResult<Self> {
        toml::from_str(content)
            .map_err(|e| CliError::Config(format!("failed to parse config: {e}")))
    }

    /// Gets the default configuration file path.
    pub fn config_path() -> CliResult<PathBuf> {
        let home = dirs_next::home_dir()
            .ok_or_else(|| CliError::Config("could not determine home directory".to_string()))?;
        Ok(home.join(".spid").join("spid-check.toml"))
    }
}

impl ComplianceConfig {
    /// Applies `SPID_TOLERANCE_MS` and `SPID_MIN_LEVEL`.
    pub fn apply_env(&mut self) {
        if let Some(tolerance) = std::env::var("SPID_TOLERANCE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.tolerance_ms = Some(tolerance);
        }
        if let Some(level) = std::env::var("SPID_MIN_LEVEL")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.min_level = Some(level);
        }
    }

    /// Builds the checker context, command-line values taking precedence.
    pub fn to_context(&self, args: &CheckArgs) -> CliResult<ComplianceContext> {
        let required = |arg: &Option<String>, configured: &Option<String>, name: &str| {
            arg.clone()
                .or_else(|| configured.clone())
                .ok_or_else(|| CliError::Config(format!("{name} not set")))
        };
        let destination = required(&args.destination, &self.destination, "destination")?;
        let idp = required(&args.idp_entity_id, &self.idp_entity_id, "idp_entity_id")?;
        let sp = required(&args.sp_entity_id, &self.sp_entity_id, "sp_entity_id")?;

        let mut context = ComplianceContext::new(destination, idp, sp);

        if let Some(tolerance) = args.tolerance_ms.or(self.tolerance_ms) {
            context = context.with_tolerance_ms(tolerance);
        }
        if let Some(level) = args.min_level.or(self.min_level) {
            let level = SpidLevel::from_ordinal(level)
                .ok_or_else(|| CliError::Config(format!("unknown SPID level {level}")))?;
            context = context.with_min_level(level);
        }

        let names = if args.attributes.is_empty() {
            &self.requested_attributes
        } else {
            &args.attributes
        };
        if !names.is_empty() {
            context = context.with_requested_attributes(names.iter().cloned());
        } else if let Some(index) = args.attribute_set.or(self.attribute_set) {
            let service = attribute_sets::by_index(index).ok_or_else(|| {
                CliError::InvalidArgument(format!("no AgID attribute set with index {index}"))
            })?;
            context = context.with_attribute_service(&service);
        }

        Ok(context)
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::cli::{Cli, Command};

    const CONFIG: &str = r#"
output_format = "json"

[compliance]
destination = "https://sp.example/acs"
idp_entity_id = "https://idp.example/"
sp_entity_id = "https://sp.example/"
min_level = 2
attribute_set = 0

[metadata]
entity_id = "https://sp.example/"

[[metadata.assertion_consumer_services]]
index = 0
is_default = true
binding = "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST"
location = "https://sp.example/acs"

[metadata.organization]
name = "Comune di Esempio"
display_name = "Esempio"
url = "https://www.comune.esempio.it"

[metadata.contact]
public = true
ipa_code = "c_x000"
email = "spid@comune.esempio.it"
"#;

    fn check_args(extra: &[&str]) -> CheckArgs {
        let mut argv = vec!["spid-check", "check", "--response", "r.json", "--cert", "a.pem"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Check(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn parses_full_config() {
        let config = CliConfig::parse(CONFIG).unwrap();
        assert_eq!(config.output_format, OutputFormat::Json);
        let metadata = config.metadata.unwrap();
        assert!(metadata.contact.public);
        assert_eq!(metadata.assertion_consumer_services.len(), 1);
    }

    #[test]
    fn context_from_config() {
        let config = CliConfig::parse(CONFIG).unwrap();
        let context = config.compliance.to_context(&check_args(&[])).unwrap();
        assert_eq!(context.min_level, SpidLevel::L2);
        assert_eq!(context.requested_names().len(), 6);
        assert_eq!(context.sp_entity_id, "https://sp.example/");
    }

    #[test]
    fn arguments_override_config() {
        let config = CliConfig::parse(CONFIG).unwrap();
        let args = check_args(&["--attributes", "spidCode,name", "--sp-entity-id", "https://other/"]);
        let context = config.compliance.to_context(&args).unwrap();
        assert_eq!(context.requested_names(), ["spidCode", "name"]);
        assert_eq!(context.sp_entity_id, "https://other/");
    }

    #[test]
    fn missing_expectation_is_reported() {
        let config = CliConfig::default();
        let err = config.compliance.to_context(&check_args(&[])).unwrap_err();
        assert!(err.to_string().contains("destination"));
    }

    #[test]
    fn unknown_attribute_set() {
        let mut config = CliConfig::parse(CONFIG).unwrap();
        config.compliance.attribute_set = Some(7);
        assert!(config.compliance.to_context(&check_args(&[])).is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let missing = Path::new("/nonexistent/spid-check.toml");
        assert!(matches!(CliConfig::load(Some(missing)), Err(CliError::Config(_))));
    }
}
