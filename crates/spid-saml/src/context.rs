//! Per-run expectations for the compliance checker.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::encryption::DecryptionKey;
use crate::metadata::AttributeConsumingService;
use crate::types::SpidLevel;

/// Default clock skew tolerance: three minutes.
pub const DEFAULT_TOLERANCE_MS: u64 = 180_000;

fn default_tolerance_ms() -> u64 {
    DEFAULT_TOLERANCE_MS
}

/// What the service provider expects from a response.
///
/// Immutable during a validation run and cheap to clone; the decryption key
/// is shared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceContext {
    /// Tolerance applied to instant comparisons, in milliseconds.
    #[serde(default = "default_tolerance_ms")]
    pub tolerance_ms: u64,

    /// Assertion consumer service URL the response must be addressed to.
    pub destination: String,

    /// Entity ID of the identity provider.
    pub idp_entity_id: String,

    /// Entity ID of the service provider, the only accepted audience.
    pub sp_entity_id: String,

    /// Attribute names requested in the authentication request.
    ///
    /// Duplicates count towards the number of expected attributes.
    #[serde(default)]
    pub requested_attributes: Vec<String>,

    /// Minimum SPID level accepted.
    #[serde(default)]
    pub min_level: SpidLevel,

    /// SP key used for encrypted assertions.
    #[serde(skip)]
    pub decryption_key: Option<Arc<DecryptionKey>>,
}

impl ComplianceContext {
    /// Creates a context with the default tolerance, level 1 and no
    /// requested attributes.
    #[must_use]
    pub fn new(
        destination: impl Into<String>,
        idp_entity_id: impl Into<String>,
        sp_entity_id: impl Into<String>,
    ) -> Self {
        Self {
            tolerance_ms: DEFAULT_TOLERANCE_MS,
            destination: destination.into(),
            idp_entity_id: idp_entity_id.into(),
            sp_entity_id: sp_entity_id.into(),
            requested_attributes: Vec::new(),
            min_level: SpidLevel::L1,
            decryption_key: None,
        }
    }

    /// Sets the tolerance in milliseconds.
    #[must_use]
    pub const fn with_tolerance_ms(mut self, tolerance_ms: u64) -> Self {
        self.tolerance_ms = tolerance_ms;
        self
    }

    /// Sets the requested attribute names.
    #[must_use]
    pub fn with_requested_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requested_attributes = names.into_iter().map(Into::into).collect();
        self
    }

    /// Requests the attributes of an AgID consuming service.
    #[must_use]
    pub fn with_attribute_service(self, service: &AttributeConsumingService) -> Self {
        self.with_requested_attributes(service.requested_names())
    }

    /// Sets the minimum SPID level.
    #[must_use]
    pub const fn with_min_level(mut self, level: SpidLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Sets the key used for encrypted assertions.
    #[must_use]
    pub fn with_decryption_key(mut self, key: Arc<DecryptionKey>) -> Self {
        self.decryption_key = Some(key);
        self
    }

    /// Returns the requested attribute names.
    #[must_use]
    pub fn requested_names(&self) -> &[String] {
        &self.requested_attributes
    }

    /// Returns true if `name` was requested.
    #[must_use]
    pub fn is_requested(&self, name: &str) -> bool {
        self.requested_attributes.iter().any(|requested| requested == name)
    }
}
