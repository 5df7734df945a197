//! SAML 2.0 types consumed by the compliance checker.
//!
//! These are the parsed forms of protocol messages. They are produced upstream
//! by an XML parser and only read here, so most fields are optional: a missing
//! element is a compliance failure, not a deserialization error.

mod assertion;
mod constants;
mod name_id;
mod response;
mod status;
mod timestamp;

pub use assertion::*;
pub use constants::*;
pub use name_id::*;
pub use response::*;
pub use status::*;
pub use timestamp::*;
