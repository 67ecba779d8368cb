//! # Options
//!
//! Settings that shape the proof request and the checks applied to
//! non-revocation intervals.

use serde::{Deserialize, Serialize};

/// Library options. Implementers supply these through the
/// [`Config`](crate::provider::Config) provider trait.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Options {
    /// Version string written to every proof request.
    #[serde(default = "default_version")]
    pub proof_request_version: String,

    /// Proof request name used when the presentation definition does not have
    /// one.
    #[serde(default = "default_name")]
    pub default_proof_request_name: String,

    /// The widest non-revocation interval accepted, in seconds. The default
    /// of 0 requires `from`, when present, to equal `to` (Aries RFC 0441).
    #[serde(default)]
    pub max_non_revoked_interval: u64,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_name() -> String {
    "Proof request".to_string()
}

impl Default for Options {
    fn default() -> Self {
        Self {
            proof_request_version: default_version(),
            default_proof_request_name: default_name(),
            max_non_revoked_interval: 0,
        }
    }
}
