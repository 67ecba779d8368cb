//! # Registry Objects
//!
//! `AnonCreds` objects resolved from a registry. Cryptographic material is
//! carried as opaque JSON and handed to the native proof primitives untouched.
//!
//! <https://hyperledger.github.io/anoncreds-spec>

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A credential schema.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Identifier of the schema publisher.
    pub issuer_id: String,

    /// Schema name.
    pub name: String,

    /// Schema version.
    pub version: String,

    /// Names of the attributes the schema defines.
    pub attr_names: Vec<String>,
}

/// A credential definition.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDefinition {
    /// Identifier of the credential definition publisher.
    pub issuer_id: String,

    /// Identifier of the schema the definition is based on.
    pub schema_id: String,

    /// Signature type. Always `CL`.
    #[serde(rename = "type")]
    pub type_: String,

    /// Tag distinguishing definitions for the same schema.
    pub tag: String,

    /// Public key material.
    pub value: Value,
}

/// A revocation registry definition.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RevocationRegistryDefinition {
    /// Identifier of the registry publisher.
    pub issuer_id: String,

    /// Registry type. Always `CL_ACCUM`.
    pub revoc_def_type: String,

    /// Identifier of the credential definition the registry belongs to.
    pub cred_def_id: String,

    /// Tag distinguishing registries for the same credential definition.
    pub tag: String,

    /// Registry values.
    pub value: RevocationRegistryValue,
}

/// Values of a [`RevocationRegistryDefinition`].
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RevocationRegistryValue {
    /// Accumulator public keys.
    pub public_keys: Value,

    /// Maximum number of credentials the registry can hold.
    pub max_cred_num: u32,

    /// Location the tails file is published at.
    pub tails_location: String,

    /// Hash of the tails file.
    pub tails_hash: String,
}

/// The state of a revocation registry at a point in time.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RevocationStatusList {
    /// Identifier of the registry publisher.
    pub issuer_id: String,

    /// Identifier of the revocation registry definition.
    pub rev_reg_def_id: String,

    /// One entry per credential index: 1 if revoked, 0 otherwise.
    pub revocation_list: Vec<u8>,

    /// Accumulator value at `timestamp`.
    pub current_accumulator: String,

    /// Time the list took effect. May differ from the time it was fetched for
    /// on append-only registries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

/// Diagnostics returned by a registry alongside a lookup.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ResolutionMetadata {
    /// Machine readable error code, e.g. `notFound`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Human readable error description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The outcome of a registry lookup. Absence is reported with `object` set
/// to `None`, not as an error.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Resolution<T> {
    /// The resolved object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<T>,

    /// Resolution diagnostics.
    #[serde(default)]
    pub metadata: ResolutionMetadata,
}

impl<T> Resolution<T> {
    /// A successful lookup.
    pub fn found(object: T) -> Self {
        Self {
            object: Some(object),
            metadata: ResolutionMetadata::default(),
        }
    }

    /// A lookup that found nothing.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            object: None,
            metadata: ResolutionMetadata {
                error: Some("notFound".into()),
                message: Some(message.into()),
            },
        }
    }

    /// Describes why the lookup found nothing, for inclusion in error messages.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        match (&self.metadata.error, &self.metadata.message) {
            (Some(error), Some(message)) => format!("{error}: {message}"),
            (Some(text), None) | (None, Some(text)) => text.clone(),
            (None, None) => "no resolution metadata".into(),
        }
    }
}
