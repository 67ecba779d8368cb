//! # `AnonCreds` Proof Request
//!
//! The proof request handed to the native proof primitives, and the
//! instructions binding presented credentials to its referents. Field names
//! follow the `AnonCreds` wire format so requests interoperate with other
//! `AnonCreds` verifiers.
//!
//! <https://hyperledger.github.io/anoncreds-spec/#create-presentation-request>

pub mod builder;
pub mod claim;
pub mod predicate;

use std::collections::BTreeMap;
use std::fmt;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Number of decimal digits in a proof request nonce.
const NONCE_DIGITS: usize = 20;

/// An `AnonCreds` proof request.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ProofRequest {
    /// Proof request name.
    pub name: String,

    /// Proof request version.
    pub version: String,

    /// Decimal nonce binding the proof to the request.
    pub nonce: String,

    /// Attributes to reveal, by referent.
    pub requested_attributes: BTreeMap<String, AttributeRequest>,

    /// Predicates to prove, by referent.
    pub requested_predicates: BTreeMap<String, PredicateRequest>,
}

/// A request to reveal one or more attributes from the same credential.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct AttributeRequest {
    /// The attribute name(s) requested.
    #[serde(flatten)]
    pub names: AttributeNames,

    /// Restrictions on the credentials that may satisfy the request.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<Restriction>,

    /// Interval over which the credential must not have been revoked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_revoked: Option<NonRevokedInterval>,
}

/// Serialized as `name` for a single attribute and `names` for a group.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttributeNames {
    /// A single attribute.
    Name(String),

    /// A group of attributes revealed from the same credential.
    Names(Vec<String>),
}

impl AttributeNames {
    /// Adds an attribute name. A single name is converted to a group.
    pub fn add(&mut self, name: impl Into<String>) {
        match self {
            Self::Name(first) => {
                *self = Self::Names(vec![std::mem::take(first), name.into()]);
            }
            Self::Names(names) => names.push(name.into()),
        }
    }

    /// Returns the number of attribute names.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Name(_) => 1,
            Self::Names(names) => names.len(),
        }
    }

    /// Returns `true` if the group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Name(_) => false,
            Self::Names(names) => names.is_empty(),
        }
    }

    /// Iterates over the attribute names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let names: Vec<&str> = match self {
            Self::Name(name) => vec![name.as_str()],
            Self::Names(names) => names.iter().map(String::as_str).collect(),
        };
        names.into_iter()
    }
}

/// A request to prove a predicate over a numeric attribute.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct PredicateRequest {
    /// The attribute the predicate applies to.
    pub name: String,

    /// Comparison operator.
    pub p_type: PredicateType,

    /// Value the attribute is compared to.
    pub p_value: i32,

    /// Restrictions on the credentials that may satisfy the request.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<Restriction>,

    /// Interval over which the credential must not have been revoked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_revoked: Option<NonRevokedInterval>,
}

/// `AnonCreds` predicate operators.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum PredicateType {
    /// Greater than.
    #[serde(rename = ">")]
    GreaterThan,

    /// Greater than or equal to.
    #[serde(rename = ">=")]
    GreaterThanOrEqual,

    /// Less than.
    #[serde(rename = "<")]
    LessThan,

    /// Less than or equal to.
    #[serde(rename = "<=")]
    LessThanOrEqual,
}

impl PredicateType {
    /// Evaluates `attribute <op> value`.
    #[must_use]
    pub const fn holds(self, attribute: i64, value: i64) -> bool {
        match self {
            Self::GreaterThan => attribute > value,
            Self::GreaterThanOrEqual => attribute >= value,
            Self::LessThan => attribute < value,
            Self::LessThanOrEqual => attribute <= value,
        }
    }
}

impl fmt::Display for PredicateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GreaterThan => write!(f, ">"),
            Self::GreaterThanOrEqual => write!(f, ">="),
            Self::LessThan => write!(f, "<"),
            Self::LessThanOrEqual => write!(f, "<="),
        }
    }
}

/// Restricts the credentials that may satisfy a request.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Restriction {
    /// Credential definition the credential must be issued under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cred_def_id: Option<String>,
}

impl Restriction {
    /// Restrict to credentials issued under the given credential definition.
    #[must_use]
    pub fn cred_def(cred_def_id: impl Into<String>) -> Self {
        Self {
            cred_def_id: Some(cred_def_id.into()),
        }
    }
}

/// Interval over which a credential must not have been revoked, in seconds
/// since the Unix epoch.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct NonRevokedInterval {
    /// Start of the interval.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<u64>,

    /// End of the interval.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<u64>,
}

impl NonRevokedInterval {
    /// An interval covering a single instant.
    #[must_use]
    pub const fn at(timestamp: u64) -> Self {
        Self {
            from: Some(timestamp),
            to: Some(timestamp),
        }
    }
}

/// Binds a presented credential to a referent in the proof request.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProveInstruction {
    /// Index of the credential in the list of presented credentials.
    pub entry_index: usize,

    /// Referent in the proof request.
    pub referent: String,

    /// `true` if the referent is a requested predicate.
    pub is_predicate: bool,

    /// `true` if attribute values are revealed.
    pub reveal: bool,
}

/// A presented credential along with its revocation requirements.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct CredentialWithMetadata {
    /// The credential as presented.
    pub credential: Value,

    /// Interval over which the credential must not have been revoked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_revoked: Option<NonRevokedInterval>,

    /// Timestamp of the revocation state the credential is proven against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

/// Derive a proof request nonce from a presentation challenge.
///
/// The nonce is the first 20 decimal digits of the SHA-256 digest of the
/// challenge, read as a big-endian unsigned integer.
#[must_use]
pub fn nonce(challenge: &str) -> String {
    let digest = Sha256::digest(challenge.as_bytes());
    BigUint::from_bytes_be(&digest).to_str_radix(10).chars().take(NONCE_DIGITS).collect()
}
