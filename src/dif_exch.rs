//! # Distributed Identity Foundation Presentation Exchange
//!
//! The subset of the Presentation Exchange data model needed to describe
//! `AnonCreds` presentation requirements: input descriptors with field
//! constraints, predicate filters, and credential status directives.
//!
//! Specifications:
//! - <https://identity.foundation/presentation-exchange/spec/v2.0.0>
//! - <https://identity.foundation/claim-format-registry>

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A Presentation Definition is used by a Verifier to articulate proofs
/// required. The proofs help the Verifier decide how to interact with the
/// Holder providing the proofs.
///
/// <https://identity.foundation/presentation-exchange/spec/v2.0.0/#presentation-definition>
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct PresentationDefinition {
    /// A unique ID for the desired context.
    pub id: String,

    /// Input Descriptors describe the information a Verifier requires from the
    /// Holder.
    pub input_descriptors: Vec<InputDescriptor>,

    /// If present, a human-friendly, distinctive designation for the
    /// Presentation Definition. Used as the proof request name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// If present, it MUST describe the purpose for which the Presentation
    /// Definition is being used for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,

    /// One or more registered Claim Format Designation objects (e.g.
    /// `di_vp`, `ldp_vc`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<HashMap<String, ClaimFormat>>,
}

impl PresentationDefinition {
    /// Find the Input Descriptor with the given id.
    #[must_use]
    pub fn descriptor(&self, id: &str) -> Option<&InputDescriptor> {
        self.input_descriptors.iter().find(|d| d.id == id)
    }
}

/// Input Descriptors describe the information a Verifier requires from the
/// Holder. All Input Descriptors MUST be satisfied, unless otherwise specified.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct InputDescriptor {
    /// An identifier that does not conflict with the id of any other Input
    /// Descriptor in the same Presentation Definition. Used as the base of
    /// every referent generated for the descriptor.
    pub id: String,

    /// If set, it SHOULD be a human-friendly name that describes what the
    /// target schema represents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// If present, its value MUST describe the purpose for which the Claim's
    /// data is being requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,

    /// Constrains submission of a single input to a subset of the top-level
    /// formats.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<HashMap<String, ClaimFormat>>,

    /// Contraints specify constraints on data values, and an explanation why a
    /// certain item or set of data is being requested.
    pub constraints: Constraints,
}

/// A registered Claim Format Designation object.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ClaimFormat {
    /// An array of one or more algorithmic identifiers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<Vec<String>>,

    /// An array of one or more proof type identifiers, e.g.
    /// `["DataIntegrityProof"]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_type: Option<Vec<String>>,
}

/// Contraints specify constraints on data values, and an explanation why a
/// certain item or set of data is being requested.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Constraints {
    /// Fields are used to specify attributes of credential data the Verifier
    /// requires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<Field>>,

    /// If present, `limit_disclosure` MUST be one of "required" or
    /// "preferred". Zero-knowledge presentations always limit disclosure to
    /// the requested fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_disclosure: Option<String>,

    /// Credential status requirements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<Statuses>,
}

/// Fields are used to specify attributes of credential data the Verifier
/// requires.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Field {
    /// If present, it MUST be unique from every other field object’s id
    /// property, including those contained in other Input Descriptor
    /// Objects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// One or more `JSONPath` expressions that select a target value from the
    /// input. Only paths into `$.credentialSubject` can be mapped to
    /// `AnonCreds` attributes.
    pub path: Vec<String>,

    /// If present, it MUST be a JSON Schema descriptor used to filter against
    /// the values returned from evaluation of the `JSONPath` expressions in
    /// the path array.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,

    /// The predicate Feature enables the Verifier to request that Wallet apply a
    /// predicate and return a boolean rather than the matching credential.
    /// When present, the `filter` field containing the predicate MUST also be
    /// present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicate: Option<Optionality>,

    /// If present, its MUST describe the purpose for which the field is being
    /// requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,

    /// If present, it SHOULD be a human-friendly name that describes what the
    /// target field represents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// If present, it MUST indicate whether the field is optional or not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,

    /// If present, MUST be a boolean that indicates the Verifier intends to retain
    /// the Claim's data being requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent_to_retain: Option<bool>,
}

impl Field {
    /// Returns `true` if the field requests a predicate rather than a
    /// revealed value.
    #[must_use]
    pub const fn is_predicate(&self) -> bool {
        self.predicate.is_some()
    }
}

/// Whether a feature is required or preferred.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Optionality {
    /// The feature MUST be applied.
    Required,

    /// The feature SHOULD be applied.
    Preferred,
}

/// A JSON Schema descriptor used to filter against the values returned from
/// evaluation of the `JSONPath` expressions in the path array.
///
/// Keywords are kept in their JSON form so that unsupported keywords can be
/// reported rather than dropped.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Filter {
    /// The JSON Schema type of the value, e.g. `number`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    /// Remaining JSON Schema keywords, e.g. `minimum` or `const`.
    #[serde(flatten)]
    pub keywords: Map<String, Value>,
}

/// Credential status requirements of an Input Descriptor.
///
/// <https://identity.foundation/presentation-exchange/spec/v2.0.0/#credential-status-constraint-feature>
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Statuses {
    /// Requirement on the credential being active (not revoked).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<StatusDirective>,

    /// Requirement on the credential being suspended.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspended: Option<StatusDirective>,

    /// Requirement on the credential being revoked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoked: Option<StatusDirective>,
}

/// A status requirement.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct StatusDirective {
    /// How the status is to be treated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directive: Option<Directive>,
}

/// Status directive values.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Directive {
    /// The credential MUST have the status.
    Required,

    /// The credential MAY have the status.
    Allowed,

    /// The credential MUST NOT have the status.
    Disallowed,

    /// A directive value this library does not recognise.
    #[serde(untagged)]
    Other(String),
}

impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required => write!(f, "required"),
            Self::Allowed => write!(f, "allowed"),
            Self::Disallowed => write!(f, "disallowed"),
            Self::Other(directive) => write!(f, "{directive}"),
        }
    }
}

/// A Presentation Submission expresses how proofs presented to the Verifier, in
/// accordance with the requirements specified in a Presentation Definition.
///
/// <https://identity.foundation/presentation-exchange/spec/v2.0.0/#presentation-submission>
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PresentationSubmission {
    /// The `id` MUST be a unique identifier, such as a UUID.
    pub id: String,

    /// The value of this property MUST be the id value of the Presentation
    /// Definition this submission fulfills.
    pub definition_id: String,

    /// An array of Input Descriptor Mapping Objects.
    pub descriptor_map: Vec<DescriptorMap>,
}

impl FromStr for PresentationSubmission {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self, Self::Err> {
        Ok(serde_json::from_str::<Self>(s)?)
    }
}

/// An Input Descriptor Mapping Object is used to map an Input Descriptor to a
/// presented credential.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct DescriptorMap {
    /// MUST match the Input Descriptor id in the Presentation Definition this
    /// Presentation Submission is related to.
    pub id: String,

    /// Denotes the data format of the Claim, e.g. `di_vc`.
    pub format: String,

    /// A `JSONPath` expression selecting the credential from the
    /// presentation, e.g. `$.verifiableCredential[0]`.
    pub path: String,

    /// Describes how to find a credential nested inside the selected object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_nested: Option<PathNested>,
}

/// A nested path object is used to describe how to find a returned Credential
/// within the Verifiable Presentation.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PathNested {
    /// Format of the credential returned in the Verifiable Presentation.
    pub format: String,

    /// Describes how to find a returned Credential within a Verifiable
    /// Presentation. The value depends on the credential format.
    pub path: String,
}
