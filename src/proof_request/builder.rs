//! # Proof Request Builder
//!
//! Translates a Presentation Definition and Submission, together with the
//! credentials being presented, into an `AnonCreds` proof request and the
//! instructions binding each credential to the request's referents.
//!
//! Each entry in the submission's descriptor map is translated on its own and
//! the per-descriptor results are then folded into a single request. Holder
//! and verifier share this step and add their own resolution afterwards.

use std::collections::BTreeSet;

use chrono::Utc;
use serde_json::Value;
use serde_json_path::JsonPath;

use super::{
    claim, predicate, AttributeNames, AttributeRequest, CredentialWithMetadata,
    NonRevokedInterval, PredicateRequest, ProofRequest, ProveInstruction, Restriction,
};
use crate::config::Options;
use crate::dif_exch::{
    DescriptorMap, Directive, InputDescriptor, PresentationDefinition, PresentationSubmission,
};
use crate::format::{AnonCredsCredential, PresentedCredential};
use crate::{Error, Result};

/// A presented credential selected by the submission.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    /// Index of the credential in the list of presented credentials.
    pub entry_index: usize,

    /// Id of the Input Descriptor the credential satisfies.
    pub descriptor_id: String,

    /// The `AnonCreds` view of the credential.
    pub credential: AnonCredsCredential,

    /// The credential with its revocation requirements.
    pub metadata: CredentialWithMetadata,
}

/// The proof request and everything derived alongside it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProofRequestParts {
    /// The proof request.
    pub proof_request: ProofRequest,

    /// Instructions binding credentials to referents, in submission order.
    pub prove_instructions: Vec<ProveInstruction>,

    /// Selected credentials, in submission order.
    pub selections: Vec<Selection>,

    /// Schemas referenced by the selected credentials.
    pub schema_ids: BTreeSet<String>,

    /// Credential definitions referenced by the selected credentials.
    pub credential_definition_ids: BTreeSet<String>,
}

/// Build a proof request from a presentation definition, the submission
/// mapping its descriptors to credentials, and the presentation embedding the
/// credentials.
///
/// Submission paths are evaluated against `presentation`, e.g.
/// `$.verifiableCredential[0]`. `challenge` is the presentation challenge the
/// nonce is derived from and `now` (seconds since the Unix epoch) is used for
/// non-revocation intervals.
///
/// # Errors
///
/// Returns an error if a descriptor, credential, claim path, predicate filter,
/// or status directive cannot be translated.
pub fn build(
    definition: &PresentationDefinition, submission: &PresentationSubmission,
    presentation: &Value, challenge: &str, options: &Options, now: u64,
) -> Result<ProofRequestParts> {
    tracing::debug!("builder::build");

    let credentials = embedded_credentials(presentation)?;

    let parts = ProofRequestParts {
        proof_request: ProofRequest {
            name: definition
                .name
                .clone()
                .unwrap_or_else(|| options.default_proof_request_name.clone()),
            version: options.proof_request_version.clone(),
            nonce: super::nonce(challenge),
            ..ProofRequest::default()
        },
        ..ProofRequestParts::default()
    };

    submission
        .descriptor_map
        .iter()
        .map(|mapping| descriptor_request(definition, mapping, presentation, credentials, now))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .try_fold(parts, ProofRequestParts::merge)
}

/// The credentials embedded in a presentation. A presentation embeds one
/// credential as an object or several as an array.
///
/// # Errors
///
/// Returns `InvalidCredential` if the presentation embeds no credentials.
pub fn embedded_credentials(presentation: &Value) -> Result<&[Value]> {
    match presentation.get("verifiableCredential") {
        Some(Value::Array(credentials)) if !credentials.is_empty() => Ok(credentials),
        Some(credential @ Value::Object(_)) => Ok(std::slice::from_ref(credential)),
        _ => Err(Error::InvalidCredential(
            "presentation contains no verifiable credentials".into(),
        )),
    }
}

/// The current time in seconds since the Unix epoch.
pub(crate) fn now() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or_default()
}

// The portion of the proof request generated for a single descriptor.
#[derive(Debug)]
struct DescriptorRequest {
    attribute: Option<(String, AttributeRequest)>,
    predicates: Vec<(String, PredicateRequest)>,
    prove_instructions: Vec<ProveInstruction>,
    selection: Selection,
}

fn descriptor_request(
    definition: &PresentationDefinition, mapping: &DescriptorMap, presentation: &Value,
    credentials: &[Value], now: u64,
) -> Result<DescriptorRequest> {
    let Some(descriptor) = definition.descriptor(&mapping.id) else {
        return Err(Error::DescriptorNotFound(mapping.id.clone()));
    };
    let Some(fields) = descriptor.constraints.fields.as_ref().filter(|f| !f.is_empty()) else {
        return Err(Error::MissingFields(descriptor.id.clone()));
    };

    let (entry_index, document) = extract(mapping, presentation, credentials)?;
    let credential = PresentedCredential::from_json(document)?.into_anoncreds()?;
    let non_revoked = non_revoked(descriptor, &credential, now)?;
    let restrictions = vec![Restriction::cred_def(credential.credential_definition_id())];

    let attribute_referent = format!("{}_attribute", descriptor.id);
    let mut attribute: Option<AttributeRequest> = None;
    let mut predicates = vec![];
    let mut prove_instructions = vec![];

    for field in fields {
        let name = claim::primary_name(field)?;

        if field.is_predicate() {
            for (p_type, p_value) in predicate::predicates(field.filter.as_ref())? {
                let referent = format!("{}_predicate_{}", descriptor.id, predicates.len());
                predicates.push((
                    referent.clone(),
                    PredicateRequest {
                        name: name.clone(),
                        p_type,
                        p_value,
                        restrictions: restrictions.clone(),
                        non_revoked,
                    },
                ));
                prove_instructions.push(ProveInstruction {
                    entry_index,
                    referent,
                    is_predicate: true,
                    reveal: true,
                });
            }
            continue;
        }

        // all revealed claims for a descriptor share one attribute group
        if let Some(attribute) = &mut attribute {
            attribute.names.add(name);
        } else {
            attribute = Some(AttributeRequest {
                names: AttributeNames::Name(name),
                restrictions: restrictions.clone(),
                non_revoked,
            });
            prove_instructions.push(ProveInstruction {
                entry_index,
                referent: attribute_referent.clone(),
                is_predicate: false,
                reveal: true,
            });
        }
    }

    Ok(DescriptorRequest {
        attribute: attribute.map(|a| (attribute_referent, a)),
        predicates,
        prove_instructions,
        selection: Selection {
            entry_index,
            descriptor_id: descriptor.id.clone(),
            metadata: CredentialWithMetadata {
                credential: document.clone(),
                non_revoked,
                timestamp: None,
            },
            credential,
        },
    })
}

// Find the credential the descriptor mapping points to. The selected node must
// be one of the embedded credentials, not merely equal to one.
fn extract<'a>(
    mapping: &DescriptorMap, presentation: &'a Value, credentials: &[Value],
) -> Result<(usize, &'a Value)> {
    let mut node = query(&mapping.path, presentation)?;
    if let Some(nested) = &mapping.path_nested {
        node = query(&nested.path, node)?;
    }

    let Some(entry_index) = credentials.iter().position(|c| std::ptr::eq(c, node)) else {
        return Err(Error::CredentialNotFound(mapping.path.clone()));
    };
    Ok((entry_index, node))
}

fn query<'a>(path: &str, value: &'a Value) -> Result<&'a Value> {
    let jpath = JsonPath::parse(path)
        .map_err(|e| Error::CredentialExtractionFailed(format!("invalid path {path}: {e}")))?;
    jpath.query(value).exactly_one().map_err(|_| {
        Error::CredentialExtractionFailed(format!("{path} does not select exactly one credential"))
    })
}

// Credentials are checked for revocation at the current instant when the
// descriptor asks for active credentials.
fn non_revoked(
    descriptor: &InputDescriptor, credential: &AnonCredsCredential, now: u64,
) -> Result<Option<NonRevokedInterval>> {
    let Some(active) = descriptor.constraints.statuses.as_ref().and_then(|s| s.active.as_ref())
    else {
        return Ok(None);
    };

    match &active.directive {
        None => Ok(None),
        Some(Directive::Required | Directive::Allowed) => {
            if credential.revocation_registry_id().is_none() {
                return Err(Error::CredentialNotRevocable(descriptor.id.clone()));
            }
            Ok(Some(NonRevokedInterval::at(now)))
        }
        Some(directive) => Err(Error::UnsupportedStatusDirective(directive.to_string())),
    }
}

impl ProofRequestParts {
    fn merge(mut self, request: DescriptorRequest) -> Result<Self> {
        if let Some((referent, attribute)) = request.attribute {
            if self.proof_request.requested_attributes.contains_key(&referent) {
                return Err(Error::DuplicateReferent(referent));
            }
            self.proof_request.requested_attributes.insert(referent, attribute);
        }
        for (referent, predicate) in request.predicates {
            if self.proof_request.requested_predicates.contains_key(&referent) {
                return Err(Error::DuplicateReferent(referent));
            }
            self.proof_request.requested_predicates.insert(referent, predicate);
        }

        let selection = request.selection;
        self.schema_ids.insert(selection.credential.schema_id().to_string());
        self.credential_definition_ids
            .insert(selection.credential.credential_definition_id().to_string());
        self.prove_instructions.extend(request.prove_instructions);
        self.selections.push(selection);

        Ok(self)
    }
}
