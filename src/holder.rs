//! # Create Presentation
//!
//! Creates an `AnonCreds` presentation satisfying a Presentation Exchange
//! request.
//!
//! The holder selects the credentials to present and describes the selection
//! in a Presentation Submission. The library translates the definition and
//! submission into an `AnonCreds` proof request, checks each selected
//! credential against its stored record, resolves the schemas, credential
//! definitions, link secret and revocation state the proof needs, and then
//! asks the native proof primitives to create the presentation.

use std::collections::{BTreeMap, BTreeSet};

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::instrument;

use crate::config::Options;
use crate::dif_exch::{PresentationDefinition, PresentationSubmission};
use crate::handle::{NativeHandle, NativePresentation};
use crate::proof_request::builder::{self, ProofRequestParts, Selection};
use crate::proof_request::ProofRequest;
use crate::provider::{CredentialEntry, Holder, PresentationMetadata};
use crate::revocation::{self, RevocationFetchMetadata, RevocationMetadata};
use crate::{resolver, Error, Result};

/// Request to create a presentation.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct CreatePresentationRequest {
    /// The verifier's Presentation Definition.
    pub presentation_definition: PresentationDefinition,

    /// Maps the definition's input descriptors to `credentials`. Paths are
    /// relative to a presentation embedding `credentials` as its
    /// `verifiableCredential` array.
    pub presentation_submission: PresentationSubmission,

    /// The credentials to present.
    pub credentials: Vec<Value>,

    /// The stored record of each credential in `credentials`, in the same
    /// order.
    pub records: Vec<CredentialRecord>,

    /// The verifier's challenge.
    pub challenge: String,
}

/// A stored `AnonCreds` credential and the tags derived for it at issuance.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CredentialRecord {
    /// The stored credential.
    pub credential: Value,

    /// Link secret the credential was issued to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_secret_id: Option<String>,

    /// Schema the credential was issued under.
    pub schema_id: String,

    /// Credential definition the credential was issued under.
    pub credential_definition_id: String,

    /// Revocation registry the credential was issued into.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation_registry_id: Option<String>,

    /// Index of the credential in the revocation registry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_revocation_id: Option<u32>,
}

/// The created presentation.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct CreatePresentationResponse {
    /// The presentation, ready to send to the verifier.
    pub presentation: Value,

    /// The proof request the presentation satisfies.
    pub proof_request: ProofRequest,
}

/// Create a presentation satisfying the Presentation Definition using the
/// credentials selected by the Presentation Submission.
///
/// # Errors
///
/// Returns an error if the request cannot be translated to a proof request,
/// the selected credentials do not match their records or do not share a
/// single link secret, a referenced object cannot be resolved, or the native
/// proof primitive fails.
#[instrument(level = "debug", skip(provider))]
pub async fn create_presentation(
    provider: impl Holder, request: CreatePresentationRequest,
) -> Result<CreatePresentationResponse> {
    process(&provider, request).await
}

async fn process(
    provider: &impl Holder, request: CreatePresentationRequest,
) -> Result<CreatePresentationResponse> {
    tracing::debug!("create_presentation::process");

    let options = provider.options();
    let presentation = json!({"verifiableCredential": request.credentials});
    let parts = builder::build(
        &request.presentation_definition,
        &request.presentation_submission,
        &presentation,
        &request.challenge,
        &options,
        builder::now(),
    )?;

    let selected = SelectedRecords::collect(&parts, &request.records)?;
    let link_secret_id = selected.link_secret_id()?;

    let resolved =
        resolver::resolve(provider, &selected.schema_ids, &selected.credential_definition_ids)
            .await?;
    let link_secret = provider.link_secret(link_secret_id).await?;
    let revocation = revocation_metadata(provider, &parts, &selected, &options).await?;

    let mut credentials: Vec<CredentialEntry<_>> = request
        .credentials
        .into_iter()
        .map(|credential| CredentialEntry {
            credential,
            timestamp: None,
            revocation_state: None,
        })
        .collect();
    for (entry_index, metadata) in revocation {
        let entry = &mut credentials[entry_index];
        entry.timestamp = Some(metadata.updated_timestamp);
        entry.revocation_state = metadata.revocation_state;
    }

    let metadata = PresentationMetadata {
        schemas: resolved.schemas,
        credential_definitions: resolved.credential_definitions,
        link_secret,
        prove_instructions: parts.prove_instructions,
        credentials,
    };

    tracing::debug!("create_presentation::native");
    let handle = NativeHandle::new(
        provider.create_presentation(&parts.proof_request, &metadata).map_err(Error::Native)?,
    );
    let presentation = handle.to_json().map_err(Error::Native)?;

    Ok(CreatePresentationResponse {
        presentation,
        proof_request: parts.proof_request,
    })
}

// Identifiers collected from the records of the selected credentials.
#[derive(Debug, Default)]
struct SelectedRecords<'a> {
    link_secret_ids: BTreeSet<&'a str>,
    schema_ids: BTreeSet<String>,
    credential_definition_ids: BTreeSet<String>,
    records: BTreeMap<usize, &'a CredentialRecord>,
}

impl<'a> SelectedRecords<'a> {
    fn collect(parts: &ProofRequestParts, records: &'a [CredentialRecord]) -> Result<Self> {
        parts.selections.iter().try_fold(Self::default(), |mut selected, selection| {
            let record = record(selection, records)?;
            if let Some(id) = &record.link_secret_id {
                selected.link_secret_ids.insert(id);
            }
            selected.schema_ids.insert(record.schema_id.clone());
            selected.credential_definition_ids.insert(record.credential_definition_id.clone());
            selected.records.insert(selection.entry_index, record);
            Ok(selected)
        })
    }

    fn link_secret_id(&self) -> Result<&'a str> {
        let mut ids = self.link_secret_ids.iter();
        match (ids.next(), ids.next()) {
            (None, _) => Err(Error::NoLinkSecret),
            (Some(&id), None) => Ok(id),
            (Some(_), Some(_)) => Err(Error::MultipleLinkSecrets),
        }
    }
}

// The record for a selected credential must hold exactly the presented JSON.
fn record<'a>(
    selection: &Selection, records: &'a [CredentialRecord],
) -> Result<&'a CredentialRecord> {
    let Some(record) = records.get(selection.entry_index) else {
        return Err(Error::CredentialNotFound(format!(
            "no record for credential {}",
            selection.entry_index
        )));
    };
    if record.credential != selection.metadata.credential {
        tracing::warn!("credential {} does not match its record", selection.entry_index);
        return Err(Error::CredentialMismatch(format!(
            "credential {} for descriptor {}",
            selection.entry_index, selection.descriptor_id
        )));
    }
    Ok(record)
}

// Resolve revocation state for every selected credential that must be proven
// unrevoked.
async fn revocation_metadata<P: Holder>(
    provider: &P, parts: &ProofRequestParts, selected: &SelectedRecords<'_>, options: &Options,
) -> Result<Vec<(usize, RevocationMetadata<P::RevocationState>)>> {
    let fetches = parts.selections.iter().filter_map(|selection| {
        let interval = selection.metadata.non_revoked?;
        let record = selected.records.get(&selection.entry_index);
        let revocation_registry_id = record
            .and_then(|r| r.revocation_registry_id.as_deref())
            .or_else(|| selection.credential.revocation_registry_id())
            .unwrap_or_default()
            .to_string();

        let fetch = RevocationFetchMetadata {
            revocation_registry_id,
            revocation_registry_index: record.and_then(|r| r.credential_revocation_id),
            non_revoked_interval: interval,
            timestamp: None,
        };
        Some((selection.entry_index, fetch))
    });

    try_join_all(fetches.map(|(entry_index, fetch)| async move {
        let metadata = revocation::revocation_metadata(provider, &fetch, false, options).await?;
        Ok::<_, Error>((entry_index, metadata))
    }))
    .await
}
