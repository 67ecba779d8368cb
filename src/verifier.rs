//! # Verify Presentation
//!
//! Verifies an `AnonCreds` presentation received in response to a
//! Presentation Exchange request.
//!
//! The proof request is rebuilt from the verifier's own Presentation
//! Definition and the credentials embedded in the presentation. A proof
//! request supplied by the holder is never used. Revocation state is resolved
//! at the timestamps recorded in the presentation.
//!
//! A presentation that does not satisfy the request is a successful
//! verification with `verified` set to `false`. An error means the
//! presentation could not be checked.

use std::collections::BTreeSet;

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::dif_exch::{PresentationDefinition, PresentationSubmission};
use crate::format::PresentedCredential;
use crate::handle::{NativeHandle, NativePresentation};
use crate::proof_request::builder::{self, ProofRequestParts};
use crate::provider::{VerificationMetadata, Verifier};
use crate::revocation::{self, RevocationFetchMetadata};
use crate::{resolver, Error, Result};

/// Request to verify a presentation.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct VerifyPresentationRequest {
    /// The received presentation.
    pub presentation: Value,

    /// The Presentation Definition the presentation responds to.
    pub presentation_definition: PresentationDefinition,

    /// The holder's Presentation Submission.
    pub presentation_submission: PresentationSubmission,

    /// The challenge sent to the holder.
    pub challenge: String,
}

/// The verification result.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct VerifyPresentationResponse {
    /// `true` when the presentation satisfies the Presentation Definition.
    pub verified: bool,
}

/// Verify a presentation against the Presentation Definition it responds to.
///
/// # Errors
///
/// Returns an error if the presentation cannot be translated to a proof
/// request, contains a credential that is not an `AnonCreds` credential, a
/// referenced object cannot be resolved, revocation state is inconsistent,
/// or the native proof primitive fails.
#[instrument(level = "debug", skip(provider))]
pub async fn verify_presentation(
    provider: impl Verifier, request: VerifyPresentationRequest,
) -> Result<VerifyPresentationResponse> {
    process(&provider, request).await
}

async fn process(
    provider: &impl Verifier, request: VerifyPresentationRequest,
) -> Result<VerifyPresentationResponse> {
    tracing::debug!("verify_presentation::process");

    let credential_definition_ids = builder::embedded_credentials(&request.presentation)?
        .iter()
        .map(credential_definition_id)
        .collect::<Result<BTreeSet<_>>>()?;

    let options = provider.options();
    let parts = builder::build(
        &request.presentation_definition,
        &request.presentation_submission,
        &request.presentation,
        &request.challenge,
        &options,
        builder::now(),
    )?;

    let handle = NativeHandle::new(
        provider.load_presentation(&request.presentation).map_err(Error::Native)?,
    );
    let fetches = revocation_fetches(&parts, &*handle);

    // schemas are derived from the credential definitions
    let resolved =
        resolver::resolve(provider, &BTreeSet::new(), &credential_definition_ids).await?;

    let mut metadata = VerificationMetadata {
        schemas: resolved.schemas,
        credential_definitions: resolved.credential_definitions,
        ..VerificationMetadata::default()
    };

    tracing::debug!("verify_presentation::revocation");
    let revocation = try_join_all(
        fetches
            .iter()
            .map(|fetch| revocation::revocation_metadata(provider, fetch, true, &options)),
    )
    .await?;
    for rev in revocation {
        metadata
            .revocation_status_lists
            .entry(rev.revocation_registry_id.clone())
            .or_default()
            .insert(rev.updated_timestamp, rev.status_list);
        metadata.revocation_registry_definitions.insert(rev.revocation_registry_id, rev.definition);
        metadata.interval_overrides.extend(rev.interval_override);
    }

    tracing::debug!("verify_presentation::native");
    let verified = provider
        .verify_presentation(&handle, &parts.proof_request, &metadata)
        .map_err(Error::Native)?;
    if !verified {
        tracing::debug!("verify_presentation::not_verified");
    }

    Ok(VerifyPresentationResponse { verified })
}

// The credential definition a credential is restricted to must be the one its
// proof was created with.
fn credential_definition_id(credential: &Value) -> Result<String> {
    let vc = PresentedCredential::from_json(credential)?.into_anoncreds()?;
    if vc.proof.verification_method != vc.credential_definition_id() {
        return Err(Error::InvalidCredential(format!(
            "verification method {} is not credential definition {}",
            vc.proof.verification_method,
            vc.credential_definition_id()
        )));
    }
    Ok(vc.credential_schema.definition)
}

// Credentials proven unrevoked are checked at the timestamp recorded in the
// presentation.
fn revocation_fetches(
    parts: &ProofRequestParts, presentation: &impl NativePresentation,
) -> Vec<RevocationFetchMetadata> {
    parts
        .selections
        .iter()
        .filter_map(|selection| {
            let interval = selection.metadata.non_revoked?;
            Some(RevocationFetchMetadata {
                revocation_registry_id: selection
                    .credential
                    .revocation_registry_id()
                    .unwrap_or_default()
                    .to_string(),
                revocation_registry_index: None,
                non_revoked_interval: interval,
                timestamp: presentation.timestamp(selection.entry_index),
            })
        })
        .collect()
}
