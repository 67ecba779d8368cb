//! # Revocation Metadata
//!
//! Resolves the revocation registry state a credential is proven against at a
//! point in time.
//!
//! Append-only registries return the status list in effect at a requested
//! time, which may have been published earlier. When a verifier asks for a
//! credential to be unrevoked from a time later than the status list the
//! holder used, the registry is asked for the list in effect at that later
//! time. If it is the same list, the holder's list is accepted for the whole
//! interval and an override is recorded for the native verifier.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::Options;
use crate::proof_request::NonRevokedInterval;
use crate::provider::{ProofSystem, Registry, RevocationStateInput, TailsFileCache};
use crate::registry::{RevocationRegistryDefinition, RevocationStatusList};
use crate::{Error, Result};

/// Identifies the revocation state to resolve for a credential.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RevocationFetchMetadata {
    /// Revocation registry the credential was issued into.
    pub revocation_registry_id: String,

    /// Index of the credential in the registry. Only known to the holder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation_registry_index: Option<u32>,

    /// Interval over which the credential must not have been revoked.
    pub non_revoked_interval: NonRevokedInterval,

    /// Timestamp of the status list the credential was proven against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

/// Accepts a status list for a `from` time later than the time it was
/// published at.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NonRevokedIntervalOverride {
    /// Timestamp of the status list used in the proof.
    pub override_revocation_status_list_timestamp: u64,

    /// The requested `from` time.
    pub requested_from_timestamp: u64,

    /// The revocation registry.
    pub revocation_registry_definition_id: String,
}

/// Resolved revocation state for a credential.
#[derive(Clone, Debug)]
pub struct RevocationMetadata<S> {
    /// Timestamp of the resolved status list.
    pub updated_timestamp: u64,

    /// Revocation registry id.
    pub revocation_registry_id: String,

    /// Revocation registry definition.
    pub definition: RevocationRegistryDefinition,

    /// The status list in effect at `updated_timestamp`.
    pub status_list: RevocationStatusList,

    /// Revocation state, built when the credential's registry index is known.
    pub revocation_state: Option<S>,

    /// Set when the status list was accepted for a later `from` time.
    pub interval_override: Option<NonRevokedIntervalOverride>,
}

/// Check a non-revocation interval follows Aries RFC 0441: `to` is required
/// and `from`, when present, is no more than `max_non_revoked_interval`
/// seconds before `to`.
///
/// # Errors
///
/// Returns `InvalidRevocationInterval` if the interval is not acceptable.
pub fn check_interval(interval: &NonRevokedInterval, options: &Options) -> Result<()> {
    let Some(to) = interval.to else {
        return Err(Error::InvalidRevocationInterval(
            "proof of non-revocation requested with no 'to' value".into(),
        ));
    };
    let Some(from) = interval.from else {
        return Ok(());
    };

    if from > to {
        return Err(Error::InvalidRevocationInterval(format!(
            "'from' ({from}) is later than 'to' ({to})"
        )));
    }
    if to - from > options.max_non_revoked_interval {
        return Err(Error::InvalidRevocationInterval(format!(
            "interval of {}s exceeds the maximum of {}s",
            to - from,
            options.max_non_revoked_interval
        )));
    }
    Ok(())
}

/// Resolve the registry definition, status list, and (for the holder)
/// revocation state for a credential.
///
/// The status list is fetched at `fetch.timestamp`, or the interval's `to`
/// time when there is no timestamp. Set `must_have_timestamp` when the
/// timestamp is read from a presentation, as a verifier does.
///
/// # Errors
///
/// Returns an error if the metadata or interval is invalid, the registry
/// definition or status list cannot be resolved, or the registry's status
/// list for the requested `from` time differs from the one fetched.
#[instrument(level = "debug", skip(provider, options))]
pub async fn revocation_metadata<P>(
    provider: &P, fetch: &RevocationFetchMetadata, must_have_timestamp: bool, options: &Options,
) -> Result<RevocationMetadata<P::RevocationState>>
where
    P: Registry + TailsFileCache + ProofSystem,
{
    tracing::debug!("revocation::revocation_metadata");

    if fetch.revocation_registry_id.is_empty() {
        return Err(Error::InvalidRevocationMetadata("no revocation registry id".into()));
    }
    if must_have_timestamp && fetch.timestamp.is_none() {
        return Err(Error::InvalidRevocationMetadata(format!(
            "no timestamp for revocation registry {}",
            fetch.revocation_registry_id
        )));
    }

    let interval = &fetch.non_revoked_interval;
    check_interval(interval, options)?;

    let registry_id = &fetch.revocation_registry_id;
    let resolution = provider.revocation_registry_definition(registry_id).await?;
    let Some(definition) = resolution.object else {
        return Err(Error::RegistryNotFound(format!("{registry_id}: {}", resolution.diagnostic())));
    };

    let tails = provider.tails_file(&definition).await?;

    let Some(timestamp_to_fetch) = fetch.timestamp.or(interval.to) else {
        return Err(Error::InvalidRevocationMetadata(format!(
            "no timestamp or interval to fetch revocation registry {registry_id} at"
        )));
    };

    tracing::debug!("revocation::status_list");
    let resolution = provider.revocation_status_list(registry_id, timestamp_to_fetch).await?;
    let Some(status_list) = resolution.object else {
        return Err(Error::StatusListNotFound(format!(
            "{registry_id} at {timestamp_to_fetch}: {}",
            resolution.diagnostic()
        )));
    };
    let updated_timestamp = status_list.timestamp.unwrap_or(timestamp_to_fetch);

    let revocation_state = match fetch.revocation_registry_index {
        Some(index) => Some(
            provider
                .create_revocation_state(RevocationStateInput {
                    revocation_registry_index: index,
                    definition: &definition,
                    tails_file_path: &tails.tails_file_path,
                    status_list: &status_list,
                })
                .map_err(Error::Native)?,
        ),
        None => None,
    };

    let interval_override = match interval.from {
        Some(from) if from > timestamp_to_fetch => {
            Some(interval_override(provider, registry_id, from, timestamp_to_fetch).await?)
        }
        _ => None,
    };

    Ok(RevocationMetadata {
        updated_timestamp,
        revocation_registry_id: registry_id.clone(),
        definition,
        status_list,
        revocation_state,
        interval_override,
    })
}

// Check the registry has no newer status list between the timestamp used and
// the requested `from` time.
async fn interval_override(
    registry: &impl Registry, registry_id: &str, requested_from: u64, expected: u64,
) -> Result<NonRevokedIntervalOverride> {
    tracing::debug!("revocation::interval_override");

    let resolution = registry.revocation_status_list(registry_id, requested_from).await?;
    let received = resolution.object.and_then(|list| list.timestamp);

    if received != Some(expected) {
        tracing::warn!(
            "status list for {registry_id} at {requested_from} has timestamp {received:?}, expected {expected}"
        );
        return Err(Error::RevocationTimestampMismatch {
            requested_from,
            expected,
            received,
        });
    }

    Ok(NonRevokedIntervalOverride {
        override_revocation_status_list_timestamp: expected,
        requested_from_timestamp: requested_from,
        revocation_registry_definition_id: registry_id.to_string(),
    })
}
