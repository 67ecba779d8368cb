//! # Schema and Credential Definition Resolution
//!
//! Resolves the schemas and credential definitions referenced by the
//! credentials in a presentation. Lookups of the same kind run concurrently.
//! Nothing is cached between calls.

use std::collections::{BTreeMap, BTreeSet};

use futures::future::try_join_all;
use tracing::instrument;

use crate::provider::Registry;
use crate::registry::{CredentialDefinition, Schema};
use crate::{Error, Result};

/// Schemas and credential definitions, by id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolved {
    /// Schemas, by id.
    pub schemas: BTreeMap<String, Schema>,

    /// Credential definitions, by id.
    pub credential_definitions: BTreeMap<String, CredentialDefinition>,
}

/// Resolve the credential definitions in `cred_def_ids` and the schemas in
/// `schema_ids`. When `schema_ids` is empty, the schemas referenced by the
/// resolved credential definitions are resolved instead.
///
/// # Errors
///
/// Returns `ObjectNotFound` if any object cannot be resolved, or a provider
/// error if the registry fails.
#[instrument(level = "debug", skip(registry))]
pub async fn resolve(
    registry: &impl Registry, schema_ids: &BTreeSet<String>, cred_def_ids: &BTreeSet<String>,
) -> Result<Resolved> {
    tracing::debug!("resolver::resolve");

    let credential_definitions: BTreeMap<_, _> =
        try_join_all(cred_def_ids.iter().map(|id| async move {
            let resolution = registry.credential_definition(id).await?;
            let Some(definition) = resolution.object else {
                return Err(Error::ObjectNotFound(format!(
                    "credential definition {id}: {}",
                    resolution.diagnostic()
                )));
            };
            Ok::<_, Error>((id.clone(), definition))
        }))
        .await?
        .into_iter()
        .collect();

    let schema_ids = if schema_ids.is_empty() {
        credential_definitions.values().map(|d| d.schema_id.clone()).collect()
    } else {
        schema_ids.clone()
    };

    let schemas = try_join_all(schema_ids.iter().map(|id| async move {
        let resolution = registry.schema(id).await?;
        let Some(schema) = resolution.object else {
            return Err(Error::ObjectNotFound(format!("schema {id}: {}", resolution.diagnostic())));
        };
        Ok::<_, Error>((id.clone(), schema))
    }))
    .await?
    .into_iter()
    .collect();

    Ok(Resolved {
        schemas,
        credential_definitions,
    })
}
