//! # Providers
//!
//! Traits implemented by library users to supply registries, secrets, and the
//! native `AnonCreds` proof primitives. Provider methods return
//! [`anyhow::Result`]: collaborator failures are propagated, not interpreted.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Options;
pub use crate::handle::NativePresentation;
use crate::proof_request::{ProofRequest, ProveInstruction};
use crate::registry::{
    CredentialDefinition, Resolution, RevocationRegistryDefinition, RevocationStatusList, Schema,
};
use crate::revocation::NonRevokedIntervalOverride;

/// Result is used for all external errors.
pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;

/// Providers required to create a presentation.
pub trait Holder: Registry + TailsFileCache + LinkSecretStore + ProofSystem + Config + Clone {}

/// Providers required to verify a presentation.
pub trait Verifier: Registry + TailsFileCache + ProofSystem + Config + Clone {}

/// Resolves `AnonCreds` objects from a verifiable data registry. A lookup that
/// finds nothing returns a [`Resolution`] without an object.
pub trait Registry: Send + Sync {
    /// Resolve a schema.
    fn schema(&self, schema_id: &str) -> impl Future<Output = Result<Resolution<Schema>>> + Send;

    /// Resolve a credential definition.
    fn credential_definition(
        &self, cred_def_id: &str,
    ) -> impl Future<Output = Result<Resolution<CredentialDefinition>>> + Send;

    /// Resolve a revocation registry definition.
    fn revocation_registry_definition(
        &self, rev_reg_def_id: &str,
    ) -> impl Future<Output = Result<Resolution<RevocationRegistryDefinition>>> + Send;

    /// Resolve the status list in effect at `timestamp`. The returned list's
    /// own timestamp may be earlier than the one requested.
    fn revocation_status_list(
        &self, rev_reg_def_id: &str, timestamp: u64,
    ) -> impl Future<Output = Result<Resolution<RevocationStatusList>>> + Send;
}

/// Downloads and caches revocation registry tails files.
pub trait TailsFileCache: Send + Sync {
    /// Returns the local tails file for the registry, downloading it if
    /// necessary.
    fn tails_file(
        &self, definition: &RevocationRegistryDefinition,
    ) -> impl Future<Output = Result<TailsFile>> + Send;
}

/// A locally available tails file.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct TailsFile {
    /// Path to the tails file.
    pub tails_file_path: String,
}

/// Holder link secrets.
pub trait LinkSecretStore: Send + Sync {
    /// Returns the link secret with the given id.
    fn link_secret(&self, link_secret_id: &str) -> impl Future<Output = Result<LinkSecret>> + Send;
}

/// A holder's link secret.
#[derive(Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct LinkSecret {
    /// Link secret identifier.
    pub link_secret_id: String,

    /// The secret value.
    pub value: String,
}

impl Debug for LinkSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkSecret")
            .field("link_secret_id", &self.link_secret_id)
            .finish_non_exhaustive()
    }
}

/// The native `AnonCreds` proof primitives.
pub trait ProofSystem: Send + Sync {
    /// Native presentation object.
    type Presentation: NativePresentation;

    /// Native revocation state for a single credential.
    type RevocationState: Clone + Debug + Send + Sync;

    /// Build the revocation state (witness) of a credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the native primitive fails.
    fn create_revocation_state(
        &self, input: RevocationStateInput<'_>,
    ) -> Result<Self::RevocationState>;

    /// Create a presentation satisfying the proof request.
    ///
    /// # Errors
    ///
    /// Returns an error if the native primitive fails.
    fn create_presentation(
        &self, proof_request: &ProofRequest,
        metadata: &PresentationMetadata<Self::RevocationState>,
    ) -> Result<Self::Presentation>;

    /// Load a received presentation into a native object.
    ///
    /// # Errors
    ///
    /// Returns an error if the presentation cannot be read.
    fn load_presentation(&self, presentation: &Value) -> Result<Self::Presentation>;

    /// Verify a presentation against the proof request. A presentation that
    /// does not satisfy the request is reported as `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns an error if verification could not be carried out.
    fn verify_presentation(
        &self, presentation: &Self::Presentation, proof_request: &ProofRequest,
        metadata: &VerificationMetadata,
    ) -> Result<bool>;
}

/// Library options.
pub trait Config: Send + Sync {
    /// Options applied when building proof requests and checking
    /// non-revocation intervals.
    fn options(&self) -> Options {
        Options::default()
    }
}

/// Input to [`ProofSystem::create_revocation_state`].
#[derive(Clone, Copy, Debug)]
pub struct RevocationStateInput<'a> {
    /// Index of the credential in the revocation registry.
    pub revocation_registry_index: u32,

    /// The revocation registry definition.
    pub definition: &'a RevocationRegistryDefinition,

    /// Path to the registry's tails file.
    pub tails_file_path: &'a str,

    /// The status list to build the state from.
    pub status_list: &'a RevocationStatusList,
}

/// Everything the native primitives need to create a presentation.
#[derive(Clone, Debug)]
pub struct PresentationMetadata<S> {
    /// Schemas, by id.
    pub schemas: BTreeMap<String, Schema>,

    /// Credential definitions, by id.
    pub credential_definitions: BTreeMap<String, CredentialDefinition>,

    /// The holder's link secret.
    pub link_secret: LinkSecret,

    /// Instructions binding credentials to proof request referents.
    pub prove_instructions: Vec<ProveInstruction>,

    /// Presented credentials, indexed by the instructions' `entry_index`.
    pub credentials: Vec<CredentialEntry<S>>,
}

/// A credential with the revocation state it is proven against.
#[derive(Clone, Debug)]
pub struct CredentialEntry<S> {
    /// The credential.
    pub credential: Value,

    /// Timestamp of the status list the revocation state was built from.
    pub timestamp: Option<u64>,

    /// Revocation state for revocable credentials that must be proven
    /// unrevoked.
    pub revocation_state: Option<S>,
}

/// Everything the native primitives need to verify a presentation.
#[derive(Clone, Debug, Default)]
pub struct VerificationMetadata {
    /// Schemas, by id.
    pub schemas: BTreeMap<String, Schema>,

    /// Credential definitions, by id.
    pub credential_definitions: BTreeMap<String, CredentialDefinition>,

    /// Revocation registry definitions, by id.
    pub revocation_registry_definitions: BTreeMap<String, RevocationRegistryDefinition>,

    /// Status lists, by registry id then timestamp.
    pub revocation_status_lists: BTreeMap<String, BTreeMap<u64, RevocationStatusList>>,

    /// Status lists accepted for a `from` time they were not fetched at.
    pub interval_overrides: Vec<NonRevokedIntervalOverride>,
}
