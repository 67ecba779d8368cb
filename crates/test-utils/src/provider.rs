use serde_json::Value;
use vercre_anoncreds::config::Options;
use vercre_anoncreds::proof_request::ProofRequest;
use vercre_anoncreds::provider::{
    Config, Holder, LinkSecret, LinkSecretStore, PresentationMetadata, ProofSystem, Registry,
    Result, RevocationStateInput, TailsFile, TailsFileCache, VerificationMetadata, Verifier,
};
use vercre_anoncreds::registry::{
    CredentialDefinition, Resolution, RevocationRegistryDefinition, RevocationStatusList, Schema,
};

use crate::proof::{self, Presentation, RevocationState};
use crate::store::{registry, secret};

pub const TAILS_DIR: &str = "/tmp/tails";

#[derive(Default, Clone, Debug)]
pub struct Provider {
    pub registry: registry::Store,
    pub secrets: secret::Store,
    pub proof: proof::ProofSystem,
    pub options: Options,
}

impl Provider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of native presentations released so far.
    #[must_use]
    pub fn releases(&self) -> usize {
        self.proof.releases()
    }
}

impl Holder for Provider {}

impl Verifier for Provider {}

impl Registry for Provider {
    async fn schema(&self, schema_id: &str) -> Result<Resolution<Schema>> {
        Ok(self.registry.schema(schema_id))
    }

    async fn credential_definition(
        &self, cred_def_id: &str,
    ) -> Result<Resolution<CredentialDefinition>> {
        Ok(self.registry.credential_definition(cred_def_id))
    }

    async fn revocation_registry_definition(
        &self, rev_reg_def_id: &str,
    ) -> Result<Resolution<RevocationRegistryDefinition>> {
        Ok(self.registry.revocation_registry_definition(rev_reg_def_id))
    }

    async fn revocation_status_list(
        &self, rev_reg_def_id: &str, timestamp: u64,
    ) -> Result<Resolution<RevocationStatusList>> {
        Ok(self.registry.status_list(rev_reg_def_id, timestamp))
    }
}

impl TailsFileCache for Provider {
    async fn tails_file(&self, definition: &RevocationRegistryDefinition) -> Result<TailsFile> {
        Ok(TailsFile {
            tails_file_path: format!("{TAILS_DIR}/{}", definition.value.tails_hash),
        })
    }
}

impl LinkSecretStore for Provider {
    async fn link_secret(&self, link_secret_id: &str) -> Result<LinkSecret> {
        self.secrets.get(link_secret_id)
    }
}

impl Config for Provider {
    fn options(&self) -> Options {
        self.options.clone()
    }
}

impl ProofSystem for Provider {
    type Presentation = Presentation;
    type RevocationState = RevocationState;

    fn create_revocation_state(
        &self, input: RevocationStateInput<'_>,
    ) -> Result<Self::RevocationState> {
        self.proof.create_revocation_state(input)
    }

    fn create_presentation(
        &self, proof_request: &ProofRequest,
        metadata: &PresentationMetadata<Self::RevocationState>,
    ) -> Result<Self::Presentation> {
        self.proof.create_presentation(proof_request, metadata)
    }

    fn load_presentation(&self, presentation: &Value) -> Result<Self::Presentation> {
        self.proof.load_presentation(presentation)
    }

    fn verify_presentation(
        &self, presentation: &Self::Presentation, proof_request: &ProofRequest,
        metadata: &VerificationMetadata,
    ) -> Result<bool> {
        self.proof.verify_presentation(presentation, proof_request, metadata)
    }
}
