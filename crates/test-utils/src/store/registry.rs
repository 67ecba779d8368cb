use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use vercre_anoncreds::registry::{
    CredentialDefinition, Resolution, RevocationRegistryDefinition, RevocationStatusList, Schema,
};

/// An append-only registry. Status lists are kept by the time they were
/// published and a lookup returns the latest list published at or before the
/// requested time.
#[derive(Default, Clone, Debug)]
pub struct Store {
    schemas: Arc<Mutex<HashMap<String, Schema>>>,
    cred_defs: Arc<Mutex<HashMap<String, CredentialDefinition>>>,
    rev_reg_defs: Arc<Mutex<HashMap<String, RevocationRegistryDefinition>>>,
    status_lists: Arc<Mutex<HashMap<String, BTreeMap<u64, RevocationStatusList>>>>,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_schema(&self, id: &str, schema: Schema) {
        self.schemas.lock().expect("should lock").insert(id.to_string(), schema);
    }

    pub fn add_credential_definition(&self, id: &str, definition: CredentialDefinition) {
        self.cred_defs.lock().expect("should lock").insert(id.to_string(), definition);
    }

    pub fn add_revocation_registry_definition(
        &self, id: &str, definition: RevocationRegistryDefinition,
    ) {
        self.rev_reg_defs.lock().expect("should lock").insert(id.to_string(), definition);
    }

    /// Publish a status list at its timestamp.
    pub fn publish_status_list(&self, list: RevocationStatusList) {
        let timestamp = list.timestamp.expect("status list should have a timestamp");
        self.status_lists
            .lock()
            .expect("should lock")
            .entry(list.rev_reg_def_id.clone())
            .or_default()
            .insert(timestamp, list);
    }

    pub fn schema(&self, id: &str) -> Resolution<Schema> {
        self.schemas.lock().expect("should lock").get(id).cloned().map_or_else(
            || Resolution::not_found(format!("schema {id} not found")),
            Resolution::found,
        )
    }

    pub fn credential_definition(&self, id: &str) -> Resolution<CredentialDefinition> {
        self.cred_defs.lock().expect("should lock").get(id).cloned().map_or_else(
            || Resolution::not_found(format!("credential definition {id} not found")),
            Resolution::found,
        )
    }

    pub fn revocation_registry_definition(
        &self, id: &str,
    ) -> Resolution<RevocationRegistryDefinition> {
        self.rev_reg_defs.lock().expect("should lock").get(id).cloned().map_or_else(
            || Resolution::not_found(format!("revocation registry {id} not found")),
            Resolution::found,
        )
    }

    pub fn status_list(&self, id: &str, timestamp: u64) -> Resolution<RevocationStatusList> {
        let lists = self.status_lists.lock().expect("should lock");
        let latest = lists
            .get(id)
            .and_then(|by_time| by_time.range(..=timestamp).next_back())
            .map(|(_, list)| list.clone());
        drop(lists);

        latest.map_or_else(
            || Resolution::not_found(format!("no status list for {id} at {timestamp}")),
            Resolution::found,
        )
    }
}
