use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use vercre_anoncreds::provider::{LinkSecret, Result};

#[derive(Default, Clone, Debug)]
pub struct Store {
    secrets: Arc<Mutex<HashMap<String, LinkSecret>>>,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, link_secret_id: &str, value: &str) {
        self.secrets.lock().expect("should lock").insert(
            link_secret_id.to_string(),
            LinkSecret {
                link_secret_id: link_secret_id.to_string(),
                value: value.to_string(),
            },
        );
    }

    pub fn get(&self, link_secret_id: &str) -> Result<LinkSecret> {
        let Some(secret) = self.secrets.lock().expect("should lock").get(link_secret_id).cloned()
        else {
            return Err(anyhow!("link secret not found for id: {link_secret_id}"));
        };
        Ok(secret)
    }
}
