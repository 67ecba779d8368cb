//! # Mock Proof System
//!
//! Stands in for the native `AnonCreds` primitives. Presentations are plain
//! JSON: revealed attributes are copied into the presentation and predicates
//! are checked when the presentation is created. Verification checks the
//! presentation against the proof request and the revocation state supplied
//! by the library, so tests can observe what the library hands the native
//! layer.
//!
//! Every released native presentation is counted.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, bail};
use serde_json::{json, Map, Value};
use vercre_anoncreds::proof_request::{NonRevokedInterval, ProofRequest, Restriction};
use vercre_anoncreds::provider::{
    self, NativePresentation, PresentationMetadata, RevocationStateInput, VerificationMetadata,
};

/// The mock proof system.
#[derive(Clone, Debug, Default)]
pub struct ProofSystem {
    releases: Arc<AtomicUsize>,
}

impl ProofSystem {
    /// Number of native presentations released so far.
    #[must_use]
    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

/// A native presentation.
#[derive(Debug)]
pub struct Presentation {
    document: Value,
    proof: Value,
    releases: Arc<AtomicUsize>,
}

impl NativePresentation for Presentation {
    fn to_json(&self) -> anyhow::Result<Value> {
        Ok(self.document.clone())
    }

    fn timestamp(&self, entry_index: usize) -> Option<u64> {
        self.proof["identifiers"].get(entry_index)?["timestamp"].as_u64()
    }

    fn release(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// Revocation state of a single credential.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevocationState {
    pub revocation_registry_id: String,
    pub index: u32,
    pub timestamp: u64,
    pub revoked: bool,
}

impl ProofSystem {
    fn presentation(&self, document: Value) -> provider::Result<Presentation> {
        let Some(proof_value) = document["proof"]["proofValue"].as_str() else {
            bail!("presentation has no proof value");
        };
        let proof = serde_json::from_str(proof_value)?;
        Ok(Presentation {
            document,
            proof,
            releases: Arc::clone(&self.releases),
        })
    }
}

impl provider::ProofSystem for ProofSystem {
    type Presentation = Presentation;
    type RevocationState = RevocationState;

    fn create_revocation_state(
        &self, input: RevocationStateInput<'_>,
    ) -> provider::Result<RevocationState> {
        let index = input.revocation_registry_index;
        if index >= input.definition.value.max_cred_num {
            bail!("revocation index {index} is out of range");
        }
        if input.tails_file_path.is_empty() {
            bail!("no tails file");
        }

        let list = input.status_list;
        let revoked = usize::try_from(index)
            .ok()
            .and_then(|i| list.revocation_list.get(i))
            .is_some_and(|&flag| flag == 1);

        Ok(RevocationState {
            revocation_registry_id: list.rev_reg_def_id.clone(),
            index,
            timestamp: list.timestamp.unwrap_or_default(),
            revoked,
        })
    }

    fn create_presentation(
        &self, proof_request: &ProofRequest, metadata: &PresentationMetadata<RevocationState>,
    ) -> provider::Result<Presentation> {
        if metadata.link_secret.value.is_empty() {
            bail!("empty link secret");
        }

        let mut revealed_attr_groups = Map::new();
        let mut predicates = Map::new();
        let mut disclosed: Vec<Map<String, Value>> = vec![Map::new(); metadata.credentials.len()];

        for instruction in &metadata.prove_instructions {
            let index = instruction.entry_index;
            let Some(entry) = metadata.credentials.get(index) else {
                bail!("no credential at {index}");
            };
            let credential = &entry.credential;
            let schema_id = credential["credentialSchema"]["schema"].as_str().unwrap_or_default();
            let cred_def_id =
                credential["credentialSchema"]["definition"].as_str().unwrap_or_default();
            if !metadata.schemas.contains_key(schema_id) {
                bail!("schema {schema_id} not provided");
            }
            if !metadata.credential_definitions.contains_key(cred_def_id) {
                bail!("credential definition {cred_def_id} not provided");
            }
            let subject = &credential["credentialSubject"];

            if instruction.is_predicate {
                let Some(predicate) = proof_request.requested_predicates.get(&instruction.referent)
                else {
                    bail!("no predicate {}", instruction.referent);
                };
                let Some(value) = subject[&predicate.name].as_i64() else {
                    bail!("attribute {} is not an integer", predicate.name);
                };
                if !predicate.p_type.holds(value, predicate.p_value.into()) {
                    bail!("predicate {} is not satisfied", instruction.referent);
                }
                predicates.insert(
                    instruction.referent.clone(),
                    json!({
                        "sub_proof_index": index,
                        "name": predicate.name,
                        "p_type": predicate.p_type,
                        "p_value": predicate.p_value,
                    }),
                );
            } else {
                let Some(attribute) = proof_request.requested_attributes.get(&instruction.referent)
                else {
                    bail!("no attribute {}", instruction.referent);
                };
                let mut values = Map::new();
                for name in attribute.names.iter() {
                    let Some(value) = subject.get(name) else {
                        bail!("attribute {name} not in credential");
                    };
                    values.insert(name.to_string(), value.clone());
                    disclosed[index].insert(name.to_string(), value.clone());
                }
                revealed_attr_groups.insert(
                    instruction.referent.clone(),
                    json!({"sub_proof_index": index, "values": values}),
                );
            }
        }

        let identifiers: Vec<Value> = metadata
            .credentials
            .iter()
            .map(|entry| {
                let schema = &entry.credential["credentialSchema"];
                json!({
                    "schema_id": schema["schema"],
                    "cred_def_id": schema["definition"],
                    "rev_reg_id": schema.get("revocation_registry"),
                    "timestamp": entry.timestamp,
                    "non_revoked": entry.revocation_state.as_ref().map(|s| !s.revoked),
                })
            })
            .collect();

        let proof = json!({
            "nonce": proof_request.nonce,
            "requested_proof": {
                "revealed_attr_groups": revealed_attr_groups,
                "predicates": predicates,
            },
            "identifiers": identifiers,
        });

        let credentials: Vec<Value> = metadata
            .credentials
            .iter()
            .zip(disclosed)
            .map(|(entry, subject)| {
                let mut credential = entry.credential.clone();
                credential["credentialSubject"] = Value::Object(subject);
                credential
            })
            .collect();

        let document = json!({
            "@context": ["https://www.w3.org/2018/credentials/v1"],
            "type": ["VerifiablePresentation"],
            "verifiableCredential": credentials,
            "proof": {
                "type": "DataIntegrityProof",
                "cryptosuite": "anoncreds-2023",
                "proofPurpose": "authentication",
                "challenge": proof_request.nonce,
                "proofValue": proof.to_string(),
            }
        });

        self.presentation(document)
    }

    fn load_presentation(&self, presentation: &Value) -> provider::Result<Presentation> {
        self.presentation(presentation.clone())
    }

    fn verify_presentation(
        &self, presentation: &Presentation, proof_request: &ProofRequest,
        metadata: &VerificationMetadata,
    ) -> provider::Result<bool> {
        let proof = &presentation.proof;
        if proof["nonce"].as_str() != Some(proof_request.nonce.as_str()) {
            return Ok(false);
        }
        let requested_proof = &proof["requested_proof"];
        let credentials = match &presentation.document["verifiableCredential"] {
            Value::Array(credentials) => credentials.clone(),
            credential => vec![credential.clone()],
        };

        for (referent, attribute) in &proof_request.requested_attributes {
            let Some(group) = requested_proof["revealed_attr_groups"].get(referent) else {
                return Ok(false);
            };
            let index = sub_proof_index(group)?;
            if !restricted(&proof["identifiers"][index], &attribute.restrictions, metadata)? {
                return Ok(false);
            }
            let Some(credential) = credentials.get(index) else {
                return Ok(false);
            };
            let subject = &credential["credentialSubject"];
            for name in attribute.names.iter() {
                let revealed = &group["values"][name];
                if revealed.is_null() || revealed != &subject[name] {
                    return Ok(false);
                }
            }
            if !unrevoked(&proof["identifiers"][index], attribute.non_revoked, metadata)? {
                return Ok(false);
            }
        }

        for (referent, predicate) in &proof_request.requested_predicates {
            let Some(proven) = requested_proof["predicates"].get(referent) else {
                return Ok(false);
            };
            if proven["name"] != json!(predicate.name)
                || proven["p_type"] != json!(predicate.p_type)
                || proven["p_value"] != json!(predicate.p_value)
            {
                return Ok(false);
            }
            let index = sub_proof_index(proven)?;
            if !restricted(&proof["identifiers"][index], &predicate.restrictions, metadata)? {
                return Ok(false);
            }
            if !unrevoked(&proof["identifiers"][index], predicate.non_revoked, metadata)? {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

fn sub_proof_index(proven: &Value) -> provider::Result<usize> {
    proven["sub_proof_index"]
        .as_u64()
        .and_then(|i| usize::try_from(i).ok())
        .ok_or_else(|| anyhow!("missing sub proof index"))
}

// The credential must satisfy the restrictions and its schema and credential
// definition must have been provided.
fn restricted(
    identifier: &Value, restrictions: &[Restriction], metadata: &VerificationMetadata,
) -> provider::Result<bool> {
    let schema_id = identifier["schema_id"].as_str().unwrap_or_default();
    let cred_def_id = identifier["cred_def_id"].as_str().unwrap_or_default();
    if !metadata.schemas.contains_key(schema_id) {
        bail!("schema {schema_id} not provided");
    }
    if !metadata.credential_definitions.contains_key(cred_def_id) {
        bail!("credential definition {cred_def_id} not provided");
    }

    Ok(restrictions
        .iter()
        .all(|r| r.cred_def_id.as_deref().map_or(true, |id| id == cred_def_id)))
}

// The credential must have been proven unrevoked against a provided status
// list that covers the interval.
fn unrevoked(
    identifier: &Value, interval: Option<NonRevokedInterval>, metadata: &VerificationMetadata,
) -> provider::Result<bool> {
    let Some(interval) = interval else {
        return Ok(true);
    };
    let (Some(rev_reg_id), Some(timestamp)) =
        (identifier["rev_reg_id"].as_str(), identifier["timestamp"].as_u64())
    else {
        return Ok(false);
    };

    if !metadata.revocation_registry_definitions.contains_key(rev_reg_id) {
        bail!("revocation registry {rev_reg_id} not provided");
    }
    if !metadata.revocation_status_lists.get(rev_reg_id).is_some_and(|l| l.contains_key(&timestamp))
    {
        bail!("status list for {rev_reg_id} at {timestamp} not provided");
    }
    if identifier["non_revoked"].as_bool() != Some(true) {
        return Ok(false);
    }

    if let Some(from) = interval.from {
        if timestamp < from {
            let overridden = metadata.interval_overrides.iter().any(|o| {
                o.revocation_registry_definition_id == rev_reg_id
                    && o.requested_from_timestamp == from
                    && o.override_revocation_status_list_timestamp == timestamp
            });
            if !overridden {
                return Ok(false);
            }
        }
    }
    if interval.to.is_some_and(|to| timestamp > to) {
        return Ok(false);
    }

    Ok(true)
}
