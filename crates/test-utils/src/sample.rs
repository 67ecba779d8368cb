//! Sample registry objects, credentials, and a provider populated with them.

use serde_json::{json, Value};
use vercre_anoncreds::registry::{
    CredentialDefinition, RevocationRegistryDefinition, RevocationRegistryValue,
    RevocationStatusList, Schema,
};
use vercre_anoncreds::CredentialRecord;

use crate::provider::Provider;

pub const ISSUER_ID: &str = "did:example:issuer";
pub const SCHEMA_ID: &str = "did:example:issuer/anoncreds/v0/SCHEMA/employee/1.0";
pub const CRED_DEF_ID: &str = "did:example:issuer/anoncreds/v0/CLAIM_DEF/1/default";
pub const REV_REG_ID: &str = "did:example:issuer/anoncreds/v0/REV_REG_DEF/1/default/1";
pub const LINK_SECRET_ID: &str = "default-link-secret";

/// Time the first status list was published.
pub const PUBLISHED_AT: u64 = 1_600_000_000;

const TAILS_HASH: &str = "7Qen9RDyemMuV7xGQvp7NjwMSpyHieJyBakycxN7dX7P";
const ACCUMULATOR: &str = "21 124C594B6B20E41B681E92B2C43FD165EA9E68BC3C9D63A82C8893124983CAE94";

#[must_use]
pub fn schema() -> Schema {
    Schema {
        issuer_id: ISSUER_ID.into(),
        name: "employee".into(),
        version: "1.0".into(),
        attr_names: vec!["name".into(), "role".into(), "age".into()],
    }
}

#[must_use]
pub fn credential_definition() -> CredentialDefinition {
    CredentialDefinition {
        issuer_id: ISSUER_ID.into(),
        schema_id: SCHEMA_ID.into(),
        type_: "CL".into(),
        tag: "default".into(),
        value: json!({"primary": {"n": "779...397", "s": "750...803"}}),
    }
}

#[must_use]
pub fn revocation_registry_definition() -> RevocationRegistryDefinition {
    RevocationRegistryDefinition {
        issuer_id: ISSUER_ID.into(),
        revoc_def_type: "CL_ACCUM".into(),
        cred_def_id: CRED_DEF_ID.into(),
        tag: "1".into(),
        value: RevocationRegistryValue {
            public_keys: json!({"accumKey": {"z": "1 0BB...386"}}),
            max_cred_num: 8,
            tails_location: format!("https://tails.example.com/{TAILS_HASH}"),
            tails_hash: TAILS_HASH.into(),
        },
    }
}

/// A status list published at `timestamp` with the given indexes revoked.
#[must_use]
pub fn status_list(timestamp: u64, revoked: &[usize]) -> RevocationStatusList {
    let mut revocation_list = vec![0; 8];
    for &index in revoked {
        revocation_list[index] = 1;
    }
    RevocationStatusList {
        issuer_id: ISSUER_ID.into(),
        rev_reg_def_id: REV_REG_ID.into(),
        revocation_list,
        current_accumulator: format!("{ACCUMULATOR} {timestamp}"),
        timestamp: Some(timestamp),
    }
}

/// A W3C `AnonCreds` credential issued under the sample credential
/// definition.
#[must_use]
pub fn credential(subject: &Value, revocable: bool) -> Value {
    let mut credential_schema = json!({
        "type": "AnonCredsDefinition",
        "definition": CRED_DEF_ID,
        "schema": SCHEMA_ID,
        "encoding": "auto"
    });
    if revocable {
        credential_schema["revocation_registry"] = json!(REV_REG_ID);
    }

    json!({
        "@context": [
            "https://www.w3.org/2018/credentials/v1",
            "https://w3id.org/security/data-integrity/v2"
        ],
        "type": ["VerifiableCredential"],
        "issuer": ISSUER_ID,
        "issuanceDate": "2024-01-01T00:00:00Z",
        "credentialSchema": credential_schema,
        "credentialSubject": subject,
        "proof": {
            "type": "DataIntegrityProof",
            "cryptosuite": "anoncreds-2023",
            "verificationMethod": CRED_DEF_ID,
            "proofPurpose": "assertionMethod",
            "proofValue": "ukgGEqXNjaGVtYV9pZNkvZGlkOmV4YW1wbGU"
        }
    })
}

/// The stored record of a credential held with the sample link secret.
#[must_use]
pub fn record(credential: &Value, revocation_index: Option<u32>) -> CredentialRecord {
    CredentialRecord {
        credential: credential.clone(),
        link_secret_id: Some(LINK_SECRET_ID.into()),
        schema_id: SCHEMA_ID.into(),
        credential_definition_id: CRED_DEF_ID.into(),
        revocation_registry_id: revocation_index.map(|_| REV_REG_ID.into()),
        credential_revocation_id: revocation_index,
    }
}

/// A provider whose registry holds the sample objects and a status list
/// published at [`PUBLISHED_AT`] with nothing revoked.
#[must_use]
pub fn provider() -> Provider {
    let provider = Provider::new();
    provider.registry.add_schema(SCHEMA_ID, schema());
    provider.registry.add_credential_definition(CRED_DEF_ID, credential_definition());
    provider
        .registry
        .add_revocation_registry_definition(REV_REG_ID, revocation_registry_definition());
    provider.registry.publish_status_list(status_list(PUBLISHED_AT, &[]));
    provider.secrets.add(LINK_SECRET_ID, "98316347958732914651374327486498742617");
    provider
}
