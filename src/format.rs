//! # Credential Formats
//!
//! Presented credentials arrive as JSON. Only W3C credentials secured with an
//! `AnonCreds` Data Integrity proof can take part in a zero-knowledge
//! presentation; other encodings are recognised so they can be rejected with
//! a meaningful error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Data Integrity proof type used by `AnonCreds` W3C credentials.
pub const DATA_INTEGRITY_PROOF: &str = "DataIntegrityProof";

/// Cryptosuite identifying an `AnonCreds` proof.
pub const ANONCREDS_CRYPTOSUITE: &str = "anoncreds-2023";

/// A presented credential, by encoding.
#[derive(Clone, Debug, PartialEq)]
pub enum PresentedCredential {
    /// JSON-LD credential secured with an embedded Data Integrity proof.
    DataIntegrity(Box<AnonCredsCredential>),

    /// Credential secured as a compact JWT.
    JwtVc(String),

    /// ISO mobile document.
    MsoMdoc(Value),
}

impl PresentedCredential {
    /// Classify a JSON credential by encoding.
    ///
    /// # Errors
    ///
    /// Returns an error when the value is neither a string nor an object, or
    /// when an object carries a Data Integrity proof that cannot be read.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::String(token) => Ok(Self::JwtVc(token.clone())),
            Value::Object(obj) if obj.contains_key("docType") => Ok(Self::MsoMdoc(value.clone())),
            Value::Object(obj) => {
                let proof_type =
                    obj.get("proof").and_then(|p| p.get("type")).and_then(Value::as_str);
                if proof_type != Some(DATA_INTEGRITY_PROOF) {
                    return Err(Error::UnsupportedCredentialType(format!(
                        "proof type {}",
                        proof_type.unwrap_or("none")
                    )));
                }
                let credential = serde_json::from_value(value.clone())
                    .map_err(|e| Error::InvalidCredential(format!("{e}")))?;
                Ok(Self::DataIntegrity(Box::new(credential)))
            }
            _ => Err(Error::UnsupportedCredentialType(format!("unexpected value {value}"))),
        }
    }

    /// Returns the `AnonCreds` view of the credential.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedCredentialType` for any encoding other than an
    /// `AnonCreds` Data Integrity credential.
    pub fn into_anoncreds(self) -> Result<AnonCredsCredential> {
        match self {
            Self::DataIntegrity(vc) => {
                if vc.proof.cryptosuite != ANONCREDS_CRYPTOSUITE {
                    return Err(Error::UnsupportedCredentialType(format!(
                        "cryptosuite {}",
                        vc.proof.cryptosuite
                    )));
                }
                Ok(*vc)
            }
            Self::JwtVc(_) => Err(Error::UnsupportedCredentialType("jwt_vc".into())),
            Self::MsoMdoc(_) => Err(Error::UnsupportedCredentialType("mso_mdoc".into())),
        }
    }
}

/// The parts of a W3C `AnonCreds` credential the library reads.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnonCredsCredential {
    /// Identifies the schema, definition and registry the credential was
    /// issued under.
    pub credential_schema: CredentialSchema,

    /// Claims about the subject.
    pub credential_subject: Map<String, Value>,

    /// The embedded proof.
    pub proof: DataIntegrityProof,
}

impl AnonCredsCredential {
    /// Identifier of the credential definition the credential was issued
    /// under.
    #[must_use]
    pub fn credential_definition_id(&self) -> &str {
        &self.credential_schema.definition
    }

    /// Identifier of the schema the credential was issued under.
    #[must_use]
    pub fn schema_id(&self) -> &str {
        &self.credential_schema.schema
    }

    /// Identifier of the revocation registry, if the credential is revocable.
    #[must_use]
    pub fn revocation_registry_id(&self) -> Option<&str> {
        self.credential_schema.revocation_registry.as_deref()
    }
}

/// `credentialSchema` of an `AnonCreds` credential.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct CredentialSchema {
    /// Always `AnonCredsDefinition`.
    #[serde(rename = "type")]
    pub type_: String,

    /// Credential definition identifier.
    pub definition: String,

    /// Schema identifier.
    pub schema: String,

    /// Revocation registry identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation_registry: Option<String>,

    /// Attribute encoding, e.g. `auto`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

/// An embedded Data Integrity proof.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DataIntegrityProof {
    /// Always `DataIntegrityProof`.
    #[serde(rename = "type")]
    pub type_: String,

    /// The cryptosuite, e.g. `anoncreds-2023`.
    pub cryptosuite: String,

    /// For `AnonCreds` proofs, the credential definition identifier.
    pub verification_method: String,

    /// Proof purpose, e.g. `assertionMethod`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_purpose: Option<String>,

    /// Encoded proof.
    pub proof_value: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn credential(cryptosuite: &str) -> Value {
        json!({
            "@context": ["https://www.w3.org/2018/credentials/v1"],
            "type": ["VerifiableCredential"],
            "issuer": "did:example:issuer",
            "credentialSchema": {
                "type": "AnonCredsDefinition",
                "definition": "did:example:issuer/cred-def",
                "schema": "did:example:issuer/schema",
                "revocation_registry": "did:example:issuer/rev-reg",
                "encoding": "auto"
            },
            "credentialSubject": { "age": 25 },
            "proof": {
                "type": "DataIntegrityProof",
                "cryptosuite": cryptosuite,
                "verificationMethod": "did:example:issuer/cred-def",
                "proofPurpose": "assertionMethod",
                "proofValue": "ukgGEqXNjaGVtYV9pZA"
            }
        })
    }

    #[test]
    fn anoncreds() {
        let vc = PresentedCredential::from_json(&credential(ANONCREDS_CRYPTOSUITE))
            .and_then(PresentedCredential::into_anoncreds)
            .expect("should be supported");

        assert_eq!(vc.credential_definition_id(), "did:example:issuer/cred-def");
        assert_eq!(vc.schema_id(), "did:example:issuer/schema");
        assert_eq!(vc.revocation_registry_id(), Some("did:example:issuer/rev-reg"));
    }

    #[test]
    fn other_cryptosuite() {
        let result = PresentedCredential::from_json(&credential("eddsa-rdfc-2022"))
            .and_then(PresentedCredential::into_anoncreds);
        assert!(matches!(result, Err(Error::UnsupportedCredentialType(_))));
    }

    #[test]
    fn jwt() {
        let vc = PresentedCredential::from_json(&json!("eyJhbGciOiJFZERTQSJ9.e30.c2ln"))
            .expect("should classify");
        assert!(matches!(vc, PresentedCredential::JwtVc(_)));
        assert!(matches!(vc.into_anoncreds(), Err(Error::UnsupportedCredentialType(_))));
    }

    #[test]
    fn missing_proof() {
        let result = PresentedCredential::from_json(&json!({"credentialSubject": {}}));
        assert!(matches!(result, Err(Error::UnsupportedCredentialType(_))));
    }
}
