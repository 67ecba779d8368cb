#![allow(missing_docs, dead_code)]

use serde_json::{json, Value};
use vercre_anoncreds::dif_exch::{PathNested, PresentationDefinition, PresentationSubmission};
use vercre_anoncreds::{CreatePresentationRequest, CredentialRecord, VerifyPresentationRequest};

pub const CHALLENGE: &str = "3c5e7f0a-9f1e-4c41-8a5d-0b7c2fb7f3a1";

/// Claims of the sample employee credential.
pub fn employee() -> Value {
    json!({"name": "Alice Garcia", "role": "Engineer", "age": 25})
}

/// Requests `name` and `role`, and proof that `age` is at least `min_age`.
pub fn employment(id: &str, min_age: i32, statuses: Option<&str>) -> Value {
    let mut descriptor = json!({
        "id": id,
        "name": "Employment",
        "constraints": {
            "limit_disclosure": "required",
            "fields": [
                {"path": ["$.credentialSubject.name"]},
                {"path": ["$.credentialSubject.role"]},
                {
                    "path": ["$.credentialSubject.age"],
                    "predicate": "required",
                    "filter": {"type": "number", "minimum": min_age}
                }
            ]
        }
    });
    if let Some(directive) = statuses {
        descriptor["constraints"]["statuses"] = json!({"active": {"directive": directive}});
    }
    descriptor
}

pub fn definition(descriptors: &[Value]) -> PresentationDefinition {
    serde_json::from_value(json!({
        "id": "32f54163-7166-48f1-93d8-ff217bdb0653",
        "name": "Employment verification",
        "input_descriptors": descriptors,
    }))
    .expect("should deserialize")
}

/// Maps each descriptor id to the embedded credential at the same position.
pub fn submission(definition: &PresentationDefinition) -> PresentationSubmission {
    serde_json::from_value(json!({
        "id": "a30e3b91-fb77-4d22-95fa-871689c322e2",
        "definition_id": definition.id,
        "descriptor_map": definition.input_descriptors.iter().enumerate().map(|(i, d)| json!({
            "id": d.id,
            "format": "di_vc",
            "path": format!("$.verifiableCredential[{i}]"),
        })).collect::<Vec<_>>(),
    }))
    .expect("should deserialize")
}

pub fn create_request(
    definition: &PresentationDefinition, records: Vec<CredentialRecord>,
) -> CreatePresentationRequest {
    CreatePresentationRequest {
        presentation_definition: definition.clone(),
        presentation_submission: submission(definition),
        credentials: records.iter().map(|r| r.credential.clone()).collect(),
        records,
        challenge: CHALLENGE.into(),
    }
}

pub fn verify_request(
    definition: &PresentationDefinition, presentation: Value,
) -> VerifyPresentationRequest {
    VerifyPresentationRequest {
        presentation,
        presentation_definition: definition.clone(),
        presentation_submission: submission(definition),
        challenge: CHALLENGE.into(),
    }
}

/// The proof the mock proof system embeds in a presentation.
pub fn embedded_proof(presentation: &Value) -> Value {
    let proof_value = presentation["proof"]["proofValue"].as_str().expect("should have proof");
    serde_json::from_str(proof_value).expect("should deserialize")
}

/// Maps each descriptor id to the presentation, with the credential at the
/// same position selected by a nested path.
pub fn nested_submission(definition: &PresentationDefinition) -> PresentationSubmission {
    let mut submission = submission(definition);
    for mapping in &mut submission.descriptor_map {
        let path = std::mem::replace(&mut mapping.path, "$".into());
        mapping.path_nested = Some(PathNested {
            format: "di_vc".into(),
            path,
        });
    }
    submission
}
