//! Tests creating a presentation and verifying it against the same request

mod utils;

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;
use test_utils::sample;
use vercre_anoncreds::{create_presentation, verify_presentation, Error, ErrorKind};

#[tokio::test]
async fn employment() {
    test_utils::init_tracer();
    let provider = sample::provider();

    let definition = utils::definition(&[utils::employment("employment", 18, None)]);
    let credential = sample::credential(&utils::employee(), false);
    let request = utils::create_request(&definition, vec![sample::record(&credential, None)]);
    let created = create_presentation(provider.clone(), request).await.expect("should create");

    let request = utils::verify_request(&definition, created.presentation);
    let response = verify_presentation(provider.clone(), request).await.expect("should verify");

    assert!(response.verified);
    assert_eq!(provider.releases(), 2);
}

// The holder proves non-revocation against the status list in effect when the
// presentation was created. The verifier asks for the credential to be
// unrevoked at a later time and accepts the same status list.
#[tokio::test]
async fn revocable() {
    test_utils::init_tracer();
    let provider = sample::provider();

    let definition = utils::definition(&[utils::employment("employment", 18, Some("required"))]);
    let credential = sample::credential(&utils::employee(), true);
    let request = utils::create_request(&definition, vec![sample::record(&credential, Some(1))]);
    let created = create_presentation(provider.clone(), request).await.expect("should create");

    let request = utils::verify_request(&definition, created.presentation);
    let response = verify_presentation(provider.clone(), request).await.expect("should verify");

    assert!(response.verified);
    assert_eq!(provider.releases(), 2);
}

#[tokio::test]
async fn revoked() {
    test_utils::init_tracer();
    let provider = sample::provider();
    provider.registry.publish_status_list(sample::status_list(sample::PUBLISHED_AT + 60, &[1]));

    let definition = utils::definition(&[utils::employment("employment", 18, Some("allowed"))]);
    let credential = sample::credential(&utils::employee(), true);
    let request = utils::create_request(&definition, vec![sample::record(&credential, Some(1))]);
    let created = create_presentation(provider.clone(), request).await.expect("should create");

    let request = utils::verify_request(&definition, created.presentation);
    let response = verify_presentation(provider, request).await.expect("should verify");

    assert!(!response.verified);
}

// A status list published after the presentation was created means the
// holder's proof no longer covers the verifier's request.
#[tokio::test]
async fn revoked_after_presentation() {
    test_utils::init_tracer();
    let provider = sample::provider();

    let definition = utils::definition(&[utils::employment("employment", 18, Some("required"))]);
    let credential = sample::credential(&utils::employee(), true);
    let request = utils::create_request(&definition, vec![sample::record(&credential, Some(1))]);
    let created = create_presentation(provider.clone(), request).await.expect("should create");

    let now = SystemTime::now().duration_since(UNIX_EPOCH).expect("should be after epoch");
    provider.registry.publish_status_list(sample::status_list(now.as_secs() - 1, &[1]));

    let request = utils::verify_request(&definition, created.presentation);
    let err = verify_presentation(provider.clone(), request).await.expect_err("should fail");

    assert!(matches!(err, Error::RevocationTimestampMismatch { .. }));
    assert_eq!(err.kind(), ErrorKind::Consistency);
    assert_eq!(provider.releases(), 2);
}

#[tokio::test]
async fn two_credentials() {
    test_utils::init_tracer();
    let provider = sample::provider();

    let manager = json!({
        "id": "manager",
        "constraints": {
            "statuses": {"active": {"directive": "required"}},
            "fields": [
                {"path": ["$.credentialSubject.role"]},
                {
                    "path": ["$.credentialSubject.age"],
                    "predicate": "preferred",
                    "filter": {"exclusiveMinimum": 30, "exclusiveMaximum": 60}
                }
            ]
        }
    });
    let definition =
        utils::definition(&[utils::employment("employment", 18, None), manager]);

    let first = sample::credential(&utils::employee(), false);
    let second =
        sample::credential(&json!({"name": "Bob Smith", "role": "Manager", "age": 40}), true);
    let records = vec![sample::record(&first, None), sample::record(&second, Some(5))];

    let request = utils::create_request(&definition, records);
    let created = create_presentation(provider.clone(), request).await.expect("should create");

    let proof_request = &created.proof_request;
    assert_eq!(proof_request.requested_attributes.len(), 2);
    assert_eq!(proof_request.requested_predicates.len(), 3);
    assert!(proof_request.requested_predicates.contains_key("manager_predicate_1"));

    let request = utils::verify_request(&definition, created.presentation);
    let response = verify_presentation(provider, request).await.expect("should verify");

    assert!(response.verified);
}
