//! Tests for verifying presentations

mod utils;

use serde_json::{json, Value};
use test_utils::provider::Provider;
use test_utils::sample::{self, CRED_DEF_ID};
use vercre_anoncreds::{create_presentation, verify_presentation, Error, ErrorKind};

// Create a presentation of the sample employee credential.
async fn presentation(provider: &Provider, descriptors: &[Value]) -> Value {
    let definition = utils::definition(descriptors);
    let credential = sample::credential(&utils::employee(), false);
    let request = utils::create_request(&definition, vec![sample::record(&credential, None)]);
    create_presentation(provider.clone(), request).await.expect("should create").presentation
}

#[tokio::test]
async fn verified() {
    test_utils::init_tracer();
    let provider = sample::provider();

    let descriptors = [utils::employment("employment", 18, None)];
    let presentation = presentation(&provider, &descriptors).await;

    let request = utils::verify_request(&utils::definition(&descriptors), presentation);
    let response = verify_presentation(provider.clone(), request).await.expect("should verify");

    assert!(response.verified);
    assert_eq!(provider.releases(), 2);
}

#[tokio::test]
async fn tampered_claim() {
    test_utils::init_tracer();
    let provider = sample::provider();

    let descriptors = [utils::employment("employment", 18, None)];
    let mut presentation = presentation(&provider, &descriptors).await;
    presentation["verifiableCredential"][0]["credentialSubject"]["role"] = json!("Director");

    let request = utils::verify_request(&utils::definition(&descriptors), presentation);
    let response = verify_presentation(provider.clone(), request).await.expect("should verify");

    assert!(!response.verified);
    assert_eq!(provider.releases(), 2);
}

#[tokio::test]
async fn different_challenge() {
    test_utils::init_tracer();
    let provider = sample::provider();

    let descriptors = [utils::employment("employment", 18, None)];
    let presentation = presentation(&provider, &descriptors).await;

    let mut request = utils::verify_request(&utils::definition(&descriptors), presentation);
    request.challenge = "a-different-challenge".into();
    let response = verify_presentation(provider, request).await.expect("should verify");

    assert!(!response.verified);
}

// The verifier checks against the proof request it would have made, not the
// one the holder used.
#[tokio::test]
async fn stricter_definition() {
    test_utils::init_tracer();
    let provider = sample::provider();

    let presentation =
        presentation(&provider, &[utils::employment("employment", 18, None)]).await;

    let stricter = utils::definition(&[utils::employment("employment", 21, None)]);
    let request = utils::verify_request(&stricter, presentation);
    let response = verify_presentation(provider, request).await.expect("should verify");

    assert!(!response.verified);
}

#[tokio::test]
async fn single_credential() {
    test_utils::init_tracer();
    let provider = sample::provider();

    let descriptors = [utils::employment("employment", 18, None)];
    let mut presentation = presentation(&provider, &descriptors).await;
    presentation["verifiableCredential"] = presentation["verifiableCredential"][0].clone();

    let mut request = utils::verify_request(&utils::definition(&descriptors), presentation);
    request.presentation_submission.descriptor_map[0].path = "$.verifiableCredential".into();
    let response = verify_presentation(provider, request).await.expect("should verify");

    assert!(response.verified);
}

#[tokio::test]
async fn unsupported_credential() {
    test_utils::init_tracer();
    let provider = sample::provider();

    let descriptors = [utils::employment("employment", 18, None)];
    let mut presentation = presentation(&provider, &descriptors).await;
    presentation["verifiableCredential"] = json!(["eyJhbGciOiJFUzI1NksifQ.eyJ2YyI6e319.c2ln"]);

    let request = utils::verify_request(&utils::definition(&descriptors), presentation);
    let err = verify_presentation(provider.clone(), request).await.expect_err("should fail");

    assert!(matches!(err, Error::UnsupportedCredentialType(_)));

    // only the holder's presentation was loaded
    assert_eq!(provider.releases(), 1);
}

#[tokio::test]
async fn other_cryptosuite() {
    test_utils::init_tracer();
    let provider = sample::provider();

    let descriptors = [utils::employment("employment", 18, None)];
    let mut presentation = presentation(&provider, &descriptors).await;
    presentation["verifiableCredential"][0]["proof"]["cryptosuite"] = json!("eddsa-rdfc-2022");

    let request = utils::verify_request(&utils::definition(&descriptors), presentation);
    let err = verify_presentation(provider, request).await.expect_err("should fail");

    assert!(matches!(err, Error::UnsupportedCredentialType(_)));
}

// Restrictions and resolution must refer to the same credential definition.
#[tokio::test]
async fn other_verification_method() {
    test_utils::init_tracer();
    let provider = sample::provider();

    let descriptors = [utils::employment("employment", 18, None)];
    let mut presentation = presentation(&provider, &descriptors).await;
    presentation["verifiableCredential"][0]["proof"]["verificationMethod"] =
        json!("did:example:issuer/anoncreds/v0/CLAIM_DEF/2/default");

    let request = utils::verify_request(&utils::definition(&descriptors), presentation);
    let err = verify_presentation(provider, request).await.expect_err("should fail");

    assert!(matches!(err, Error::InvalidCredential(_)));
    assert_eq!(err.kind(), ErrorKind::CallerInput);
}

#[tokio::test]
async fn no_credentials() {
    test_utils::init_tracer();
    let provider = sample::provider();

    let descriptors = [utils::employment("employment", 18, None)];
    let request = utils::verify_request(
        &utils::definition(&descriptors),
        json!({"type": ["VerifiablePresentation"], "verifiableCredential": []}),
    );
    let err = verify_presentation(provider, request).await.expect_err("should fail");

    assert!(matches!(err, Error::InvalidCredential(_)));
}

// A verifier unable to resolve the credential definition cannot check the
// presentation. The loaded presentation is still released.
#[tokio::test]
async fn unresolved_definition() {
    test_utils::init_tracer();
    let holder = sample::provider();

    let descriptors = [utils::employment("employment", 18, None)];
    let presentation = presentation(&holder, &descriptors).await;

    let verifier = Provider::new();
    verifier.registry.add_schema(sample::SCHEMA_ID, sample::schema());

    let request = utils::verify_request(&utils::definition(&descriptors), presentation);
    let err = verify_presentation(verifier.clone(), request).await.expect_err("should fail");

    match &err {
        Error::ObjectNotFound(message) => assert!(message.contains(CRED_DEF_ID)),
        _ => panic!("unexpected error: {err}"),
    }
    assert_eq!(err.kind(), ErrorKind::Resolution);
    assert_eq!(verifier.releases(), 1);
}

#[tokio::test]
async fn unknown_descriptor() {
    test_utils::init_tracer();
    let provider = sample::provider();

    let descriptors = [utils::employment("employment", 18, None)];
    let presentation = presentation(&provider, &descriptors).await;

    let mut request = utils::verify_request(&utils::definition(&descriptors), presentation);
    request.presentation_submission.descriptor_map[0].id = "education".into();
    let err = verify_presentation(provider, request).await.expect_err("should fail");

    assert!(matches!(err, Error::DescriptorNotFound(id) if id == "education"));
}
