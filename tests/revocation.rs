//! Tests for revocation metadata and object resolution

use std::collections::BTreeSet;

use assert_let_bind::assert_let;
use test_utils::provider::Provider;
use test_utils::sample::{self, CRED_DEF_ID, PUBLISHED_AT, REV_REG_ID, SCHEMA_ID};
use vercre_anoncreds::config::Options;
use vercre_anoncreds::proof_request::NonRevokedInterval;
use vercre_anoncreds::revocation::{
    revocation_metadata, NonRevokedIntervalOverride, RevocationFetchMetadata,
};
use vercre_anoncreds::{resolve, Error, ErrorKind};

fn fetch(
    index: Option<u32>, interval: NonRevokedInterval, timestamp: Option<u64>,
) -> RevocationFetchMetadata {
    RevocationFetchMetadata {
        revocation_registry_id: REV_REG_ID.into(),
        revocation_registry_index: index,
        non_revoked_interval: interval,
        timestamp,
    }
}

#[tokio::test]
async fn holder_state() {
    test_utils::init_tracer();
    let provider = sample::provider();

    let requested = PUBLISHED_AT + 3600;
    let fetch = fetch(Some(3), NonRevokedInterval::at(requested), None);
    let metadata =
        revocation_metadata(&provider, &fetch, false, &Options::default()).await.expect("ok");

    // the list in effect was published before the requested time
    assert_eq!(metadata.updated_timestamp, PUBLISHED_AT);
    assert_eq!(metadata.revocation_registry_id, REV_REG_ID);
    assert_eq!(metadata.definition, sample::revocation_registry_definition());
    assert!(metadata.interval_override.is_none());

    assert_let!(Some(state), metadata.revocation_state);
    assert_eq!(state.index, 3);
    assert_eq!(state.timestamp, PUBLISHED_AT);
    assert!(!state.revoked);
}

#[tokio::test]
async fn revoked_index() {
    test_utils::init_tracer();
    let provider = sample::provider();
    provider.registry.publish_status_list(sample::status_list(PUBLISHED_AT + 60, &[3]));

    let fetch = fetch(Some(3), NonRevokedInterval::at(PUBLISHED_AT + 3600), None);
    let metadata =
        revocation_metadata(&provider, &fetch, false, &Options::default()).await.expect("ok");

    assert_eq!(metadata.updated_timestamp, PUBLISHED_AT + 60);
    assert_let!(Some(state), metadata.revocation_state);
    assert!(state.revoked);
}

#[tokio::test]
async fn no_index_no_state() {
    test_utils::init_tracer();
    let provider = sample::provider();

    let fetch = fetch(None, NonRevokedInterval::at(PUBLISHED_AT), Some(PUBLISHED_AT));
    let metadata =
        revocation_metadata(&provider, &fetch, true, &Options::default()).await.expect("ok");

    assert!(metadata.revocation_state.is_none());
    assert!(metadata.interval_override.is_none());
}

// The registry has not changed between the timestamp used in the proof and the
// requested `from` time, so the proof's status list is accepted.
#[tokio::test]
async fn interval_override() {
    test_utils::init_tracer();
    let provider = sample::provider();

    let from = PUBLISHED_AT + 3600;
    let fetch = fetch(None, NonRevokedInterval::at(from), Some(PUBLISHED_AT));
    let metadata =
        revocation_metadata(&provider, &fetch, true, &Options::default()).await.expect("ok");

    assert_eq!(metadata.updated_timestamp, PUBLISHED_AT);
    assert_eq!(
        metadata.interval_override,
        Some(NonRevokedIntervalOverride {
            override_revocation_status_list_timestamp: PUBLISHED_AT,
            requested_from_timestamp: from,
            revocation_registry_definition_id: REV_REG_ID.into(),
        })
    );
}

// A status list was published between the timestamp used in the proof and the
// requested `from` time.
#[tokio::test]
async fn timestamp_mismatch() {
    test_utils::init_tracer();
    let provider = sample::provider();
    provider.registry.publish_status_list(sample::status_list(PUBLISHED_AT + 60, &[]));

    let from = PUBLISHED_AT + 3600;
    let fetch = fetch(None, NonRevokedInterval::at(from), Some(PUBLISHED_AT));
    let err = revocation_metadata(&provider, &fetch, true, &Options::default())
        .await
        .expect_err("should fail");

    assert_let!(
        Error::RevocationTimestampMismatch {
            requested_from,
            expected,
            received
        },
        &err
    );
    assert_eq!(*requested_from, from);
    assert_eq!(*expected, PUBLISHED_AT);
    assert_eq!(*received, Some(PUBLISHED_AT + 60));
    assert_eq!(err.kind(), ErrorKind::Consistency);
}

#[tokio::test]
async fn verifier_needs_timestamp() {
    test_utils::init_tracer();
    let provider = sample::provider();

    let fetch = fetch(None, NonRevokedInterval::at(PUBLISHED_AT), None);
    let err = revocation_metadata(&provider, &fetch, true, &Options::default())
        .await
        .expect_err("should fail");

    assert!(matches!(err, Error::InvalidRevocationMetadata(_)));
}

#[tokio::test]
async fn no_registry_id() {
    test_utils::init_tracer();
    let provider = sample::provider();

    let mut fetch = fetch(None, NonRevokedInterval::at(PUBLISHED_AT), None);
    fetch.revocation_registry_id = String::new();
    let err = revocation_metadata(&provider, &fetch, false, &Options::default())
        .await
        .expect_err("should fail");

    assert!(matches!(err, Error::InvalidRevocationMetadata(_)));
}

// Intervals are checked before the registry is consulted.
#[tokio::test]
async fn interval_too_wide() {
    test_utils::init_tracer();
    let provider = Provider::new();

    let interval = NonRevokedInterval {
        from: Some(PUBLISHED_AT),
        to: Some(PUBLISHED_AT + 86_400),
    };
    let fetch = fetch(None, interval, None);
    let err = revocation_metadata(&provider, &fetch, false, &Options::default())
        .await
        .expect_err("should fail");

    assert!(matches!(err, Error::InvalidRevocationInterval(_)));
}

#[tokio::test]
async fn configured_interval() {
    test_utils::init_tracer();
    let provider = sample::provider();

    let options = Options {
        max_non_revoked_interval: 86_400,
        ..Options::default()
    };
    let interval = NonRevokedInterval {
        from: Some(PUBLISHED_AT + 60),
        to: Some(PUBLISHED_AT + 3600),
    };
    let metadata = revocation_metadata(&provider, &fetch(None, interval, None), false, &options)
        .await
        .expect("ok");

    // fetched at 'to', but the list predates 'from'
    assert_eq!(metadata.updated_timestamp, PUBLISHED_AT);
    assert!(metadata.interval_override.is_none());
}

#[tokio::test]
async fn registry_not_found() {
    test_utils::init_tracer();
    let provider = Provider::new();

    let fetch = fetch(None, NonRevokedInterval::at(PUBLISHED_AT), None);
    let err = revocation_metadata(&provider, &fetch, false, &Options::default())
        .await
        .expect_err("should fail");

    assert_let!(Error::RegistryNotFound(message), &err);
    assert!(message.contains("notFound"));
    assert_eq!(err.kind(), ErrorKind::Resolution);
}

#[tokio::test]
async fn status_list_not_found() {
    test_utils::init_tracer();
    let provider = sample::provider();

    let fetch = fetch(None, NonRevokedInterval::at(PUBLISHED_AT - 1), None);
    let err = revocation_metadata(&provider, &fetch, false, &Options::default())
        .await
        .expect_err("should fail");

    assert!(matches!(err, Error::StatusListNotFound(_)));
}

#[tokio::test]
async fn schemas_from_definitions() {
    test_utils::init_tracer();
    let provider = sample::provider();

    let cred_def_ids = BTreeSet::from([CRED_DEF_ID.to_string()]);
    let resolved = resolve(&provider, &BTreeSet::new(), &cred_def_ids).await.expect("ok");

    assert_eq!(resolved.credential_definitions[CRED_DEF_ID], sample::credential_definition());
    assert_eq!(resolved.schemas[SCHEMA_ID], sample::schema());
    assert_eq!(resolved.schemas.len(), 1);
}

#[tokio::test]
async fn object_not_found() {
    test_utils::init_tracer();
    let provider = sample::provider();

    let schema_ids =
        BTreeSet::from(["did:example:issuer/anoncreds/v0/SCHEMA/unknown/1.0".to_string()]);
    let cred_def_ids = BTreeSet::from([CRED_DEF_ID.to_string()]);
    let err = resolve(&provider, &schema_ids, &cred_def_ids).await.expect_err("should fail");

    assert!(matches!(err, Error::ObjectNotFound(_)));
}
