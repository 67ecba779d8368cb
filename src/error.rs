//! # Errors
//!
//! Errors raised while translating a Presentation Exchange request into an
//! `AnonCreds` proof request, resolving the objects it references, and
//! creating or verifying the resulting presentation.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned when building, creating, or verifying a presentation.
///
/// None of these errors are retried by the library. Callers can use
/// [`Error::kind`] to distinguish bad input from resolution failures and
/// consistency failures.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A predicate filter is missing or uses a keyword that cannot be mapped
    /// to an `AnonCreds` predicate.
    #[error("unsupported predicate filter: {0}")]
    UnsupportedFilter(String),

    /// A field path does not reference a claim in the credential subject.
    #[error("invalid claim path: {0}")]
    InvalidClaimPath(String),

    /// A field has no usable paths.
    #[error("field path is empty: {0}")]
    EmptyFieldPath(String),

    /// An input descriptor has no field constraints to map.
    #[error("input descriptor {0} has no field constraints")]
    MissingFields(String),

    /// A schema or credential definition could not be resolved.
    #[error("object not found: {0}")]
    ObjectNotFound(String),

    /// A revocation registry definition could not be resolved.
    #[error("revocation registry not found: {0}")]
    RegistryNotFound(String),

    /// A revocation status list could not be resolved.
    #[error("revocation status list not found: {0}")]
    StatusListNotFound(String),

    /// The registry holds state for the requested `from` time that the
    /// fetched status list does not account for.
    #[error(
        "status list timestamp for {requested_from} does not match the one used in the proof. Expected: {expected}, received: {received:?}"
    )]
    RevocationTimestampMismatch {
        /// The requested `from` time.
        requested_from: u64,

        /// The timestamp of the status list used in the proof.
        expected: u64,

        /// The timestamp reported by the registry for `requested_from`.
        received: Option<u64>,
    },

    /// A non-revocation interval does not follow Aries RFC 0441.
    #[error("invalid non-revocation interval: {0}")]
    InvalidRevocationInterval(String),

    /// Revocation metadata is incomplete.
    #[error("invalid revocation metadata: {0}")]
    InvalidRevocationMetadata(String),

    /// A submission references an input descriptor that is not in the
    /// presentation definition.
    #[error("input descriptor {0} not found in presentation definition")]
    DescriptorNotFound(String),

    /// A submission path does not resolve to exactly one credential.
    #[error("could not extract credential from presentation submission: {0}")]
    CredentialExtractionFailed(String),

    /// The extracted document is not one of the presented credentials.
    #[error("credential not found in presented credentials: {0}")]
    CredentialNotFound(String),

    /// A presented credential does not match its stored record.
    #[error("credential does not match stored record: {0}")]
    CredentialMismatch(String),

    /// A credential must be revocable to satisfy a status directive but is
    /// not.
    #[error("selected credential must be revocable but is not: {0}")]
    CredentialNotRevocable(String),

    /// A status directive other than `allowed` or `required`.
    #[error("unsupported status directive: {0}")]
    UnsupportedStatusDirective(String),

    /// No link secret is associated with the selected credentials.
    #[error("cannot create a presentation without a link secret")]
    NoLinkSecret,

    /// More than one link secret is associated with the selected credentials.
    #[error("multiple link secrets cannot be used")]
    MultipleLinkSecrets,

    /// Two requested attributes or predicates share a referent.
    #[error("duplicate referent in proof request: {0}")]
    DuplicateReferent(String),

    /// A presented credential is not an `AnonCreds` Data Integrity credential.
    #[error("unsupported credential type: {0}")]
    UnsupportedCredentialType(String),

    /// A credential could not be read.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    /// A collaborator (registry, tails cache, secret store) failed.
    #[error("provider error: {0}")]
    Provider(#[from] anyhow::Error),

    /// The native proof primitive failed.
    #[error("native proof error: {0}")]
    Native(anyhow::Error),
}

/// Classification of [`Error`] values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied input that cannot be translated.
    CallerInput,

    /// An object referenced by a credential could not be resolved.
    Resolution,

    /// Resolved state contradicts the presentation being built or verified.
    Consistency,

    /// A collaborator or native primitive failed.
    Collaborator,
}

impl Error {
    /// Returns the class of the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedFilter(_)
            | Self::InvalidClaimPath(_)
            | Self::EmptyFieldPath(_)
            | Self::MissingFields(_)
            | Self::InvalidRevocationInterval(_)
            | Self::InvalidRevocationMetadata(_)
            | Self::DescriptorNotFound(_)
            | Self::CredentialExtractionFailed(_)
            | Self::CredentialNotFound(_)
            | Self::CredentialNotRevocable(_)
            | Self::UnsupportedStatusDirective(_)
            | Self::NoLinkSecret
            | Self::MultipleLinkSecrets
            | Self::DuplicateReferent(_)
            | Self::UnsupportedCredentialType(_)
            | Self::InvalidCredential(_) => ErrorKind::CallerInput,
            Self::ObjectNotFound(_) | Self::RegistryNotFound(_) | Self::StatusListNotFound(_) => {
                ErrorKind::Resolution
            }
            Self::RevocationTimestampMismatch { .. } | Self::CredentialMismatch(_) => {
                ErrorKind::Consistency
            }
            Self::Provider(_) | Self::Native(_) => ErrorKind::Collaborator,
        }
    }
}
