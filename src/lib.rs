//! An API for creating and verifying zero-knowledge `AnonCreds` presentations
//! requested using [DIF Presentation Exchange](https://identity.foundation/presentation-exchange/spec/v2.0.0).
//!
//! Presentation Exchange describes the claims a verifier requires without
//! reference to any credential format. `AnonCreds` proofs, on the other hand,
//! are created and verified against an `AnonCreds` proof request. The library
//! translates between the two: it builds a proof request from a Presentation
//! Definition, the holder's Presentation Submission, and the credentials being
//! presented, then resolves everything the native proof primitives need to
//! create or verify the proof.
//!
//! # Design
//!
//! **Entry points**
//!
//! The library exposes one entry point per role, [`create_presentation`] for
//! holders and [`verify_presentation`] for verifiers. Both share the same
//! proof request builder, so a verifier always checks a presentation against
//! the proof request it would have asked for, never one supplied by the
//! holder.
//!
//! **Providers**
//!
//! Implementers supply registries, tails files, link secrets, and the native
//! proof primitives by implementing the traits in [`provider`]. The library
//! does not cache registry objects; providers wishing to do so should cache
//! behind the [`provider::Registry`] trait.
//!
//! **Revocation**
//!
//! Credentials are proven unrevoked when an input descriptor's
//! `statuses.active` directive is `required` or `allowed`. The proof is made
//! against the status list in effect at the time of the request. See
//! [`revocation`] for how verifiers accept proofs made against status lists
//! published before their own request.
//!
//! # Example
//!
//! ```rust,ignore
//! let request = CreatePresentationRequest {
//!     presentation_definition,
//!     presentation_submission,
//!     credentials,
//!     records,
//!     challenge: "4a7b".into(),
//! };
//! let response = create_presentation(provider.clone(), request).await?;
//!
//! let request = VerifyPresentationRequest {
//!     presentation: response.presentation,
//!     presentation_definition,
//!     presentation_submission,
//!     challenge: "4a7b".into(),
//! };
//! assert!(verify_presentation(provider, request).await?.verified);
//! ```

pub mod config;
pub mod dif_exch;
mod error;
pub mod format;
mod handle;
mod holder;
pub mod proof_request;
pub mod provider;
pub mod registry;
mod resolver;
pub mod revocation;
mod verifier;

pub use crate::error::{Error, ErrorKind, Result};
pub use crate::handle::NativeHandle;
pub use crate::holder::{
    create_presentation, CreatePresentationRequest, CreatePresentationResponse, CredentialRecord,
};
pub use crate::resolver::{resolve, Resolved};
pub use crate::verifier::{
    verify_presentation, VerifyPresentationRequest, VerifyPresentationResponse,
};
