//! # Claim Paths
//!
//! Resolves the `AnonCreds` attribute names referenced by a field constraint.

use crate::dif_exch::Field;
use crate::{Error, Result};

/// Prefix every mappable field path starts with.
pub const CREDENTIAL_SUBJECT: &str = "$.credentialSubject.";

/// Returns the attribute names referenced by the field's paths. The first
/// name is the field's primary name.
///
/// Paths outside the credential subject cannot be mapped and are skipped.
///
/// # Errors
///
/// Returns `EmptyFieldPath` if the field has no paths, and `InvalidClaimPath`
/// if no path is into the credential subject or a path names no attribute.
pub fn claim_names(field: &Field) -> Result<Vec<String>> {
    let Some(first) = field.path.first() else {
        return Err(Error::EmptyFieldPath(field.id.clone().unwrap_or_default()));
    };

    let names = field
        .path
        .iter()
        .filter_map(|path| path.strip_prefix(CREDENTIAL_SUBJECT))
        .map(|name| {
            if name.is_empty() {
                return Err(Error::InvalidClaimPath(format!(
                    "'{CREDENTIAL_SUBJECT}' names no claim"
                )));
            }
            Ok(name.to_string())
        })
        .collect::<Result<Vec<_>>>()?;

    if names.is_empty() {
        return Err(Error::InvalidClaimPath(format!(
            "'{first}' must start with '{CREDENTIAL_SUBJECT}'"
        )));
    }
    Ok(names)
}

/// Returns the primary attribute name referenced by the field.
///
/// # Errors
///
/// See [`claim_names`].
pub fn primary_name(field: &Field) -> Result<String> {
    let mut names = claim_names(field)?;
    Ok(names.swap_remove(0))
}
