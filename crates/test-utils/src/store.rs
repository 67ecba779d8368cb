//! In-memory stores backing the test provider.

pub mod registry;
pub mod secret;
