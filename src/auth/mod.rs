//! Who is signed in, and which model-provider keys we hold.
//!
//! The identity provider itself lives elsewhere; this module only records
//! its outcome.

pub mod credentials;
pub mod identity;

pub use credentials::CredentialStore;
pub use identity::Identity;
