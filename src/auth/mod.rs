//! Authentication module
//!
//! Exchanges an API key and secret for a short-lived bearer token.
//!
//! The `AuthSession` owns the current token. Other components read it before
//! each request and call `refresh()` when the API answers 401.

mod session;
mod types;

pub use session::{authenticate, AuthSession};
pub use types::{Credentials, Token};

#[cfg(test)]
mod tests;
