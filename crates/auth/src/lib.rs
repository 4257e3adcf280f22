//! Credential verification and token issuance
//!
//! `password` is the one-way credential store, `jwt` the stateless token
//! service, and `service` the account registry built on top of both.

mod error;
pub mod jwt;
pub mod password;
pub mod service;

pub use error::{AuthError, Result};
pub use jwt::{Claims, issue_token, verify_token};
pub use password::{hash_password, verify_password};
pub use service::AccountRegistry;
