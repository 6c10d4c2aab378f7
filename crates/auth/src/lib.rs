//! `bulkparts-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod authorize;
pub mod claims;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use authorize::{authorize, AuthzError};
pub use claims::{Hs256JwtValidator, JwtClaims, JwtError, JwtValidator, TokenValidationError, validate_claims};
pub use permissions::Permission;
pub use principal::{Principal, PrincipalId};
pub use roles::Role;
