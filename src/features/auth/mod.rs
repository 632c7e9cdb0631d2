//! Bearer-token authentication against the external OIDC provider.
//!
//! Tokens are issued by Logto; this service only validates them against the
//! provider's JWKS and maps the role claim onto back-office guards.

mod jwks;
mod validator;

pub mod dto;
pub mod guards;
pub mod handler;
pub mod model;
pub mod routes;

pub use jwks::JwksClient;
pub use validator::JwtValidator;
