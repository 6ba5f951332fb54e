//! Bearer-token authentication.
//!
//! Tokens are HS256 JWTs signed with the shared `JWT_SECRET`; the `sub` claim is the
//! user id.

pub mod jwt;
pub mod models;

pub use jwt::{bearer_token, JwtService};
pub use models::{AccessClaims, AuthenticatedUser};
