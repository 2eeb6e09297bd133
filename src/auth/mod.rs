//! # Authentication Module
//!
//! Token issuance and verification, password hashing, the auth gate
//! middleware and the social login providers.

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod oauth;
pub mod password;

pub use jwt::JwtService;
pub use middleware::AuthMiddleware;
pub use models::{AuthUser, MaybeAuthUser};
