//! # Session Service Core
//!
//! Domain layer for the multi-tenant OAuth2/OIDC session service. This
//! crate contains the domain entities, the repository ports, the signing
//! key manager, the token generator/verifier pair, and the grant state
//! machine. It performs no I/O of its own; persistent and ephemeral
//! storage are reached through the traits in [`repositories`].

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

pub use errors::{AuthError, DomainError, DomainResult, TokenError};
