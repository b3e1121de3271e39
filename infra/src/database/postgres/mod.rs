//! Postgres repository implementations.

pub mod credential_repository;

pub use credential_repository::PgCredentialRepository;
