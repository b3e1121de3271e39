//! Postgres-backed persistent storage.

pub mod connection;
pub mod postgres;

pub use connection::create_pool;
pub use postgres::PgCredentialRepository;
