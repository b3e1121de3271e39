//! Domain entities for the session service.

pub mod client;
pub mod tenant;
pub mod token;
pub mod user;

pub use client::Client;
pub use tenant::Tenant;
pub use token::{Claims, RefreshTokenRecord, TokenResponse, TokenSubject};
pub use user::User;
