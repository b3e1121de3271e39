//! Value objects exchanged with the transport layer.

pub mod grant;

pub use grant::GrantRequest;
