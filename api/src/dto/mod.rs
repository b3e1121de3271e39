//! Request and response DTOs.

pub mod token;
pub mod verify;

pub use token::TokenForm;
pub use verify::{VerifyRequest, VerifyResponse};
