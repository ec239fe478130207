//! Signed session tokens.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::Claims;
pub use decoder::TokenDecoder;
pub use encoder::{IssuedToken, TokenEncoder};
