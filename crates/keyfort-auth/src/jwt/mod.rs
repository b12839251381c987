//! JWT token encoding, decoding, and claims management.

pub mod claims;
pub mod codec;

pub use claims::{Claims, TokenType};
pub use codec::TokenCodec;
