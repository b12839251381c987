//! Refresh-token domain entities.

pub mod model;
pub mod pair;

pub use model::{ClientMeta, NewRefreshToken, RefreshToken};
pub use pair::TokenPair;
