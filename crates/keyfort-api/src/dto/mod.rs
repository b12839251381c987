//! Request and response DTOs.
//!
//! Wire field names are camelCase; request fields are optional so the
//! handlers can answer missing fields with a 400 instead of a decode
//! rejection.

pub mod request;
pub mod response;
