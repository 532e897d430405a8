//! The authentication core: hand-rolled JSON codec, bearer-token codec,
//! credential hasher and the role-based authorization policy.

pub mod json;
pub mod password;
pub mod policy;
pub mod token;

pub use token::{TokenCodec, TokenError};
