//! Auth Module
//!
//! Tokens are minted by the external identity service; this module only
//! validates them and exposes the acting user to handlers.

pub mod extractor;
pub mod jwt;

pub use jwt::{Claims, CurrentActor, JwtConfig, JwtError, JwtService};
