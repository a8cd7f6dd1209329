//! Domain facades that fan requests out to the provider clients.
//!
//! Each researcher has its own operation and input type; there is no common trait.

pub mod generic;
pub mod token;

pub use generic::GenericResearcher;
pub use token::{TokenQuery, TokenReport, TokenResearcher};
