//! Request handlers for sync operations.

mod pull;
mod push;

pub use pull::*;
pub use push::*;
