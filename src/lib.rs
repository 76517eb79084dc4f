//! Folio application library
//!
//! Application modules plus the bootstrap that wires them into the HTTP
//! server.

pub mod bootstrap;
pub mod modules;

/// Re-export commonly used types
pub use modules::*;
