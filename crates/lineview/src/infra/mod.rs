//! Infrastructure adapters for configuration and syntax colouring.

pub mod config;
pub mod highlight;
