//! CLI command implementations.

pub mod common;
pub mod hunt;
pub mod params;
pub mod render;
