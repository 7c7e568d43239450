//! Configuration module for the token engine
//!
//! Compile-time constants live in [`constants`]; user-tunable settings in [`runtime`].

pub mod constants;
pub mod runtime;

pub use constants::compile_time;
pub use runtime::{ConfigError, EngineConfig};
