//! Configuration module.
//!
//! Static settings come from a TOML file; the language-model API key comes
//! from the environment. A missing key is fatal at startup.

pub mod settings;

pub use settings::*;
