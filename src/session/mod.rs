//! Session orchestration module.
//!
//! Holds the current incident's state across user actions and dispatches:
//! - Summarize incident
//! - Resolution steps
//! - Clear

pub mod context;
pub mod dispatch;
pub mod gate;
pub mod render;
pub mod state;

pub use context::*;
pub use dispatch::*;
pub use gate::*;
pub use render::*;
pub use state::*;
