//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "generate from a script".

pub mod generation_service;

pub use generation_service::{GenerationService, RunState};
