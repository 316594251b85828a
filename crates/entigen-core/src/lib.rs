//! Entigen Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Entigen
//! entity code generator, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           entigen-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │          (GenerationService)            │
//! │  loader → registry → binder → reconciler│
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Scripts, Store, Filesystem, Renderer)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    entigen-adapters (Infrastructure)    │
//! │ (Handlebars, LocalFilesystem, etc)      │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (Config tree, preparation, validation) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use entigen_core::application::{GenerationRequest, GenerationService, Registry};
//!
//! let service = GenerationService::new(scripts, templates, renderer, filesystem, Registry::with_builtins());
//! let request = GenerationRequest::new("EntityLibrary", "./generated")
//!     .with_runtime_parameter("Company", "Acme");
//! let stats = service.generate(&request, &document).unwrap();
//! println!("{} created, {} updated", stats.created, stats.updated);
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ArtifactStatus, GenerationRequest, GenerationService, GenerationStatistics, Registry,
        ports::{Filesystem, ScriptSource, TemplateRenderer, TemplateStore},
    };
    pub use crate::domain::{
        ConfigError, EntityConfig, OperationConfig, PreparedConfig, RootConfig, naming,
    };
    pub use crate::error::{EntigenError, EntigenResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
