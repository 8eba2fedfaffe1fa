//! elaine-crud: development tooling for the ElaineCrud engine
//!
//! The engine generates CRUD interfaces for the models of a host application.
//! This crate carries the tasks a contributor runs around it:
//!
//! - **css**: locate the standalone Tailwind CSS compiler, build the engine
//!   stylesheet and stamp it with a generated header
//! - **demo**: create, migrate, seed and reset the library demo database, run
//!   the demo host application and describe its resource routes
//! - **specs**: run the engine's integration and controller test suites
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use elaine_crud::config::ElaineConfig;
//! use elaine_crud::css::CssBuilder;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = ElaineConfig::load(".", None)?;
//! let report = CssBuilder::new(".", &config.css).build(false)?;
//! println!("built {} with Tailwind {}", report.output.display(), report.version);
//! # Ok(())
//! # }
//! ```
//!
//! Every failure surfaces as [`error::ElaineError`]; nothing is retried.

#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod css;
pub mod demo;
pub mod error;
pub mod observability;
pub mod runner;
pub mod specs;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{CssSettings, DemoSettings, ElaineConfig, SpecSettings};
    pub use crate::css::{BuildReport, CompilerLocator, CssBuilder, InstallInstructions, Platform};
    pub use crate::demo::{DemoDatabase, DemoInfo, Resource, Route};
    pub use crate::error::{ElaineError, Result};
    pub use crate::runner::CommandTemplate;
    pub use crate::specs::SpecRunner;
}
