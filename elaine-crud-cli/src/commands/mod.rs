//! CLI command implementations

pub mod css;
pub mod demo;
pub mod spec;

pub use css::CssCommand;
pub use demo::DemoCommand;
pub use spec::SpecCommand;
