//! In-memory model of a project's buildable artifacts.
//!
//! Declarations are evaluated in program order into a [`build::Build`]
//! registry. Each [`target::BuildTarget`] is validated as it is constructed
//! and stays read-only afterwards, ready for an external backend to consume.

pub mod build;
pub mod config;
pub mod configure;
pub mod dependency;
pub mod environment;
pub mod error;
pub mod generator;
pub mod include_dirs;
pub mod target;
pub mod value;

pub use build::Build;
pub use error::{BuildError, Result};
pub use target::{BuildTarget, TargetKind};
pub use value::{Kwargs, Value};
