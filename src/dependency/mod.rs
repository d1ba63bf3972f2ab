use crate::value::Value;
use std::fmt::Debug;

/// An external dependency a target can declare through `deps`.
///
/// Dependencies may carry their own source files, which are merged into every
/// consuming target with the same rules as the target's own sources.
pub trait Dependency: Debug {
    fn name(&self) -> &str;

    fn get_compile_args(&self) -> Vec<String> {
        Vec::new()
    }

    fn get_link_args(&self) -> Vec<String> {
        Vec::new()
    }

    fn get_sources(&self) -> Vec<Value> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExternalDependency {
    name: String,
    compile_args: Vec<String>,
    link_args: Vec<String>,
    sources: Vec<Value>,
}

impl ExternalDependency {
    pub fn new(name: impl Into<String>) -> Self {
        ExternalDependency {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_compile_args(mut self, args: Vec<String>) -> Self {
        self.compile_args = args;
        self
    }

    pub fn with_link_args(mut self, args: Vec<String>) -> Self {
        self.link_args = args;
        self
    }

    pub fn with_sources(mut self, sources: Vec<Value>) -> Self {
        self.sources = sources;
        self
    }
}

impl Dependency for ExternalDependency {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_compile_args(&self) -> Vec<String> {
        self.compile_args.clone()
    }

    fn get_link_args(&self) -> Vec<String> {
        self.link_args.clone()
    }

    fn get_sources(&self) -> Vec<Value> {
        self.sources.clone()
    }
}
