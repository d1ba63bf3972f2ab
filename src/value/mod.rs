//! Declaration values and the keyword bag handed to constructors.
//!
//! The declaration front end hands every object over already unwrapped into
//! [`Value`], so constructors match on one typed union instead of probing for
//! wrapper attributes while they validate.

use crate::dependency::Dependency;
use crate::generator::{ExternalProgram, GeneratedList, Generator};
use crate::include_dirs::IncludeDirs;
use crate::target::BuildTarget;
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub enum Value {
    String(String),
    Integer(i64),
    Boolean(bool),
    List(Vec<Value>),
    Target(Rc<BuildTarget>),
    Dependency(Rc<dyn Dependency>),
    IncludeDirs(Rc<IncludeDirs>),
    Generator(Rc<Generator>),
    GeneratedList(Rc<GeneratedList>),
    Program(Rc<ExternalProgram>),
}

impl Value {
    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Value::String(s) => format!("string '{s}'"),
            Value::Integer(i) => format!("integer {i}"),
            Value::Boolean(b) => format!("boolean {b}"),
            Value::List(_) => "list".to_string(),
            Value::Target(t) => format!("{} '{}'", t.kind(), t.name()),
            Value::Dependency(d) => format!("dependency '{}'", d.name()),
            Value::IncludeDirs(_) => "include directories".to_string(),
            Value::Generator(_) => "generator".to_string(),
            Value::GeneratedList(_) => "generated list".to_string(),
            Value::Program(p) => format!("program '{}'", p.name()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// A scalar becomes a one-element list; a list yields its elements.
    pub fn into_list(self) -> Vec<Value> {
        match self {
            Value::List(items) => items,
            other => vec![other],
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<Rc<BuildTarget>> for Value {
    fn from(target: Rc<BuildTarget>) -> Self {
        Value::Target(target)
    }
}

impl From<Rc<IncludeDirs>> for Value {
    fn from(dirs: Rc<IncludeDirs>) -> Self {
        Value::IncludeDirs(dirs)
    }
}

impl From<Rc<Generator>> for Value {
    fn from(generator: Rc<Generator>) -> Self {
        Value::Generator(generator)
    }
}

impl From<Rc<GeneratedList>> for Value {
    fn from(list: Rc<GeneratedList>) -> Self {
        Value::GeneratedList(list)
    }
}

impl From<Rc<ExternalProgram>> for Value {
    fn from(program: Rc<ExternalProgram>) -> Self {
        Value::Program(program)
    }
}

impl From<Rc<dyn Dependency>> for Value {
    fn from(dep: Rc<dyn Dependency>) -> Self {
        Value::Dependency(dep)
    }
}

/// Keyword arguments of a declaration, in the order they were written.
#[derive(Debug, Clone, Default)]
pub struct Kwargs {
    values: IndexMap<String, Value>,
}

impl Kwargs {
    pub fn new() -> Self {
        Kwargs::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Entries of a single-or-list keyword; empty when the key is absent.
    pub fn list(&self, key: &str) -> Vec<Value> {
        self.values
            .get(key)
            .cloned()
            .map(Value::into_list)
            .unwrap_or_default()
    }
}
