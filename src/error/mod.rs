//! Validation errors raised while declaring build objects.
//!
//! Every failure in the model is a configuration error: the declaration that
//! triggered it is rejected and whatever was under construction is dropped.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BuildError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("bad source in target '{target}': expected a filename or generated list, got {found}")]
    BadSource { target: String, found: String },

    #[error("bad object in target '{target}': expected a filename, got {found}")]
    BadObject { target: String, found: String },

    #[error("link target '{link}' of '{target}' is not a library")]
    NotALibrary { target: String, link: String },

    #[error("invalid '{key}' in target '{target}': expected {expected}, got {found}")]
    InvalidOption {
        target: String,
        key: String,
        expected: &'static str,
        found: String,
    },

    #[error("invalid {language} PCH in target '{target}': {reason}")]
    InvalidPch {
        target: String,
        language: String,
        reason: String,
    },

    #[error("build target '{target}' has no sources")]
    NoSources { target: String },

    #[error("duplicate target name: {name}")]
    DuplicateTarget { name: String },

    #[error("test '{test}' must run an executable, but '{target}' is not one")]
    NotAnExecutable { test: String, target: String },

    #[error("include_directories does not take keyword arguments")]
    IncludeDirsOptions,

    #[error("generator requires exactly one positional argument, got {count}")]
    GeneratorArity { count: usize },

    #[error("first generator argument must be an executable, got {found}")]
    GeneratorExecutable { found: String },

    #[error("generator must have an '{key}' keyword argument")]
    MissingGeneratorKeyword { key: &'static str },

    #[error("generator '{key}' must be a string or a list of strings, got {found}")]
    InvalidGeneratorKeyword { key: &'static str, found: String },

    #[error("generator output '{template}' {reason}")]
    InvalidOutputTemplate { template: String, reason: &'static str },

    #[error("'{input}' was never added to this generated list")]
    UnknownGeneratorInput { input: String },

    #[error("configuration data has no value for '{key}'")]
    MissingConfigValue { key: String },

    #[error("no static linker available for compiler '{compiler}'")]
    NoStaticLinker { compiler: String },
}
