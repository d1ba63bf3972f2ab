//! Typed view of a target's keyword arguments, validated once.

use super::BuildTarget;
use crate::environment::{is_header, is_source, Language};
use crate::error::{BuildError, Result};
use crate::include_dirs::IncludeDirs;
use crate::value::{Kwargs, Value};
use std::collections::BTreeMap;
use std::rc::Rc;

/// A precompiled header with its optional companion source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pch {
    pub header: String,
    pub source: Option<String>,
}

impl Pch {
    /// Accepts `[]`, `[header]` or a header/source pair in either order;
    /// the pair is stored header first.
    pub fn from_files(target: &str, language: Language, files: Vec<String>) -> Result<Option<Pch>> {
        let invalid = |reason: &str| BuildError::InvalidPch {
            target: target.to_string(),
            language: language.to_string(),
            reason: reason.to_string(),
        };
        let mut files = files.into_iter();
        match (files.next(), files.next(), files.next()) {
            (None, _, _) => Ok(None),
            (Some(header), None, _) if is_header(&header) => Ok(Some(Pch {
                header,
                source: None,
            })),
            (Some(other), None, _) => Err(invalid(&format!("'{other}' is not a header"))),
            (Some(first), Some(second), None) => {
                if is_header(&first) && is_source(&second) {
                    Ok(Some(Pch {
                        header: first,
                        source: Some(second),
                    }))
                } else if is_source(&first) && is_header(&second) {
                    Ok(Some(Pch {
                        header: second,
                        source: Some(first),
                    }))
                } else {
                    Err(invalid("must contain one header and at most one source"))
                }
            }
            (Some(_), Some(_), Some(_)) => Err(invalid("may have a maximum of 2 files")),
        }
    }

    pub fn files(&self) -> Vec<&str> {
        let mut files = vec![self.header.as_str()];
        files.extend(self.source.as_deref());
        files
    }
}

#[derive(Debug, Clone, Default)]
pub struct TargetOptions {
    pub install: bool,
    pub link_with: Vec<Rc<BuildTarget>>,
    pub pch: BTreeMap<Language, Pch>,
    pub args: BTreeMap<Language, Vec<String>>,
    pub version: Option<String>,
    pub soversion: Option<String>,
    pub include_dirs: Vec<Rc<IncludeDirs>>,
}

impl TargetOptions {
    pub fn from_kwargs(target: &str, kwargs: &Kwargs) -> Result<Self> {
        let invalid = |key: &str, expected: &'static str, found: &Value| BuildError::InvalidOption {
            target: target.to_string(),
            key: key.to_string(),
            expected,
            found: found.describe(),
        };

        let mut options = TargetOptions::default();

        options.install = match kwargs.get("install") {
            None => false,
            Some(Value::Boolean(install)) => *install,
            Some(other) => return Err(invalid("install", "a boolean", other)),
        };

        for link in kwargs.list("link_with") {
            match link {
                Value::Target(lib) if lib.kind().is_library() => options.link_with.push(lib),
                other => {
                    let link = match &other {
                        Value::Target(t) => t.name().to_string(),
                        value => value.describe(),
                    };
                    return Err(BuildError::NotALibrary {
                        target: target.to_string(),
                        link,
                    });
                }
            }
        }

        for language in Language::ALL {
            let key = language.pch_key();
            let files = kwargs
                .list(key)
                .into_iter()
                .map(|v| match v {
                    Value::String(s) => Ok(s),
                    other => Err(invalid(key, "a filename", &other)),
                })
                .collect::<Result<Vec<_>>>()?;
            if let Some(pch) = Pch::from_files(target, language, files)? {
                options.pch.insert(language, pch);
            }
        }

        for language in Language::ALL {
            let key = language.args_key();
            let args = kwargs
                .list(key)
                .into_iter()
                .map(|v| match v {
                    Value::String(s) => Ok(s),
                    other => Err(invalid(key, "a string", &other)),
                })
                .collect::<Result<Vec<_>>>()?;
            if !args.is_empty() {
                options.args.insert(language, args);
            }
        }

        options.version = match kwargs.get("version") {
            None => None,
            Some(Value::String(v)) => Some(v.clone()),
            Some(other) => return Err(invalid("version", "a string", other)),
        };

        options.soversion = match kwargs.get("soversion") {
            None => None,
            Some(Value::String(v)) => Some(v.clone()),
            Some(Value::Integer(v)) => Some(v.to_string()),
            Some(other) => return Err(invalid("soversion", "a string or integer", other)),
        };

        for dirs in kwargs.list("include_dirs") {
            match dirs {
                Value::IncludeDirs(dirs) => options.include_dirs.push(dirs),
                other => return Err(invalid("include_dirs", "include directories", &other)),
            }
        }

        Ok(options)
    }
}
