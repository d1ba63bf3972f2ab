use crate::error::{BuildError, Result};
use crate::value::Kwargs;

/// Include directories declared relative to a source subdirectory.
///
/// Paths are stored as written; nothing checks that they exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirs {
    curdir: String,
    incdirs: Vec<String>,
}

impl IncludeDirs {
    pub fn new(curdir: impl Into<String>, dirs: Vec<String>, kwargs: &Kwargs) -> Result<Self> {
        if !kwargs.is_empty() {
            return Err(BuildError::IncludeDirsOptions);
        }
        Ok(IncludeDirs {
            curdir: curdir.into(),
            incdirs: dirs,
        })
    }

    pub fn get_curdir(&self) -> &str {
        &self.curdir
    }

    pub fn get_incdirs(&self) -> &[String] {
        &self.incdirs
    }
}
