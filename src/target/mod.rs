//! Build targets: executables, static libraries and shared libraries.
//!
//! A target is validated and fully populated by [`BuildTarget::new`]. Once it
//! is shared behind an `Rc` (registered in a [`Build`](crate::build::Build) or
//! referenced by another target) it is read-only.

mod naming;
mod options;

pub use naming::NamingConventions;
pub use options::{Pch, TargetOptions};

use crate::dependency::Dependency;
use crate::environment::{Environment, Language};
use crate::error::{BuildError, Result};
use crate::generator::GeneratedList;
use crate::include_dirs::IncludeDirs;
use crate::value::{Kwargs, Value};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum TargetKind {
    #[serde(rename = "executable")]
    Executable,
    #[serde(rename = "static_library")]
    StaticLibrary,
    #[serde(rename = "shared_library")]
    SharedLibrary,
}

impl TargetKind {
    pub fn is_library(&self) -> bool {
        matches!(self, TargetKind::StaticLibrary | TargetKind::SharedLibrary)
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TargetKind::Executable => "executable",
            TargetKind::StaticLibrary => "static library",
            TargetKind::SharedLibrary => "shared library",
        })
    }
}

#[derive(Debug, Clone)]
pub struct BuildTarget {
    name: String,
    subdir: String,
    is_cross: bool,
    kind: TargetKind,
    sources: Vec<String>,
    objects: Vec<String>,
    external_deps: Vec<Rc<dyn Dependency>>,
    include_dirs: Vec<Rc<IncludeDirs>>,
    link_targets: Vec<Rc<BuildTarget>>,
    naming: NamingConventions,
    filename: String,
    need_install: bool,
    pch: BTreeMap<Language, Pch>,
    extra_args: BTreeMap<Language, Vec<String>>,
    generated: Vec<Rc<GeneratedList>>,
    version: Option<String>,
    soversion: Option<String>,
}

impl BuildTarget {
    /// Validates sources, objects and keyword arguments in that order and
    /// stops at the first violation.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: TargetKind,
        name: &str,
        subdir: &str,
        is_cross: bool,
        sources: Vec<Value>,
        objects: Vec<Value>,
        environment: &dyn Environment,
        kwargs: &Kwargs,
    ) -> Result<Self> {
        let conventions = NamingConventions::from_env(environment);
        let mut target = BuildTarget {
            name: name.to_string(),
            subdir: subdir.to_string(),
            is_cross,
            kind,
            sources: Vec::new(),
            objects: Vec::new(),
            external_deps: Vec::new(),
            include_dirs: Vec::new(),
            link_targets: Vec::new(),
            filename: String::new(),
            naming: conventions,
            need_install: false,
            pch: BTreeMap::new(),
            extra_args: BTreeMap::new(),
            generated: Vec::new(),
            version: None,
            soversion: None,
        };

        target.process_sourcelist(sources)?;
        target.process_objectlist(objects)?;
        let options = TargetOptions::from_kwargs(name, kwargs)?;
        target.apply_options(options);
        target.process_deps(kwargs.list("deps"))?;

        if target.sources.is_empty() && target.generated.is_empty() {
            return Err(BuildError::NoSources {
                target: target.name,
            });
        }

        target.filename = naming::filename(
            target.kind,
            &target.name,
            &target.naming,
            target.version.as_deref(),
        );
        tracing::trace!(name = %target.name, kind = %target.kind, filename = %target.filename, "built target");
        Ok(target)
    }

    fn process_sourcelist(&mut self, sources: Vec<Value>) -> Result<()> {
        for source in sources {
            match source {
                Value::String(s) => self.sources.push(s),
                Value::GeneratedList(list) => self.generated.push(list),
                other => {
                    return Err(BuildError::BadSource {
                        target: self.name.clone(),
                        found: other.describe(),
                    })
                }
            }
        }
        Ok(())
    }

    fn process_objectlist(&mut self, objects: Vec<Value>) -> Result<()> {
        for object in objects {
            match object {
                Value::String(s) => self.objects.push(s),
                other => {
                    return Err(BuildError::BadObject {
                        target: self.name.clone(),
                        found: other.describe(),
                    })
                }
            }
        }
        Ok(())
    }

    fn apply_options(&mut self, options: TargetOptions) {
        self.need_install = options.install;
        self.link_targets.extend(options.link_with);
        self.pch.extend(options.pch);
        for (language, args) in options.args {
            self.add_compiler_args(language, args);
        }
        self.version = options.version;
        self.soversion = options.soversion;
        self.include_dirs.extend(options.include_dirs);
    }

    /// Each dependency's sources are merged before the next entry is looked at.
    fn process_deps(&mut self, deps: Vec<Value>) -> Result<()> {
        for dep in deps {
            match dep {
                Value::Dependency(dep) => {
                    self.process_sourcelist(dep.get_sources())?;
                    self.external_deps.push(dep);
                }
                other => {
                    return Err(BuildError::InvalidOption {
                        target: self.name.clone(),
                        key: "deps".to_string(),
                        expected: "an external dependency",
                        found: other.describe(),
                    })
                }
            }
        }
        Ok(())
    }

    /// Appends to the language's argument list; repeated calls accumulate.
    pub fn add_compiler_args<I, S>(&mut self, language: Language, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args
            .entry(language)
            .or_default()
            .extend(args.into_iter().map(Into::into));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    pub fn get_subdir(&self) -> &str {
        &self.subdir
    }

    pub fn is_cross(&self) -> bool {
        self.is_cross
    }

    pub fn get_sources(&self) -> &[String] {
        &self.sources
    }

    pub fn get_objects(&self) -> &[String] {
        &self.objects
    }

    pub fn get_generated_sources(&self) -> &[Rc<GeneratedList>] {
        &self.generated
    }

    pub fn get_external_deps(&self) -> &[Rc<dyn Dependency>] {
        &self.external_deps
    }

    pub fn get_include_dirs(&self) -> &[Rc<IncludeDirs>] {
        &self.include_dirs
    }

    /// Libraries this target links against directly.
    pub fn get_dependencies(&self) -> &[Rc<BuildTarget>] {
        &self.link_targets
    }

    pub fn get_extra_args(&self, language: Language) -> &[String] {
        self.extra_args
            .get(&language)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has_pch(&self) -> bool {
        !self.pch.is_empty()
    }

    pub fn get_pch(&self, language: Language) -> Option<&Pch> {
        self.pch.get(&language)
    }

    pub fn should_install(&self) -> bool {
        self.need_install
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn soversion(&self) -> Option<&str> {
        self.soversion.as_deref()
    }

    pub fn get_filename(&self) -> &str {
        &self.filename
    }

    pub fn get_aliaslist(&self) -> Vec<String> {
        naming::aliases(
            self.kind,
            &self.name,
            &self.naming,
            self.version.as_deref(),
            self.soversion.as_deref(),
        )
    }

    /// Runtime search paths, depth first through the link graph. A shared
    /// library contributes its own subdirectory ahead of its links.
    /// Duplicates are kept.
    pub fn get_rpaths(&self) -> Vec<String> {
        let mut rpaths = match self.kind {
            TargetKind::SharedLibrary => vec![self.subdir.clone()],
            TargetKind::Executable | TargetKind::StaticLibrary => Vec::new(),
        };
        rpaths.extend(self.get_transitive_rpaths());
        rpaths
    }

    pub fn get_transitive_rpaths(&self) -> Vec<String> {
        self.link_targets
            .iter()
            .flat_map(|link| link.get_rpaths())
            .collect()
    }
}
