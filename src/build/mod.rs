//! The registry every declaration of a configuration run ends up in.

use crate::configure::ConfigureFile;
use crate::environment::{Compiler, Environment, Language, StaticLinker};
use crate::error::{BuildError, Result};
use crate::target::{BuildTarget, TargetKind};
use crate::value::{Kwargs, Value};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct Test {
    name: String,
    exe: Rc<BuildTarget>,
    args: Vec<String>,
}

impl Test {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn exe(&self) -> &Rc<BuildTarget> {
        &self.exe
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// Headers installed from one subdirectory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headers {
    pub subdir: String,
    pub sources: Vec<String>,
    pub install_subdir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Man {
    pub subdir: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Data {
    pub subdir: String,
    pub sources: Vec<String>,
    pub install_dir: Option<String>,
}

pub struct Build {
    environment: Box<dyn Environment>,
    project: Option<String>,
    targets: IndexMap<String, Rc<BuildTarget>>,
    compilers: Vec<Compiler>,
    cross_compilers: Vec<Compiler>,
    static_linker: Option<StaticLinker>,
    static_cross_linker: Option<StaticLinker>,
    global_args: HashMap<Language, Vec<String>>,
    tests: Vec<Test>,
    headers: Vec<Headers>,
    man: Vec<Man>,
    data: Vec<Data>,
    configure_files: Vec<ConfigureFile>,
}

impl fmt::Debug for Build {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Build")
            .field("project", &self.project)
            .field("targets", &self.targets.keys().collect::<Vec<_>>())
            .field("compilers", &self.compilers)
            .field("cross_compilers", &self.cross_compilers)
            .field("static_linker", &self.static_linker)
            .field("static_cross_linker", &self.static_cross_linker)
            .field("tests", &self.tests.len())
            .field("configure_files", &self.configure_files.len())
            .finish_non_exhaustive()
    }
}

impl Build {
    pub fn new(environment: Box<dyn Environment>) -> Self {
        Build {
            environment,
            project: None,
            targets: IndexMap::new(),
            compilers: Vec::new(),
            cross_compilers: Vec::new(),
            static_linker: None,
            static_cross_linker: None,
            global_args: HashMap::new(),
            tests: Vec::new(),
            headers: Vec::new(),
            man: Vec::new(),
            data: Vec::new(),
            configure_files: Vec::new(),
        }
    }

    pub fn environment(&self) -> &dyn Environment {
        self.environment.as_ref()
    }

    pub fn set_project(&mut self, name: impl Into<String>) {
        self.project = Some(name.into());
    }

    pub fn get_project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    /// The first compiler registered picks the static linker; later ones
    /// are only recorded.
    pub fn add_compiler(&mut self, compiler: Compiler) -> Result<()> {
        if self.compilers.is_empty() {
            self.static_linker = Some(self.environment.detect_static_linker(&compiler)?);
        }
        tracing::debug!(compiler = compiler.id(), language = %compiler.get_language(), "registered compiler");
        self.compilers.push(compiler);
        Ok(())
    }

    pub fn add_cross_compiler(&mut self, compiler: Compiler) -> Result<()> {
        if self.cross_compilers.is_empty() {
            self.static_cross_linker = Some(self.environment.detect_static_linker(&compiler)?);
        }
        tracing::debug!(compiler = compiler.id(), language = %compiler.get_language(), "registered cross compiler");
        self.cross_compilers.push(compiler);
        Ok(())
    }

    pub fn compilers(&self) -> &[Compiler] {
        &self.compilers
    }

    pub fn cross_compilers(&self) -> &[Compiler] {
        &self.cross_compilers
    }

    pub fn static_linker(&self) -> Option<&StaticLinker> {
        self.static_linker.as_ref()
    }

    pub fn static_cross_linker(&self) -> Option<&StaticLinker> {
        self.static_cross_linker.as_ref()
    }

    pub fn add_global_args<I, S>(&mut self, language: Language, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.global_args
            .entry(language)
            .or_default()
            .extend(args.into_iter().map(Into::into));
    }

    pub fn get_global_flags(&self, compiler: &Compiler) -> &[String] {
        self.global_args
            .get(&compiler.get_language())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Registers a finished target; names are unique within a build.
    pub fn add_target(&mut self, target: BuildTarget) -> Result<Rc<BuildTarget>> {
        if self.targets.contains_key(target.name()) {
            return Err(BuildError::DuplicateTarget {
                name: target.name().to_string(),
            });
        }
        tracing::debug!(name = target.name(), filename = target.get_filename(), "registered target");
        let target = Rc::new(target);
        self.targets
            .insert(target.name().to_string(), Rc::clone(&target));
        Ok(target)
    }

    /// Builds a target against this registry's environment and registers it.
    #[allow(clippy::too_many_arguments)]
    pub fn declare_target(
        &mut self,
        kind: TargetKind,
        name: &str,
        subdir: &str,
        is_cross: bool,
        sources: Vec<Value>,
        objects: Vec<Value>,
        kwargs: &Kwargs,
    ) -> Result<Rc<BuildTarget>> {
        let target = BuildTarget::new(
            kind,
            name,
            subdir,
            is_cross,
            sources,
            objects,
            self.environment.as_ref(),
            kwargs,
        )?;
        self.add_target(target)
    }

    pub fn get_targets(&self) -> &IndexMap<String, Rc<BuildTarget>> {
        &self.targets
    }

    pub fn get_target(&self, name: &str) -> Option<&Rc<BuildTarget>> {
        self.targets.get(name)
    }

    pub fn add_test(
        &mut self,
        name: impl Into<String>,
        exe: Rc<BuildTarget>,
        args: Vec<String>,
    ) -> Result<()> {
        let name = name.into();
        if exe.kind() != TargetKind::Executable {
            return Err(BuildError::NotAnExecutable {
                test: name,
                target: exe.name().to_string(),
            });
        }
        self.tests.push(Test { name, exe, args });
        Ok(())
    }

    pub fn get_tests(&self) -> &[Test] {
        &self.tests
    }

    pub fn add_headers(&mut self, headers: Headers) {
        self.headers.push(headers);
    }

    pub fn get_headers(&self) -> &[Headers] {
        &self.headers
    }

    pub fn add_man(&mut self, man: Man) {
        self.man.push(man);
    }

    pub fn get_man(&self) -> &[Man] {
        &self.man
    }

    pub fn add_data(&mut self, data: Data) {
        self.data.push(data);
    }

    pub fn get_data(&self) -> &[Data] {
        &self.data
    }

    pub fn add_configure_file(&mut self, file: ConfigureFile) {
        self.configure_files.push(file);
    }

    pub fn get_configure_files(&self) -> &[ConfigureFile] {
        &self.configure_files
    }
}
