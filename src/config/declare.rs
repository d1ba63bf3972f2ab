//! Evaluates a project manifest into a populated [`Build`].
//!
//! Reference keywords (`link_with`, `include_dirs`, `deps`) name objects that
//! must already have been declared, so targets may only point backwards.

use super::{GeneratorDecl, ProjectManifest, SourceDecl, TargetDecl};
use crate::build::{Build, Data, Headers, Man};
use crate::configure::{ConfigValue, ConfigurationData, ConfigureFile};
use crate::dependency::{Dependency, ExternalDependency};
use crate::environment::{Compiler, Language, Platform, System};
use crate::generator::{ExternalProgram, GeneratedList, Generator};
use crate::include_dirs::IncludeDirs;
use crate::value::{Kwargs, Value};
use anyhow::{anyhow, bail, Context, Result};
use std::collections::HashMap;
use std::rc::Rc;

const REFERENCE_KEYS: &[&str] = &["link_with", "include_dirs", "deps"];

struct Scope<'a> {
    build: Build,
    include_dirs: HashMap<String, Rc<IncludeDirs>>,
    deps: HashMap<String, Rc<dyn Dependency>>,
    generator_decls: HashMap<&'a str, &'a GeneratorDecl>,
    generators: HashMap<String, Rc<Generator>>,
}

pub fn declare(manifest: &ProjectManifest, system: Option<System>) -> Result<Build> {
    let system = system
        .or(manifest.platform.system)
        .unwrap_or_else(System::host);
    let mut build = Build::new(Box::new(Platform::new(system)));
    build.set_project(&manifest.project.name);

    for decl in &manifest.compilers {
        let compiler = Compiler::new(&decl.id, decl.language, decl.exelist.clone());
        let registered = if decl.cross {
            build.add_cross_compiler(compiler)
        } else {
            build.add_compiler(compiler)
        };
        registered.with_context(|| format!("Failed to register compiler '{}'", decl.id))?;
    }

    for (language, args) in &manifest.global_args {
        let language: Language = language.parse().map_err(|e: String| anyhow!(e))?;
        build.add_global_args(language, args.iter().cloned());
    }

    let mut scope = Scope {
        build,
        include_dirs: HashMap::new(),
        deps: HashMap::new(),
        generator_decls: manifest
            .generators
            .iter()
            .map(|g| (g.name.as_str(), g))
            .collect(),
        generators: HashMap::new(),
    };

    for decl in &manifest.include_dirs {
        let dirs = IncludeDirs::new(&decl.subdir, decl.dirs.clone(), &Kwargs::new())?;
        scope.include_dirs.insert(decl.name.clone(), Rc::new(dirs));
    }

    for decl in &manifest.dependencies {
        let dep = ExternalDependency::new(&decl.name)
            .with_compile_args(decl.compile_args.clone())
            .with_link_args(decl.link_args.clone())
            .with_sources(decl.sources.iter().cloned().map(Value::String).collect());
        scope.deps.insert(decl.name.clone(), Rc::new(dep));
    }

    for decl in &manifest.targets {
        scope
            .declare_target(decl)
            .with_context(|| format!("Failed to declare target '{}'", decl.name))?;
    }

    let mut build = scope.build;

    for decl in &manifest.tests {
        let exe = build
            .get_target(&decl.exe)
            .cloned()
            .ok_or_else(|| anyhow!("Unknown executable '{}' for test '{}'", decl.exe, decl.name))?;
        build.add_test(&decl.name, exe, decl.args.clone())?;
    }

    for decl in &manifest.headers {
        build.add_headers(Headers {
            subdir: decl.subdir.clone(),
            sources: decl.sources.clone(),
            install_subdir: decl.install_subdir.clone(),
        });
    }

    for decl in &manifest.man {
        build.add_man(Man {
            subdir: decl.subdir.clone(),
            sources: decl.sources.clone(),
        });
    }

    for decl in &manifest.data {
        build.add_data(Data {
            subdir: decl.subdir.clone(),
            sources: decl.sources.clone(),
            install_dir: decl.install_dir.clone(),
        });
    }

    for decl in &manifest.configure_files {
        let mut data = ConfigurationData::new();
        for (key, value) in &decl.values {
            let value = match value {
                toml::Value::String(s) => ConfigValue::String(s.clone()),
                toml::Value::Integer(i) => ConfigValue::Integer(*i),
                toml::Value::Boolean(b) => ConfigValue::Boolean(*b),
                other => bail!(
                    "Unsupported {} value for '{}' in {}",
                    other.type_str(),
                    key,
                    decl.output
                ),
            };
            data.set(key, value);
        }
        build.add_configure_file(ConfigureFile::new(
            &decl.subdir,
            &decl.input,
            &decl.output,
            Rc::new(data),
        ));
    }

    Ok(build)
}

impl Scope<'_> {
    fn declare_target(&mut self, decl: &TargetDecl) -> Result<()> {
        let mut sources = Vec::with_capacity(decl.sources.len());
        for source in &decl.sources {
            match source {
                SourceDecl::File(name) => sources.push(Value::String(name.clone())),
                SourceDecl::Generated { generator, inputs } => {
                    let mut list = GeneratedList::new(self.generator(generator)?);
                    for input in inputs {
                        list.add_file(input.as_str());
                    }
                    sources.push(Value::GeneratedList(Rc::new(list)));
                }
            }
        }
        let objects = decl.objects.iter().cloned().map(Value::String).collect();

        let mut kwargs = Kwargs::new();
        for (key, value) in &decl.options {
            kwargs.insert(key.as_str(), self.convert(key, value)?);
        }

        self.build.declare_target(
            decl.kind,
            &decl.name,
            &decl.subdir,
            decl.cross,
            sources,
            objects,
            &kwargs,
        )?;
        Ok(())
    }

    fn generator(&mut self, name: &str) -> Result<Rc<Generator>> {
        if let Some(generator) = self.generators.get(name) {
            return Ok(Rc::clone(generator));
        }
        let decl = *self
            .generator_decls
            .get(name)
            .ok_or_else(|| anyhow!("Unknown generator '{}'", name))?;

        let mut args = Vec::new();
        if let Some(exe) = &decl.executable {
            let target = self
                .build
                .get_target(exe)
                .cloned()
                .ok_or_else(|| anyhow!("Unknown executable '{}' for generator '{}'", exe, name))?;
            args.push(Value::Target(target));
        }
        if let Some(program) = &decl.program {
            args.push(Value::Program(Rc::new(ExternalProgram::new(program, None))));
        }

        let mut kwargs = Kwargs::new();
        for (key, value) in [("arguments", &decl.arguments), ("outputs", &decl.outputs)] {
            if let Some(value) = value {
                kwargs.insert(key, self.convert(key, value)?);
            }
        }

        let generator = Rc::new(
            Generator::new(&args, &kwargs)
                .with_context(|| format!("Failed to declare generator '{}'", name))?,
        );
        self.generators.insert(name.to_string(), Rc::clone(&generator));
        Ok(generator)
    }

    fn convert(&self, key: &str, value: &toml::Value) -> Result<Value> {
        match value {
            toml::Value::String(s) if REFERENCE_KEYS.contains(&key) => self.reference(key, s),
            toml::Value::String(s) => Ok(Value::String(s.clone())),
            toml::Value::Integer(i) => Ok(Value::Integer(*i)),
            toml::Value::Boolean(b) => Ok(Value::Boolean(*b)),
            toml::Value::Array(items) => items
                .iter()
                .map(|item| self.convert(key, item))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            other => bail!("Unsupported {} value for '{}'", other.type_str(), key),
        }
    }

    fn reference(&self, key: &str, name: &str) -> Result<Value> {
        let found = match key {
            "link_with" => self.build.get_target(name).cloned().map(Value::Target),
            "include_dirs" => self.include_dirs.get(name).cloned().map(Value::IncludeDirs),
            "deps" => self.deps.get(name).cloned().map(Value::Dependency),
            _ => None,
        };
        found.ok_or_else(|| anyhow!("Unknown {} reference '{}'", key, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::TargetKind;

    const MANIFEST: &str = r#"
[project]
name = "demo"

[platform]
system = "linux"

[[compilers]]
language = "c"
id = "gcc"
exelist = ["cc"]

[[compilers]]
language = "cpp"
id = "gcc"
exelist = ["c++"]

[global_args]
c = ["-DNDEBUG"]

[[include_dirs]]
name = "inc"
dirs = ["include"]

[[dependencies]]
name = "embedded"
sources = ["third_party/embedded.c"]

[[generators]]
name = "gen"
executable = "mkgen"
arguments = ["@INPUT@", "@OUTPUT@"]
outputs = "@BASENAME@.c"

[[targets]]
type = "executable"
name = "mkgen"
subdir = "tools"
sources = ["tools/mkgen.c"]

[[targets]]
type = "shared_library"
name = "core"
subdir = "core"
sources = ["core/core.c"]
version = "1.2.3"
soversion = 1

[[targets]]
type = "static_library"
name = "util"
subdir = "util"
sources = [{ generator = "gen", inputs = ["util/tables.def"] }]
link_with = "core"
include_dirs = ["inc"]

[[targets]]
type = "executable"
name = "app"
sources = ["main.c"]
link_with = ["util", "core"]
deps = "embedded"
c_args = ["-O2"]
c_pch = ["pch/app.c", "pch/app.h"]
install = true

[[tests]]
name = "smoke"
exe = "app"
args = ["--smoke"]

[[headers]]
subdir = "include"
sources = ["core.h"]

[[configure_files]]
input = "config.h.in"
output = "config.h"

[configure_files.values]
VERSION = "1.2.3"
HAVE_THREADS = true
"#;

    #[test]
    fn declares_full_project() {
        let manifest = ProjectManifest::parse(MANIFEST).unwrap();
        let build = declare(&manifest, None).unwrap();

        assert_eq!(build.get_project(), Some("demo"));
        assert_eq!(build.compilers().len(), 2);
        assert_eq!(build.static_linker().unwrap().exelist(), ["ar"]);

        let names: Vec<_> = build.get_targets().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["mkgen", "core", "util", "app"]);

        let core = build.get_target("core").unwrap();
        assert_eq!(core.get_filename(), "libcore.so.1.2.3");
        assert_eq!(core.get_aliaslist(), vec!["libcore.so.1", "libcore.so"]);

        let util = build.get_target("util").unwrap();
        assert_eq!(util.kind(), TargetKind::StaticLibrary);
        assert_eq!(util.get_generated_sources()[0].get_outfilelist(), ["tables.c"]);
        assert_eq!(util.get_include_dirs()[0].get_incdirs(), ["include"]);

        let app = build.get_target("app").unwrap();
        assert_eq!(app.get_sources(), ["main.c", "third_party/embedded.c"]);
        assert_eq!(app.get_rpaths(), vec!["core", "core"]);
        assert_eq!(app.get_extra_args(Language::C), ["-O2"]);
        assert_eq!(app.get_pch(Language::C).unwrap().files(), vec!["pch/app.h", "pch/app.c"]);
        assert!(app.should_install());

        assert_eq!(build.get_global_flags(&build.compilers()[0]), ["-DNDEBUG"]);
        assert!(build.get_global_flags(&build.compilers()[1]).is_empty());
        assert_eq!(build.get_tests()[0].name(), "smoke");
        assert_eq!(build.get_headers()[0].sources, ["core.h"]);

        let data = build.get_configure_files()[0].get_configuration_data();
        assert_eq!(data.get("HAVE_THREADS").unwrap(), &ConfigValue::Boolean(true));
    }

    #[test]
    fn platform_override_changes_names() {
        let manifest = ProjectManifest::parse(MANIFEST).unwrap();
        let build = declare(&manifest, Some(System::Windows)).unwrap();
        assert_eq!(build.get_target("app").unwrap().get_filename(), "app.exe");
        assert_eq!(build.get_target("util").unwrap().get_filename(), "util.lib");
        assert_eq!(build.get_target("core").unwrap().get_filename(), "core.dll.1.2.3");
    }

    #[test]
    fn unlisted_compiler_id_still_configures() {
        let manifest = ProjectManifest::parse(
            r#"
[project]
name = "demo"

[[compilers]]
language = "c"
id = "icc"
exelist = ["icc"]

[[targets]]
type = "static_library"
name = "util"
sources = ["util.c"]
"#,
        )
        .unwrap();
        let build = declare(&manifest, Some(System::Linux)).unwrap();
        assert_eq!(build.static_linker().unwrap().exelist(), ["ar"]);
        assert_eq!(build.get_target("util").unwrap().get_filename(), "libutil.a");
    }

    #[test]
    fn linking_to_an_executable_is_reported_with_context() {
        let manifest = ProjectManifest::parse(
            r#"
[project]
name = "demo"

[[targets]]
type = "executable"
name = "tool"
sources = ["tool.c"]

[[targets]]
type = "executable"
name = "app"
sources = ["main.c"]
link_with = "tool"
"#,
        )
        .unwrap();
        let err = declare(&manifest, Some(System::Linux)).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Failed to declare target 'app'"));
        assert!(message.contains("is not a library"));
    }

    #[test]
    fn forward_references_are_unknown() {
        let manifest = ProjectManifest::parse(
            r#"
[project]
name = "demo"

[[targets]]
type = "executable"
name = "app"
sources = ["main.c"]
link_with = "later"

[[targets]]
type = "static_library"
name = "later"
sources = ["later.c"]
"#,
        )
        .unwrap();
        let err = declare(&manifest, Some(System::Linux)).unwrap_err();
        assert!(format!("{err:#}").contains("Unknown link_with reference 'later'"));
    }

    #[test]
    fn target_without_sources_is_rejected() {
        let manifest = ProjectManifest::parse(
            r#"
[project]
name = "demo"

[[targets]]
type = "static_library"
name = "empty"
objects = ["prebuilt.o"]
"#,
        )
        .unwrap();
        let err = declare(&manifest, Some(System::Linux)).unwrap_err();
        assert!(format!("{err:#}").contains("has no sources"));
    }
}
