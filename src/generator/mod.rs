//! Code generator rules and the outputs they produce.

use crate::error::{BuildError, Result};
use crate::target::{BuildTarget, TargetKind};
use crate::value::{Kwargs, Value};
use std::collections::HashMap;
use std::rc::Rc;

pub const BASENAME: &str = "@BASENAME@";
pub const PLAINNAME: &str = "@PLAINNAME@";

/// A program found outside the project, e.g. `protoc` on the search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalProgram {
    name: String,
    path: Option<String>,
}

impl ExternalProgram {
    pub fn new(name: impl Into<String>, path: Option<String>) -> Self {
        ExternalProgram {
            name: name.into(),
            path,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

#[derive(Debug, Clone)]
pub enum GeneratorTool {
    Target(Rc<BuildTarget>),
    Program(Rc<ExternalProgram>),
}

impl GeneratorTool {
    pub fn name(&self) -> &str {
        match self {
            GeneratorTool::Target(target) => target.name(),
            GeneratorTool::Program(program) => program.name(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Generator {
    exe: GeneratorTool,
    arglist: Vec<String>,
    outputs: Vec<String>,
}

impl Generator {
    pub fn new(args: &[Value], kwargs: &Kwargs) -> Result<Self> {
        let exe = match args {
            [Value::Target(target)] if target.kind() == TargetKind::Executable => {
                GeneratorTool::Target(Rc::clone(target))
            }
            [Value::Program(program)] => GeneratorTool::Program(Rc::clone(program)),
            [other] => {
                return Err(BuildError::GeneratorExecutable {
                    found: other.describe(),
                })
            }
            _ => return Err(BuildError::GeneratorArity { count: args.len() }),
        };

        let arglist = string_list(kwargs, "arguments")?;
        let outputs = string_list(kwargs, "outputs")?;
        for template in &outputs {
            validate_output_template(template)?;
        }

        Ok(Generator {
            exe,
            arglist,
            outputs,
        })
    }

    pub fn get_exe(&self) -> &GeneratorTool {
        &self.exe
    }

    pub fn get_arglist(&self) -> &[String] {
        &self.arglist
    }

    pub fn get_outputs(&self) -> &[String] {
        &self.outputs
    }

    /// Output names for one input: the directory is dropped, `@PLAINNAME@`
    /// becomes the remaining file name and `@BASENAME@` its part before the
    /// first dot.
    pub fn expand(&self, input: &str) -> Vec<String> {
        let plainname = input.rsplit(['/', '\\']).next().unwrap_or(input);
        let basename = plainname.split('.').next().unwrap_or(plainname);
        self.outputs
            .iter()
            .map(|t| t.replace(BASENAME, basename).replace(PLAINNAME, plainname))
            .collect()
    }
}

fn string_list(kwargs: &Kwargs, key: &'static str) -> Result<Vec<String>> {
    if !kwargs.contains_key(key) {
        return Err(BuildError::MissingGeneratorKeyword { key });
    }
    kwargs
        .list(key)
        .into_iter()
        .map(|value| match value {
            Value::String(s) => Ok(s),
            other => Err(BuildError::InvalidGeneratorKeyword {
                key,
                found: other.describe(),
            }),
        })
        .collect()
}

fn validate_output_template(template: &str) -> Result<()> {
    if !template.contains(BASENAME) && !template.contains(PLAINNAME) {
        return Err(BuildError::InvalidOutputTemplate {
            template: template.to_string(),
            reason: "must contain @BASENAME@ or @PLAINNAME@",
        });
    }
    if template.contains(['/', '\\']) {
        return Err(BuildError::InvalidOutputTemplate {
            template: template.to_string(),
            reason: "must not contain a directory separator",
        });
    }
    Ok(())
}

/// Inputs fed through one generator, with the outputs each one expands to.
#[derive(Debug, Clone)]
pub struct GeneratedList {
    generator: Rc<Generator>,
    infilelist: Vec<String>,
    outfilelist: Vec<String>,
    outmap: HashMap<String, Vec<String>>,
}

impl GeneratedList {
    pub fn new(generator: Rc<Generator>) -> Self {
        GeneratedList {
            generator,
            infilelist: Vec::new(),
            outfilelist: Vec::new(),
            outmap: HashMap::new(),
        }
    }

    pub fn add_file(&mut self, input: impl Into<String>) {
        let input = input.into();
        let outputs = self.generator.expand(&input);
        tracing::trace!(input = %input, ?outputs, "generated list grew");
        self.outfilelist.extend(outputs.iter().cloned());
        self.outmap.insert(input.clone(), outputs);
        self.infilelist.push(input);
    }

    pub fn get_infilelist(&self) -> &[String] {
        &self.infilelist
    }

    pub fn get_outfilelist(&self) -> &[String] {
        &self.outfilelist
    }

    pub fn get_outputs_for(&self, input: &str) -> Result<&[String]> {
        self.outmap
            .get(input)
            .map(Vec::as_slice)
            .ok_or_else(|| BuildError::UnknownGeneratorInput {
                input: input.to_string(),
            })
    }

    pub fn get_generator(&self) -> &Rc<Generator> {
        &self.generator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Platform;

    fn tool() -> Value {
        let exe = BuildTarget::new(
            TargetKind::Executable,
            "mkparser",
            "tools",
            false,
            vec!["mkparser.c".into()],
            vec![],
            &Platform::linux(),
            &Kwargs::new(),
        )
        .unwrap();
        Value::Target(Rc::new(exe))
    }

    fn kwargs(outputs: Vec<&str>) -> Kwargs {
        Kwargs::new()
            .with("arguments", vec!["@INPUT@", "-o", "@OUTPUT@"])
            .with("outputs", outputs)
    }

    #[test]
    fn expands_basename_and_plainname() {
        let gen = Generator::new(&[tool()], &kwargs(vec!["@BASENAME@.out"])).unwrap();
        assert_eq!(gen.expand("dir/file.c"), vec!["file.out"]);

        let gen = Generator::new(
            &[tool()],
            &kwargs(vec!["@BASENAME@.tab.c", "@PLAINNAME@.h"]),
        )
        .unwrap();
        assert_eq!(
            gen.expand("grammar/parse.y"),
            vec!["parse.tab.c", "parse.y.h"]
        );
        assert_eq!(gen.expand("a.b.c"), vec!["a.tab.c", "a.b.c.h"]);
    }

    #[test]
    fn accepts_single_string_arguments() {
        let kwargs = Kwargs::new()
            .with("arguments", "@INPUT@")
            .with("outputs", "@BASENAME@.c");
        let gen = Generator::new(&[tool()], &kwargs).unwrap();
        assert_eq!(gen.get_arglist(), ["@INPUT@"]);
        assert_eq!(gen.get_outputs(), ["@BASENAME@.c"]);
        assert_eq!(gen.get_exe().name(), "mkparser");
    }

    #[test]
    fn rejects_templates_without_placeholder_or_with_separator() {
        let err = Generator::new(&[tool()], &kwargs(vec!["fixed.c"])).unwrap_err();
        assert!(matches!(err, BuildError::InvalidOutputTemplate { .. }));

        let err = Generator::new(&[tool()], &kwargs(vec!["out/@BASENAME@.c"])).unwrap_err();
        assert!(matches!(err, BuildError::InvalidOutputTemplate { .. }));

        let err = Generator::new(&[tool()], &kwargs(vec!["out\\@BASENAME@.c"])).unwrap_err();
        assert!(matches!(err, BuildError::InvalidOutputTemplate { .. }));
    }

    #[test]
    fn requires_one_executable_positional() {
        let err = Generator::new(&[], &kwargs(vec!["@BASENAME@.c"])).unwrap_err();
        assert_eq!(err, BuildError::GeneratorArity { count: 0 });

        let err =
            Generator::new(&[tool(), tool()], &kwargs(vec!["@BASENAME@.c"])).unwrap_err();
        assert_eq!(err, BuildError::GeneratorArity { count: 2 });

        let lib = BuildTarget::new(
            TargetKind::StaticLibrary,
            "helper",
            "",
            false,
            vec!["helper.c".into()],
            vec![],
            &Platform::linux(),
            &Kwargs::new(),
        )
        .unwrap();
        let err = Generator::new(&[Value::Target(Rc::new(lib))], &kwargs(vec!["@BASENAME@.c"]))
            .unwrap_err();
        assert!(matches!(err, BuildError::GeneratorExecutable { .. }));

        let err = Generator::new(&[Value::from("protoc")], &kwargs(vec!["@BASENAME@.c"])).unwrap_err();
        assert!(matches!(err, BuildError::GeneratorExecutable { .. }));
    }

    #[test]
    fn accepts_external_program() {
        let protoc = Rc::new(ExternalProgram::new("protoc", Some("/usr/bin/protoc".into())));
        let gen = Generator::new(
            &[Value::Program(protoc)],
            &kwargs(vec!["@BASENAME@.pb.cc", "@BASENAME@.pb.h"]),
        )
        .unwrap();
        assert_eq!(gen.get_exe().name(), "protoc");
    }

    #[test]
    fn requires_arguments_and_outputs() {
        let only_outputs = Kwargs::new().with("outputs", "@BASENAME@.c");
        let err = Generator::new(&[tool()], &only_outputs).unwrap_err();
        assert_eq!(err, BuildError::MissingGeneratorKeyword { key: "arguments" });

        let only_args = Kwargs::new().with("arguments", "@INPUT@");
        let err = Generator::new(&[tool()], &only_args).unwrap_err();
        assert_eq!(err, BuildError::MissingGeneratorKeyword { key: "outputs" });

        let bad_args = Kwargs::new()
            .with("arguments", vec![Value::from("@INPUT@"), Value::from(3i64)])
            .with("outputs", "@BASENAME@.c");
        let err = Generator::new(&[tool()], &bad_args).unwrap_err();
        assert!(matches!(
            err,
            BuildError::InvalidGeneratorKeyword { key: "arguments", .. }
        ));
    }

    #[test]
    fn generated_list_records_outputs_per_input() {
        let gen = Rc::new(
            Generator::new(&[tool()], &kwargs(vec!["@BASENAME@.c", "@BASENAME@.h"])).unwrap(),
        );
        let mut list = GeneratedList::new(Rc::clone(&gen));
        list.add_file("src/lexer.l");
        list.add_file("src/parser.y");

        assert_eq!(list.get_infilelist(), ["src/lexer.l", "src/parser.y"]);
        assert_eq!(
            list.get_outfilelist(),
            ["lexer.c", "lexer.h", "parser.c", "parser.h"]
        );
        assert_eq!(
            list.get_outputs_for("src/parser.y").unwrap(),
            ["parser.c", "parser.h"]
        );
        assert!(Rc::ptr_eq(list.get_generator(), &gen));
    }

    #[test]
    fn lookup_of_unknown_input_fails() {
        let gen = Rc::new(Generator::new(&[tool()], &kwargs(vec!["@BASENAME@.c"])).unwrap());
        let list = GeneratedList::new(gen);
        assert_eq!(
            list.get_outputs_for("missing.y").unwrap_err(),
            BuildError::UnknownGeneratorInput {
                input: "missing.y".into()
            }
        );
    }
}
