mod declare;

pub use declare::declare;

use crate::environment::{Language, System};
use crate::target::TargetKind;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct PlatformDecl {
    #[serde(default)]
    pub system: Option<System>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CompilerDecl {
    pub language: Language,
    pub id: String,
    #[serde(default)]
    pub exelist: Vec<String>,
    #[serde(default)]
    pub cross: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct IncludeDirsDecl {
    pub name: String,
    #[serde(default)]
    pub subdir: String,
    pub dirs: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct DependencyDecl {
    pub name: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub compile_args: Vec<String>,
    #[serde(default)]
    pub link_args: Vec<String>,
}

/// A generator is run either by a project executable or an outside program.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GeneratorDecl {
    pub name: String,
    #[serde(default)]
    pub executable: Option<String>,
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub arguments: Option<toml::Value>,
    #[serde(default)]
    pub outputs: Option<toml::Value>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum SourceDecl {
    File(String),
    Generated { generator: String, inputs: Vec<String> },
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TargetDecl {
    #[serde(rename = "type")]
    pub kind: TargetKind,
    pub name: String,
    #[serde(default)]
    pub subdir: String,
    #[serde(default)]
    pub cross: bool,
    #[serde(default)]
    pub sources: Vec<SourceDecl>,
    #[serde(default)]
    pub objects: Vec<String>,
    /// Every other key is handed to the target as a keyword argument.
    #[serde(flatten)]
    pub options: toml::Table,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TestDecl {
    pub name: String,
    pub exe: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HeadersDecl {
    #[serde(default)]
    pub subdir: String,
    pub sources: Vec<String>,
    #[serde(default)]
    pub install_subdir: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ManDecl {
    #[serde(default)]
    pub subdir: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct DataDecl {
    #[serde(default)]
    pub subdir: String,
    pub sources: Vec<String>,
    #[serde(default)]
    pub install_dir: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ConfigureFileDecl {
    #[serde(default)]
    pub subdir: String,
    pub input: String,
    pub output: String,
    #[serde(default)]
    pub values: toml::Table,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ProjectManifest {
    pub project: ProjectInfo,
    #[serde(default)]
    pub platform: PlatformDecl,
    #[serde(default)]
    pub compilers: Vec<CompilerDecl>,
    #[serde(default)]
    pub global_args: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub include_dirs: Vec<IncludeDirsDecl>,
    #[serde(default)]
    pub dependencies: Vec<DependencyDecl>,
    #[serde(default)]
    pub generators: Vec<GeneratorDecl>,
    #[serde(default)]
    pub targets: Vec<TargetDecl>,
    #[serde(default)]
    pub tests: Vec<TestDecl>,
    #[serde(default)]
    pub headers: Vec<HeadersDecl>,
    #[serde(default)]
    pub man: Vec<ManDecl>,
    #[serde(default)]
    pub data: Vec<DataDecl>,
    #[serde(default)]
    pub configure_files: Vec<ConfigureFileDecl>,
}

impl ProjectManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest at {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid manifest TOML at {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let manifest: ProjectManifest = toml::from_str(content)?;
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_manifest_with_multiple_target_types() {
        let mut file = NamedTempFile::new().unwrap();
        let contents = r#"
[project]
name = "demo"
version = "1.0"

[platform]
system = "windows"

[[compilers]]
language = "c"
id = "gcc"
exelist = ["cc"]

[global_args]
c = ["-DNDEBUG"]

[[generators]]
name = "lemon"
program = "lemon"
arguments = ["@INPUT@"]
outputs = ["@BASENAME@.c", "@BASENAME@.h"]

[[targets]]
type = "static_library"
name = "util"
sources = ["src/util.c"]

[[targets]]
type = "executable"
name = "app"
sources = ["src/main.c", { generator = "lemon", inputs = ["src/gram.y"] }]
link_with = ["util"]
c_args = "-O2"
install = true
"#;
        std::io::Write::write_all(&mut file, contents.as_bytes()).unwrap();

        let manifest = ProjectManifest::load(file.path()).unwrap();
        assert_eq!(manifest.project.name, "demo");
        assert_eq!(manifest.platform.system, Some(System::Windows));
        assert_eq!(manifest.compilers[0].language, Language::C);
        assert_eq!(manifest.global_args["c"], vec!["-DNDEBUG"]);
        assert_eq!(manifest.targets.len(), 2);

        let app = &manifest.targets[1];
        assert_eq!(app.kind, TargetKind::Executable);
        assert_eq!(
            app.sources[1],
            SourceDecl::Generated {
                generator: "lemon".into(),
                inputs: vec!["src/gram.y".into()]
            }
        );
        assert!(app.options.contains_key("link_with"));
        assert!(app.options.contains_key("install"));
        assert!(!app.options.contains_key("name"));
    }

    #[test]
    fn reports_unreadable_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProjectManifest::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read manifest"));
    }

    #[test]
    fn rejects_unknown_target_type() {
        let err = ProjectManifest::parse(
            r#"
[project]
name = "demo"

[[targets]]
type = "custom_command"
name = "codegen"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("custom_command"));
    }
}
