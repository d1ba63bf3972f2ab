//! Platform conventions and toolchain identities consumed by the model.
//!
//! Real compiler probing lives outside this crate. The model only needs to know
//! how artifacts are named on the host, which static linker pairs with a given
//! compiler, and which language a compiler speaks.

use crate::error::Result;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

const HEADER_SUFFIXES: &[&str] = &["h", "hh", "hpp", "hxx", "H", "ipp", "inl"];
const SOURCE_SUFFIXES: &[&str] = &["c", "cc", "cpp", "cxx", "c++", "C", "m", "mm"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    #[serde(alias = "c++", alias = "cxx")]
    Cpp,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::C, Language::Cpp];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "cpp",
        }
    }

    /// Keyword carrying extra compiler arguments, e.g. `cpp_args`.
    pub fn args_key(&self) -> &'static str {
        match self {
            Language::C => "c_args",
            Language::Cpp => "cpp_args",
        }
    }

    /// Keyword carrying the precompiled header pair, e.g. `c_pch`.
    pub fn pch_key(&self) -> &'static str {
        match self {
            Language::C => "c_pch",
            Language::Cpp => "cpp_pch",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "c" => Ok(Language::C),
            "cpp" | "c++" | "cxx" => Ok(Language::Cpp),
            other => Err(format!("unknown language '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiler {
    id: String,
    language: Language,
    exelist: Vec<String>,
}

impl Compiler {
    pub fn new(id: impl Into<String>, language: Language, exelist: Vec<String>) -> Self {
        Compiler {
            id: id.into(),
            language,
            exelist,
        }
    }

    /// Toolchain family, e.g. `gcc`, `clang` or `msvc`.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn get_language(&self) -> Language {
        self.language
    }

    pub fn exelist(&self) -> &[String] {
        &self.exelist
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticLinker {
    exelist: Vec<String>,
}

impl StaticLinker {
    pub fn new(exelist: Vec<String>) -> Self {
        StaticLinker { exelist }
    }

    pub fn exelist(&self) -> &[String] {
        &self.exelist
    }
}

/// What the model needs from the surrounding environment.
pub trait Environment {
    fn exe_suffix(&self) -> &str;
    fn static_lib_prefix(&self) -> &str;
    fn static_lib_suffix(&self) -> &str;
    fn shared_lib_prefix(&self) -> &str;
    fn shared_lib_suffix(&self) -> &str;
    fn detect_static_linker(&self, compiler: &Compiler) -> Result<StaticLinker>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum System {
    Linux,
    Darwin,
    Windows,
}

impl System {
    pub fn host() -> Self {
        if cfg!(windows) {
            System::Windows
        } else if cfg!(target_os = "macos") {
            System::Darwin
        } else {
            System::Linux
        }
    }
}

impl FromStr for System {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "linux" => Ok(System::Linux),
            "darwin" | "macos" => Ok(System::Darwin),
            "windows" => Ok(System::Windows),
            other => Err(format!("unknown system '{other}'")),
        }
    }
}

/// Table-driven naming conventions for a known operating system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    system: System,
    exe_suffix: String,
    static_lib_prefix: String,
    static_lib_suffix: String,
    shared_lib_prefix: String,
    shared_lib_suffix: String,
}

impl Platform {
    pub fn new(system: System) -> Self {
        let (exe, static_prefix, static_suffix, shared_prefix, shared_suffix) = match system {
            System::Linux => ("", "lib", "a", "lib", "so"),
            System::Darwin => ("", "lib", "a", "lib", "dylib"),
            System::Windows => ("exe", "", "lib", "", "dll"),
        };
        Platform {
            system,
            exe_suffix: exe.to_string(),
            static_lib_prefix: static_prefix.to_string(),
            static_lib_suffix: static_suffix.to_string(),
            shared_lib_prefix: shared_prefix.to_string(),
            shared_lib_suffix: shared_suffix.to_string(),
        }
    }

    pub fn linux() -> Self {
        Platform::new(System::Linux)
    }

    pub fn host() -> Self {
        Platform::new(System::host())
    }

    pub fn system(&self) -> System {
        self.system
    }
}

impl Environment for Platform {
    fn exe_suffix(&self) -> &str {
        &self.exe_suffix
    }

    fn static_lib_prefix(&self) -> &str {
        &self.static_lib_prefix
    }

    fn static_lib_suffix(&self) -> &str {
        &self.static_lib_suffix
    }

    fn shared_lib_prefix(&self) -> &str {
        &self.shared_lib_prefix
    }

    fn shared_lib_suffix(&self) -> &str {
        &self.shared_lib_suffix
    }

    fn detect_static_linker(&self, compiler: &Compiler) -> Result<StaticLinker> {
        let exe = match compiler.id() {
            "msvc" => "lib",
            _ => "ar",
        };
        tracing::debug!(compiler = compiler.id(), linker = exe, "detected static linker");
        Ok(StaticLinker::new(vec![exe.to_string()]))
    }
}

fn suffix_of(filename: &str) -> Option<&str> {
    let plain = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    plain.rsplit_once('.').map(|(_, suffix)| suffix)
}

pub fn is_header(filename: &str) -> bool {
    suffix_of(filename).is_some_and(|s| HEADER_SUFFIXES.contains(&s))
}

pub fn is_source(filename: &str) -> bool {
    suffix_of(filename).is_some_and(|s| SOURCE_SUFFIXES.contains(&s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_headers_and_sources() {
        assert!(is_header("include/pch/prec.h"));
        assert!(is_header("prec.hpp"));
        assert!(!is_header("prec.c"));
        assert!(is_source("src/prec.cpp"));
        assert!(is_source("prec.c"));
        assert!(!is_source("README"));
        assert!(!is_source("dir.d/noext"));
    }

    #[test]
    fn platform_tables_differ_per_system() {
        let windows = Platform::new(System::Windows);
        assert_eq!(windows.exe_suffix(), "exe");
        assert_eq!(windows.shared_lib_prefix(), "");
        assert_eq!(windows.shared_lib_suffix(), "dll");

        let darwin = Platform::new(System::Darwin);
        assert_eq!(darwin.shared_lib_suffix(), "dylib");
        assert_eq!(darwin.static_lib_prefix(), "lib");
    }

    #[test]
    fn static_linker_follows_compiler_family() {
        let platform = Platform::linux();
        let gcc = Compiler::new("gcc", Language::C, vec!["cc".into()]);
        let msvc = Compiler::new("msvc", Language::Cpp, vec!["cl".into()]);
        assert_eq!(platform.detect_static_linker(&gcc).unwrap().exelist(), ["ar"]);
        assert_eq!(platform.detect_static_linker(&msvc).unwrap().exelist(), ["lib"]);

        for id in ["icc", "tcc"] {
            let other = Compiler::new(id, Language::C, vec![id.into()]);
            assert_eq!(platform.detect_static_linker(&other).unwrap().exelist(), ["ar"]);
        }
    }

    #[test]
    fn parses_language_names() {
        assert_eq!("c".parse::<Language>().unwrap(), Language::C);
        assert_eq!("c++".parse::<Language>().unwrap(), Language::Cpp);
        assert!("fortran".parse::<Language>().is_err());
        assert_eq!(Language::Cpp.args_key(), "cpp_args");
        assert_eq!(Language::C.pch_key(), "c_pch");
    }
}
