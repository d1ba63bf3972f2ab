//! Artifact file names as a pure function of kind, name and platform.

use super::TargetKind;
use crate::environment::Environment;

/// Snapshot of the environment's naming rules taken when a target is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConventions {
    pub exe_suffix: String,
    pub static_lib_prefix: String,
    pub static_lib_suffix: String,
    pub shared_lib_prefix: String,
    pub shared_lib_suffix: String,
}

impl NamingConventions {
    pub fn from_env(env: &dyn Environment) -> Self {
        NamingConventions {
            exe_suffix: env.exe_suffix().to_string(),
            static_lib_prefix: env.static_lib_prefix().to_string(),
            static_lib_suffix: env.static_lib_suffix().to_string(),
            shared_lib_prefix: env.shared_lib_prefix().to_string(),
            shared_lib_suffix: env.shared_lib_suffix().to_string(),
        }
    }
}

fn shared_base(name: &str, conv: &NamingConventions) -> String {
    format!(
        "{}{}.{}",
        conv.shared_lib_prefix, name, conv.shared_lib_suffix
    )
}

pub fn filename(
    kind: TargetKind,
    name: &str,
    conv: &NamingConventions,
    version: Option<&str>,
) -> String {
    match kind {
        TargetKind::Executable if conv.exe_suffix.is_empty() => name.to_string(),
        TargetKind::Executable => format!("{}.{}", name, conv.exe_suffix),
        TargetKind::StaticLibrary => format!(
            "{}{}.{}",
            conv.static_lib_prefix, name, conv.static_lib_suffix
        ),
        TargetKind::SharedLibrary => match version {
            Some(version) => format!("{}.{}", shared_base(name, conv), version),
            None => shared_base(name, conv),
        },
    }
}

/// Extra names a shared library is reachable under: the soversion link
/// first, then the unversioned development link.
pub fn aliases(
    kind: TargetKind,
    name: &str,
    conv: &NamingConventions,
    version: Option<&str>,
    soversion: Option<&str>,
) -> Vec<String> {
    if kind != TargetKind::SharedLibrary {
        return Vec::new();
    }
    let base = shared_base(name, conv);
    let mut aliases = Vec::new();
    if let Some(soversion) = soversion {
        aliases.push(format!("{base}.{soversion}"));
    }
    if version.is_some() {
        aliases.push(base);
    }
    aliases
}
