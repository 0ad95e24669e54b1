use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::args::CompileArgs;
use crate::error::{Error, Result};

pub mod dxc;
pub mod dxc_exe;
pub mod shaderc;

/// Everything a backend needs for one compilation.
#[derive(Debug, Clone, Copy)]
pub struct CompileRequest<'a> {
    /// Raw bytes of the source, UTF-8.
    pub source: &'a [u8],
    /// Where `source` was read from.
    pub path: &'a Path,
    pub args: &'a CompileArgs,
}

/// What the compiler handed back, before any policy is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendOutput {
    pub succeeded: bool,
    /// Warnings and errors as text. Empty when the compiler had nothing to
    /// say.
    pub diagnostics: String,
    pub object: Vec<u8>,
    /// Files pulled in by `#include`.
    pub dep_paths: Vec<String>,
}

pub trait Backend {
    fn name(&self) -> &'static str;
    fn compile(&self, req: &CompileRequest<'_>) -> Result<BackendOutput>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// `libdxcompiler` loaded in-process.
    Dxc,
    /// The `dxc` executable.
    DxcExe,
    /// glslang through `shaderc`.
    Shaderc,
}
impl BackendKind {
    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Dxc => "dxc",
            BackendKind::DxcExe => "dxc-exe",
            BackendKind::Shaderc => "shaderc",
        }
    }
}
impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
impl FromStr for BackendKind {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "dxc" => Ok(BackendKind::Dxc),
            "dxc-exe" => Ok(BackendKind::DxcExe),
            "shaderc" => Ok(BackendKind::Shaderc),
            _ => Err(format!("unknown backend \"{}\"", s)),
        }
    }
}

/// The source as text, for compilers that take it tagged as UTF-8.
#[cfg_attr(not(any(feature = "dxc", feature = "shaderc")), allow(dead_code))]
pub(crate) fn utf8_source<'a>(backend: &'static str, req: &CompileRequest<'a>) -> Result<&'a str> {
    std::str::from_utf8(req.source)
        .map_err(|e| Error::Backend(backend, format!("source is not UTF-8: {}", e)))
}

/// Instantiate a backend. `location` points at the DXC library or
/// executable; it is searched for when omitted and ignored by `shaderc`.
pub fn create_backend(
    kind: BackendKind,
    location: Option<PathBuf>,
) -> Result<Box<dyn Backend>> {
    log::debug!("creating {} backend", kind);
    let backend: Box<dyn Backend> = match kind {
        BackendKind::Dxc => Box::new(dxc::DxcBackend::load(location)?),
        BackendKind::DxcExe => Box::new(dxc_exe::DxcExeBackend::locate(location)?),
        BackendKind::Shaderc => Box::new(shaderc::ShadercBackend::new()?),
    };
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_kind_parses_its_own_name() {
        for kind in [BackendKind::Dxc, BackendKind::DxcExe, BackendKind::Shaderc] {
            assert_eq!(kind.name().parse::<BackendKind>(), Ok(kind));
        }
        assert!("fxc".parse::<BackendKind>().is_err());
    }

    #[test]
    fn source_must_be_utf8() {
        let args = CompileArgs::fixed("a.compute");
        let path = Path::new("a.compute");
        let text = "// \u{00e9}clairage\n[numthreads(1,1,1)] void main() {}";
        let req = CompileRequest { source: text.as_bytes(), path, args: &args };
        assert_eq!(utf8_source("dxc", &req).unwrap(), text);

        let req = CompileRequest { source: &[b'/', b'/', 0xe9, b'\n'], path, args: &args };
        let e = utf8_source("dxc", &req).unwrap_err();
        assert!(e.to_string().starts_with("dxc backend failed: source is not UTF-8"));
    }

    #[cfg(not(feature = "shaderc"))]
    #[test]
    fn disabled_backend_is_unavailable() {
        let e = create_backend(BackendKind::Shaderc, None).err().unwrap();
        assert!(e.to_string().contains("shaderc backend is not available"));
    }
}
