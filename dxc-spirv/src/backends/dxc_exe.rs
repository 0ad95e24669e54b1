//! Out-of-process DirectX Shader Compiler.
#[allow(unused_imports)]
use std::path::PathBuf;

#[allow(unused_imports)]
use crate::{BackendOutput, CompileRequest, Error, Result};
#[allow(unused_imports)]
use crate::backends::Backend;

const NAME: &str = "dxc-exe";

#[cfg(feature = "dxc-exe")]
#[derive(Debug, Clone)]
pub struct DxcExeBackend {
    exe: PathBuf,
}

#[cfg(feature = "dxc-exe")]
impl DxcExeBackend {
    /// Use the executable at `exe`, or the first `dxc` in `PATH`.
    pub fn locate(exe: Option<PathBuf>) -> Result<DxcExeBackend> {
        let exe = match exe {
            Some(exe) => exe,
            None => which::which("dxc")
                .map_err(|e| Error::BackendUnavailable(NAME, e.to_string()))?,
        };
        if !exe.is_file() {
            let msg = format!("\"{}\" is not an executable file", exe.display());
            return Err(Error::BackendUnavailable(NAME, msg));
        }
        Ok(DxcExeBackend { exe })
    }
}

#[cfg(feature = "dxc-exe")]
impl Backend for DxcExeBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    // The executable reads the source itself, from the path that is the
    // input identifier of the option list.
    fn compile(&self, req: &CompileRequest<'_>) -> Result<BackendOutput> {
        use std::fs;
        use std::process::Command;

        let out_file = tempfile::Builder::new()
            .prefix("dxc-spirv")
            .suffix(".spv")
            .tempfile()?;
        log::debug!("running {} {}", self.exe.display(), req.args.tokens().join(" "));
        let output = Command::new(&self.exe)
            .args(req.args.tokens())
            .arg("-Fo")
            .arg(out_file.path())
            .output()
            .map_err(|e| Error::Backend(NAME, format!("cannot run \"{}\": {}", self.exe.display(), e)))?;

        let succeeded = output.status.success();
        let diagnostics = String::from_utf8_lossy(&output.stderr)
            .trim_end()
            .to_owned();
        let object = if succeeded {
            fs::read(out_file.path())?
        } else {
            Vec::new()
        };
        let out = BackendOutput {
            succeeded,
            diagnostics,
            object,
            dep_paths: Vec::new(),
        };
        Ok(out)
    }
}

#[cfg(not(feature = "dxc-exe"))]
#[derive(Debug, Clone)]
pub struct DxcExeBackend;

#[cfg(not(feature = "dxc-exe"))]
impl DxcExeBackend {
    pub fn locate(_: Option<PathBuf>) -> Result<DxcExeBackend> {
        Err(Error::BackendUnavailable(NAME, "the `dxc-exe` feature is not enabled".to_owned()))
    }
}

#[cfg(not(feature = "dxc-exe"))]
impl Backend for DxcExeBackend {
    fn name(&self) -> &'static str {
        NAME
    }
    fn compile(&self, _: &CompileRequest<'_>) -> Result<BackendOutput> {
        Err(Error::BackendUnavailable(NAME, "the `dxc-exe` feature is not enabled".to_owned()))
    }
}

#[cfg(all(test, feature = "dxc-exe"))]
mod tests {
    use super::*;

    #[test]
    fn missing_executable_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let e = DxcExeBackend::locate(Some(dir.path().join("dxc"))).unwrap_err();
        assert!(matches!(e, Error::BackendUnavailable("dxc-exe", _)));
    }
}
