use std::fs;
use std::path::Path;

use crate::args::CompileArgs;
use crate::backends::{Backend, BackendOutput, CompileRequest};
use crate::error::{Error, Result};
use crate::CompilationFeedback;

/// How compiler messages decide the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosticPolicy {
    /// Any message is an error, warnings included.
    #[default]
    Strict,
    /// Only the compile status counts. Messages from a successful compile
    /// are returned as warnings.
    StatusOnly,
}

pub struct ShaderCompiler {
    backend: Box<dyn Backend>,
    policy: DiagnosticPolicy,
}
impl ShaderCompiler {
    pub fn new(backend: Box<dyn Backend>) -> ShaderCompiler {
        ShaderCompiler {
            backend,
            policy: DiagnosticPolicy::default(),
        }
    }
    pub fn with_policy(mut self, policy: DiagnosticPolicy) -> ShaderCompiler {
        self.policy = policy;
        self
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }
    pub fn policy(&self) -> DiagnosticPolicy {
        self.policy
    }

    /// Compile the shader at `path`. Either the whole object comes back or
    /// an error does; nothing is written to disk.
    pub fn compile_file(&self, path: &Path) -> Result<CompilationFeedback> {
        let source = read_source(path)?;
        self.compile_source(path, &source)
    }

    /// Compile `source`, which was read from `path`.
    pub fn compile_source(&self, path: &Path, source: &[u8]) -> Result<CompilationFeedback> {
        let path_lit = path.to_string_lossy().to_string();
        let args = CompileArgs::fixed(path_lit.clone());
        log::debug!("compiling {} ({} bytes) with {}: {}", path_lit, source.len(),
            self.backend.name(), args.tokens().join(" "));

        let req = CompileRequest { source, path, args: &args };
        let out = self.backend.compile(&req)?;
        let warnings = self.check(&out)?;

        let spv = words_from_bytes(&out.object)?;
        if spv.is_empty() {
            return Err(Error::EmptyOutput);
        }
        log::debug!("{} produced {} words", self.backend.name(), spv.len());

        let mut dep_paths = vec![path_lit];
        dep_paths.extend(out.dep_paths);
        let feedback = CompilationFeedback { spv, dep_paths, warnings };
        Ok(feedback)
    }

    fn check(&self, out: &BackendOutput) -> Result<Option<String>> {
        let diagnostics = Some(out.diagnostics.clone())
            .filter(|x| !x.is_empty());
        match self.policy {
            DiagnosticPolicy::Strict => {
                if let Some(diagnostics) = diagnostics {
                    return Err(Error::Diagnostics(diagnostics));
                }
                if !out.succeeded {
                    return Err(Error::CompileFailed(None));
                }
                Ok(None)
            },
            DiagnosticPolicy::StatusOnly => {
                if !out.succeeded {
                    return Err(Error::CompileFailed(diagnostics));
                }
                if let Some(warnings) = &diagnostics {
                    log::warn!("compiler warnings: {}", warnings);
                }
                Ok(diagnostics)
            },
        }
    }
}

/// Read a shader source as raw bytes.
pub fn read_source(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| Error::Open { path: path.to_path_buf(), source })
}

/// Reinterpret a compiler object as native-endian 32-bit words.
pub fn words_from_bytes(bytes: &[u8]) -> Result<Vec<u32>> {
    if bytes.len() % 4 != 0 {
        return Err(Error::MisalignedOutput(bytes.len()));
    }
    let words = bytes.chunks_exact(4)
        .map(|x| u32::from_ne_bytes([x[0], x[1], x[2], x[3]]))
        .collect();
    Ok(words)
}

/// Compile `path` with `backend` under the strict policy into `spirv`.
/// Prints the reason and leaves `spirv` empty on failure.
pub fn compile_shader_to_spirv(
    backend: Box<dyn Backend>,
    path: &Path,
    spirv: &mut Vec<u32>,
) -> bool {
    spirv.clear();
    match ShaderCompiler::new(backend).compile_file(path) {
        Ok(feedback) => {
            *spirv = feedback.spv;
            true
        },
        Err(e) => {
            eprintln!("{}", e);
            false
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_keep_native_byte_order() {
        let bytes = [0x03, 0x02, 0x23, 0x07, 1, 0, 0, 0];
        let words = words_from_bytes(&bytes).unwrap();
        assert_eq!(words, vec![
            u32::from_ne_bytes([0x03, 0x02, 0x23, 0x07]),
            u32::from_ne_bytes([1, 0, 0, 0]),
        ]);
    }

    #[test]
    fn partial_word_is_rejected() {
        let e = words_from_bytes(&[1, 2, 3, 4, 5]).unwrap_err();
        assert!(matches!(e, Error::MisalignedOutput(5)));
    }

    #[test]
    fn missing_source_cannot_be_opened() {
        let dir = tempfile::tempdir().unwrap();
        let e = read_source(&dir.path().join("nope.compute")).unwrap_err();
        assert!(matches!(e, Error::Open { .. }));
        assert!(e.to_string().starts_with("Failed to open shader file:"));
    }

    #[test]
    fn default_policy_is_strict() {
        assert_eq!(DiagnosticPolicy::default(), DiagnosticPolicy::Strict);
    }
}
