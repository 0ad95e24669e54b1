//! # dxc-spirv
//!
//! Compile an HLSL compute shader into SPIR-V with the DirectX Shader
//! Compiler (DXC). The source file is handed to the compiler with a fixed
//! option list:
//!
//! ```text
//! <input> -T cs_6_6 -E main -spirv -fvk-use-dx-layout
//! ```
//!
//! and the resulting object is returned as a buffer of 32-bit words.
//!
//! ## Backends
//!
//! The compiler itself is an external collaborator. Three backends are
//! available behind cargo features:
//!
//! - `dxc`: Load `libdxcompiler` at runtime and compile in-process (enabled
//! by default);
//! - `dxc-exe`: Run a `dxc` executable found in `PATH` (enabled by default);
//! - `shaderc`: Compile HLSL with glslang through `shaderc`. The shader model
//! in the target profile is ignored and `-fvk-use-dx-layout` is mapped to
//! HLSL packing offsets.
//!
//! ```ignore
//! use dxc_spirv::{BackendKind, ShaderCompiler, create_backend};
//!
//! let backend = create_backend(BackendKind::Dxc, None)?;
//! let feedback = ShaderCompiler::new(backend)
//!     .compile_file(&dxc_spirv::default_shader_path())?;
//! println!("{} words", feedback.spv.len());
//! ```
//!
//! ## Diagnostics
//!
//! By default any text the compiler emits is fatal, including warnings. Use
//! [`DiagnosticPolicy::StatusOnly`] to let the compile status decide and
//! receive the warnings in [`CompilationFeedback::warnings`] instead.
//!
//! ## Wide strings
//!
//! [`wide`] implements the `MultiByteToWideChar` contract on every platform.
//! The backends take UTF-8, so compilation never goes through it;
//! [`CompileArgs::encode_wide`] produces the wide option list for callers
//! driving a raw DXC interface themselves.
pub mod args;
pub mod backends;
pub mod compile;
pub mod config;
pub mod error;
pub mod include;
pub mod wide;

pub use args::CompileArgs;
pub use backends::{create_backend, Backend, BackendKind, BackendOutput, CompileRequest};
pub use compile::{compile_shader_to_spirv, read_source, words_from_bytes, DiagnosticPolicy, ShaderCompiler};
pub use config::{default_shader_path, SHADER_FILE_NAME, SHADER_SOURCE_DIR};
pub use error::{Error, Result};

/// Result of a successful compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilationFeedback {
    /// SPIR-V words.
    pub spv: Vec<u32>,
    /// Source file followed by every file it included.
    pub dep_paths: Vec<String>,
    /// Compiler messages tolerated under [`DiagnosticPolicy::StatusOnly`].
    pub warnings: Option<String>,
}
