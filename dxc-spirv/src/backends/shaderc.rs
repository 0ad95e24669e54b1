#[allow(unused_imports)]
use crate::{BackendOutput, CompileRequest, CompileArgs, Error, Result};
#[allow(unused_imports)]
use crate::backends::Backend;

const NAME: &str = "shaderc";

/// HLSL through glslang. The shader model part of the target profile has no
/// counterpart here; only the stage is honored.
#[cfg(feature = "shaderc")]
#[derive(Debug, Default)]
pub struct ShadercBackend;

#[cfg(feature = "shaderc")]
impl ShadercBackend {
    pub fn new() -> Result<ShadercBackend> {
        shaderc::Compiler::new()
            .ok_or_else(|| Error::BackendUnavailable(NAME, "cannot create `shaderc::Compiler`".to_owned()))?;
        Ok(ShadercBackend)
    }
}

#[cfg(feature = "shaderc")]
fn shader_kind(args: &CompileArgs) -> Result<shaderc::ShaderKind> {
    let kind = match args.stage() {
        "cs" => shaderc::ShaderKind::Compute,
        "vs" => shaderc::ShaderKind::Vertex,
        "ps" => shaderc::ShaderKind::Fragment,
        "gs" => shaderc::ShaderKind::Geometry,
        "hs" => shaderc::ShaderKind::TessControl,
        "ds" => shaderc::ShaderKind::TessEvaluation,
        "ms" => shaderc::ShaderKind::Mesh,
        "as" => shaderc::ShaderKind::Task,
        _ => {
            let msg = format!("unsupported target profile \"{}\"", args.target_profile());
            return Err(Error::Backend(NAME, msg));
        },
    };
    Ok(kind)
}

#[cfg(feature = "shaderc")]
impl Backend for ShadercBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    fn compile(&self, req: &CompileRequest<'_>) -> Result<BackendOutput> {
        use crate::args::{DX_LAYOUT_FLAG, SPIRV_FLAG};
        use crate::include::IncludeResolver;

        let args = req.args;
        if !args.has_flag(SPIRV_FLAG) {
            return Err(Error::Backend(NAME, "shaderc only emits SPIR-V".to_owned()));
        }
        let src = crate::backends::utf8_source(NAME, req)?;
        let kind = shader_kind(args)?;

        let resolver = IncludeResolver::new(req.path);
        let mut opt = shaderc::CompileOptions::new()
            .ok_or_else(|| Error::Backend(NAME, "cannot create `shaderc::CompileOptions`".to_owned()))?;
        opt.set_target_env(shaderc::TargetEnv::Vulkan, shaderc::EnvVersion::Vulkan1_2 as u32);
        opt.set_source_language(shaderc::SourceLanguage::HLSL);
        opt.set_hlsl_offsets(args.has_flag(DX_LAYOUT_FLAG));
        opt.set_include_callback(|name, _ty, src_path, _depth| {
            let (resolved_name, content) = resolver.resolve(name, Some(src_path))?;
            Ok(shaderc::ResolvedInclude { resolved_name, content })
        });

        let compiler = shaderc::Compiler::new()
            .ok_or_else(|| Error::Backend(NAME, "cannot create `shaderc::Compiler`".to_owned()))?;
        let out = compiler.compile_into_spirv(src, kind, args.input(), args.entry_point(), Some(&opt));
        drop(opt);

        let out = match out {
            Ok(artifact) => {
                let diagnostics = if artifact.get_num_warnings() != 0 {
                    artifact.get_warning_messages()
                } else {
                    String::new()
                };
                BackendOutput {
                    succeeded: true,
                    diagnostics,
                    object: artifact.as_binary_u8().to_vec(),
                    dep_paths: Vec::new(),
                }
            },
            Err(shaderc::Error::CompilationError(_, msg)) => BackendOutput {
                succeeded: false,
                diagnostics: msg,
                ..Default::default()
            },
            Err(e) => return Err(Error::Backend(NAME, e.to_string())),
        };
        Ok(BackendOutput { dep_paths: resolver.into_dep_paths(), ..out })
    }
}

#[cfg(not(feature = "shaderc"))]
#[derive(Debug, Default)]
pub struct ShadercBackend;

#[cfg(not(feature = "shaderc"))]
impl ShadercBackend {
    pub fn new() -> Result<ShadercBackend> {
        Err(Error::BackendUnavailable(NAME, "the `shaderc` feature is not enabled".to_owned()))
    }
}

#[cfg(not(feature = "shaderc"))]
impl Backend for ShadercBackend {
    fn name(&self) -> &'static str {
        NAME
    }
    fn compile(&self, _: &CompileRequest<'_>) -> Result<BackendOutput> {
        Err(Error::BackendUnavailable(NAME, "the `shaderc` feature is not enabled".to_owned()))
    }
}
