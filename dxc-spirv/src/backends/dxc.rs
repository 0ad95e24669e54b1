//! In-process DirectX Shader Compiler.
#[allow(unused_imports)]
use std::path::PathBuf;

#[allow(unused_imports)]
use crate::{BackendOutput, CompileRequest, Error, Result};
#[allow(unused_imports)]
use crate::backends::Backend;

const NAME: &str = "dxc";

#[cfg(feature = "dxc")]
pub struct DxcBackend {
    dxc: hassle_rs::Dxc,
}

#[cfg(feature = "dxc")]
impl DxcBackend {
    /// Load `libdxcompiler` (`dxcompiler.dll` on Windows) from `lib_path`,
    /// or from the default search path.
    pub fn load(lib_path: Option<PathBuf>) -> Result<DxcBackend> {
        let dxc = hassle_rs::Dxc::new(lib_path)
            .map_err(|e| Error::BackendUnavailable(NAME, e.to_string()))?;
        Ok(DxcBackend { dxc })
    }
}

#[cfg(feature = "dxc")]
struct ResolverHandler<'a>(&'a crate::include::IncludeResolver);

#[cfg(feature = "dxc")]
impl hassle_rs::DxcIncludeHandler for ResolverHandler<'_> {
    fn load_source(&mut self, filename: String) -> Option<String> {
        match self.0.resolve(&filename, None) {
            Ok((_, content)) => Some(content),
            Err(e) => {
                log::debug!("{}", e);
                None
            },
        }
    }
}

/// What one compile call handed back, before it is judged.
#[cfg(feature = "dxc")]
#[derive(Debug, Default)]
struct RawResult {
    /// The call itself returned success.
    compiled: bool,
    /// `IDxcOperationResult::GetStatus`, if it could be read.
    status: Option<u32>,
    /// Text of the error buffer; DXC puts warnings there too.
    diagnostics: Option<String>,
    object: Option<Vec<u8>>,
}

#[cfg(feature = "dxc")]
fn into_output(raw: RawResult, dep_paths: Vec<String>) -> BackendOutput {
    // Status is an HRESULT; failure codes have the sign bit set.
    let succeeded = raw.compiled && raw.status.map_or(false, |x| (x as i32) >= 0);
    let diagnostics = raw.diagnostics
        .map(|x| x.trim_end_matches('\0').to_owned())
        .unwrap_or_default();
    let object = if succeeded {
        raw.object.unwrap_or_default()
    } else {
        Vec::new()
    };
    BackendOutput { succeeded, diagnostics, object, dep_paths }
}

#[cfg(feature = "dxc")]
impl Backend for DxcBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    // Every handle below releases itself when dropped, so each early
    // return cleans up what was acquired before it.
    fn compile(&self, req: &CompileRequest<'_>) -> Result<BackendOutput> {
        use crate::backends::utf8_source;
        use crate::include::IncludeResolver;

        let fail = |e: hassle_rs::HassleError| Error::Backend(NAME, e.to_string());

        let src = utf8_source(NAME, req)?;
        let compiler = self.dxc.create_compiler().map_err(fail)?;
        let library = self.dxc.create_library().map_err(fail)?;
        let blob = library.create_blob_with_encoding_from_str(src).map_err(fail)?;

        let resolver = IncludeResolver::new(req.path);
        let mut handler = ResolverHandler(&resolver);
        let args = req.args;
        let result = compiler.compile(
            &blob,
            args.input(),
            args.entry_point(),
            args.target_profile(),
            &args.extra_flags(),
            Some(&mut handler),
            &[],
        );
        let (result, compiled) = match result {
            Ok(result) => (result, true),
            Err((result, hr)) => {
                log::debug!("dxc reported failure: {}", hr);
                (result, false)
            },
        };

        let diagnostics = match result.get_error_buffer() {
            Ok(errors) => Some(library.get_blob_as_string(&errors.into()).map_err(fail)?),
            Err(_) => None,
        };
        let status = result.get_status().ok();
        let object = if compiled {
            Some(result.get_result().map_err(fail)?.to_vec::<u8>())
        } else {
            None
        };
        drop(handler);

        let raw = RawResult { compiled, status, diagnostics, object };
        Ok(into_output(raw, resolver.into_dep_paths()))
    }
}

#[cfg(not(feature = "dxc"))]
pub struct DxcBackend;

#[cfg(not(feature = "dxc"))]
impl DxcBackend {
    pub fn load(_: Option<PathBuf>) -> Result<DxcBackend> {
        Err(Error::BackendUnavailable(NAME, "the `dxc` feature is not enabled".to_owned()))
    }
}

#[cfg(not(feature = "dxc"))]
impl Backend for DxcBackend {
    fn name(&self) -> &'static str {
        NAME
    }
    fn compile(&self, _: &CompileRequest<'_>) -> Result<BackendOutput> {
        Err(Error::BackendUnavailable(NAME, "the `dxc` feature is not enabled".to_owned()))
    }
}

#[cfg(all(test, feature = "dxc"))]
mod tests {
    use super::*;

    const E_FAIL: u32 = 0x8000_4005;

    #[test]
    fn successful_call_keeps_object() {
        let raw = RawResult {
            compiled: true,
            status: Some(0),
            diagnostics: Some(String::new()),
            object: Some(vec![3, 2, 35, 7]),
        };
        let out = into_output(raw, vec!["a.hlsl".to_owned()]);
        assert!(out.succeeded);
        assert!(out.diagnostics.is_empty());
        assert_eq!(out.object, vec![3, 2, 35, 7]);
        assert_eq!(out.dep_paths, vec!["a.hlsl"]);
    }

    #[test]
    fn warnings_survive_a_successful_call() {
        let raw = RawResult {
            compiled: true,
            status: Some(0),
            diagnostics: Some("warning: unused variable\0".to_owned()),
            object: Some(vec![0; 4]),
        };
        let out = into_output(raw, Vec::new());
        assert!(out.succeeded);
        assert_eq!(out.diagnostics, "warning: unused variable");
    }

    #[test]
    fn failing_status_drops_object() {
        let raw = RawResult {
            compiled: true,
            status: Some(E_FAIL),
            diagnostics: None,
            object: Some(vec![0; 4]),
        };
        let out = into_output(raw, Vec::new());
        assert!(!out.succeeded);
        assert!(out.object.is_empty());
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn failed_call_reports_error_buffer() {
        let raw = RawResult {
            compiled: false,
            status: Some(E_FAIL),
            diagnostics: Some("error: expected ')'".to_owned()),
            object: None,
        };
        let out = into_output(raw, Vec::new());
        assert!(!out.succeeded);
        assert_eq!(out.diagnostics, "error: expected ')'");
    }

    #[test]
    fn unreadable_status_is_a_failure() {
        let raw = RawResult {
            compiled: true,
            object: Some(vec![0; 4]),
            ..Default::default()
        };
        assert!(!into_output(raw, Vec::new()).succeeded);
    }
}
