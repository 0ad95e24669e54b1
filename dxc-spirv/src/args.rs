//! The option list handed to the compiler.
use crate::wide::{ConversionError, WideChar, WideConverter};

/// Compute shader, shader model 6.6.
pub const TARGET_PROFILE: &str = "cs_6_6";
pub const ENTRY_POINT: &str = "main";
/// Emit SPIR-V instead of DXIL.
pub const SPIRV_FLAG: &str = "-spirv";
/// Lay out buffers the way D3D does so the binary matches host structs.
pub const DX_LAYOUT_FLAG: &str = "-fvk-use-dx-layout";

const INPUT: usize = 0;
const PROFILE: usize = 2;
const ENTRY: usize = 4;
const EXTRA_FLAGS: usize = 5;

/// `{input, "-T", "cs_6_6", "-E", "main", "-spirv", "-fvk-use-dx-layout"}`.
///
/// Only the input identifier changes between invocations, everything else
/// is fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileArgs {
    tokens: Vec<String>,
}
impl CompileArgs {
    pub fn fixed(input: impl Into<String>) -> CompileArgs {
        let tokens = vec![
            input.into(),
            "-T".to_owned(), TARGET_PROFILE.to_owned(),
            "-E".to_owned(), ENTRY_POINT.to_owned(),
            SPIRV_FLAG.to_owned(),
            DX_LAYOUT_FLAG.to_owned(),
        ];
        CompileArgs { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
    pub fn input(&self) -> &str {
        &self.tokens[INPUT]
    }
    pub fn target_profile(&self) -> &str {
        &self.tokens[PROFILE]
    }
    pub fn entry_point(&self) -> &str {
        &self.tokens[ENTRY]
    }
    /// Flags that follow the profile and entry point.
    pub fn extra_flags(&self) -> Vec<&str> {
        self.tokens[EXTRA_FLAGS..].iter().map(String::as_str).collect()
    }
    pub fn has_flag(&self, flag: &str) -> bool {
        self.tokens[EXTRA_FLAGS..].iter().any(|x| x == flag)
    }
    /// Shader stage prefix of the target profile, e.g. `cs` for `cs_6_6`.
    pub fn stage(&self) -> &str {
        let profile = self.target_profile();
        profile.split('_').next().unwrap_or(profile)
    }

    /// Encode every token as a NUL-terminated wide string, the form a raw
    /// `IDxcCompiler` interface consumes.
    pub fn encode_wide(
        &self,
        converter: &dyn WideConverter,
    ) -> Result<Vec<Vec<WideChar>>, ConversionError> {
        self.tokens.iter()
            .map(|x| converter.to_wide(x))
            .collect()
    }
}
