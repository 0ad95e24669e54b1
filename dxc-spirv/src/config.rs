use std::path::PathBuf;

/// Directory holding the shader sources, fixed at build time. Set the
/// `SHADER_SOURCE_DIR` environment variable when building to override the
/// `shaders` directory shipped with this crate.
pub const SHADER_SOURCE_DIR: &str = match option_env!("SHADER_SOURCE_DIR") {
    Some(dir) => dir,
    None => concat!(env!("CARGO_MANIFEST_DIR"), "/shaders"),
};

pub const SHADER_FILE_NAME: &str = "RayQuery.compute";

#[inline]
pub fn default_shader_path() -> PathBuf {
    PathBuf::from(SHADER_SOURCE_DIR).join(SHADER_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_ends_with_shader_name() {
        let path = default_shader_path();
        assert_eq!(path.file_name().unwrap(), SHADER_FILE_NAME);
        assert!(path.starts_with(SHADER_SOURCE_DIR));
    }
}
