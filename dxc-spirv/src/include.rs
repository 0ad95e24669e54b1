use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolves `#include` directives against the directory of the shader
/// being compiled, and remembers every file it handed out.
#[derive(Debug)]
pub struct IncludeResolver {
    base_dir: PathBuf,
    dep_paths: RefCell<Vec<String>>,
}
impl IncludeResolver {
    pub fn new(src_path: &Path) -> IncludeResolver {
        let base_dir = src_path.parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        IncludeResolver {
            base_dir,
            dep_paths: RefCell::new(Vec::new()),
        }
    }

    /// `including` is the file containing the directive, when the compiler
    /// tells us. Names are otherwise taken relative to the base directory.
    pub fn resolve(
        &self,
        name: &str,
        including: Option<&str>,
    ) -> Result<(String, String), String> {
        let name_path = Path::new(name);
        let path = if name_path.is_absolute() {
            name_path.to_path_buf()
        } else {
            let cur_dir = including
                .and_then(|x| Path::new(x).parent())
                .filter(|x| !x.as_os_str().is_empty())
                .unwrap_or(self.base_dir.as_path());
            cur_dir.join(name_path.strip_prefix("./").unwrap_or(name_path))
        };

        let path_lit = path.to_string_lossy().to_string();
        let content = fs::read_to_string(&path)
            .map_err(|e| format!("cannot read from \"{}\": {}", path_lit, e))?;
        log::debug!("resolved include \"{}\" to {}", name, path_lit);
        self.dep_paths.borrow_mut().push(path_lit.clone());
        Ok((path_lit, content))
    }

    pub fn into_dep_paths(self) -> Vec<String> {
        self.dep_paths.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_to_source_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("common")).unwrap();
        fs::write(dir.path().join("common/rng.hlsl"), "uint rng;").unwrap();
        let src = dir.path().join("RayQuery.compute");

        let resolver = IncludeResolver::new(&src);
        let (path, content) = resolver.resolve("./common/rng.hlsl", None).unwrap();
        assert_eq!(content, "uint rng;");
        assert!(path.ends_with("rng.hlsl"));

        let nested = dir.path().join("common/rng.hlsl");
        fs::write(dir.path().join("common/seed.hlsl"), "uint seed;").unwrap();
        let (_, content) = resolver
            .resolve("seed.hlsl", Some(&nested.to_string_lossy()))
            .unwrap();
        assert_eq!(content, "uint seed;");

        assert_eq!(resolver.into_dep_paths().len(), 2);
    }

    #[test]
    fn missing_include_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = IncludeResolver::new(&dir.path().join("a.compute"));
        let e = resolver.resolve("nope.hlsl", None).unwrap_err();
        assert!(e.contains("nope.hlsl"));
        assert!(resolver.into_dep_paths().is_empty());
    }
}
