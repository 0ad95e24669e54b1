use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to open shader file: {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Compiler errors: {0}")]
    Diagnostics(String),

    #[error("Failed to compile shader.{}", detail(.0))]
    CompileFailed(Option<String>),

    #[error("compiler output is {0} bytes long, which is not a whole number of 32-bit words")]
    MisalignedOutput(usize),

    #[error("compiler reported success but produced no object")]
    EmptyOutput,

    #[error("{0} backend is not available: {1}")]
    BackendUnavailable(&'static str, String),

    #[error("{0} backend failed: {1}")]
    Backend(&'static str, String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

fn detail(diagnostics: &Option<String>) -> String {
    match diagnostics {
        Some(x) => format!("\n{}", x),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
