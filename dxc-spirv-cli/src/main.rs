use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use dxc_spirv::{
    create_backend, default_shader_path, read_source, BackendKind, DiagnosticPolicy,
    ShaderCompiler,
};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum BackendArg {
    Dxc,
    DxcExe,
    Shaderc,
}
impl From<BackendArg> for BackendKind {
    fn from(x: BackendArg) -> BackendKind {
        match x {
            BackendArg::Dxc => BackendKind::Dxc,
            BackendArg::DxcExe => BackendKind::DxcExe,
            BackendArg::Shaderc => BackendKind::Shaderc,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Arguments {
    /// Shader source; defaults to RayQuery.compute in the build-time shader directory.
    #[arg()]
    input: Option<PathBuf>,
    /// Write the SPIR-V binary here.
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = BackendArg::Dxc)]
    backend: BackendArg,
    /// Location of the DXC library or executable.
    #[arg(long)]
    dxc_path: Option<PathBuf>,
    /// Only fail when the compile status says so.
    #[arg(long)]
    allow_warnings: bool,
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[cfg(windows)]
const PLATFORM: &str = "Windows";
#[cfg(target_os = "macos")]
const PLATFORM: &str = "macOS";
#[cfg(not(any(windows, target_os = "macos")))]
const PLATFORM: &str = "LINUX";

fn success_line(backend: &str) -> String {
    format!("Compiled SPIRV on {} using {}", PLATFORM, backend)
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn write_spirv(path: &Path, spv: &[u32]) -> anyhow::Result<()> {
    let f = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    let mut w = io::BufWriter::new(f);
    let bytes = spv.iter()
        .flat_map(|x| x.to_le_bytes())
        .collect::<Vec<_>>();
    w.write_all(&bytes)?;
    w.flush()?;
    Ok(())
}

fn run(args: Arguments) -> anyhow::Result<()> {
    let input = args.input.unwrap_or_else(default_shader_path);
    let policy = if args.allow_warnings {
        DiagnosticPolicy::StatusOnly
    } else {
        DiagnosticPolicy::Strict
    };
    // The source is read before the compiler is loaded.
    let source = read_source(&input)?;
    let backend = create_backend(args.backend.into(), args.dxc_path)?;
    let compiler = ShaderCompiler::new(backend).with_policy(policy);

    let feedback = compiler.compile_source(&input, &source)?;
    if let Some(warnings) = &feedback.warnings {
        eprintln!("{}", warnings);
    }
    if let Some(output) = &args.output {
        write_spirv(output, &feedback.spv)?;
        log::info!("wrote {} words to {}", feedback.spv.len(), output.display());
    }
    println!("{}", success_line(compiler.backend_name()));
    Ok(())
}

fn main() -> ExitCode {
    let args = Arguments::parse();
    init_logger(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_line_names_the_backend_as_selected() {
        for (arg, name) in [
            (BackendArg::Dxc, "dxc"),
            (BackendArg::DxcExe, "dxc-exe"),
            (BackendArg::Shaderc, "shaderc"),
        ] {
            let kind = BackendKind::from(arg);
            let line = success_line(kind.name());
            assert_eq!(line, format!("Compiled SPIRV on {} using {}", PLATFORM, name));
        }
    }
}
