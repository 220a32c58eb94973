// src/main.rs
//! `include-static`: bundle directories into a Rust module.
//!
//! Every directory argument becomes `<out-dir>/<pkgname>/<stem>.rs` with an
//! accessor struct named after the directory, and `mod.rs` ties them
//! together. The data is compressed and decoded on first use, so the bundled
//! data is typically smaller than the original files.

use std::{
    collections::HashSet,
    fs,
    path::PathBuf,
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Parser;
use include_static::{Config, DEFAULT_PACKAGE, Encoding, Generated};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "include-static")]
#[command(author, version, about = "Bundle directory trees into a Rust module", long_about = None)]
struct Cli {
    /// Directories (or files) to bundle, one generated module each
    #[arg(required = true, value_name = "DIR")]
    dirs: Vec<PathBuf>,

    /// Name of the package (module directory) to create
    #[arg(long, default_value = DEFAULT_PACKAGE)]
    pkgname: String,

    /// Directory the package directory is created in
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Text encoding of the embedded data: base64 or base256
    #[arg(long, default_value_t = Encoding::Base256)]
    encoding: Encoding,

    /// gzip compression level (0-9)
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(0..=9))]
    level: u32,

    /// Path generated code uses to reach the runtime crate
    #[arg(long, default_value = "::include_static")]
    crate_path: String,
}

fn main() -> ExitCode {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(report) if report.failed == 0 => ExitCode::SUCCESS,
        Ok(report) => {
            error!(
                "{} of {} root(s) failed",
                report.failed,
                report.failed + report.generated.len()
            );
            ExitCode::FAILURE
        }
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Outcome of one invocation.
#[derive(Debug, Default)]
struct Report {
    generated: Vec<Generated>,
    failed: usize,
}

/// Bundles every root. Only setup problems are returned as errors; a root
/// that fails is logged and counted so the others still run.
fn run(cli: &Cli) -> Result<Report> {
    include_static::validate_package(&cli.pkgname)?;

    let package_dir = cli.out_dir.join(&cli.pkgname);
    fs::create_dir_all(&package_dir).with_context(|| {
        format!("Couldn't create package directory {}", package_dir.display())
    })?;
    info!("Created directory for package {:?}", cli.pkgname);

    let mut report = Report::default();
    let mut modules = HashSet::new();
    for dir in &cli.dirs {
        let config = Config::new(dir)
            .encoding(cli.encoding)
            .level(cli.level)
            .package(&cli.pkgname)
            .crate_path(&cli.crate_path)
            .out_dir(&package_dir);

        let module = config.module_name();
        if !modules.insert(module.clone()) {
            error!(
                "Failed to bundle {:?}: module {:?} was already generated by an earlier argument",
                dir, module
            );
            report.failed += 1;
            continue;
        }

        match config.write() {
            Ok(generated) => {
                info!("{}: {}", generated.path.display(), generated.stats);
                report.generated.push(generated);
            }
            Err(err) => {
                error!("Failed to bundle {:?}: {}", dir, err);
                report.failed += 1;
            }
        }
    }

    if !report.generated.is_empty() {
        let index =
            include_static::write_module_index(&package_dir, &cli.pkgname, &report.generated)?;
        info!("Wrote {}", index.display());
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("include-static").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn directories_are_required() {
        let err = Cli::try_parse_from(["include-static"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn defaults() {
        let cli = cli(&["assets"]);
        assert_eq!(cli.pkgname, "staticfs");
        assert_eq!(cli.encoding, Encoding::Base256);
        assert_eq!(cli.level, 6);
        assert!(Cli::try_parse_from(["include-static", "--level", "12", "assets"]).is_err());
    }

    #[test]
    fn failed_root_does_not_stop_the_others() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("good");
        fs::create_dir(&good).unwrap();
        fs::write(good.join("index.html"), "<html></html>").unwrap();
        let missing = temp_dir.path().join("missing");
        let out = temp_dir.path().join("out");

        let cli = cli(&[
            "--out-dir",
            out.to_str().unwrap(),
            "--encoding",
            "base64",
            missing.to_str().unwrap(),
            good.to_str().unwrap(),
        ]);
        let report = run(&cli).unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.generated.len(), 1);
        let generated = &report.generated[0];
        assert!(generated.path.starts_with(out.join("staticfs")));
        assert!(generated.path.exists());

        let index = fs::read_to_string(out.join("staticfs/mod.rs")).unwrap();
        assert!(index.contains(&format!("pub mod {};", generated.module)));
        assert!(index.contains(&format!("pub use {}::{};", generated.module, generated.identifier)));
    }

    #[test]
    fn duplicate_module_names_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("web");
        fs::create_dir(&root).unwrap();
        let out = temp_dir.path().join("out");

        let with_slash = format!("{}/", root.display());
        let cli = cli(&["--out-dir", out.to_str().unwrap(), root.to_str().unwrap(), &with_slash]);
        let report = run(&cli).unwrap();
        assert_eq!(report.generated.len(), 1);
        assert_eq!(report.failed, 1);
    }

    #[test]
    fn invalid_package_name_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let cli = cli(&["--pkgname", "static-fs", "--out-dir", temp_dir.path().to_str().unwrap(), "x"]);
        assert!(run(&cli).is_err());
        assert!(!temp_dir.path().join("static-fs").exists());
    }
}
