//! Generator front-end: build-script helpers and module writing.
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use syn::{ext::IdentExt, parse::Parser};
use tracing::info;

use crate::{
    bundle::{Bundle, BundleOptions, BundleStats},
    codec::{DEFAULT_COMPRESSION_LEVEL, EncodeError, Encoding},
    render::Renderer,
};

//
// ==================== PUBLIC BUILDER API ====================
//

/// Package name used when none is given.
pub const DEFAULT_PACKAGE: &str = "staticfs";

/// A builder for generating one bundle module from one root directory.
///
/// # Example
/// ```no_run
/// // in build.rs
/// include_static::Config::new("assets")
///   .level(9)
///   .build()
///   .expect("Failed to bundle assets");
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
    encoding: Encoding,
    level: u32,
    package: String,
    crate_path: String,
    out_dir: Option<PathBuf>,
}

/// What [`Config::write`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    /// The written source file.
    pub path: PathBuf,
    /// Module name, also the file stem.
    pub module: String,
    /// Name of the generated accessor struct.
    pub identifier: String,
    pub stats: BundleStats,
}

impl Config {
    /// Creates a new configuration for a root directory or single file.
    ///
    /// The generated module and accessor are named after `path` exactly as
    /// given, so `"assets"` yields `assets.rs` declaring `Assets`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            encoding: Encoding::default(),
            level: DEFAULT_COMPRESSION_LEVEL,
            package: DEFAULT_PACKAGE.to_owned(),
            crate_path: "::include_static".to_owned(),
            out_dir: None,
        }
    }

    /// Sets the text encoding of the embedded data.
    #[must_use]
    pub const fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets the gzip compression level (0-9).
    ///
    /// If not set, a default level of `6` is used.
    #[must_use]
    pub const fn level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Sets the package the generated module belongs to.
    #[must_use]
    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    /// Sets the path generated code uses to reach this crate, for callers
    /// that re-export it under another name.
    #[must_use]
    pub fn crate_path(mut self, crate_path: impl Into<String>) -> Self {
        self.crate_path = crate_path.into();
        self
    }

    /// Sets the directory the module is written to.
    #[must_use]
    pub fn out_dir(mut self, out_dir: impl AsRef<Path>) -> Self {
        self.out_dir = Some(out_dir.as_ref().to_path_buf());
        self
    }

    /// Module name the output will use.
    pub fn module_name(&self) -> String {
        crate::file_stem(&self.name_source())
    }

    /// Generates the module for `path` relative to the current directory.
    ///
    /// The output goes to the configured `out_dir`, or the current directory
    /// if none was set.
    ///
    /// # Errors
    /// Returns an [`Error`] if the names derived from the path are not valid
    /// Rust identifiers, if any file cannot be read or compressed, or if the
    /// output cannot be written. Nothing is written unless every file was
    /// bundled.
    pub fn write(&self) -> Result<Generated> {
        let out_dir = self.out_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        self.generate(&self.path, &out_dir)
    }

    /// Runs the generator from a build script.
    ///
    /// `path` is resolved against `CARGO_MANIFEST_DIR` and the module is
    /// written to `OUT_DIR` unless another `out_dir` was set. Cargo is told to
    /// rerun the script when anything under `path` changes.
    ///
    /// # Errors
    /// Returns an [`Error`] if Cargo's environment is missing or the path does
    /// not exist, plus everything [`Config::write`] can return.
    pub fn build(self) -> Result<Generated> {
        let manifest_dir = env::var("CARGO_MANIFEST_DIR")
            .map(PathBuf::from)
            .map_err(|_| Error::Var("CARGO_MANIFEST_DIR"))?;
        let out_dir = match &self.out_dir {
            Some(dir) => dir.clone(),
            None => env::var("OUT_DIR")
                .map(PathBuf::from)
                .map_err(|_| Error::Var("OUT_DIR"))?,
        };

        let root = manifest_dir.join(&self.path);
        let canonical_root = root.canonicalize().map_err(|_| {
            Error::PathNotFound(root.display().to_string(), manifest_dir.display().to_string())
        })?;
        println!("cargo:rerun-if-changed={}", canonical_root.display());

        self.generate(&canonical_root, &out_dir)
    }

    fn name_source(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    fn generate(&self, root: &Path, out_dir: &Path) -> Result<Generated> {
        validate_package(&self.package)?;
        let renderer = Renderer::parse(&self.crate_path)?;
        let options = BundleOptions {
            encoding: self.encoding,
            level: self.level,
            package: self.package.clone(),
        };
        let bundle = Bundle::from_dir(&self.name_source(), root, &options)?;
        let source = renderer.source(&bundle)?;

        let path = out_dir.join(format!("{}.rs", bundle.file_stem()));
        fs::write(&path, source).map_err(|source| Error::Write {
            path: path.clone(),
            source,
        })?;
        info!(
            "saving to {}, usable with {}::get and {}::list",
            path.display(),
            bundle.identifier(),
            bundle.identifier()
        );

        Ok(Generated {
            path,
            module: bundle.file_stem().to_owned(),
            identifier: bundle.identifier().to_owned(),
            stats: bundle.stats(),
        })
    }
}

/// Writes `<dir>/mod.rs` declaring every generated module and re-exporting
/// its accessor struct.
///
/// # Errors
/// Returns an [`Error`] if `package` is not a valid module name or the file
/// cannot be written.
pub fn write_module_index(dir: &Path, package: &str, generated: &[Generated]) -> Result<PathBuf> {
    validate_package(package)?;

    let mut modules: Vec<&Generated> = generated.iter().collect();
    modules.sort_by(|a, b| a.module.cmp(&b.module));
    modules.dedup_by(|a, b| a.module == b.module);

    let mut out = String::from("// Code generated by include_static; DO NOT EDIT.\n\n");
    out.push_str(&format!("//! Embedded assets for package `{package}`.\n\n"));
    for g in &modules {
        // rustc only loads non-ASCII module names through an explicit path.
        if !g.module.is_ascii() {
            out.push_str(&format!("#[path = \"{}.rs\"]\n", g.module));
        }
        out.push_str(&format!("pub mod {};\n", module_ident(&g.module)));
    }
    if !modules.is_empty() {
        out.push('\n');
    }
    for g in &modules {
        out.push_str(&format!("pub use {}::{};\n", module_ident(&g.module), g.identifier));
    }

    let path = dir.join("mod.rs");
    fs::write(&path, out).map_err(|source| Error::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Checks that `package` can be used as a module name.
///
/// # Errors
/// Returns [`Error::InvalidName`] otherwise.
pub fn validate_package(package: &str) -> Result<()> {
    check_module_name("package name", package, package)
}

/// Keywords that cannot be written as raw identifiers.
const NON_RAW_KEYWORDS: [&str; 4] = ["self", "super", "crate", "Self"];

/// Like [`check_ident`], but keywords other than [`NON_RAW_KEYWORDS`] pass
/// since modules are declared with raw identifiers where needed.
pub(crate) fn check_module_name(kind: &'static str, name: &str, source_path: &str) -> Result<()> {
    if syn::Ident::parse_any.parse_str(name).is_ok() && !NON_RAW_KEYWORDS.contains(&name) {
        Ok(())
    } else {
        Err(Error::InvalidName {
            kind,
            name: name.to_owned(),
            source_path: source_path.to_owned(),
        })
    }
}

/// `name` as written in a `mod` or `use` item: `r#static` for keywords.
fn module_ident(name: &str) -> String {
    if syn::parse_str::<syn::Ident>(name).is_ok() {
        name.to_owned()
    } else {
        format!("r#{name}")
    }
}

pub(crate) fn check_ident(kind: &'static str, name: &str, source_path: &str) -> Result<()> {
    match syn::parse_str::<syn::Ident>(name) {
        Ok(_) => Ok(()),
        Err(_) => Err(Error::InvalidName {
            kind,
            name: name.to_owned(),
            source_path: source_path.to_owned(),
        }),
    }
}

/// A specialized `Result` type for generator operations.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur while bundling a root or writing its module.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Environment variable '{0}' not set by Cargo")]
    Var(&'static str),
    #[error("Path '{0}' not found (manifest directory is '{1}')")]
    PathNotFound(String, String),
    #[error("Could not walk directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Could not read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Path '{}' is not valid UTF-8", .0.display())]
    NonUtf8Path(PathBuf),
    #[error("Path '{0}' cannot be expressed relative to its root")]
    UnsupportedPath(String),
    #[error("Could not compress '{path}': {source}")]
    Encode {
        path: String,
        #[source]
        source: EncodeError,
    },
    #[error("{failed} file(s) under '{root}' could not be bundled, first: {first}")]
    Incomplete {
        root: String,
        failed: usize,
        first: Box<Error>,
    },
    #[error("{kind} '{name}' derived from '{source_path}' is not a valid Rust identifier")]
    InvalidName {
        kind: &'static str,
        name: String,
        source_path: String,
    },
    #[error("Could not write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
