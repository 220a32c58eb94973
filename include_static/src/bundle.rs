//! Assembling the encoded entries of one root into a [`Bundle`].
use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
};

use tracing::{debug, error, info, warn};

use crate::{
    build::{DEFAULT_PACKAGE, Error, Result, check_ident, check_module_name},
    codec::{self, DEFAULT_COMPRESSION_LEVEL, Encoding},
    naming,
    walk::{self, SourceEntry},
};

/// Settings shared by every entry of a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOptions {
    pub encoding: Encoding,
    pub level: u32,
    pub package: String,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            encoding: Encoding::default(),
            level: DEFAULT_COMPRESSION_LEVEL,
            package: DEFAULT_PACKAGE.to_owned(),
        }
    }
}

/// One file after compression and text encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedEntry {
    pub path: String,
    pub text: String,
    /// Length of the original contents.
    pub raw_size: u64,
    /// File the entry was read from, if it came from disk.
    pub origin: Option<PathBuf>,
}

/// Size totals of a bundle, for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BundleStats {
    pub files: usize,
    pub raw_bytes: u64,
    /// Length of the embedded text, in bytes of UTF-8.
    pub encoded_bytes: u64,
}

impl fmt::Display for BundleStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file(s), {} -> {}",
            self.files,
            format_size(self.raw_bytes),
            format_size(self.encoded_bytes)
        )
    }
}

/// All encoded entries of one root, plus the names derived from it.
#[derive(Debug, Clone)]
pub struct Bundle {
    root: String,
    identifier: String,
    file_stem: String,
    package: String,
    encoding: Encoding,
    entries: BTreeMap<String, EncodedEntry>,
    stats: BundleStats,
}

impl Bundle {
    /// Walks `root` and bundles every file under it.
    ///
    /// Names are derived from `name`, which is normally the root as the user
    /// wrote it rather than the resolved path.
    ///
    /// # Errors
    /// See [`Bundle::build`].
    pub fn from_dir(name: &str, root: &Path, options: &BundleOptions) -> Result<Self> {
        Self::build(name, walk::walk(root), options)
    }

    /// Encodes `entries` into a bundle named after `name`.
    ///
    /// A failed entry is logged and skipped and the rest are still encoded,
    /// so every problem shows up in one run. The bundle is only returned if
    /// nothing failed.
    ///
    /// # Errors
    /// Returns [`Error::InvalidName`] if `name` does not yield valid Rust
    /// names, and [`Error::Incomplete`] if any entry could not be read or
    /// compressed.
    pub fn build<I>(name: &str, entries: I, options: &BundleOptions) -> Result<Self>
    where
        I: IntoIterator<Item = Result<SourceEntry>>,
    {
        let identifier = naming::identifier(name);
        let file_stem = naming::file_stem(name);
        check_ident("identifier", &identifier, name)?;
        check_module_name("module name", &file_stem, name)?;

        let mut bundle = Self {
            root: name.to_owned(),
            identifier,
            file_stem,
            package: options.package.clone(),
            encoding: options.encoding,
            entries: BTreeMap::new(),
            stats: BundleStats::default(),
        };

        let mut failed = 0;
        let mut first_failure = None;
        for entry in entries {
            match entry.and_then(|entry| bundle.insert(entry, options.level)) {
                Ok(()) => {}
                Err(err) => {
                    error!("couldn't bundle entry of {:?}: {}", bundle.root, err);
                    failed += 1;
                    first_failure.get_or_insert(err);
                }
            }
        }

        if let Some(first) = first_failure {
            return Err(Error::Incomplete {
                root: bundle.root,
                failed,
                first: Box::new(first),
            });
        }

        info!("bundled {:?}: {}", bundle.root, bundle.stats);
        Ok(bundle)
    }

    fn insert(&mut self, entry: SourceEntry, level: u32) -> Result<()> {
        let text = codec::encode_with_level(self.encoding, &entry.bytes, level).map_err(
            |source| Error::Encode {
                path: entry.path.clone(),
                source,
            },
        )?;

        let raw_size = entry.bytes.len() as u64;
        debug!(
            "{}\t->\t{}\t{:?}",
            format_size(raw_size),
            format_size(text.len() as u64),
            entry.path
        );

        self.stats.files += 1;
        self.stats.raw_bytes += raw_size;
        self.stats.encoded_bytes += text.len() as u64;

        let encoded = EncodedEntry {
            path: entry.path.clone(),
            text,
            raw_size,
            origin: Some(entry.origin),
        };
        if let Some(previous) = self.entries.insert(entry.path, encoded) {
            warn!("duplicate entry {:?} replaced", previous.path);
            self.stats.files -= 1;
            self.stats.raw_bytes -= previous.raw_size;
            self.stats.encoded_bytes -= previous.text.len() as u64;
        }
        Ok(())
    }

    /// The root as given by the caller.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Accessor struct name, see [`crate::identifier`].
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Output module name, see [`crate::file_stem`].
    pub fn file_stem(&self) -> &str {
        &self.file_stem
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Entries sorted by path.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &EncodedEntry> {
        self.entries.values()
    }

    pub fn get(&self, path: &str) -> Option<&EncodedEntry> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> BundleStats {
        self.stats
    }
}

/// Format bytes as human-readable string
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
