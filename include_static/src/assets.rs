//! Runtime side of a generated bundle.
use std::{collections::BTreeMap, io::Cursor, sync::OnceLock};

use crate::codec::{self, DecodeError, Encoding};

/// One embedded `(path, encoded text)` pair as written by the renderer.
pub type Entry = (&'static str, &'static str);

/// A table of embedded entries that decodes itself on first use.
///
/// Generated code declares one of these as a `static`. The table is decoded
/// in one step, either explicitly through [`Assets::init`] /
/// [`Assets::try_init`] or implicitly by the first lookup. After that the
/// decoded map never changes, so any number of threads may read it.
#[derive(Debug)]
pub struct Assets {
    encoding: Encoding,
    table: &'static [Entry],
    decoded: OnceLock<BTreeMap<&'static str, Vec<u8>>>,
}

/// A decode failure for one embedded entry.
#[derive(Debug, thiserror::Error)]
#[error("failed to decode embedded entry '{path}'")]
pub struct EntryError {
    pub path: &'static str,
    #[source]
    pub source: DecodeError,
}

impl Assets {
    #[must_use]
    pub const fn new(encoding: Encoding, table: &'static [Entry]) -> Self {
        Self {
            encoding,
            table,
            decoded: OnceLock::new(),
        }
    }

    /// Decodes every entry, once. Later calls return the same map.
    ///
    /// Nothing is stored unless every entry decodes, so a failed call leaves
    /// the table uninitialized.
    ///
    /// # Errors
    /// Returns an [`EntryError`] naming the first entry that fails to decode.
    pub fn try_init(&self) -> Result<&BTreeMap<&'static str, Vec<u8>>, EntryError> {
        if let Some(decoded) = self.decoded.get() {
            return Ok(decoded);
        }
        let mut decoded = BTreeMap::new();
        for &(path, text) in self.table {
            let bytes =
                codec::decode(self.encoding, text).map_err(|source| EntryError { path, source })?;
            decoded.insert(path, bytes);
        }
        Ok(self.decoded.get_or_init(|| decoded))
    }

    /// Decodes every entry, once.
    ///
    /// # Panics
    ///
    /// Panics if any entry is corrupt. Embedded tables are produced by the
    /// generator, so this indicates a bug or a hand-edited generated file.
    pub fn init(&self) -> &BTreeMap<&'static str, Vec<u8>> {
        self.try_init()
            .unwrap_or_else(|e| panic!("BUG: include_static: {e}: {}", e.source))
    }

    /// Looks up `path`, returning a reader over its contents.
    pub fn get(&self, path: &str) -> Option<Cursor<&[u8]>> {
        self.get_bytes(path).map(Cursor::new)
    }

    /// Looks up `path`, returning its contents.
    pub fn get_bytes(&self, path: &str) -> Option<&[u8]> {
        self.init().get(path).map(Vec::as_slice)
    }

    /// Returns a fresh reader for every entry, keyed by path.
    pub fn list(&self) -> BTreeMap<&'static str, Cursor<&[u8]>> {
        self.init()
            .iter()
            .map(|(path, bytes)| (*path, Cursor::new(bytes.as_slice())))
            .collect()
    }

    /// Embedded paths, in sorted order. Does not decode anything.
    pub fn paths(&self) -> impl Iterator<Item = &'static str> + '_ {
        let mut paths: Vec<_> = self.table.iter().map(|&(path, _)| path).collect();
        paths.sort_unstable();
        paths.dedup();
        paths.into_iter()
    }

    pub fn len(&self) -> usize {
        self.init().len()
    }

    pub fn is_empty(&self) -> bool {
        self.init().is_empty()
    }

    pub const fn encoding(&self) -> Encoding {
        self.encoding
    }
}
