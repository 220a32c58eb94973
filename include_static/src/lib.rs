//! Bundle whole directory trees into Rust source as compressed text literals.
//!
//! Every file under a root directory is gzipped, encoded as text and written
//! into a generated module together with accessors that decode the table
//! once, on first use, into an in-memory map keyed by path.
//!
//! ## How It Works
//!
//! 1.  **Generator:** the [`Config`] builder (in a `build.rs` script or from
//!     the `include-static` command-line tool) walks a root directory, encodes
//!     each file and renders a module declaring one accessor struct named
//!     after the root, e.g. `assets` becomes `Assets`.
//! 2.  **Runtime:** the generated struct wraps a static [`Assets`] table.
//!     `Assets::get("css/site.css")` returns a reader over the original bytes,
//!     `Assets::list()` returns all of them.
//!
//! Two text encodings are available through [`Encoding`]: `Base64`, which
//! keeps the generated source ASCII-only, and the default `Base256`, which
//! uses one character per compressed byte.
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! include_static = "0.1.0"
//!
//! [build-dependencies]
//! include_static = { version = "0.1.0", features = ["build"] }
//! ```
//!
//! ```ignore
//! // build.rs
//! include_static::Config::new("assets")
//!   .level(9)
//!   .build()
//!   .expect("Failed to bundle assets");
//! ```
//!
//! ```ignore
//! // src/main.rs
//! include!(concat!(env!("OUT_DIR"), "/assets.rs"));
//!
//! let index = Assets::get("index.html").expect("bundled");
//! ```

#![doc(html_root_url = "https://docs.rs/include_static/0.1.0")]

//
// ===== SHARED CODE =====
//

mod assets;
pub mod codec;
mod naming;

pub use assets::{Assets, Entry, EntryError};
pub use codec::{DecodeError, EncodeError, Encoding};
pub use naming::{STEM_SEPARATOR, file_stem, identifier};

//
// ===== BUILD-TIME CODE =====
//

#[cfg(feature = "build")]
mod build;
#[cfg(feature = "build")]
pub mod bundle;
#[cfg(feature = "build")]
pub mod render;
#[cfg(feature = "build")]
pub mod walk;

#[cfg(feature = "build")]
pub use build::{
    Config, DEFAULT_PACKAGE, Error, Generated, Result, validate_package, write_module_index,
};
