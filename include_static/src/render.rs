//! Turning a [`Bundle`] into Rust items.
use proc_macro2::TokenStream;
use quote::quote;

use crate::{
    build::{Error, Result},
    bundle::Bundle,
    codec::Encoding,
};

/// Renders bundles as Rust source.
///
/// The output declares a unit struct named after the bundle's identifier
/// with `get`, `list`, `init`, `try_init` and `assets` functions, backed by
/// a static [`crate::Assets`] table. Generated code reaches the runtime
/// through `crate_path`, `::include_static` by default.
#[derive(Debug, Clone)]
pub struct Renderer {
    crate_path: syn::Path,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(syn::parse_quote!(::include_static))
    }
}

impl Renderer {
    pub fn new(crate_path: syn::Path) -> Self {
        Self { crate_path }
    }

    /// Parses `crate_path` such as `::include_static` or `my_crate::embed`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidName`] if it is not a Rust path.
    pub fn parse(crate_path: &str) -> Result<Self> {
        syn::parse_str(crate_path)
            .map(Self::new)
            .map_err(|_| Error::InvalidName {
                kind: "crate path",
                name: crate_path.to_owned(),
                source_path: crate_path.to_owned(),
            })
    }

    /// Items for `bundle` as a token stream.
    ///
    /// # Errors
    /// Returns [`Error::InvalidName`] if the bundle identifier cannot be
    /// used as a type name.
    pub fn tokens(&self, bundle: &Bundle) -> Result<TokenStream> {
        let krate = &self.crate_path;
        let ident: syn::Ident =
            syn::parse_str(bundle.identifier()).map_err(|_| Error::InvalidName {
                kind: "identifier",
                name: bundle.identifier().to_owned(),
                source_path: bundle.root().to_owned(),
            })?;

        let encoding = match bundle.encoding() {
            Encoding::Base64 => quote!(#krate::Encoding::Base64),
            Encoding::Base256 => quote!(#krate::Encoding::Base256),
        };
        let docs = struct_docs(bundle);
        let paths = bundle.entries().map(|e| e.path.as_str());
        let texts = bundle.entries().map(|e| e.text.as_str());

        Ok(quote! {
            #(#[doc = #docs])*
            #[derive(Debug, Clone, Copy)]
            pub struct #ident;

            #[allow(dead_code)]
            impl #ident {
                /// The embedded table, decoded on first use.
                pub fn assets() -> &'static #krate::Assets {
                    static ASSETS: #krate::Assets = #krate::Assets::new(
                        #encoding,
                        &[#((#paths, #texts)),*],
                    );
                    &ASSETS
                }

                /// Decodes every entry now instead of on first lookup.
                ///
                /// # Panics
                ///
                /// Panics if the embedded data is corrupt.
                pub fn init() {
                    Self::assets().init();
                }

                /// Decodes every entry now, reporting corrupt data as an error.
                pub fn try_init() -> ::core::result::Result<(), #krate::EntryError> {
                    Self::assets().try_init().map(|_| ())
                }

                /// Looks up an embedded file by path. Returns `None` if there is
                /// no such file.
                pub fn get(path: &str) -> ::core::option::Option<::std::io::Cursor<&'static [u8]>> {
                    Self::assets().get(path)
                }

                /// Returns a reader for every embedded file, keyed by path.
                pub fn list() -> ::std::collections::BTreeMap<&'static str, ::std::io::Cursor<&'static [u8]>> {
                    Self::assets().list()
                }
            }
        })
    }

    /// Items for `bundle` as source text, with a generated-code header.
    ///
    /// The text contains items only, so it can be pulled in with `include!`.
    ///
    /// # Errors
    /// See [`Renderer::tokens`].
    pub fn source(&self, bundle: &Bundle) -> Result<String> {
        let tokens = self.tokens(bundle)?;
        Ok(format!(
            "// Code generated by include_static from {:?}; DO NOT EDIT.\n// Package: {}\n\n{}\n",
            bundle.root(),
            bundle.package(),
            tokens
        ))
    }
}

fn struct_docs(bundle: &Bundle) -> Vec<String> {
    let mut docs = vec![
        format!(" Static assets bundled from `{}` (package `{}`).", bundle.root(), bundle.package()),
        String::new(),
        " `get` returns a reader over a file's contents if it is present. The".to_owned(),
    ];
    if bundle.is_empty() {
        docs.push(" assets contain no entries.".to_owned());
    } else {
        docs.push(" assets contain exactly the following entries:".to_owned());
        docs.push(String::new());
        docs.extend(bundle.entries().map(|e| format!(" - `{}`", e.path)));
    }
    docs
}
