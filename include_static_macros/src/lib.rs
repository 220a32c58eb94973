//! Procedural macro front-end for the `include_static` crate.
use std::{env, path::PathBuf};

use include_static::{Encoding, bundle::Bundle, bundle::BundleOptions, render::Renderer};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Ident, LitStr, Token,
    parse::{Parse, ParseStream},
    parse_macro_input,
};

/// Bundles a directory at compile time.
///
/// This macro takes a string literal which must be a path to a directory (or
/// a single file) relative to the crate root (`CARGO_MANIFEST_DIR`), and
/// optionally the encoding to embed with, `base64` or `base256`.
///
/// It expands to the same items the generator writes: a unit struct named
/// after the path, so `include_dir!("assets")` declares `Assets` with `get`,
/// `list`, `init`, `try_init` and `assets` functions.
///
/// ```ignore
/// mod web {
///     include_static_macros::include_dir!("web/public", base64);
/// }
///
/// let index = web::WebPublic::get("index.html");
/// ```
///
/// # Compile Errors
///
/// Expansion fails if:
/// - The path does not exist or any file under it cannot be read.
/// - The path does not yield a valid Rust type name.
/// - The encoding is not `base64` or `base256`.
#[proc_macro]
pub fn include_dir(input: TokenStream) -> TokenStream {
    let args = parse_macro_input!(input as Args);
    expand(&args)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

struct Args {
    path: LitStr,
    encoding: Option<Ident>,
}

impl Parse for Args {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let path = input.parse()?;
        let mut encoding = None;
        if input.parse::<Option<Token![,]>>()?.is_some() && !input.is_empty() {
            encoding = Some(input.parse()?);
            input.parse::<Option<Token![,]>>()?;
        }
        Ok(Self { path, encoding })
    }
}

fn expand(args: &Args) -> syn::Result<TokenStream2> {
    let span = args.path.span();
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").map_err(|_| {
        syn::Error::new(span, "CARGO_MANIFEST_DIR is not set; this macro must be run by Cargo.")
    })?;

    let encoding = match &args.encoding {
        Some(ident) => ident
            .to_string()
            .parse::<Encoding>()
            .map_err(|e| syn::Error::new(ident.span(), e))?,
        None => Encoding::default(),
    };

    let name = args.path.value();
    let root = PathBuf::from(manifest_dir).join(&name);
    let options = BundleOptions {
        encoding,
        ..BundleOptions::default()
    };
    let bundle = Bundle::from_dir(&name, &root, &options)
        .map_err(|e| syn::Error::new(span, format!("include_static: {e}")))?;

    let items = Renderer::new(crate_path())
        .tokens(&bundle)
        .map_err(|e| syn::Error::new(span, format!("include_static: {e}")))?;

    // Referencing every file makes Cargo rebuild when one of them changes.
    // Unused constants are not emitted into the binary.
    let tracked = bundle
        .entries()
        .filter_map(|e| e.origin.as_ref())
        .map(|origin| origin.display().to_string());

    Ok(quote! {
        #items
        #(const _: &[u8] = ::core::include_bytes!(#tracked);)*
    })
}

/// Path to the runtime crate as seen from the calling crate.
fn crate_path() -> syn::Path {
    use proc_macro_crate::{FoundCrate, crate_name};
    use proc_macro2::Span;

    match crate_name("include_static") {
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            syn::parse_quote!(::#ident)
        }
        Ok(FoundCrate::Itself) => syn::parse_quote!(crate),
        Err(_) => syn::parse_quote!(::include_static), // Fallback
    }
}
