//! Names derived from a root directory argument.
//!
//! Both functions only look at letters; everything else is treated as a
//! word boundary. They never fail and always give the same answer for the
//! same input.

/// Separator placed between words by [`file_stem`].
pub const STEM_SEPARATOR: char = '_';

/// Turns `path` into a snake-style name usable as a file or module name.
///
/// Letters are copied through. Each run of non-letters between two letters
/// becomes a single [`STEM_SEPARATOR`]; runs before the first letter or after
/// the last one are dropped.
///
/// ```
/// assert_eq!(include_static::file_stem("my-assets/dir"), "my_assets_dir");
/// assert_eq!(include_static::file_stem("./static/"), "static");
/// ```
pub fn file_stem(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut pending_separator = false;

    for ch in path.chars() {
        if ch.is_alphabetic() {
            if pending_separator {
                out.push(STEM_SEPARATOR);
                pending_separator = false;
            }
            out.push(ch);
        } else if !out.is_empty() {
            pending_separator = true;
        }
    }
    out
}

/// Turns `path` into a camel-case identifier.
///
/// The first letter of every word is uppercased and non-letters are removed,
/// so the result can be used as a type name or appended to a prefix.
///
/// Only cased letters change. A letter with no uppercase form (`数`) or
/// whose uppercase form is not purely alphabetic (`ὐ`, which gains a
/// combining mark) is kept as is, so the output is always letters only.
///
/// ```
/// assert_eq!(include_static::identifier("static"), "Static");
/// assert_eq!(include_static::identifier("my-assets/dir"), "MyAssetsDir");
/// ```
pub fn identifier(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut capitalize = true;

    for ch in path.chars() {
        if !ch.is_alphabetic() {
            capitalize = true;
        } else if capitalize {
            if ch.to_uppercase().all(char::is_alphabetic) {
                out.extend(ch.to_uppercase());
            } else {
                out.push(ch);
            }
            capitalize = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_examples() {
        assert_eq!(file_stem("my-assets/dir"), "my_assets_dir");
        assert_eq!(file_stem("static"), "static");
        assert_eq!(file_stem("../web//public/"), "web_public");
        assert_eq!(file_stem("a--b"), "a_b");
        assert_eq!(file_stem("x"), "x");
    }

    #[test]
    fn identifier_examples() {
        assert_eq!(identifier("static"), "Static");
        assert_eq!(identifier("my-assets/dir"), "MyAssetsDir");
        assert_eq!(identifier("./camelCase"), "CamelCase");
        assert_eq!(identifier("v2assets"), "VAssets");
        assert_eq!(identifier("x"), "X");
        assert_eq!(identifier("ὐ"), "ὐ");
        assert_eq!(identifier("straße"), "Straße");
        assert_eq!(identifier("ßtraße"), "SStraße");
    }

    #[test]
    fn uncased_letters_are_kept() {
        assert_eq!(identifier("数据/图片"), "数据图片");
        assert_eq!(file_stem("数据/图片"), "数据_图片");
    }

    #[test]
    fn no_letters_gives_empty() {
        for input in ["", "/", "123", "../..", "_-_"] {
            assert_eq!(file_stem(input), "", "{input:?}");
            assert_eq!(identifier(input), "", "{input:?}");
        }
    }

    #[test]
    fn unicode_letters_count() {
        assert_eq!(file_stem("données/été"), "données_été");
        assert_eq!(identifier("données/été"), "DonnéesÉté");
    }
}
