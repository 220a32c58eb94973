//! Compression and text encoding of embedded entries.
//!
//! Every entry goes through the same pipeline: gzip the raw bytes, then map
//! the compressed bytes into text that can sit inside a Rust string literal.
//! [`decode`] is the exact inverse of [`encode`] for both encodings.
use std::{
    fmt,
    io::{Read, Write},
    str::FromStr,
};

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use flate2::{Compression, GzBuilder, read::GzDecoder};

/// The default gzip level used by [`encode`].
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// First code point of the base256 alphabet. Byte `b` maps to `'a' + b`.
const BASE256_OFFSET: u32 = 'a' as u32;

/// Text representation of the compressed bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Standard padded base64. 4 characters per 3 bytes, ASCII only.
    Base64,
    /// One `char` per byte, shifted up by `'a'`. Denser, but the text is
    /// mostly non-ASCII.
    #[default]
    Base256,
}

impl Encoding {
    /// Lowercase name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Base64 => "base64",
            Self::Base256 => "base256",
        }
    }

    fn encode_text(self, bytes: &[u8]) -> String {
        match self {
            Self::Base64 => BASE64.encode(bytes),
            Self::Base256 => bytes
                .iter()
                .map(|&b| {
                    // 'a' + 255 is U+0160, well clear of the surrogate range.
                    char::from_u32(BASE256_OFFSET + u32::from(b))
                        .unwrap_or(char::REPLACEMENT_CHARACTER)
                })
                .collect(),
        }
    }

    fn decode_text(self, text: &str) -> Result<Vec<u8>, DecodeError> {
        match self {
            Self::Base64 => Ok(BASE64.decode(text)?),
            Self::Base256 => {
                let mut out = Vec::with_capacity(text.len());
                for (offset, ch) in text.chars().enumerate() {
                    let byte = u32::from(ch)
                        .checked_sub(BASE256_OFFSET)
                        .and_then(|v| u8::try_from(v).ok())
                        .ok_or(DecodeError::InvalidChar { ch, offset })?;
                    out.push(byte);
                }
                Ok(out)
            }
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "base64" | "b64" => Ok(Self::Base64),
            "base256" | "b256" => Ok(Self::Base256),
            _ => Err(UnknownEncoding(s.to_owned())),
        }
    }
}

/// Returned when parsing an [`Encoding`] name fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown encoding '{0}' (expected 'base64' or 'base256')")]
pub struct UnknownEncoding(pub String);

/// Failure while compressing an entry.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("gzip write failed")]
    Write(#[source] std::io::Error),
    #[error("gzip finish failed")]
    Finish(#[source] std::io::Error),
}

/// Failure while turning embedded text back into bytes.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid base64 text")]
    Base64(#[from] base64::DecodeError),
    #[error("character {ch:?} at offset {offset} is outside the base256 alphabet")]
    InvalidChar { ch: char, offset: usize },
    #[error("corrupt gzip stream")]
    Decompress(#[source] std::io::Error),
}

/// Compresses `raw` with the default level and encodes it as text.
///
/// # Errors
/// Returns an [`EncodeError`] if the gzip stream cannot be written.
pub fn encode(encoding: Encoding, raw: &[u8]) -> Result<String, EncodeError> {
    encode_with_level(encoding, raw, DEFAULT_COMPRESSION_LEVEL)
}

/// Compresses `raw` at `level` (0-9, clamped) and encodes it as text.
///
/// The output depends only on the inputs: the gzip header carries no
/// timestamp or file name.
///
/// # Errors
/// Returns an [`EncodeError`] if the gzip stream cannot be written.
pub fn encode_with_level(encoding: Encoding, raw: &[u8], level: u32) -> Result<String, EncodeError> {
    let compressed = compress(raw, level)?;
    Ok(encoding.encode_text(&compressed))
}

/// Inverse of [`encode`].
///
/// # Errors
/// Returns a [`DecodeError`] if `text` is not valid for `encoding` or the
/// gzip stream inside it is malformed, truncated or fails its checksum.
pub fn decode(encoding: Encoding, text: &str) -> Result<Vec<u8>, DecodeError> {
    let compressed = encoding.decode_text(text)?;
    decompress(&compressed)
}

fn compress(raw: &[u8], level: u32) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = GzBuilder::new()
        .mtime(0)
        .write(Vec::with_capacity(raw.len() / 2 + 32), Compression::new(level.min(9)));
    encoder.write_all(raw).map_err(EncodeError::Write)?;
    encoder.finish().map_err(EncodeError::Finish)
}

fn decompress(compressed: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut decoder = GzDecoder::new(compressed);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).map_err(DecodeError::Decompress)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_bytes() -> Vec<u8> {
        (0..=255u8).collect()
    }

    #[test]
    fn round_trips_both_encodings() {
        let inputs: [&[u8]; 4] = [b"", b"hello", &all_bytes(), &[0u8; 4096]];
        for encoding in [Encoding::Base64, Encoding::Base256] {
            for input in inputs {
                let text = encode(encoding, input).unwrap();
                assert_eq!(decode(encoding, &text).unwrap(), input, "{encoding}");
            }
        }
    }

    #[test]
    fn base256_maps_every_byte_to_distinct_char() {
        let text = Encoding::Base256.encode_text(&all_bytes());
        let chars: Vec<char> = text.chars().collect();
        assert_eq!(chars.len(), 256);
        assert_eq!(chars[0], 'a');
        assert_eq!(chars[255], '\u{160}');
        assert_eq!(Encoding::Base256.decode_text(&text).unwrap(), all_bytes());
    }

    #[test]
    fn base256_is_one_char_per_byte() {
        let raw = b"some text that compresses a little, a little, a little";
        let compressed = compress(raw, DEFAULT_COMPRESSION_LEVEL).unwrap();
        let text = encode(Encoding::Base256, raw).unwrap();
        assert_eq!(text.chars().count(), compressed.len());
    }

    #[test]
    fn base64_output_is_ascii() {
        let text = encode(Encoding::Base64, &all_bytes()).unwrap();
        assert!(text.is_ascii());
        assert_eq!(text.len() % 4, 0);
    }

    #[test]
    fn encoding_is_deterministic() {
        for encoding in [Encoding::Base64, Encoding::Base256] {
            let a = encode(encoding, b"same bytes").unwrap();
            let b = encode(encoding, b"same bytes").unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn base256_rejects_out_of_range_chars() {
        let err = decode(Encoding::Base256, "ab`").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidChar { ch: '`', offset: 2 }));

        let err = decode(Encoding::Base256, "\u{161}").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidChar { offset: 0, .. }));
    }

    #[test]
    fn base64_rejects_garbage() {
        let err = decode(Encoding::Base64, "not*base64").unwrap_err();
        assert!(matches!(err, DecodeError::Base64(_)));
    }

    #[test]
    fn truncated_stream_fails() {
        for encoding in [Encoding::Base64, Encoding::Base256] {
            let compressed = compress(b"hello world", 6).unwrap();
            let text = encoding.encode_text(&compressed[..compressed.len() - 4]);
            assert!(matches!(
                decode(encoding, &text),
                Err(DecodeError::Decompress(_))
            ));
        }
    }

    #[test]
    fn corrupted_payload_fails() {
        let raw = b"the quick brown fox jumps over the lazy dog";
        let mut compressed = compress(raw, 6).unwrap();
        // Past the 10-byte header, inside the deflate data.
        compressed[12] ^= 0x55;
        let text = Encoding::Base256.encode_text(&compressed);
        assert!(decode(Encoding::Base256, &text).is_err());
    }

    #[test]
    fn parses_encoding_names() {
        assert_eq!("base64".parse::<Encoding>().unwrap(), Encoding::Base64);
        assert_eq!("BASE256".parse::<Encoding>().unwrap(), Encoding::Base256);
        assert!("hex".parse::<Encoding>().is_err());
        assert_eq!(Encoding::default(), Encoding::Base256);
    }
}
