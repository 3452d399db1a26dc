//! Text encoding detection and conversion to UTF-8.
//!
//! Candidates are tried in a fixed priority order and the first one that
//! strictly accepts the input wins:
//!
//! 1. UTF-8
//! 2. ASCII
//! 3. ISO-8859-1 (rejects C1 control bytes `0x80..=0x9F`)
//! 4. Windows-1252 (rejects the five bytes the code page leaves undefined)
//!
//! Since ASCII is a subset of UTF-8, pure ASCII input is reported as UTF-8.
//! Input no candidate accepts is converted with a plain byte-to-char Latin-1
//! mapping.

use encoding_rs::WINDOWS_1252;
use std::fmt;

/// Bytes with no assigned character in Windows-1252.
const WINDOWS_1252_UNDEFINED: [u8; 5] = [0x81, 0x8D, 0x8F, 0x90, 0x9D];

/// A candidate source encoding, in detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceEncoding {
    Utf8,
    Ascii,
    Latin1,
    Windows1252,
}

impl SourceEncoding {
    pub const CANDIDATES: [SourceEncoding; 4] = [
        SourceEncoding::Utf8,
        SourceEncoding::Ascii,
        SourceEncoding::Latin1,
        SourceEncoding::Windows1252,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SourceEncoding::Utf8 => "UTF-8",
            SourceEncoding::Ascii => "ASCII",
            SourceEncoding::Latin1 => "ISO-8859-1",
            SourceEncoding::Windows1252 => "Windows-1252",
        }
    }

    /// Returns true if `bytes` is valid in this encoding.
    pub fn accepts(&self, bytes: &[u8]) -> bool {
        match self {
            SourceEncoding::Utf8 => std::str::from_utf8(bytes).is_ok(),
            SourceEncoding::Ascii => bytes.is_ascii(),
            SourceEncoding::Latin1 => !bytes.iter().any(|b| (0x80..=0x9F).contains(b)),
            SourceEncoding::Windows1252 => {
                !bytes.iter().any(|b| WINDOWS_1252_UNDEFINED.contains(b))
            }
        }
    }

    /// Converts `bytes` to UTF-8. The caller must have checked [`accepts`](Self::accepts).
    fn decode(&self, bytes: &[u8]) -> String {
        match self {
            SourceEncoding::Utf8 | SourceEncoding::Ascii => {
                String::from_utf8_lossy(bytes).into_owned()
            }
            SourceEncoding::Latin1 => latin1_to_utf8(bytes),
            SourceEncoding::Windows1252 => {
                let (text, _, _) = WINDOWS_1252.decode(bytes);
                text.into_owned()
            }
        }
    }
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Text converted to UTF-8 together with the encoding it was read as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    /// `None` when no candidate matched and the Latin-1 fallback was used.
    pub encoding: Option<SourceEncoding>,
}

/// Returns the first candidate encoding that accepts `bytes`.
pub fn detect(bytes: &[u8]) -> Option<SourceEncoding> {
    SourceEncoding::CANDIDATES
        .into_iter()
        .find(|encoding| encoding.accepts(bytes))
}

/// Converts raw file content to UTF-8.
///
/// # Examples
///
/// ```
/// use dirdump::encoding::{decode_to_utf8, SourceEncoding};
///
/// let decoded = decode_to_utf8(b"caf\xe9");
/// assert_eq!(decoded.text, "café");
/// assert_eq!(decoded.encoding, Some(SourceEncoding::Latin1));
/// ```
pub fn decode_to_utf8(bytes: &[u8]) -> Decoded {
    match detect(bytes) {
        Some(encoding) => Decoded {
            text: encoding.decode(bytes),
            encoding: Some(encoding),
        },
        None => Decoded {
            text: latin1_to_utf8(bytes),
            encoding: None,
        },
    }
}

fn latin1_to_utf8(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
