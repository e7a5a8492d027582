//! Turning shown string bytes into Unicode text.

use crate::cmap::ToUnicodeMap;

/// How a font's string bytes are decoded.
#[derive(Debug, Clone, Default)]
pub enum FontDecoder {
    /// Through the font's `/ToUnicode` CMap.
    ToUnicode(ToUnicodeMap),
    /// Two-byte codes of a composite font without a CMap, read as UTF-16BE.
    TwoByte,
    /// Single-byte codes as WinAnsi (Windows-1252).
    #[default]
    WinAnsi,
}

/// Decoded text plus whether decoding had to guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    /// True if codes were missing from the CMap or the encoding is a guess.
    pub lossy: bool,
}

impl FontDecoder {
    /// Pick a decoder from the font's subtype and optional ToUnicode map.
    pub fn select(is_composite: bool, to_unicode: Option<ToUnicodeMap>) -> Self {
        match to_unicode {
            Some(map) if !map.is_empty() => FontDecoder::ToUnicode(map),
            _ if is_composite => FontDecoder::TwoByte,
            _ => FontDecoder::WinAnsi,
        }
    }

    /// True when decoding is a guess: a composite font with no ToUnicode map.
    pub fn is_fallback(&self) -> bool {
        matches!(self, FontDecoder::TwoByte)
    }

    pub fn decode(&self, bytes: &[u8]) -> Decoded {
        match self {
            FontDecoder::ToUnicode(map) => {
                let (text, unmapped) = map.decode(bytes);
                Decoded {
                    text,
                    lossy: unmapped > 0,
                }
            }
            FontDecoder::TwoByte => {
                let (text, _, _) = encoding_rs::UTF_16BE.decode(bytes);
                Decoded {
                    text: text.into_owned(),
                    lossy: true,
                }
            }
            FontDecoder::WinAnsi => {
                let (text, had_errors) =
                    encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
                Decoded {
                    text: text.into_owned(),
                    lossy: had_errors,
                }
            }
        }
    }
}
