//! ToUnicode CMap parsing.
//!
//! Reads the `beginbfchar`/`beginbfrange` sections of an embedded
//! `/ToUnicode` stream. Destination values are UTF-16BE hex strings.

use std::collections::HashMap;

use crate::error::BackendError;

/// Character-code to Unicode mapping from a font's `/ToUnicode` stream.
#[derive(Debug, Clone, Default)]
pub struct ToUnicodeMap {
    mappings: HashMap<u32, String>,
    /// Bytes per character code, from `begincodespacerange` (1 if absent).
    code_bytes: usize,
}

impl ToUnicodeMap {
    /// Parse CMap stream data.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Font`] for malformed hex codes or invalid
    /// UTF-16 destinations.
    pub fn parse(data: &[u8]) -> Result<Self, BackendError> {
        let text = String::from_utf8_lossy(data);

        // Width comes from the first code space range, else from the sources.
        let code_bytes = sections(&text, "begincodespacerange", "endcodespacerange")
            .first()
            .and_then(|section| hex_tokens(section).first().map(|low| low.len().div_ceil(2)))
            .unwrap_or_else(|| widest_source(&text))
            .max(1);

        let mut mappings = HashMap::new();
        for section in sections(&text, "beginbfchar", "endbfchar") {
            parse_bfchar(section, &mut mappings)?;
        }
        for section in sections(&text, "beginbfrange", "endbfrange") {
            parse_bfrange(section, &mut mappings)?;
        }

        Ok(Self {
            mappings,
            code_bytes,
        })
    }

    /// The Unicode text for a character code.
    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(String::as_str)
    }

    /// Bytes consumed per character code.
    pub fn code_bytes(&self) -> usize {
        self.code_bytes
    }

    /// Decode a shown string. Unmapped codes become U+FFFD.
    ///
    /// Returns the text and the number of unmapped codes.
    pub fn decode(&self, bytes: &[u8]) -> (String, usize) {
        let mut text = String::new();
        let mut unmapped = 0;
        for chunk in bytes.chunks(self.code_bytes) {
            let code = chunk.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
            match self.lookup(code) {
                Some(s) => text.push_str(s),
                None => {
                    text.push('\u{FFFD}');
                    unmapped += 1;
                }
            }
        }
        (text, unmapped)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Bodies of every `begin ... end` section, in order.
fn sections<'t>(text: &'t str, begin: &'static str, end: &'static str) -> Vec<&'t str> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(begin) {
        let body = &rest[start + begin.len()..];
        let Some(stop) = body.find(end) else {
            break;
        };
        found.push(&body[..stop]);
        rest = &body[stop + end.len()..];
    }
    found
}

/// Every `<hex>` token in a piece of CMap text.
fn hex_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open + 1..].find('>') else {
            break;
        };
        tokens.push(rest[open + 1..open + 1 + close].trim());
        rest = &rest[open + 1 + close + 1..];
    }
    tokens
}

/// Without a code space range, guess the code width from the mapped sources.
fn widest_source(text: &str) -> usize {
    sections(text, "beginbfchar", "endbfchar")
        .into_iter()
        .chain(sections(text, "beginbfrange", "endbfrange"))
        .flat_map(|section| section.lines())
        .filter_map(|line| hex_tokens(line).first().map(|t| t.len().div_ceil(2)))
        .max()
        .unwrap_or(1)
        .max(1)
}

fn parse_code(hex: &str) -> Result<u32, BackendError> {
    u32::from_str_radix(hex, 16)
        .map_err(|e| BackendError::Font(format!("invalid CMap code '{hex}': {e}")))
}

/// Decode a UTF-16BE hex destination such as `0041` or `D835DC00`.
fn decode_utf16be(hex: &str) -> Result<String, BackendError> {
    // Two-digit destinations are single bytes.
    let padded;
    let hex = if hex.len() == 2 {
        padded = format!("00{hex}");
        padded.as_str()
    } else {
        hex
    };
    if hex.len() % 4 != 0 {
        return Err(BackendError::Font(format!(
            "UTF-16BE destination '{hex}' is not a whole number of code units"
        )));
    }
    let units = hex
        .as_bytes()
        .chunks(4)
        .map(|chunk| {
            let digits = std::str::from_utf8(chunk).unwrap_or_default();
            u16::from_str_radix(digits, 16)
                .map_err(|e| BackendError::Font(format!("invalid UTF-16BE unit '{digits}': {e}")))
        })
        .collect::<Result<Vec<u16>, _>>()?;
    String::from_utf16(&units)
        .map_err(|e| BackendError::Font(format!("invalid UTF-16BE sequence: {e}")))
}

/// `<src> <dst>` per line.
fn parse_bfchar(section: &str, mappings: &mut HashMap<u32, String>) -> Result<(), BackendError> {
    for line in section.lines() {
        let tokens = hex_tokens(line);
        if let [src, dst, ..] = tokens.as_slice() {
            mappings.insert(parse_code(src)?, decode_utf16be(dst)?);
        }
    }
    Ok(())
}

/// `<lo> <hi> <dst>` or `<lo> <hi> [<dst0> <dst1> ...]` per line.
fn parse_bfrange(section: &str, mappings: &mut HashMap<u32, String>) -> Result<(), BackendError> {
    for line in section.lines() {
        let tokens = hex_tokens(line);
        let [lo, hi, rest @ ..] = tokens.as_slice() else {
            continue;
        };
        let lo = parse_code(lo)?;
        let hi = parse_code(hi)?;
        if hi < lo {
            continue;
        }

        if line.contains('[') {
            for (code, dst) in (lo..=hi).zip(rest) {
                mappings.insert(code, decode_utf16be(dst)?);
            }
        } else if let Some(dst) = rest.first() {
            // The last character is incremented across the range.
            let start = decode_utf16be(dst)?;
            let mut chars: Vec<char> = start.chars().collect();
            let Some(last) = chars.pop() else {
                continue;
            };
            let prefix: String = chars.into_iter().collect();
            for (offset, code) in (lo..=hi).enumerate() {
                if let Some(ch) = char::from_u32(u32::from(last) + offset as u32) {
                    mappings.insert(code, format!("{prefix}{ch}"));
                }
            }
        }
    }
    Ok(())
}
