//! Content stream interpreter.
//!
//! Walks tokenized operators, tracks the CTM and text state, decodes every
//! text-showing operator and reports it to a [`ContentHandler`]. Form
//! XObjects are followed through `Do`.

use std::collections::{HashMap, HashSet};

use crewseat_core::{ParseWarning, ParseWarningCode};

use crate::cmap::ToUnicodeMap;
use crate::error::BackendError;
use crate::font::FontDecoder;
use crate::handler::{ContentHandler, TextEvent};
use crate::lopdf_backend::{decode_stream, resolve};
use crate::text_state::{Matrix, TextState};
use crate::tokenizer::{Operand, Operator, tokenize};

/// Form XObjects nested deeper than this are skipped.
pub(crate) const MAX_FORM_DEPTH: usize = 10;

/// `TJ` adjustments at or below this (thousandths of text space) read as a word gap.
const TJ_SPACE_THRESHOLD: f64 = -200.0;

/// Graphics state relevant to text placement.
#[derive(Debug, Clone, Default)]
pub(crate) struct GraphicsState {
    pub ctm: Matrix,
    pub text: TextState,
    saved: Vec<(Matrix, TextState)>,
}

impl GraphicsState {
    /// `q`.
    fn save(&mut self) {
        self.saved.push((self.ctm, self.text.clone()));
    }

    /// `Q`. Text object matrices are not part of the saved state.
    fn restore(&mut self) {
        if let Some((ctm, text)) = self.saved.pop() {
            self.ctm = ctm;
            self.text.set_font(text.font_name, text.font_size);
            self.text.leading = text.leading;
        }
    }

    /// `cm`: prepend to the CTM.
    fn concat(&mut self, m: Matrix) {
        self.ctm = m.concat(&self.ctm);
    }
}

/// Fonts resolved for one resource scope.
struct FontCache<'r> {
    resources: &'r lopdf::Dictionary,
    decoders: HashMap<String, FontDecoder>,
    warned: HashSet<String>,
}

/// Interpret one content stream (page or form) at the given nesting depth.
pub(crate) fn interpret_content_stream(
    doc: &lopdf::Document,
    bytes: &[u8],
    resources: &lopdf::Dictionary,
    handler: &mut dyn ContentHandler,
    depth: usize,
    state: &mut GraphicsState,
) -> Result<(), BackendError> {
    let operators = tokenize(bytes)?;
    let mut fonts = FontCache {
        resources,
        decoders: HashMap::new(),
        warned: HashSet::new(),
    };

    for op in &operators {
        match op.name.as_str() {
            "q" => state.save(),
            "Q" => state.restore(),
            "cm" => {
                if let Some(m) = op.matrix() {
                    state.concat(Matrix::from_array(m));
                }
            }
            "BT" => state.text.begin_text(),
            "ET" => {}
            "Tf" => {
                let name = op.operands.first().and_then(Operand::as_name);
                if let (Some(name), Some(size)) = (name, op.number(1)) {
                    state.text.set_font(name, size);
                }
            }
            "Tm" => {
                if let Some(m) = op.matrix() {
                    state.text.set_text_matrix(Matrix::from_array(m));
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = (op.number(0), op.number(1)) {
                    state.text.move_text_position(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (op.number(0), op.number(1)) {
                    state.text.move_text_position_and_set_leading(tx, ty);
                }
            }
            "T*" => state.text.move_to_next_line(),
            "TL" => {
                if let Some(leading) = op.number(0) {
                    state.text.leading = leading;
                }
            }
            "Tj" => show(doc, op, op.operands.first(), &mut fonts, handler, state),
            "'" => {
                state.text.move_to_next_line();
                show(doc, op, op.operands.first(), &mut fonts, handler, state);
            }
            "\"" => {
                state.text.move_to_next_line();
                show(doc, op, op.operands.get(2), &mut fonts, handler, state);
            }
            "TJ" => show(doc, op, op.operands.first(), &mut fonts, handler, state),
            "Do" => {
                if let Some(name) = op.operands.first().and_then(Operand::as_name) {
                    invoke_xobject(doc, resources, name, handler, depth, state)?;
                }
            }
            // Paths, colours, marked content and the remaining text
            // parameters do not affect the extracted text.
            _ => {}
        }
    }

    Ok(())
}

/// Decode a text-showing operator's string (or `TJ` array) and report it.
fn show(
    doc: &lopdf::Document,
    op: &Operator,
    operand: Option<&Operand>,
    fonts: &mut FontCache<'_>,
    handler: &mut dyn ContentHandler,
    state: &GraphicsState,
) {
    let font_name = state.text.font_name.clone();
    let decoder = fonts.decoder(doc, &font_name, handler);

    let (text, lossy) = match operand {
        Some(Operand::String(bytes)) => {
            let decoded = decoder.decode(bytes);
            (decoded.text, decoded.lossy)
        }
        Some(Operand::Array(items)) => show_array(&decoder, items),
        _ => {
            handler.on_warning(ParseWarning::with_code(
                ParseWarningCode::UnsupportedOperator,
                format!("'{}' without a string operand", op.name),
            ));
            return;
        }
    };

    if lossy && !decoder.is_fallback() && fonts.warned.insert(font_name.clone()) {
        handler.on_warning(ParseWarning::with_code(
            ParseWarningCode::EncodingFallback,
            format!("font /{font_name} has codes without a Unicode mapping"),
        ));
    }

    handler.on_text(TextEvent {
        text,
        y: state.text.baseline_y(&state.ctm),
    });
}

/// Join the strings of a `TJ` array, turning wide negative kerning into spaces.
fn show_array(decoder: &FontDecoder, items: &[Operand]) -> (String, bool) {
    let mut text = String::new();
    let mut lossy = false;
    for item in items {
        match item {
            Operand::String(bytes) => {
                let decoded = decoder.decode(bytes);
                text.push_str(&decoded.text);
                lossy |= decoded.lossy;
            }
            other => {
                let gap = other.as_f64().is_some_and(|v| v <= TJ_SPACE_THRESHOLD);
                if gap && !text.is_empty() && !text.ends_with(' ') {
                    text.push(' ');
                }
            }
        }
    }
    (text, lossy)
}

impl FontCache<'_> {
    fn decoder(
        &mut self,
        doc: &lopdf::Document,
        name: &str,
        handler: &mut dyn ContentHandler,
    ) -> FontDecoder {
        if let Some(decoder) = self.decoders.get(name) {
            return decoder.clone();
        }

        let decoder = match font_dictionary(doc, self.resources, name) {
            Some(font) => {
                let decoder = FontDecoder::select(is_composite(font), to_unicode(doc, font));
                if decoder.is_fallback() && self.warned.insert(name.to_string()) {
                    handler.on_warning(ParseWarning::with_code(
                        ParseWarningCode::EncodingFallback,
                        format!("composite font /{name} has no ToUnicode map; reading UTF-16"),
                    ));
                }
                decoder
            }
            None => {
                if self.warned.insert(name.to_string()) {
                    handler.on_warning(ParseWarning::with_code(
                        ParseWarningCode::EncodingFallback,
                        format!("font /{name} not found in resources; reading WinAnsi"),
                    ));
                }
                FontDecoder::WinAnsi
            }
        };

        self.decoders.insert(name.to_string(), decoder.clone());
        decoder
    }
}

fn font_dictionary<'d>(
    doc: &'d lopdf::Document,
    resources: &'d lopdf::Dictionary,
    name: &str,
) -> Option<&'d lopdf::Dictionary> {
    let fonts = resolve(doc, resources.get(b"Font").ok()?).as_dict().ok()?;
    resolve(doc, fonts.get(name.as_bytes()).ok()?).as_dict().ok()
}

fn is_composite(font: &lopdf::Dictionary) -> bool {
    font.get(b"Subtype")
        .and_then(lopdf::Object::as_name)
        .is_ok_and(|subtype| subtype == b"Type0")
}

fn to_unicode(doc: &lopdf::Document, font: &lopdf::Dictionary) -> Option<ToUnicodeMap> {
    let stream = resolve(doc, font.get(b"ToUnicode").ok()?).as_stream().ok()?;
    let data = decode_stream(stream).ok()?;
    match ToUnicodeMap::parse(&data) {
        Ok(map) => Some(map),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable ToUnicode map");
            None
        }
    }
}

/// `Do`: run a Form XObject with its own resources and matrix.
fn invoke_xobject(
    doc: &lopdf::Document,
    resources: &lopdf::Dictionary,
    name: &str,
    handler: &mut dyn ContentHandler,
    depth: usize,
    state: &mut GraphicsState,
) -> Result<(), BackendError> {
    let stream = resources
        .get(b"XObject")
        .ok()
        .and_then(|x| resolve(doc, x).as_dict().ok())
        .and_then(|x| x.get(name.as_bytes()).ok())
        .and_then(|x| resolve(doc, x).as_stream().ok());
    let Some(stream) = stream else {
        handler.on_warning(ParseWarning::with_code(
            ParseWarningCode::UnsupportedOperator,
            format!("Do /{name}: XObject not found in resources"),
        ));
        return Ok(());
    };

    let is_form = stream
        .dict
        .get(b"Subtype")
        .and_then(lopdf::Object::as_name)
        .is_ok_and(|subtype| subtype == b"Form");
    if !is_form {
        // Images carry no text.
        return Ok(());
    }

    if depth >= MAX_FORM_DEPTH {
        handler.on_warning(ParseWarning::with_code(
            ParseWarningCode::UnsupportedOperator,
            format!("Do /{name}: form nesting deeper than {MAX_FORM_DEPTH}"),
        ));
        return Ok(());
    }

    let form_resources = stream
        .dict
        .get(b"Resources")
        .ok()
        .and_then(|r| resolve(doc, r).as_dict().ok())
        .unwrap_or(resources);
    let content = decode_stream(stream)?;

    state.save();
    let matrix = stream
        .dict
        .get(b"Matrix")
        .and_then(lopdf::Object::as_array)
        .ok()
        .and_then(|values| {
            let values: Vec<f64> = values.iter().filter_map(number).collect();
            <[f64; 6]>::try_from(values).ok()
        });
    if let Some(m) = matrix {
        state.concat(Matrix::from_array(m));
    }
    let result = interpret_content_stream(doc, &content, form_resources, handler, depth + 1, state);
    state.restore();
    result
}

fn number(obj: &lopdf::Object) -> Option<f64> {
    match obj {
        lopdf::Object::Integer(i) => Some(*i as f64),
        lopdf::Object::Real(f) => Some(f64::from(*f)),
        _ => None,
    }
}
