//! WebAssembly/JavaScript bindings for crewseat.
//!
//! Either hand the roster PDF bytes to [`WasmRoster`], or run a JavaScript
//! PDF library yourself and pass its text items to `composeFromItems`.
//! Complex types are serialized to JsValue using serde_wasm_bindgen.
//! Messages are dated from the browser's local clock.

use chrono::NaiveDateTime;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

use crewseat::{ExtractionMode, Roster, RosterError, RosterOptions, TextFragment, date_label};

fn js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

fn mode(flat: Option<bool>) -> ExtractionMode {
    if flat.unwrap_or(false) {
        ExtractionMode::Flat
    } else {
        ExtractionMode::Positioned
    }
}

/// A roster PDF opened for parsing (WASM binding).
///
/// # JavaScript Usage
///
/// ```js
/// const roster = WasmRoster.open(pdfBytes);
/// console.log(`Pages: ${roster.pageCount}`);
/// textarea.value = roster.message();
/// ```
#[wasm_bindgen]
pub struct WasmRoster {
    inner: Roster,
}

#[wasm_bindgen]
impl WasmRoster {
    /// Open a roster from raw bytes (Uint8Array in JavaScript).
    pub fn open(data: &[u8]) -> Result<WasmRoster, JsError> {
        let inner = Roster::open(data, None).map_err(js_error)?;
        Ok(WasmRoster { inner })
    }

    #[wasm_bindgen(getter, js_name = "pageCount")]
    pub fn page_count(&self) -> usize {
        self.inner.page_count()
    }

    /// The reservation message, dated from the local clock.
    ///
    /// Pass `flat = true` to ignore text positions.
    pub fn message(&self, flat: Option<bool>) -> Result<String, JsError> {
        self.inner
            .message(mode(flat), local_now())
            .map(|report| report.value)
            .map_err(js_error)
    }

    /// Flight blocks as an array of `{flight_identifier, separator, entries}`.
    pub fn blocks(&self, flat: Option<bool>) -> Result<JsValue, JsError> {
        let report = self.inner.parse(mode(flat)).map_err(js_error)?;
        serde_wasm_bindgen::to_value(&report.value.blocks).map_err(js_error)
    }

    /// Reconstructed lines as an array of `{text, index}`.
    pub fn lines(&self, flat: Option<bool>) -> Result<JsValue, JsError> {
        let report = self.inner.parse(mode(flat)).map_err(js_error)?;
        serde_wasm_bindgen::to_value(&report.value.lines).map_err(js_error)
    }

    /// Warnings for skipped input, as an array of objects.
    pub fn warnings(&self, flat: Option<bool>) -> Result<JsValue, JsError> {
        let report = self.inner.parse(mode(flat)).map_err(js_error)?;
        serde_wasm_bindgen::to_value(&report.warnings).map_err(js_error)
    }
}

/// A text item as produced by JavaScript PDF libraries.
///
/// Accepts pdf.js items (`str`, `transform`) as well as plain
/// `{text, y, page}` objects.
#[derive(Debug, Deserialize)]
struct TextItem {
    #[serde(alias = "str")]
    text: String,
    #[serde(default)]
    y: Option<f64>,
    /// pdf.js text matrix; element 5 is the baseline y.
    #[serde(default)]
    transform: Option<Vec<f64>>,
    #[serde(default)]
    page: usize,
}

impl TextItem {
    fn into_fragment(self) -> TextFragment {
        let y = self
            .y
            .or_else(|| self.transform.as_ref().and_then(|t| t.get(5).copied()));
        match y {
            Some(y) => TextFragment::positioned(self.text, self.page, y),
            None => TextFragment {
                page: self.page,
                ..TextFragment::flat(self.text)
            },
        }
    }
}

fn compose_fragments(
    fragments: &[TextFragment],
    now: NaiveDateTime,
) -> Result<String, RosterError> {
    let report = crewseat::parse(fragments, &RosterOptions::default())?;
    Ok(report.value.message(&date_label(now)))
}

/// Compose the message from text items extracted in JavaScript.
///
/// `items` is an array of `{str|text, y?, transform?, page?}`. Items without
/// a position fall back to marker-based line splitting.
#[wasm_bindgen(js_name = "composeFromItems")]
pub fn compose_from_items(items: JsValue) -> Result<String, JsError> {
    let items: Vec<TextItem> = serde_wasm_bindgen::from_value(items).map_err(js_error)?;
    let fragments: Vec<TextFragment> = items.into_iter().map(TextItem::into_fragment).collect();
    compose_fragments(&fragments, local_now()).map_err(js_error)
}

/// Compose the message from a flat text dump of the roster.
#[wasm_bindgen(js_name = "composeFromText")]
pub fn compose_from_text(text: &str) -> Result<String, JsError> {
    compose_fragments(&[TextFragment::flat(text)], local_now()).map_err(js_error)
}
