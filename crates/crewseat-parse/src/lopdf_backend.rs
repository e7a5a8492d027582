//! lopdf-based text backend.
//!
//! Implements [`TextBackend`] using the [lopdf](https://crates.io/crates/lopdf)
//! crate. This is the default backend for crewseat.

use std::sync::LazyLock;

use crewseat_core::{ParseResult, RosterError, TextFragment};

use crate::backend::TextBackend;
use crate::error::BackendError;
use crate::handler::FragmentCollector;
use crate::interpreter::{GraphicsState, interpret_content_stream};

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    inner: lopdf::Document,
    /// Page object ids in page order.
    page_ids: Vec<lopdf::ObjectId>,
}

impl LopdfDocument {
    /// Access the underlying lopdf document.
    pub fn inner(&self) -> &lopdf::Document {
        &self.inner
    }
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

/// The lopdf-based text backend.
///
/// ```ignore
/// use crewseat_parse::{LopdfBackend, TextBackend};
///
/// let doc = LopdfBackend::open(pdf_bytes)?;
/// let fragments = LopdfBackend::document_fragments(&doc)?;
/// ```
pub struct LopdfBackend;

impl TextBackend for LopdfBackend {
    type Document = LopdfDocument;
    type Error = BackendError;

    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error> {
        let inner = lopdf::Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;

        if inner.is_encrypted() {
            return Err(BackendError::Core(RosterError::PasswordRequired));
        }

        // get_pages is keyed by 1-based page number
        let page_ids = inner.get_pages().values().copied().collect();
        Ok(LopdfDocument { inner, page_ids })
    }

    fn page_count(doc: &Self::Document) -> usize {
        doc.page_ids.len()
    }

    fn page_fragments(
        doc: &Self::Document,
        index: usize,
    ) -> Result<ParseResult<Vec<TextFragment>>, Self::Error> {
        let page_id = *doc.page_ids.get(index).ok_or_else(|| {
            BackendError::Parse(format!(
                "page index {index} out of range (0..{})",
                doc.page_ids.len()
            ))
        })?;

        let inner = &doc.inner;
        let page_dict = inner
            .get_object(page_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;
        let content = page_content_bytes(inner, page_dict)?;
        let resources = page_resources(inner, page_id)?;

        let mut collector = FragmentCollector::new(index);
        let mut state = GraphicsState::default();
        interpret_content_stream(inner, &content, resources, &mut collector, 0, &mut state)?;

        let (fragments, warnings) = collector.finish();
        tracing::debug!(
            page = index,
            fragments = fragments.len(),
            warnings = warnings.len(),
            "extracted page text"
        );
        Ok(ParseResult::with_warnings(fragments, warnings))
    }
}

/// Follow an indirect reference, or return the object itself.
///
/// Dangling references resolve to the reference object, which then fails
/// whatever type check the caller applies.
pub(crate) fn resolve<'a>(doc: &'a lopdf::Document, obj: &'a lopdf::Object) -> &'a lopdf::Object {
    match obj {
        lopdf::Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        other => other,
    }
}

/// Stream data with filters applied.
pub(crate) fn decode_stream(stream: &lopdf::Stream) -> Result<Vec<u8>, BackendError> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| BackendError::Parse(format!("failed to decompress stream: {e}")))
    } else {
        Ok(stream.content.clone())
    }
}

/// Look a key up on a page, walking `/Parent` links for inherited attributes.
fn resolve_inherited<'a>(
    doc: &'a lopdf::Document,
    page_id: lopdf::ObjectId,
    key: &[u8],
) -> Result<Option<&'a lopdf::Object>, BackendError> {
    let mut current_id = page_id;
    loop {
        let dict = doc
            .get_object(current_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page tree node: {e}")))?;

        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }

        match dict.get(b"Parent") {
            Ok(parent) => {
                current_id = parent
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
}

/// Concatenated `/Contents` of a page. A page without contents is empty.
fn page_content_bytes(
    doc: &lopdf::Document,
    page_dict: &lopdf::Dictionary,
) -> Result<Vec<u8>, BackendError> {
    let Ok(contents) = page_dict.get(b"Contents") else {
        return Ok(Vec::new());
    };

    match resolve(doc, contents) {
        lopdf::Object::Stream(stream) => decode_stream(stream),
        lopdf::Object::Array(items) => {
            let mut content = Vec::new();
            for item in items {
                let stream = resolve(doc, item).as_stream().map_err(|e| {
                    BackendError::Parse(format!("/Contents array item is not a stream: {e}"))
                })?;
                content.extend(decode_stream(stream)?);
                // Streams may split between tokens.
                content.push(b'\n');
            }
            Ok(content)
        }
        _ => Err(BackendError::Parse(
            "/Contents is neither a stream nor an array".to_string(),
        )),
    }
}

fn page_resources(
    doc: &lopdf::Document,
    page_id: lopdf::ObjectId,
) -> Result<&lopdf::Dictionary, BackendError> {
    static EMPTY: LazyLock<lopdf::Dictionary> = LazyLock::new(lopdf::Dictionary::new);

    match resolve_inherited(doc, page_id, b"Resources")? {
        Some(obj) => resolve(doc, obj)
            .as_dict()
            .map_err(|_| BackendError::Parse("/Resources is not a dictionary".to_string())),
        None => Ok(&EMPTY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewseat_core::ParseWarningCode;
    use lopdf::{Document, Object, ObjectId, Stream, dictionary};

    /// A PDF whose pages show the given content streams with a Helvetica /F1.
    fn pdf_with_pages(contents: &[&[u8]]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id: ObjectId = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let mut kids: Vec<Object> = Vec::new();
        for content in contents {
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => contents.len() as i64,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("failed to save test PDF");
        buf
    }

    /// One page whose resources hold a composite font and a form XObject.
    fn pdf_with_resources(content: &[u8], build: impl FnOnce(&mut Document) -> lopdf::Dictionary) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id: ObjectId = doc.new_object_id();
        let resources = build(&mut doc);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::from(page_id)],
                "Count" => 1i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("failed to save test PDF");
        buf
    }

    fn texts(result: &ParseResult<Vec<TextFragment>>) -> Vec<(&str, Option<f64>)> {
        result.value.iter().map(|f| (f.text.as_str(), f.y)).collect()
    }

    #[test]
    fn open_counts_pages() {
        let bytes = pdf_with_pages(&[b"", b"", b""]);
        let doc = LopdfBackend::open(&bytes).unwrap();
        assert_eq!(LopdfBackend::page_count(&doc), 3);
        assert!(format!("{doc:?}").contains("page_count: 3"));
    }

    #[test]
    fn open_rejects_garbage() {
        let err = LopdfBackend::open(b"not a pdf").unwrap_err();
        assert!(matches!(err, BackendError::Parse(_)));
        assert!(matches!(RosterError::from(err), RosterError::ParseError(_)));
    }

    #[test]
    fn page_text_with_inherited_resources() {
        let bytes = pdf_with_pages(&[
            b"BT /F1 10 Tf 72 700 Td (CZL - ALG 6190) Tj 0 -14 Td (CP BOUTALEB #1) Tj ET",
        ]);
        let doc = LopdfBackend::open(&bytes).unwrap();
        let result = LopdfBackend::page_fragments(&doc, 0).unwrap();
        assert!(result.is_clean());
        assert_eq!(
            texts(&result),
            vec![("CZL - ALG 6190", Some(700.0)), ("CP BOUTALEB #1", Some(686.0))]
        );
        assert!(result.value.iter().all(|f| f.page == 0));
    }

    #[test]
    fn page_out_of_range() {
        let bytes = pdf_with_pages(&[b""]);
        let doc = LopdfBackend::open(&bytes).unwrap();
        assert!(LopdfBackend::page_fragments(&doc, 1).is_err());
    }

    #[test]
    fn document_fragments_in_page_order() {
        let bytes = pdf_with_pages(&[
            b"BT /F1 10 Tf 72 700 Td (page one) Tj ET",
            b"BT /F1 10 Tf 72 700 Td (page two) Tj ET",
        ]);
        let doc = LopdfBackend::open(&bytes).unwrap();
        let result = LopdfBackend::document_fragments(&doc).unwrap();
        let pages: Vec<(&str, usize)> = result
            .value
            .iter()
            .map(|f| (f.text.as_str(), f.page))
            .collect();
        assert_eq!(pages, vec![("page one", 0), ("page two", 1)]);
    }

    #[test]
    fn tj_kerning_and_blank_strings() {
        let bytes = pdf_with_pages(&[b"BT /F1 10 Tf 72 700 Td [(CP) -300 (KADI)] TJ ( ) Tj ET"]);
        let doc = LopdfBackend::open(&bytes).unwrap();
        let result = LopdfBackend::page_fragments(&doc, 0).unwrap();
        assert_eq!(texts(&result), vec![("CP KADI", Some(700.0))]);
    }

    #[test]
    fn form_xobject_text_uses_form_matrix() {
        let bytes = pdf_with_resources(b"q 1 0 0 1 0 100 cm /Fm1 Do Q", |doc| {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => "Helvetica",
            });
            let form_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Form",
                    "BBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                    "Matrix" => vec![1.into(), 0.into(), 0.into(), 1.into(), 0.into(), 20.into()],
                    "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
                },
                b"BT /F1 10 Tf 72 500 Td (AH 2024) Tj ET".to_vec(),
            ));
            dictionary! { "XObject" => dictionary! { "Fm1" => form_id } }
        });
        let doc = LopdfBackend::open(&bytes).unwrap();
        let result = LopdfBackend::page_fragments(&doc, 0).unwrap();
        assert!(result.is_clean());
        assert_eq!(texts(&result), vec![("AH 2024", Some(620.0))]);
    }

    #[test]
    fn self_referencing_form_stops_with_warning() {
        let bytes = pdf_with_resources(b"/Fm1 Do", |doc| {
            let form_id = doc.new_object_id();
            let resources_id = doc.add_object(dictionary! {
                "XObject" => dictionary! { "Fm1" => form_id },
            });
            doc.objects.insert(
                form_id,
                Object::Stream(Stream::new(
                    dictionary! {
                        "Type" => "XObject",
                        "Subtype" => "Form",
                        "Resources" => resources_id,
                    },
                    b"/Fm1 Do".to_vec(),
                )),
            );
            dictionary! { "XObject" => dictionary! { "Fm1" => form_id } }
        });
        let doc = LopdfBackend::open(&bytes).unwrap();
        let result = LopdfBackend::page_fragments(&doc, 0).unwrap();
        assert!(result.value.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, ParseWarningCode::UnsupportedOperator);
        assert_eq!(result.warnings[0].page, Some(0));
    }

    #[test]
    fn to_unicode_map_decodes_composite_font() {
        let cmap = b"begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n\
                     2 beginbfchar\n<0001> <0043>\n<0002> <0050>\nendbfchar";
        let bytes = pdf_with_resources(b"BT /F2 10 Tf 72 700 Td <00010002> Tj ET", |doc| {
            let cmap_id = doc.add_object(Stream::new(dictionary! {}, cmap.to_vec()));
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type0",
                "BaseFont" => "Embedded",
                "ToUnicode" => cmap_id,
            });
            dictionary! { "Font" => dictionary! { "F2" => font_id } }
        });
        let doc = LopdfBackend::open(&bytes).unwrap();
        let result = LopdfBackend::page_fragments(&doc, 0).unwrap();
        assert!(result.is_clean());
        assert_eq!(texts(&result), vec![("CP", Some(700.0))]);
    }

    #[test]
    fn composite_font_without_map_warns() {
        let bytes = pdf_with_resources(b"BT /F2 10 Tf 72 700 Td <00430050> Tj ET", |doc| {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type0",
                "BaseFont" => "Embedded",
            });
            dictionary! { "Font" => dictionary! { "F2" => font_id } }
        });
        let doc = LopdfBackend::open(&bytes).unwrap();
        let result = LopdfBackend::page_fragments(&doc, 0).unwrap();
        assert_eq!(texts(&result), vec![("CP", Some(700.0))]);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, ParseWarningCode::EncodingFallback);
    }

    #[test]
    fn contents_array_is_concatenated() {
        let mut doc = Document::with_version("1.5");
        let pages_id: ObjectId = doc.new_object_id();
        let first = doc.add_object(Stream::new(dictionary! {}, b"BT 72 700 Td".to_vec()));
        let second = doc.add_object(Stream::new(dictionary! {}, b"(split) Tj ET".to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => vec![Object::from(first), Object::from(second)],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::from(page_id)],
                "Count" => 1i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();

        let doc = LopdfBackend::open(&bytes).unwrap();
        let result = LopdfBackend::page_fragments(&doc, 0).unwrap();
        assert_eq!(result.value[0].text, "split");
        // No font set and none in resources.
        assert_eq!(result.warnings[0].code, ParseWarningCode::EncodingFallback);
    }
}
