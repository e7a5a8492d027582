/// A piece of text as produced by a PDF text-extraction backend.
///
/// `y` is the vertical page coordinate in PDF user space (origin at the
/// bottom-left, so larger values are higher on the page). Backends that
/// only expose a flat string produce fragments with `y == None`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextFragment {
    /// The extracted text.
    pub text: String,
    /// 0-based page index.
    #[cfg_attr(feature = "serde", serde(default))]
    pub page: usize,
    /// Vertical position of the text baseline, if known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub y: Option<f64>,
}

impl TextFragment {
    /// A fragment with a known vertical position.
    pub fn positioned(text: impl Into<String>, page: usize, y: f64) -> Self {
        Self {
            text: text.into(),
            page,
            y: Some(y),
        }
    }

    /// A fragment without position data.
    pub fn flat(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            page: 0,
            y: None,
        }
    }

    /// Returns true if the fragment carries a usable vertical position.
    pub fn is_positioned(&self) -> bool {
        self.y.is_some_and(f64::is_finite)
    }

    /// Drop the position, keeping text and page.
    pub fn without_position(mut self) -> Self {
        self.y = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positioned_fragment() {
        let f = TextFragment::positioned("CZL - ALG 6190", 1, 700.0);
        assert_eq!(f.page, 1);
        assert_eq!(f.y, Some(700.0));
        assert!(f.is_positioned());
    }

    #[test]
    fn flat_fragment_has_no_position() {
        let f = TextFragment::flat("CP BOUTALEB #1");
        assert_eq!(f.page, 0);
        assert!(!f.is_positioned());
    }

    #[test]
    fn nan_position_is_unusable() {
        let f = TextFragment::positioned("x", 0, f64::NAN);
        assert!(!f.is_positioned());
    }

    #[test]
    fn without_position_keeps_text() {
        let f = TextFragment::positioned("x", 2, 10.0).without_position();
        assert_eq!(f, TextFragment {
            text: "x".to_string(),
            page: 2,
            y: None
        });
    }
}
