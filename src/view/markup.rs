//! Rendered region content
//!
//! Markup is produced with maud, which escapes every interpolated value.
//! A [`Fragment`] also keeps the visible text of what it renders, so
//! non-HTML surfaces can show a region without parsing markup.

use maud::{Markup, Render, html};

/// Content a panel region is replaced with
#[derive(Debug, Clone)]
pub struct Fragment {
    markup: Markup,
    text: Vec<String>,
}

impl Fragment {
    /// Markup together with its visible text, in document order.
    ///
    /// Blank entries are dropped and the rest trimmed.
    #[must_use]
    pub fn new(markup: Markup, text: impl IntoIterator<Item = String>) -> Self {
        Self {
            markup,
            text: text
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::new(html! {}, Vec::new())
    }

    /// Plain text, escaped
    #[must_use]
    pub fn text(text: &str) -> Self {
        Self::new(html! { (text) }, [text.to_string()])
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markup.0.is_empty()
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        self.markup.0.clone()
    }

    /// Visible text, one entry per non-blank text item
    #[must_use]
    pub fn text_content(&self) -> Vec<String> {
        self.text.clone()
    }
}

impl Default for Fragment {
    fn default() -> Self {
        Self::empty()
    }
}

impl Render for Fragment {
    fn render(&self) -> Markup {
        self.markup.clone()
    }
}
