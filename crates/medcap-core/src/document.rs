//! Read-only HTML document handle shared by every pipeline stage.

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

use crate::error::SelectorError;

lazy_static! {
    static ref TITLE: Selector = Selector::parse("title").unwrap();
    static ref BODY: Selector = Selector::parse("body").unwrap();
}

/// A parsed page snapshot plus the URL it was captured from.
///
/// The tree is never mutated after parsing, so a `Document` can be handed
/// to any number of extraction passes.
pub struct Document {
    html: Html,
    url: Option<String>,
}

impl Document {
    /// Parse a full HTML document.
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
            url: None,
        }
    }

    /// Attach the page URL used for classification and provenance.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.url = if url.is_empty() { None } else { Some(url) };
        self
    }

    /// The underlying parsed tree.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Page URL, if known.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Text of the first `<title>`, trimmed with inner whitespace collapsed.
    pub fn title(&self) -> String {
        self.html
            .select(&TITLE)
            .next()
            .map(|el| collapse_whitespace(&element_text(el)))
            .unwrap_or_default()
    }

    /// Concatenated text content of `<body>`.
    pub fn body_text(&self) -> String {
        self.html
            .select(&BODY)
            .next()
            .map(element_text)
            .unwrap_or_default()
    }

    /// Provenance label: the title, or the URL when the title is empty.
    pub fn source(&self) -> String {
        let title = self.title();
        if !title.is_empty() {
            return title;
        }
        self.url.clone().unwrap_or_default()
    }

    /// First element matching `selector` in document order.
    pub fn select_first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.html.select(selector).next()
    }

    /// All elements matching `selector` in document order.
    pub fn select_all(&self, selector: &Selector) -> Vec<ElementRef<'_>> {
        self.html.select(selector).collect()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("title", &self.title())
            .field("url", &self.url)
            .finish()
    }
}

/// Concatenated text of every descendant text node.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Compile a configured CSS selector, naming the setting it came from.
pub fn compile_selector(field: &'static str, selector: &str) -> Result<Selector, SelectorError> {
    if selector.trim().is_empty() {
        return Err(SelectorError::Empty(field));
    }
    Selector::parse(selector).map_err(|e| SelectorError::Invalid {
        field,
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
