//! HTML parser for extracting references and structured data
//!
//! This module pulls out of a page every value the crawler follows:
//! - `<a href>` hyperlinks
//! - `<img src>` images
//! - `<script src>` scripts
//! - `<link rel="stylesheet" href>` stylesheets
//!
//! and the text of every `<script type="application/ld+json">` block.
//! Values are returned raw; resolving them is the caller's business.

use scraper::{Html, Selector};

/// Element category a reference was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Anchor,
    Image,
    Script,
    Stylesheet,
}

impl ReferenceKind {
    /// Extraction order, each with its CSS selector and attribute
    const ALL: [(ReferenceKind, &'static str, &'static str); 4] = [
        (ReferenceKind::Anchor, "a[href]", "href"),
        (ReferenceKind::Image, "img[src]", "src"),
        (ReferenceKind::Script, "script[src]", "src"),
        (ReferenceKind::Stylesheet, r#"link[rel~="stylesheet"][href]"#, "href"),
    ];
}

/// A raw attribute value found in a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: ReferenceKind,
    pub value: String,
}

/// Everything the crawler needs from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// References in extraction order: anchors, then images, scripts, stylesheets
    pub references: Vec<Reference>,

    /// Text of each JSON-LD block, in document order
    pub structured_data: Vec<String>,
}

/// Parses HTML content and extracts references and structured data blocks
///
/// Fragment-only references (`#top`) are dropped here: anchors inside the
/// page are not checked.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
///
/// # Returns
///
/// The references and structured data found in the page
///
/// # Example
///
/// ```
/// use website_checker::crawler::{parse_html, ReferenceKind};
///
/// let html = r#"<html><body><a href="/page">Link</a><img src="logo.png"></body></html>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.references.len(), 2);
/// assert_eq!(parsed.references[0].kind, ReferenceKind::Anchor);
/// assert_eq!(parsed.references[1].value, "logo.png");
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        references: extract_references(&document),
        structured_data: extract_structured_data(&document),
    }
}

fn extract_references(document: &Html) -> Vec<Reference> {
    let mut references = Vec::new();

    for (kind, selector, attribute) in ReferenceKind::ALL {
        let Ok(selector) = Selector::parse(selector) else {
            continue;
        };

        for element in document.select(&selector) {
            if let Some(value) = element.value().attr(attribute) {
                if value.trim_start().starts_with('#') {
                    continue;
                }
                references.push(Reference {
                    kind,
                    value: value.to_string(),
                });
            }
        }
    }

    references
}

fn extract_structured_data(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse(r#"script[type="application/ld+json"]"#) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(|element| element.text().collect::<String>())
        .collect()
}
