// src/parse/html.rs
// =============================================================================
// Extracts SEO fields from an HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever, so broken markup still parses
//
// Only the FIRST match of each selector is used. A page without an <h1> gets
// an empty h1, that is not an error.
//
// title and h1 text is trimmed. The meta description is the content
// attribute exactly as written, surrounding whitespace included.
// =============================================================================

use super::PageRecord;
use scraper::{ElementRef, Html, Selector};

// Builds a selector from a constant CSS string.
// The strings below are fixed and known to be valid, so a failure here is a
// programmer error, not something a web page can trigger.
fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("constant CSS selector must be valid")
}

/// Reads title, first h1 and meta description from `html`.
///
/// `url` and `status_code` describe the response the HTML came from and are
/// copied into the record as-is.
pub fn extract_page_record(html: &str, url: &str, status_code: u16) -> PageRecord {
    let document = Html::parse_document(html);

    let title = first_text(&document, &selector("title"));
    let h1 = first_text(&document, &selector("h1"));

    let meta_description = document
        .select(&selector(r#"meta[name="description"]"#))
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(str::to_string)
        .unwrap_or_default();

    PageRecord {
        url: url.to_string(),
        title,
        h1,
        meta_description,
        status_code,
    }
}

// Text of the first element matching `selector`, whitespace trimmed
fn first_text(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_all_fields() {
        let html = r#"
            <html>
              <head>
                <title>Rust Programming</title>
                <meta name="description" content="A language empowering everyone">
              </head>
              <body><h1>Why Rust?</h1></body>
            </html>
        "#;
        let record = extract_page_record(html, "https://www.rust-lang.org/", 200);
        assert_eq!(record.title, "Rust Programming");
        assert_eq!(record.h1, "Why Rust?");
        assert_eq!(record.meta_description, "A language empowering everyone");
        assert_eq!(record.status_code, 200);
    }

    #[test]
    fn test_missing_meta_description_is_empty() {
        let html = "<html><head><title>No meta</title></head><body></body></html>";
        let record = extract_page_record(html, "https://example.com", 200);
        assert_eq!(record.meta_description, "");
        assert_eq!(record.h1, "");
    }

    #[test]
    fn test_only_first_h1_used() {
        let html = "<body><h1>First</h1><h1>Second</h1></body>";
        let record = extract_page_record(html, "https://example.com", 200);
        assert_eq!(record.h1, "First");
    }

    #[test]
    fn test_nested_h1_text_is_joined() {
        let html = "<body><h1>Hello <em>there</em></h1></body>";
        let record = extract_page_record(html, "https://example.com", 200);
        assert_eq!(record.h1, "Hello there");
    }

    #[test]
    fn test_other_meta_tags_ignored() {
        let html = r#"<head>
            <meta name="keywords" content="a, b">
            <meta name="description" content="the real one">
            <meta name="description" content="a second one">
        </head>"#;
        let record = extract_page_record(html, "https://example.com", 200);
        assert_eq!(record.meta_description, "the real one");
    }

    #[test]
    fn test_meta_description_copied_verbatim() {
        let html = "<head><meta name=\"description\" content=\"  padded text \n\"></head>";
        let record = extract_page_record(html, "https://example.com", 200);
        assert_eq!(record.meta_description, "  padded text \n");
    }

    #[test]
    fn test_error_page_keeps_status() {
        let html = "<title>Not Found</title>";
        let record = extract_page_record(html, "https://example.com/gone", 404);
        assert_eq!(record.title, "Not Found");
        assert_eq!(record.status_code, 404);
    }
}
