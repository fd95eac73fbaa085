// src/fetch/charset.rs
// =============================================================================
// Works out which character encoding a fetched body uses and decodes it.
//
// Where the encoding comes from, first match wins:
// 1. a byte order mark at the start of the body
// 2. the charset parameter of the Content-Type header
// 3. a <meta charset=...> / http-equiv tag or an <?xml encoding=...?> prolog
//    near the top of the document
// 4. UTF-8 if the bytes are valid UTF-8, windows-1252 otherwise (what
//    browsers assume for unlabelled legacy pages)
//
// encoding_rs does the actual decoding. It is the same crate reqwest uses
// inside Response::text(). Decoding never fails: bytes that do not fit the
// encoding become U+FFFD.
// =============================================================================

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use std::borrow::Cow;

// Browsers only look this far into a page for a charset declaration
const SNIFF_LIMIT: usize = 1024;

/// Pulls the charset parameter out of a Content-Type header value.
///
/// `text/html; charset="ISO-8859-1"` -> `Some("ISO-8859-1")`
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// Decodes `body`, using `declared` (the header charset) when it names a
/// known encoding.
pub fn decode<'a>(body: &'a [u8], declared: Option<&str>) -> Cow<'a, str> {
    let encoding = declared
        .and_then(|label| Encoding::for_label(label.trim().as_bytes()))
        .or_else(|| sniff(body))
        .unwrap_or_else(|| fallback(body));

    // decode() honours a BOM over `encoding`
    let (text, _, _) = encoding.decode(body);
    text
}

// Looks for a charset declaration in the first bytes of the document
fn sniff(body: &[u8]) -> Option<&'static Encoding> {
    let head = &body[..body.len().min(SNIFF_LIMIT)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    ["charset=", "encoding="].iter().find_map(|marker| {
        let start = head.find(marker)? + marker.len();
        let label: String = head[start..]
            .trim_start_matches(|c| c == '"' || c == '\'')
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
            .collect();
        Encoding::for_label(label.as_bytes())
    })
}

fn fallback(body: &[u8]) -> &'static Encoding {
    if std::str::from_utf8(body).is_ok() {
        UTF_8
    } else {
        WINDOWS_1252
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charset_from_content_type() {
        assert_eq!(
            charset_from_content_type("text/html; charset=ISO-8859-1"),
            Some("ISO-8859-1".to_string())
        );
        assert_eq!(
            charset_from_content_type(r#"text/html;Charset="utf-8""#),
            Some("utf-8".to_string())
        );
        assert_eq!(charset_from_content_type("text/html"), None);
        assert_eq!(charset_from_content_type("text/html; charset="), None);
    }

    #[test]
    fn test_utf8_passes_through_borrowed() {
        let text = decode("Café".as_bytes(), None);
        assert_eq!(text, "Café");
        assert!(matches!(text, Cow::Borrowed(_)));
    }

    #[test]
    fn test_header_charset_wins() {
        assert_eq!(decode(b"Caf\xe9", Some("iso-8859-1")), "Café");
    }

    #[test]
    fn test_meta_charset_sniffed() {
        let html = b"<html><head><meta charset=\"iso-8859-1\"><title>Caf\xe9</title>";
        assert!(decode(html, None).contains("Café"));

        let http_equiv =
            b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1252\">\x93hi\x94";
        assert!(decode(http_equiv, None).contains("\u{201c}hi\u{201d}"));
    }

    #[test]
    fn test_xml_prolog_sniffed() {
        let xml = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><loc>caf\xe9</loc>";
        assert!(decode(xml, None).contains("café"));
    }

    #[test]
    fn test_unlabelled_legacy_bytes_fall_back() {
        assert_eq!(decode(b"Caf\xe9", None), "Café");
    }

    #[test]
    fn test_unknown_header_label_ignored() {
        assert_eq!(decode("Café".as_bytes(), Some("no-such-charset")), "Café");
    }
}
