// src/parse/sitemap.rs
// =============================================================================
// Pulls every <loc> value out of a sitemap document.
//
// The same code handles both flavours:
//   <urlset>       -> <url><loc>page</loc></url>
//   <sitemapindex> -> <sitemap><loc>another sitemap</loc></sitemap>
// Telling them apart is the classifier's job, not ours.
//
// quick-xml is a streaming reader: we walk start/text/end events and collect
// the text between <loc> and </loc>.
// =============================================================================

use crate::error::ParseError;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Returns the text of every `<loc>` element in document order.
///
/// Duplicates are kept. Values are trimmed and empty ones dropped. An empty
/// document yields an empty list.
pub fn extract_loc_values(xml: &str) -> Result<Vec<String>, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut locations = Vec::new();
    // Some(..) while we are inside a <loc> element
    let mut current: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) if start.local_name().as_ref() == b"loc" => {
                current = Some(String::new());
            }
            Ok(Event::Text(text)) => {
                if let Some(buffer) = current.as_mut() {
                    let unescaped = text.unescape().map_err(|e| ParseError::Xml {
                        position: reader.buffer_position() as u64,
                        reason: e.to_string(),
                    })?;
                    buffer.push_str(&unescaped);
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(buffer) = current.as_mut() {
                    buffer.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Ok(Event::End(end)) if end.local_name().as_ref() == b"loc" => {
                if let Some(value) = current.take() {
                    let value = value.trim();
                    if !value.is_empty() {
                        locations.push(value.to_string());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ParseError::Xml {
                    position: reader.buffer_position() as u64,
                    reason: e.to_string(),
                });
            }
            _ => {}
        }
    }

    Ok(locations)
}
