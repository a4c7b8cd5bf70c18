//! Rich-text entities to HTML.

use crate::bot::gateway::{SpanKind, TextSpan};

fn tags(kind: SpanKind) -> (&'static str, &'static str) {
    match kind {
        SpanKind::Bold => ("<b>", "</b>"),
        SpanKind::Italic => ("<i>", "</i>"),
        SpanKind::Underline => ("<u>", "</u>"),
        SpanKind::Strikethrough => ("<s>", "</s>"),
        SpanKind::Code => ("<code>", "</code>"),
    }
}

/// Wrap each span of `text` in its HTML tags.
///
/// Spans are applied from the highest offset down so an insertion never
/// shifts a span that is still pending. Offsets count UTF-16 code units and
/// out-of-range spans are clamped to the end of the text.
///
/// Overlapping spans are inserted at their original offsets without any
/// nesting repair; the result for them is best-effort.
pub fn format_entities(text: &str, spans: &[TextSpan]) -> String {
    if spans.is_empty() {
        return text.to_string();
    }

    let mut ordered = spans.to_vec();
    ordered.sort_by(|a, b| b.offset.cmp(&a.offset));

    let mut units: Vec<u16> = text.encode_utf16().collect();
    for span in ordered {
        let (open, close) = tags(span.kind);
        let start = span.offset.min(units.len());
        let end = span.offset.saturating_add(span.length).min(units.len());

        units.splice(end..end, close.encode_utf16());
        units.splice(start..start, open.encode_utf16());
    }

    String::from_utf16_lossy(&units)
}
