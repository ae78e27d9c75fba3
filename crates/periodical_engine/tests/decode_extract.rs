use std::sync::Once;

use periodical_engine::{
    decode_text, ArticleElementExtractor, BodyExtractor, BodyNormalizer, RegexNormalizer,
};
use periodical_core::ImageRegistry;
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(periodical_logging::initialize_for_tests);
}

#[test]
fn decode_respects_charset_header() {
    let decoded = decode_text(b"caf\xe9", Some("text/html; Charset=\"ISO-8859-1\""));
    assert_eq!(decoded.text, "café");
    assert!(
        decoded.encoding_label.eq_ignore_ascii_case("ISO-8859-1")
            || decoded.encoding_label.eq_ignore_ascii_case("windows-1252")
    );
}

#[test]
fn decode_handles_utf8_bom() {
    let decoded = decode_text(b"\xEF\xBB\xBFhello", Some("text/html; charset=latin1"));
    assert_eq!(decoded.text, "hello");
    assert_eq!(decoded.encoding_label, "UTF-8");
}

#[test]
fn decode_reads_meta_charset_without_header() {
    let bytes = b"<html><head><meta charset=\"windows-1252\"></head><body>na\xefve</body></html>";
    let decoded = decode_text(bytes, Some("text/html"));
    assert!(decoded.text.contains("naïve"));
    assert_eq!(decoded.encoding_label, "windows-1252");
}

#[test]
fn stray_byte_in_declared_charset_is_replaced() {
    init_logging();
    let decoded = decode_text(b"<p>caf\xff ok</p>", Some("text/html; charset=utf-8"));

    assert_eq!(decoded.text, "<p>caf\u{FFFD} ok</p>");
    assert_eq!(decoded.encoding_label, "UTF-8");
    assert!(decoded.lossy);

    let body = RegexNormalizer.normalize(&decoded.text, &mut ImageRegistry::new());
    assert_eq!(body, "<p>caf\u{FFFD}&nbsp;ok</p>");
}

#[test]
fn clean_input_is_not_lossy() {
    let decoded = decode_text("<p>naïve</p>".as_bytes(), Some("text/html; charset=utf-8"));
    assert_eq!(decoded.text, "<p>naïve</p>");
    assert!(!decoded.lossy);
}

#[test]
fn extractor_prefers_article_element() {
    let html = r#"
    <html><head><title>Site | Story</title></head>
    <body>
        <nav>Menu</nav>
        <article><h1>Heading</h1><p>Body text</p></article>
    </body></html>
    "#;
    let extracted = ArticleElementExtractor.extract(html);

    assert_eq!(extracted.title.as_deref(), Some("Heading"));
    assert!(extracted.body_html.starts_with("<h1>Heading</h1>"));
    assert!(extracted.body_html.contains("<p>Body text</p>"));
    assert!(!extracted.body_html.contains("Menu"));
}

#[test]
fn extractor_falls_back_to_body_and_title() {
    let html = "<html><head><title>Only   Title</title></head><body><p>Plain</p></body></html>";
    let extracted = ArticleElementExtractor.extract(html);

    assert_eq!(extracted.title.as_deref(), Some("Only Title"));
    assert_eq!(extracted.body_html, "<p>Plain</p>");
}
