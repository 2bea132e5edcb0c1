//! End-to-end conversion through the public API.

use rjlink::dom::html;
use rjlink::linkify::{Conversion, Rejection};
use rjlink::{Config, ConfigBuilder, Document, Linkifier, linkify_html};

fn linkifier() -> Linkifier {
    Linkifier::new(&Config::default()).unwrap()
}

#[test]
fn converts_the_release_announcement() {
    let mut doc = rjlink::parse("<html><body><p>New release RJ123456 is out.</p></body></html>");
    let report = linkifier().process_page(&mut doc).unwrap();
    assert_eq!(report.links, 1);
    assert_eq!(report.converted, 1);

    let body = doc.body().unwrap();
    let p = doc.children(body)[0];
    let kids = doc.children(p).to_vec();
    assert_eq!(kids.len(), 3);
    assert_eq!(doc.text(kids[0]), Some("New release "));
    assert_eq!(doc.tag_name(kids[1]), Some("a"));
    assert_eq!(doc.text_content(kids[1]), "RJ123456");
    assert_eq!(doc.text(kids[2]), Some(" is out."));
    assert!(doc.has_class(p, "dlsite-rj-converted"));
    assert!(doc.has_class(body, "dlsite-rj-converted"));
}

#[test]
fn converting_twice_changes_nothing() {
    let input = "<html><body><p>RJ111111</p><div>x <i>RJ222222</i> y RJ333333</div></body></html>";
    let once = linkify_html(input, None).unwrap();
    let twice = linkify_html(&once, None).unwrap();
    similar_asserts::assert_eq!(once, twice);
    assert_eq!(once.matches("<a ").count(), 3);
}

#[test]
fn textarea_content_stays_plain_text() {
    let input = "<html><body><textarea>RJ123456</textarea></body></html>";
    let once = linkify_html(input, None).unwrap();
    let twice = linkify_html(&once, None).unwrap();
    similar_asserts::assert_eq!(once, twice);
    assert!(once.contains("<textarea>RJ123456</textarea>"));
    assert!(!once.contains("product_id"));
}

#[test]
fn existing_links_are_left_alone() {
    let input = "<html><body><a href=\"/x\">RJ123456</a></body></html>";
    let out = linkify_html(input, None).unwrap();
    assert!(!out.contains("product_id"));
    assert!(out.contains("<a href=\"/x\">RJ123456</a>"));
}

#[test]
fn fragments_without_body_are_processed_whole() {
    let out = linkify_html("<p>RJ123456</p>", None).unwrap();
    assert!(out.starts_with("<p class=\"dlsite-rj-converted\"><a href="));
}

#[test]
fn page_without_body_is_a_no_op() {
    let mut doc = rjlink::parse("<p>RJ123456</p>");
    assert!(linkifier().process_page(&mut doc).is_none());
    assert_eq!(html::serialize(&doc, Document::ROOT), "<p>RJ123456</p>");
}

#[test]
fn standalone_conversion_marks_its_container() {
    let mut doc = rjlink::parse("<div><span>RJ123456</span></div>");
    let span = doc.find_element("span").unwrap();
    let text = doc.children(span)[0];

    let l = linkifier();
    match l.convert_text_node(&mut doc, text) {
        Conversion::Converted {
            container, links, ..
        } => {
            assert_eq!(container, span);
            assert_eq!(links, 1);
        }
        other => panic!("expected conversion, got {other:?}"),
    }
    assert!(doc.has_class(span, "dlsite-rj-converted"));

    // A new token in the same container is now refused.
    let late = doc.create_text("RJ654321");
    doc.append_child(span, late).unwrap();
    assert!(matches!(
        l.convert_text_node(&mut doc, late),
        Conversion::Skipped(Rejection::AlreadyConverted)
    ));
}

#[test]
fn detached_text_is_refused() {
    let mut doc = Document::new();
    let text = doc.create_text("RJ123456");
    assert!(matches!(
        linkifier().convert_text_node(&mut doc, text),
        Conversion::Skipped(Rejection::Detached)
    ));
}

#[test]
fn custom_exclusions_apply() {
    let config = ConfigBuilder::default()
        .excluded_tags(["a", "code"])
        .build();
    let out = linkify_html(
        "<p>RJ123456 <code>RJ654321</code> <script>RJ111111</script></p>",
        Some(config),
    )
    .unwrap();
    assert!(out.contains("product_id/RJ123456.html"));
    assert!(!out.contains("product_id/RJ654321.html"));
    // script is no longer excluded
    assert!(out.contains("product_id/RJ111111.html"));
}

#[test]
fn invalid_pattern_is_an_error() {
    let config = ConfigBuilder::default().pattern("RJ[0-9").build();
    assert!(linkify_html("<p>RJ123456</p>", Some(config)).is_err());
}
