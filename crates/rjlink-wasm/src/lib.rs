use wasm_bindgen::prelude::*;

/// Convert every RJ number in `input` into a catalog link.
///
/// Returns the input unchanged if `pattern` is not a valid regex.
#[wasm_bindgen]
pub fn linkify_html(input: &str, pattern: Option<String>) -> String {
    let mut builder = rjlink::ConfigBuilder::default();
    if let Some(pattern) = pattern {
        builder = builder.pattern(pattern);
    }
    rjlink::linkify_html(input, Some(builder.build())).unwrap_or_else(|_| input.to_string())
}

// Token listing as JSON, for debugging
#[wasm_bindgen]
pub fn tokens_json(input: &str) -> String {
    let Ok(linkifier) = rjlink::Linkifier::new(&rjlink::Config::default()) else {
        return "[]".to_string();
    };
    let doc = rjlink::parse(input);
    // Same scope as linkify_html: the body, or the whole input without one.
    let root = doc.body().unwrap_or(rjlink::Document::ROOT);
    let hits = linkifier.find_tokens(&doc, root);
    serde_json::to_string(&hits).unwrap_or_else(|_| "[]".to_string())
}
