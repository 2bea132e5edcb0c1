pub mod config;
pub mod dom;
pub mod linkify;

#[cfg(feature = "watch")]
pub mod bootstrap;
#[cfg(feature = "watch")]
pub mod watcher;

pub use config::Config;
pub use config::ConfigBuilder;
pub use dom::{Document, NodeId};
pub use linkify::{Linkifier, PassReport};

#[cfg(feature = "watch")]
pub use bootstrap::{bootstrap, start};
#[cfg(feature = "watch")]
pub use watcher::{ChangeWatcher, SharedDocument};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parses an HTML document into a mutable tree.
///
/// # Examples
///
/// ```rust
/// let doc = rjlink::parse("<p>RJ123456</p>");
/// assert_eq!(doc.text_content(doc.root()), "RJ123456");
/// ```
pub fn parse(input: &str) -> Document {
    dom::html::parse(input)
}

/// Converts every RJ number in an HTML document into a catalog link.
///
/// The whole `<body>` is processed when there is one; otherwise the whole
/// input is treated as a fragment.
///
/// # Examples
///
/// ```no_run
/// let out = rjlink::linkify_html("<p>See RJ123456</p>", None).unwrap();
/// assert!(out.contains("product_id/RJ123456.html"));
/// ```
///
/// # Arguments
///
/// * `input` - HTML source
/// * `config` - Optional configuration (defaults to default config)
pub fn linkify_html(input: &str, config: Option<Config>) -> Result<String, regex::Error> {
    #[cfg(debug_assertions)]
    {
        init_logger();
    }

    let config = config.unwrap_or_default();
    let linkifier = Linkifier::new(&config)?;
    let mut doc = parse(input);
    if doc.body().is_some() {
        linkifier.process_page(&mut doc);
    } else {
        linkifier.process_subtree(&mut doc, Document::ROOT);
    }
    Ok(dom::html::serialize(&doc, Document::ROOT))
}
