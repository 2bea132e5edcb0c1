use crate::config::Config;
use crate::dom::{Document, DomError, NodeId};

/// Builds the `<a>` element that replaces a matched token.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    base_url: String,
    url_suffix: String,
    title_template: String,
    style: String,
    marker: String,
}

impl LinkBuilder {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
            url_suffix: config.url_suffix.clone(),
            title_template: config.title_template.clone(),
            style: config.link_style.to_css(),
            marker: config.processed_class.clone(),
        }
    }

    /// Catalog page for `token`.
    pub fn url_for(&self, token: &str) -> String {
        format!("{}{}{}", self.base_url, token, self.url_suffix)
    }

    pub fn title_for(&self, token: &str) -> String {
        self.title_template.replace("{token}", token)
    }

    /// Create a detached link element for `token`.
    ///
    /// The element carries the conversion marker and is itself an inert
    /// container, so its text is never scanned again.
    pub fn build(&self, doc: &mut Document, token: &str) -> Result<NodeId, DomError> {
        let link = doc.create_element("a");
        doc.set_attribute(link, "href", self.url_for(token))?;
        doc.set_attribute(link, "target", "_blank")?;
        doc.set_attribute(link, "rel", "noopener noreferrer")?;
        doc.set_attribute(link, "title", self.title_for(token))?;
        if !self.style.is_empty() {
            doc.set_attribute(link, "style", self.style.as_str())?;
        }
        if !self.marker.is_empty() {
            doc.add_class(link, &self.marker)?;
        }
        let label = doc.create_text(token);
        doc.append_child(link, label)?;
        Ok(link)
    }
}
