//! Turning tokens in text nodes into links.

pub mod converter;
pub mod eligibility;
pub mod link_builder;
pub mod matcher;
pub mod scan;
pub mod walker;

pub use converter::{Conversion, Segment, split_text};
pub use eligibility::{EligibilityFilter, Rejection};
pub use link_builder::LinkBuilder;
pub use matcher::{Match, TokenMatcher};
pub use scan::{TokenHit, element_path};
pub use walker::{PassReport, collect_text_nodes};

use crate::config::Config;

/// Matcher, filter and link builder for one configuration.
///
/// A `Linkifier` holds no per-document state; one instance can serve any
/// number of documents and passes.
#[derive(Debug, Clone)]
pub struct Linkifier {
    matcher: TokenMatcher,
    filter: EligibilityFilter,
    builder: LinkBuilder,
}

impl Linkifier {
    pub fn new(config: &Config) -> Result<Self, regex::Error> {
        Ok(Self {
            matcher: TokenMatcher::new(&config.pattern)?,
            filter: EligibilityFilter::new(
                config.processed_class.as_str(),
                &config.excluded_tags,
            ),
            builder: LinkBuilder::new(config),
        })
    }

    pub fn matcher(&self) -> &TokenMatcher {
        &self.matcher
    }

    pub fn filter(&self) -> &EligibilityFilter {
        &self.filter
    }

    pub fn link_builder(&self) -> &LinkBuilder {
        &self.builder
    }
}
