//! Stylesheet categories and link construction.
//!
//! This module turns the declarative [`StylesheetConfig`] into the ordered
//! link lists consumed by the renderer:
//!
//! - [`StyleCategory`]: persistent, preferred or alternate
//! - [`StyleLink`]: one `<link>` element's attribute values
//! - [`RenderedStyleList`]: the three link lists, in render order
//!
//! URLs are built by plain concatenation of the base URL and the entry path.
//! Duplicate slashes are deliberately left alone: `https://x.io/` joined with
//! `/css/a.css` yields `https://x.io//css/a.css`.

use serde::Serialize;
use tracing::debug;

use crate::config::{StylesheetConfig, StylesheetEntry};

/// The three kinds of stylesheet a page can link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleCategory {
    /// Always applied; never titled.
    Persistent,
    /// Applied by default; titled so the user agent can list it.
    Preferred,
    /// Selectable but not applied by default.
    Alternate,
}

impl StyleCategory {
    /// All categories, in the order they are rendered.
    pub const ALL: [StyleCategory; 3] = [
        StyleCategory::Persistent,
        StyleCategory::Preferred,
        StyleCategory::Alternate,
    ];

    /// Returns the configuration key for this category.
    pub fn as_str(self) -> &'static str {
        match self {
            StyleCategory::Persistent => "persistent_styles",
            StyleCategory::Preferred => "preferred_styles",
            StyleCategory::Alternate => "alternate_styles",
        }
    }

    /// Returns `true` if entries of this category must carry a title.
    pub fn requires_title(self) -> bool {
        !matches!(self, StyleCategory::Persistent)
    }
}

impl std::fmt::Display for StyleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute values for a single `<link>` element.
///
/// `title` is always `None` for persistent stylesheets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleLink {
    pub url: String,
    pub title: Option<String>,
    pub media: Option<String>,
}

/// Links for every category, ready to hand to the renderer.
///
/// Serializes with the field names the fragment template iterates over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedStyleList {
    pub persistent_styles: Vec<StyleLink>,
    pub preferred_styles: Vec<StyleLink>,
    pub alternate_styles: Vec<StyleLink>,
}

impl RenderedStyleList {
    /// Builds the link lists for every configured category.
    ///
    /// Categories that are not configured produce an empty list.
    pub fn from_config(config: &StylesheetConfig) -> Self {
        let base_url = config.base_url();
        let mut list = Self::default();
        for category in StyleCategory::ALL {
            let links = build_style_entries(config, category, base_url);
            debug!(category = %category, links = links.len(), "built stylesheet links");
            *list.links_mut(category) = links;
        }
        list
    }

    /// Returns the links for one category.
    pub fn links(&self, category: StyleCategory) -> &[StyleLink] {
        match category {
            StyleCategory::Persistent => &self.persistent_styles,
            StyleCategory::Preferred => &self.preferred_styles,
            StyleCategory::Alternate => &self.alternate_styles,
        }
    }

    fn links_mut(&mut self, category: StyleCategory) -> &mut Vec<StyleLink> {
        match category {
            StyleCategory::Persistent => &mut self.persistent_styles,
            StyleCategory::Preferred => &mut self.preferred_styles,
            StyleCategory::Alternate => &mut self.alternate_styles,
        }
    }

    /// Returns `true` if no category has any link.
    pub fn is_empty(&self) -> bool {
        StyleCategory::ALL
            .iter()
            .all(|&category| self.links(category).is_empty())
    }
}

/// Builds the links for one category, preserving entry order.
///
/// Assumes the configuration has been validated; a missing path is rendered
/// as the bare base URL rather than reported.
pub fn build_style_entries(
    config: &StylesheetConfig,
    category: StyleCategory,
    base_url: &str,
) -> Vec<StyleLink> {
    config
        .entries(category)
        .unwrap_or_default()
        .iter()
        .map(|entry| build_link(entry, category, base_url))
        .collect()
}

fn build_link(entry: &StylesheetEntry, category: StyleCategory, base_url: &str) -> StyleLink {
    let mut url = String::with_capacity(base_url.len() + entry.path().map_or(0, str::len));
    url.push_str(base_url);
    url.push_str(entry.path().unwrap_or_default());

    let title = if category.requires_title() {
        entry.title().map(str::to_string)
    } else {
        None
    };

    StyleLink {
        url,
        title,
        media: entry.media().map(str::to_string),
    }
}
