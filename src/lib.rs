//! # Docstyler - stylesheet links for static-site themes
//!
//! Docstyler adds persistent, preferred and alternate external stylesheet
//! links to a custom static-site theme, driven by declarative configuration.
//!
//! ## Stylesheet categories
//!
//! - **Persistent**: always applied, never titled
//! - **Preferred**: applied by default, titled so the user agent can list it
//! - **Alternate**: titled, selectable, not applied by default
//!
//! ## Build lifecycle
//!
//! The host calls two hooks per build, in order:
//!
//! 1. [`Plugin::on_config`] checks that the theme directory is writable
//!    (a fatal error otherwise), then that every stylesheet has a path and
//!    every preferred/alternate stylesheet has a title.
//! 2. [`Plugin::on_pre_template`] renders the `<link>` fragment and writes it,
//!    together with a wrapper template that includes it, into the theme
//!    directory.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use docstyler::{Plugin, SiteConfig, StyleLinkInjector};
//!
//! let config = SiteConfig::load("mkdocs.yml")?;
//! let mut injector = StyleLinkInjector::new();
//! let config = injector.on_config(config)?;
//! injector.on_pre_template((), "main.html", &config)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The pure parts are usable on their own: [`validate_config`] checks a
//! configuration, [`RenderedStyleList::from_config`] builds the links and
//! [`StyleRenderer`] turns them into markup.

pub mod config;
pub mod error;
pub mod inject;
pub mod plugin;
pub mod render;
pub mod styles;
pub mod validate;

pub use config::{
    OverwritePolicy, SiteConfig, StylesheetConfig, StylesheetEntry, ThemeConfig, ValidationMode,
    PLUGIN_NAME,
};
pub use error::{ConfigError, InjectError};
pub use inject::{prepare, GeneratedFile, InjectedFiles};
pub use plugin::{Phase, Plugin, StyleLinkInjector};
pub use render::{render_wrapper, StyleRenderer};
pub use styles::{build_style_entries, RenderedStyleList, StyleCategory, StyleLink};
pub use validate::{validate_config, ValidatedConfig};
