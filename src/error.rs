//! Errors raised while validating configuration and injecting stylesheets.

use std::path::PathBuf;

use thiserror::Error;

use crate::styles::StyleCategory;

/// Error returned by the configuration hook.
///
/// Only [`ConfigError::ThemeNotWritable`] is fatal: the host is expected to
/// terminate the build immediately. Every other variant is an ordinary
/// configuration failure that stops the build before any file is written.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The active theme has no writable primary directory.
    #[error(
        "docstyler plugin cannot write to theme directory{}... \
         Perhaps you are using a built-in theme: 'mkdocs' or 'readthedocs'? \
         Please try using a third-party/custom theme instead.",
        .dir.as_ref().map(|d| format!(" '{}'", d.display())).unwrap_or_default()
    )]
    ThemeNotWritable { dir: Option<PathBuf> },

    /// A preferred or alternate stylesheet has no title.
    #[error(
        "Alternate and preferred stylesheets must have a 'title' attribute value \
         ({category} entry #{index})."
    )]
    MissingTitle { category: StyleCategory, index: usize },

    /// A stylesheet has no path.
    #[error("All stylesheets must have a 'path' attribute value ({category} entry #{index}).")]
    MissingPath { category: StyleCategory, index: usize },

    /// The site configuration file could not be read.
    #[error("failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The site configuration is not valid YAML or has the wrong shape.
    #[error("invalid site configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The plugin's own options have the wrong shape.
    #[error("invalid docstyler options: {0}")]
    InvalidPluginOptions(#[source] serde_yaml::Error),
}

impl ConfigError {
    /// Returns `true` if the build must be aborted without further reporting.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ConfigError::ThemeNotWritable { .. })
    }
}

/// Error returned by the pre-render hook.
#[derive(Debug, Error)]
pub enum InjectError {
    /// The pre-render hook ran before the configuration hook succeeded.
    #[error("stylesheet injection requested before configuration was validated")]
    NotValidated,

    /// The link fragment template failed to render.
    #[error("failed to render stylesheet links: {0}")]
    Render(#[from] minijinja::Error),

    /// A target file in the theme directory could not be written.
    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_not_writable_is_fatal() {
        let err = ConfigError::ThemeNotWritable { dir: None };
        assert!(err.is_fatal());
        let msg = err.to_string();
        assert!(msg.contains("readthedocs"));
        assert!(msg.contains("third-party/custom theme"));
    }

    #[test]
    fn test_theme_not_writable_names_dir() {
        let err = ConfigError::ThemeNotWritable {
            dir: Some(PathBuf::from("/opt/theme")),
        };
        assert!(err.to_string().contains("'/opt/theme'"));
    }

    #[test]
    fn test_missing_title_is_not_fatal() {
        let err = ConfigError::MissingTitle {
            category: StyleCategory::Alternate,
            index: 2,
        };
        assert!(!err.is_fatal());
        let msg = err.to_string();
        assert!(msg.contains("'title'"));
        assert!(msg.contains("alternate_styles entry #2"));
    }

    #[test]
    fn test_missing_path_display() {
        let err = ConfigError::MissingPath {
            category: StyleCategory::Persistent,
            index: 0,
        };
        assert!(err.to_string().contains("persistent_styles entry #0"));
    }
}
