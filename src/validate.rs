//! Configuration checks run by the configuration hook.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. the theme's primary directory must be writable (fatal)
//! 2. preferred and alternate stylesheets must have titles
//! 3. every stylesheet must have a path
//!
//! Nothing is written to disk by any check.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{SiteConfig, StylesheetConfig, StylesheetEntry, ValidationMode};
use crate::error::ConfigError;
use crate::styles::StyleCategory;

/// Configuration that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig {
    /// The writable primary theme directory.
    pub theme_dir: PathBuf,
    /// The plugin's options.
    pub styles: StylesheetConfig,
}

/// Runs every check against the site configuration.
///
/// The theme is checked before the plugin options are even parsed.
pub fn validate_config(site: &SiteConfig) -> Result<ValidatedConfig, ConfigError> {
    let theme_dir = check_theme_compatibility(site)?;
    let styles = site.stylesheet_config()?;
    check_titles(&styles)?;
    check_paths(&styles)?;
    Ok(ValidatedConfig { theme_dir, styles })
}

/// Returns the theme's primary directory, or [`ConfigError::ThemeNotWritable`]
/// unless it exists and is writable.
pub fn check_theme_compatibility(site: &SiteConfig) -> Result<PathBuf, ConfigError> {
    match site.theme_dir() {
        Some(dir) if is_writable_dir(&dir) => Ok(dir),
        dir => Err(ConfigError::ThemeNotWritable { dir }),
    }
}

/// A directory is writable if it exists and the current process may create
/// entries in it.
fn is_writable_dir(dir: &Path) -> bool {
    let is_dir = fs::metadata(dir).map(|meta| meta.is_dir()).unwrap_or(false);
    is_dir && can_write(dir)
}

#[cfg(unix)]
fn can_write(dir: &Path) -> bool {
    use rustix::fs::{access, Access};

    access(dir, Access::WRITE_OK).is_ok()
}

#[cfg(not(unix))]
fn can_write(dir: &Path) -> bool {
    fs::metadata(dir)
        .map(|meta| !meta.permissions().readonly())
        .unwrap_or(false)
}

/// Enforces non-empty titles on preferred and alternate stylesheets.
pub fn check_titles(styles: &StylesheetConfig) -> Result<(), ConfigError> {
    let categories = [StyleCategory::Alternate, StyleCategory::Preferred];
    for (category, entries) in governed(styles, &categories) {
        if let Some(index) = entries.iter().position(|e| e.title().is_none()) {
            return Err(ConfigError::MissingTitle { category, index });
        }
    }
    Ok(())
}

/// Enforces non-empty paths on every stylesheet.
pub fn check_paths(styles: &StylesheetConfig) -> Result<(), ConfigError> {
    let categories = [
        StyleCategory::Alternate,
        StyleCategory::Persistent,
        StyleCategory::Preferred,
    ];
    for (category, entries) in governed(styles, &categories) {
        if let Some(index) = entries.iter().position(|e| e.path().is_none()) {
            return Err(ConfigError::MissingPath { category, index });
        }
    }
    Ok(())
}

/// Selects the entry lists a check applies to.
///
/// In strict mode that is every configured category. In compatible mode it
/// is only the first non-empty one, in the given order.
fn governed<'a>(
    styles: &'a StylesheetConfig,
    categories: &[StyleCategory],
) -> Vec<(StyleCategory, &'a [StylesheetEntry])> {
    let configured = categories
        .iter()
        .filter_map(|&category| styles.entries(category).map(|entries| (category, entries)));

    match styles.validation {
        ValidationMode::Strict => configured.collect(),
        ValidationMode::Compatible => configured
            .filter(|(_, entries)| !entries.is_empty())
            .take(1)
            .collect(),
    }
}
