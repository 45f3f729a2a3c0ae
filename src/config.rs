//! Site configuration and plugin options.
//!
//! The host site configuration is a YAML document. Only the parts this
//! plugin cares about are modelled: the theme (to locate the writable theme
//! directory) and the plugin list (to find this plugin's options and to know
//! whether it is active). Everything else in the document is ignored.
//!
//! ```yaml
//! theme:
//!   name: material
//!   custom_dir: my_theme
//! plugins:
//!   - search
//!   - docstyler:
//!       site_url: /docs/
//!       persistent_styles:
//!         - path: css/base.css
//!       preferred_styles:
//!         - path: css/light.css
//!           title_attr: Light
//!           media_attr: screen
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::error::ConfigError;
use crate::styles::StyleCategory;

/// Name under which the plugin is listed in the site configuration.
pub const PLUGIN_NAME: &str = "docstyler";

/// Default file name of the generated link fragment.
pub const DEFAULT_STYLES_FILE: &str = "custom_styles.html";

/// Default file name of the generated theme wrapper template.
pub const DEFAULT_WRAPPER_FILE: &str = "main.html";

/// Base URL used when `site_url` is absent or null: paths are emitted as-is.
pub const DEFAULT_BASE_URL: &str = "";

/// Option keys recognised under the plugin entry.
const KNOWN_OPTIONS: &[&str] = &[
    "site_url",
    "persistent_styles",
    "preferred_styles",
    "alternate_styles",
    "validation",
    "styles_file",
    "wrapper_file",
    "overwrite",
];

/// The parts of the host site configuration used by the plugin.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub plugins: Plugins,
    /// Directory relative theme paths are resolved against.
    #[serde(skip)]
    pub config_dir: PathBuf,
}

impl SiteConfig {
    /// Loads a site configuration file.
    ///
    /// Relative theme directories are resolved against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml(&yaml)?;
        config.config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(config)
    }

    /// Parses a site configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: SiteConfig = serde_yaml::from_str(yaml)?;
        config.config_dir = PathBuf::from(".");
        Ok(config)
    }

    /// Returns the active theme's primary directory, if it has one.
    ///
    /// Stock themes selected only by name have no primary directory the
    /// plugin could write to.
    pub fn theme_dir(&self) -> Option<PathBuf> {
        let dir = self.theme.custom_dir.as_ref()?;
        if dir.is_absolute() {
            Some(dir.clone())
        } else {
            Some(self.config_dir.join(dir))
        }
    }

    /// Returns `true` if the named plugin is listed.
    pub fn is_plugin_active(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p.name == name)
    }

    /// Extracts this plugin's options.
    ///
    /// A missing or option-less plugin entry yields the default options.
    /// Unrecognised option keys are reported and otherwise ignored.
    pub fn stylesheet_config(&self) -> Result<StylesheetConfig, ConfigError> {
        let options = self
            .plugins
            .iter()
            .find(|p| p.name == PLUGIN_NAME)
            .and_then(|p| p.options.clone());

        match options {
            None | Some(Value::Null) => Ok(StylesheetConfig::default()),
            Some(value) => {
                if let Value::Mapping(map) = &value {
                    warn_unknown_options(map);
                }
                serde_yaml::from_value(value).map_err(ConfigError::InvalidPluginOptions)
            }
        }
    }
}

fn warn_unknown_options(map: &Mapping) {
    for key in map.keys() {
        let name = key.as_str().unwrap_or("<non-string key>");
        if !KNOWN_OPTIONS.contains(&name) {
            warn!(plugin = PLUGIN_NAME, option = name, "unrecognised configuration option");
        }
    }
}

/// Theme selection.
///
/// Accepts either a bare theme name (`theme: readthedocs`) or a mapping with
/// `name` and/or `custom_dir`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Option<RawTheme>")]
pub struct ThemeConfig {
    pub name: Option<String>,
    pub custom_dir: Option<PathBuf>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTheme {
    Name(String),
    Full {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        custom_dir: Option<PathBuf>,
    },
}

impl From<Option<RawTheme>> for ThemeConfig {
    fn from(raw: Option<RawTheme>) -> Self {
        match raw {
            None => ThemeConfig::default(),
            Some(RawTheme::Name(name)) => ThemeConfig {
                name: Some(name),
                custom_dir: None,
            },
            Some(RawTheme::Full { name, custom_dir }) => ThemeConfig { name, custom_dir },
        }
    }
}

/// A plugin listed in the site configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginSpec {
    pub name: String,
    pub options: Option<Value>,
}

/// The ordered plugin list.
///
/// Accepts a sequence of names and single-key mappings, or a single mapping
/// of name to options. A null value is an empty list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Option<RawPlugins>")]
pub struct Plugins(Vec<PluginSpec>);

impl Plugins {
    pub fn iter(&self) -> impl Iterator<Item = &PluginSpec> {
        self.0.iter()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPlugins {
    List(Vec<RawPluginEntry>),
    Map(Mapping),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPluginEntry {
    Name(String),
    Configured(Mapping),
}

impl From<Option<RawPlugins>> for Plugins {
    fn from(raw: Option<RawPlugins>) -> Self {
        let specs = match raw {
            None => Vec::new(),
            Some(RawPlugins::List(entries)) => entries
                .into_iter()
                .flat_map(|entry| match entry {
                    RawPluginEntry::Name(name) => vec![PluginSpec {
                        name,
                        options: None,
                    }],
                    RawPluginEntry::Configured(map) => specs_from_mapping(map),
                })
                .collect(),
            Some(RawPlugins::Map(map)) => specs_from_mapping(map),
        };
        Plugins(specs)
    }
}

fn specs_from_mapping(map: Mapping) -> Vec<PluginSpec> {
    map.into_iter()
        .filter_map(|(key, options)| {
            key.as_str().map(|name| PluginSpec {
                name: name.to_string(),
                options: Some(options),
            })
        })
        .collect()
}

/// How thoroughly stylesheet entries are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Check every entry of every configured category.
    #[default]
    Strict,
    /// Check titles only on the first non-empty of alternate/preferred, and
    /// paths only on the first non-empty of alternate/persistent/preferred.
    Compatible,
}

/// What to do when a target file already exists in the theme directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverwritePolicy {
    /// Truncate and replace the existing file.
    #[default]
    Always,
    /// Leave the existing file untouched.
    KeepExisting,
}

/// The plugin's options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StylesheetConfig {
    pub site_url: Option<String>,
    pub persistent_styles: Option<Vec<StylesheetEntry>>,
    pub preferred_styles: Option<Vec<StylesheetEntry>>,
    pub alternate_styles: Option<Vec<StylesheetEntry>>,
    pub validation: ValidationMode,
    pub styles_file: String,
    pub wrapper_file: String,
    pub overwrite: OverwritePolicy,
}

impl Default for StylesheetConfig {
    fn default() -> Self {
        Self {
            site_url: None,
            persistent_styles: None,
            preferred_styles: None,
            alternate_styles: None,
            validation: ValidationMode::default(),
            styles_file: DEFAULT_STYLES_FILE.to_string(),
            wrapper_file: DEFAULT_WRAPPER_FILE.to_string(),
            overwrite: OverwritePolicy::default(),
        }
    }
}

impl StylesheetConfig {
    /// Returns the prefix every stylesheet path is appended to.
    pub fn base_url(&self) -> &str {
        self.site_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Returns the configured entries of a category, or `None` if unset.
    pub fn entries(&self, category: StyleCategory) -> Option<&[StylesheetEntry]> {
        match category {
            StyleCategory::Persistent => self.persistent_styles.as_deref(),
            StyleCategory::Preferred => self.preferred_styles.as_deref(),
            StyleCategory::Alternate => self.alternate_styles.as_deref(),
        }
    }
}

/// One stylesheet declaration.
///
/// All fields are optional at parse time so that missing values can be
/// reported by validation with the offending category and position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StylesheetEntry {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub title_attr: Option<String>,
    #[serde(default)]
    pub media_attr: Option<String>,
}

impl StylesheetEntry {
    /// The path, if present and non-empty.
    pub fn path(&self) -> Option<&str> {
        non_empty(&self.path)
    }

    /// The title, if present and non-empty.
    pub fn title(&self) -> Option<&str> {
        non_empty(&self.title_attr)
    }

    /// The media query, if present and non-empty.
    pub fn media(&self) -> Option<&str> {
        non_empty(&self.media_attr)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: &str = r#"
site_name: Example
theme:
  name: material
  custom_dir: overrides
plugins:
  - search
  - docstyler:
      site_url: /docs/
      persistent_styles:
        - path: p.css
      preferred_styles:
        - path: q.css
          title_attr: Light
          media_attr: screen
      alternate_styles: null
"#;

    #[test]
    fn test_parse_site_config() {
        let config = SiteConfig::from_yaml(SITE).unwrap();
        assert_eq!(config.theme.name.as_deref(), Some("material"));
        assert_eq!(config.theme_dir(), Some(PathBuf::from("./overrides")));
        assert!(config.is_plugin_active("search"));
        assert!(config.is_plugin_active(PLUGIN_NAME));
        assert!(!config.is_plugin_active("other"));
    }

    #[test]
    fn test_stylesheet_config_extracted() {
        let styles = SiteConfig::from_yaml(SITE)
            .unwrap()
            .stylesheet_config()
            .unwrap();
        assert_eq!(styles.base_url(), "/docs/");
        assert_eq!(styles.persistent_styles.as_ref().unwrap().len(), 1);
        assert_eq!(styles.alternate_styles, None);
        let preferred = &styles.preferred_styles.as_ref().unwrap()[0];
        assert_eq!(preferred.title(), Some("Light"));
        assert_eq!(preferred.media(), Some("screen"));
        assert_eq!(styles.styles_file, DEFAULT_STYLES_FILE);
        assert_eq!(styles.wrapper_file, DEFAULT_WRAPPER_FILE);
        assert_eq!(styles.validation, ValidationMode::Strict);
        assert_eq!(styles.overwrite, OverwritePolicy::Always);
    }

    #[test]
    fn test_bare_theme_name_has_no_dir() {
        let config = SiteConfig::from_yaml("theme: readthedocs\n").unwrap();
        assert_eq!(config.theme.name.as_deref(), Some("readthedocs"));
        assert_eq!(config.theme_dir(), None);
    }

    #[test]
    fn test_absolute_custom_dir_is_kept() {
        let config = SiteConfig::from_yaml("theme:\n  custom_dir: /srv/theme\n").unwrap();
        assert_eq!(config.theme_dir(), Some(PathBuf::from("/srv/theme")));
    }

    #[test]
    fn test_plugins_as_mapping() {
        let yaml = "plugins:\n  search: {}\n  docstyler:\n    site_url: https://x.io/\n";
        let config = SiteConfig::from_yaml(yaml).unwrap();
        assert!(config.is_plugin_active("search"));
        let styles = config.stylesheet_config().unwrap();
        assert_eq!(styles.base_url(), "https://x.io/");
    }

    #[test]
    fn test_plugin_without_options_uses_defaults() {
        let config = SiteConfig::from_yaml("plugins:\n  - docstyler\n").unwrap();
        assert!(config.is_plugin_active(PLUGIN_NAME));
        assert_eq!(
            config.stylesheet_config().unwrap(),
            StylesheetConfig::default()
        );
    }

    #[test]
    fn test_site_url_defaults_to_empty_prefix() {
        assert_eq!(StylesheetConfig::default().base_url(), "");
        let explicit_null = SiteConfig::from_yaml("plugins:\n  - docstyler:\n      site_url: null\n")
            .unwrap()
            .stylesheet_config()
            .unwrap();
        assert_eq!(explicit_null.base_url(), "");
        let root = StylesheetConfig {
            site_url: Some("/".into()),
            ..Default::default()
        };
        assert_eq!(root.base_url(), "/");
    }

    #[test]
    fn test_null_plugins_and_theme_are_empty() {
        let config = SiteConfig::from_yaml("theme:\nplugins:\n").unwrap();
        assert_eq!(config.plugins, Plugins::default());
        assert_eq!(config.theme, ThemeConfig::default());
        assert!(!config.is_plugin_active(PLUGIN_NAME));
        assert_eq!(config.theme_dir(), None);
    }

    #[test]
    fn test_redesign_options_parse() {
        let yaml = r#"
plugins:
  - docstyler:
      validation: compatible
      overwrite: keep_existing
      styles_file: links.html
      wrapper_file: layout.html
"#;
        let styles = SiteConfig::from_yaml(yaml)
            .unwrap()
            .stylesheet_config()
            .unwrap();
        assert_eq!(styles.validation, ValidationMode::Compatible);
        assert_eq!(styles.overwrite, OverwritePolicy::KeepExisting);
        assert_eq!(styles.styles_file, "links.html");
        assert_eq!(styles.wrapper_file, "layout.html");
    }

    #[test]
    fn test_unknown_option_is_tolerated() {
        let yaml = "plugins:\n  - docstyler:\n      colour: blue\n      site_url: /\n";
        let styles = SiteConfig::from_yaml(yaml)
            .unwrap()
            .stylesheet_config()
            .unwrap();
        assert_eq!(styles.base_url(), "/");
    }

    #[test]
    fn test_wrongly_typed_option_is_an_error() {
        let yaml = "plugins:\n  - docstyler:\n      persistent_styles: not-a-list\n";
        let err = SiteConfig::from_yaml(yaml)
            .unwrap()
            .stylesheet_config()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPluginOptions(_)));
    }

    #[test]
    fn test_empty_entry_fields_are_absent() {
        let entry = StylesheetEntry {
            path: Some(String::new()),
            title_attr: None,
            media_attr: Some(String::new()),
        };
        assert_eq!(entry.path(), None);
        assert_eq!(entry.title(), None);
        assert_eq!(entry.media(), None);
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let err = SiteConfig::from_yaml("plugins: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
