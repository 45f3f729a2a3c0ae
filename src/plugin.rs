//! Host lifecycle integration.
//!
//! A build calls the plugin's hooks once each, in order:
//!
//! 1. [`Plugin::on_config`] once the site configuration is loaded
//! 2. [`Plugin::on_pre_template`] before the host renders its templates
//!
//! [`StyleLinkInjector`] tracks where it is in that sequence and refuses to
//! inject before its configuration has been validated.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::{SiteConfig, PLUGIN_NAME};
use crate::error::{ConfigError, InjectError};
use crate::inject::{prepare, InjectedFiles};
use crate::render::StyleRenderer;
use crate::validate::{validate_config, ValidatedConfig};

/// Lifecycle hooks a host invokes on its plugins.
pub trait Plugin {
    /// The name the plugin is listed under in the site configuration.
    fn name(&self) -> &'static str;

    /// Called once the site configuration is final.
    ///
    /// Returns the (possibly updated) configuration.
    fn on_config(&mut self, config: SiteConfig) -> Result<SiteConfig, ConfigError>;

    /// Called before the host renders `template_name`.
    ///
    /// Returns the template handle to render.
    fn on_pre_template<T>(
        &mut self,
        template: T,
        template_name: &str,
        config: &SiteConfig,
    ) -> Result<T, InjectError>;
}

/// Where a [`StyleLinkInjector`] is in the build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Unvalidated,
    Validated(ValidatedConfig),
    Injected(ValidatedConfig),
}

/// Writes persistent, preferred and alternate stylesheet links into the
/// active theme.
#[derive(Debug, Default)]
pub struct StyleLinkInjector {
    phase: Phase,
}

impl StyleLinkInjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Renders both theme files without writing them.
    pub fn render(&self) -> Result<InjectedFiles, InjectError> {
        let validated = self.validated()?;
        let renderer = StyleRenderer::new()?;
        prepare(&validated.styles, &validated.theme_dir, &renderer)
    }

    /// Renders and writes both theme files, returning the paths written.
    pub fn inject(&mut self) -> Result<Vec<PathBuf>, InjectError> {
        let files = self.render()?;
        let validated = self.validated()?.clone();
        let written = files.write(validated.styles.overwrite)?;
        self.phase = Phase::Injected(validated);
        Ok(written)
    }

    fn validated(&self) -> Result<&ValidatedConfig, InjectError> {
        match &self.phase {
            Phase::Unvalidated => Err(InjectError::NotValidated),
            Phase::Validated(validated) | Phase::Injected(validated) => Ok(validated),
        }
    }
}

impl Plugin for StyleLinkInjector {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    fn on_config(&mut self, config: SiteConfig) -> Result<SiteConfig, ConfigError> {
        let validated = validate_config(&config)?;
        debug!(theme_dir = %validated.theme_dir.display(), "stylesheet configuration validated");
        self.phase = Phase::Validated(validated);
        Ok(config)
    }

    fn on_pre_template<T>(
        &mut self,
        template: T,
        template_name: &str,
        _config: &SiteConfig,
    ) -> Result<T, InjectError> {
        let written = self.inject()?;
        info!(template = template_name, files = written.len(), "injected stylesheet links");
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn site(dir: &std::path::Path, options: &str) -> SiteConfig {
        let yaml = format!("theme:\n  custom_dir: .\nplugins:\n  - docstyler:\n{}", options);
        SiteConfig {
            config_dir: dir.to_path_buf(),
            ..SiteConfig::from_yaml(&yaml).unwrap()
        }
    }

    #[test]
    fn test_pre_template_before_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = site(dir.path(), "      site_url: /\n");
        let mut injector = StyleLinkInjector::new();
        let err = injector
            .on_pre_template((), "main.html", &config)
            .unwrap_err();
        assert!(matches!(err, InjectError::NotValidated));
        assert!(!dir.path().join("custom_styles.html").exists());
    }

    #[test]
    fn test_phases_advance() {
        let dir = tempfile::tempdir().unwrap();
        let config = site(dir.path(), "      persistent_styles: [{path: p.css}]\n");
        let mut injector = StyleLinkInjector::new();
        assert_eq!(injector.phase(), &Phase::Unvalidated);

        let config = injector.on_config(config).unwrap();
        assert!(matches!(injector.phase(), Phase::Validated(_)));

        let handle = injector
            .on_pre_template("template-handle", "main.html", &config)
            .unwrap();
        assert_eq!(handle, "template-handle");
        assert!(matches!(injector.phase(), Phase::Injected(_)));
        assert!(dir.path().join("custom_styles.html").exists());
        assert!(dir.path().join("main.html").exists());
    }

    #[test]
    fn test_failed_config_leaves_injector_unvalidated() {
        let dir = tempfile::tempdir().unwrap();
        let config = site(dir.path(), "      preferred_styles: [{path: q.css}]\n");
        let mut injector = StyleLinkInjector::new();
        assert!(injector.on_config(config).is_err());
        assert_eq!(injector.phase(), &Phase::Unvalidated);
        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_render_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let config = site(dir.path(), "      persistent_styles: [{path: p.css}]\n");
        let mut injector = StyleLinkInjector::new();
        injector.on_config(config).unwrap();
        let files = injector.render().unwrap();
        assert_eq!(files.styles.contents, "<link rel=\"stylesheet\" href=\"p.css\">\n");
        assert!(!files.styles.path.exists());
    }

    #[test]
    fn test_name() {
        assert_eq!(StyleLinkInjector::new().name(), "docstyler");
    }
}
