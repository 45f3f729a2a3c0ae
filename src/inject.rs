//! Stylesheet injection into the theme directory.
//!
//! Injection is split in two:
//!
//! 1. [`prepare`] computes both file contents and their target paths without
//!    touching the filesystem.
//! 2. [`InjectedFiles::write`] performs the writes.
//!
//! Writes truncate and replace the targets in place. There is no locking and
//! no atomic rename; a crash mid-write leaves a partial file behind.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::{OverwritePolicy, StylesheetConfig, PLUGIN_NAME};
use crate::error::InjectError;
use crate::render::{render_wrapper, StyleRenderer};
use crate::styles::RenderedStyleList;

/// A file ready to be written into the theme directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// The two files produced for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedFiles {
    /// The `<link>` fragment.
    pub styles: GeneratedFile,
    /// The wrapper template including the fragment.
    pub wrapper: GeneratedFile,
}

impl InjectedFiles {
    /// Writes the fragment, then the wrapper.
    ///
    /// Returns the paths actually written; files skipped under
    /// [`OverwritePolicy::KeepExisting`] are left out.
    pub fn write(&self, policy: OverwritePolicy) -> Result<Vec<PathBuf>, InjectError> {
        let mut written = Vec::with_capacity(2);
        for file in [&self.styles, &self.wrapper] {
            if policy == OverwritePolicy::KeepExisting && file.path.exists() {
                warn!(path = %file.path.display(), "keeping existing file");
                continue;
            }
            write_file(&file.path, &file.contents)?;
            info!(path = %file.path.display(), bytes = file.contents.len(), "wrote theme file");
            written.push(file.path.clone());
        }
        Ok(written)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), InjectError> {
    fs::write(path, contents).map_err(|source| InjectError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Renders both theme files for the given configuration.
pub fn prepare(
    styles: &StylesheetConfig,
    theme_dir: &Path,
    renderer: &StyleRenderer,
) -> Result<InjectedFiles, InjectError> {
    let links = RenderedStyleList::from_config(styles);
    let fragment = renderer.render_links(&links)?;

    Ok(InjectedFiles {
        styles: GeneratedFile {
            path: theme_dir.join(&styles.styles_file),
            contents: fragment,
        },
        wrapper: GeneratedFile {
            path: theme_dir.join(&styles.wrapper_file),
            contents: render_wrapper(PLUGIN_NAME, &styles.styles_file),
        },
    })
}
