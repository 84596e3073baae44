//! Build orchestration.
//!
//! Renders decoded data to the output file.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use folio_core::{Data, Settings};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    render::{RenderError, Renderer, compact},
    template::{TemplateError, TemplateRegistry},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Template loading error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Rendering error.
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of projects rendered.
    pub projects: usize,

    /// Number of contributions rendered.
    pub contributions: usize,

    /// Number of creations rendered, across categories.
    pub creations: usize,

    /// Size of the written page in bytes.
    pub bytes: usize,

    /// Render duration in milliseconds.
    pub duration_ms: u64,
}

/// Page builder that renders and writes the output.
#[derive(Debug)]
pub struct Builder {
    renderer: Renderer,
    output_path: PathBuf,
    compact: bool,
}

impl Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new(renderer: Renderer, output_path: impl Into<PathBuf>) -> Self {
        Self {
            renderer,
            output_path: output_path.into(),
            compact: true,
        }
    }

    /// Create a builder from settings, loading templates from disk.
    ///
    /// Relative paths are resolved against the directory of `settings_path`.
    pub fn from_settings(settings: &Settings, settings_path: &Path) -> Result<Self> {
        let template_dir = Settings::resolve(settings_path, &settings.templates.dir);
        let templates = TemplateRegistry::from_dir(&template_dir)?;
        let renderer = Renderer::new(templates, settings.templates.entry.clone());

        Ok(
            Self::new(renderer, Settings::resolve(settings_path, &settings.output.path))
                .with_compact(settings.output.compact),
        )
    }

    /// Set whether output lines are compacted.
    #[must_use]
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Override the output path.
    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Output file path.
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Render `data` and write the page.
    pub fn build(&self, data: &Data) -> Result<BuildStats> {
        let start = Instant::now();

        info!(output = %self.output_path.display(), "rendering page");

        let mut html = self.renderer.render(data)?;
        if self.compact {
            html = compact(&html);
        }

        if let Some(parent) = self.output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| BuildError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.output_path, &html).map_err(|source| BuildError::Io {
            path: self.output_path.clone(),
            source,
        })?;
        debug!(path = %self.output_path.display(), bytes = html.len(), "wrote page");

        let stats = BuildStats {
            projects: data.projects.len(),
            contributions: data.contributions.len(),
            creations: data.creations.iter().map(|c| c.items.len()).sum(),
            bytes: html.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            projects = stats.projects,
            contributions = stats.contributions,
            creations = stats.creations,
            bytes = stats.bytes,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }
}
