//! One build run: profile, query, fetch, decode, render.

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use folio_core::{Config, ResponseDecoder, Settings};
use folio_generator::{BuildStats, Builder};

use crate::client::GraphQlClient;

/// Drives the full build from settings.
#[derive(Debug, Clone)]
pub struct Pipeline {
    settings: Settings,
    settings_path: PathBuf,
    client: GraphQlClient,
    output: Option<PathBuf>,
}

impl Pipeline {
    /// Create a pipeline. Relative paths in `settings` resolve against the
    /// directory of `settings_path`.
    pub fn new(settings: Settings, settings_path: impl Into<PathBuf>) -> Result<Self> {
        let client = GraphQlClient::from_settings(&settings.api)?;
        Ok(Self {
            settings,
            settings_path: settings_path.into(),
            client,
            output: None,
        })
    }

    /// Override the output path from the settings.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Settings used by this pipeline.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Absolute or settings-relative path of the profile.
    #[must_use]
    pub fn profile_path(&self) -> PathBuf {
        Settings::resolve(&self.settings_path, &self.settings.site.profile)
    }

    /// Remote profile URL, when the profile is not read from disk.
    #[must_use]
    pub fn profile_url(&self) -> Option<&str> {
        self.settings.site.profile_url.as_deref()
    }

    /// Template directory.
    #[must_use]
    pub fn template_dir(&self) -> PathBuf {
        Settings::resolve(&self.settings_path, &self.settings.templates.dir)
    }

    /// Read the profile, from the remote URL if one is set, and parse it.
    pub async fn load_config(&self) -> Result<Config> {
        let Some(url) = self.profile_url() else {
            return load_config(&self.settings, &self.profile_path());
        };

        let text = self
            .client
            .get_text(url)
            .await
            .wrap_err_with(|| format!("Failed to fetch profile {url}"))?;
        parse_profile(&self.settings, &text).wrap_err_with(|| format!("Invalid profile {url}"))
    }

    /// Run one build.
    pub async fn run(&self) -> Result<BuildStats> {
        let config = self.load_config().await?;
        tracing::info!(
            login = %config.identity.primary,
            projects = config.projects.len(),
            contributions = config.contributions.len(),
            "parsed profile"
        );

        let payload = self
            .settings
            .query_builder()
            .payload(&config)
            .wrap_err("Failed to encode query")?;

        let body = self.client.post(payload).await?;

        let data = ResponseDecoder::for_config(&config)
            .decode(&body)
            .wrap_err("Failed to decode API response")?
            .with_creations(&config.creations);

        let mut builder = Builder::from_settings(&self.settings, &self.settings_path)
            .wrap_err("Failed to load templates")?;
        if let Some(output) = &self.output {
            builder = builder.with_output_path(output);
        }

        builder.build(&data).wrap_err("Failed to render page")
    }
}

/// Read and parse a profile using the parser options from `settings`.
pub fn load_config(settings: &Settings, profile_path: &Path) -> Result<Config> {
    let text = std::fs::read_to_string(profile_path)
        .wrap_err_with(|| format!("Failed to read profile {}", profile_path.display()))?;
    parse_profile(settings, &text)
        .wrap_err_with(|| format!("Invalid profile {}", profile_path.display()))
}

fn parse_profile(settings: &Settings, text: &str) -> Result<Config> {
    let options = settings.parse_options()?;
    Ok(Config::parse_with(text, &options)?)
}
