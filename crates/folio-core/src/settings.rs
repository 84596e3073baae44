//! Build settings management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    config::{DEFAULT_COMMENT_MARKER, ParseOptions, SectionKind},
    error::{CoreError, Result},
    query::{DEFAULT_LANGUAGE_LIMIT, QueryBuilder},
};

/// Main settings structure for folio.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Profile source settings.
    #[serde(default)]
    pub site: SiteSettings,

    /// Remote API settings.
    #[serde(default)]
    pub api: ApiSettings,

    /// Template settings.
    #[serde(default)]
    pub templates: TemplateSettings,

    /// Output settings.
    #[serde(default)]
    pub output: OutputSettings,

    /// Watch mode settings.
    #[serde(default)]
    pub watch: WatchSettings,
}

/// Profile source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSettings {
    /// Path to the profile text.
    #[serde(default = "default_profile")]
    pub profile: PathBuf,

    /// Fetch the profile from this http(s) URL instead of `profile`.
    #[serde(default)]
    pub profile_url: Option<String>,

    /// Comment marker used by the profile.
    #[serde(default = "default_comment_marker")]
    pub comment_marker: String,

    /// Section order for profiles without headers.
    #[serde(default = "default_layout")]
    pub layout: Vec<String>,
}

/// Remote API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// GraphQL endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Bearer token. Usually supplied through `FOLIO__API__TOKEN`.
    #[serde(default)]
    pub token: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Languages requested per project.
    #[serde(default = "default_languages")]
    pub languages: usize,
}

/// Template settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSettings {
    /// Template directory.
    #[serde(default = "default_template_dir")]
    pub dir: PathBuf,

    /// Entry template, relative to `dir`.
    #[serde(default = "default_entry")]
    pub entry: String,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Rendered file path.
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// Trim whitespace from every output line.
    #[serde(default = "default_true")]
    pub compact: bool,
}

/// Watch mode settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchSettings {
    /// Quiet period before a rebuild, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

// Default value functions
fn default_profile() -> PathBuf {
    PathBuf::from(".config")
}

fn default_comment_marker() -> String {
    DEFAULT_COMMENT_MARKER.to_string()
}

fn default_layout() -> Vec<String> {
    ["identity", "projects", "contributions", "creations"]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

fn default_endpoint() -> String {
    "https://api.github.com/graphql".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_languages() -> usize {
    DEFAULT_LANGUAGE_LIMIT
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_entry() -> String {
    "entry.html".to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("index.html")
}

fn default_true() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    123
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            profile_url: None,
            comment_marker: default_comment_marker(),
            layout: default_layout(),
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            token: String::new(),
            timeout_secs: default_timeout_secs(),
            languages: default_languages(),
        }
    }
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            dir: default_template_dir(),
            entry: default_entry(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            compact: true,
        }
    }
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::settings(format!(
                "Settings file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content).map_err(|e| {
            CoreError::settings_with_source(
                format!("Failed to parse settings file: {}", path.display()),
                e,
            )
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Load settings layered with `FOLIO__*` environment variables.
    ///
    /// A missing file is allowed here so a build can be configured from the
    /// environment alone.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix("FOLIO").separator("__"))
            .build()?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings.
    fn validate(&self) -> Result<()> {
        if self.api.endpoint.is_empty() {
            return Err(CoreError::settings("api.endpoint cannot be empty"));
        }

        if self.templates.entry.is_empty() {
            return Err(CoreError::settings("templates.entry cannot be empty"));
        }

        if let Some(url) = self
            .site
            .profile_url
            .as_deref()
            .filter(|url| !(url.starts_with("http://") || url.starts_with("https://")))
        {
            return Err(CoreError::settings(format!(
                "site.profile_url must be an http(s) URL, got \"{url}\""
            )));
        }

        self.parse_options()?;

        if self.api.token.is_empty() {
            tracing::warn!("api.token is empty, requests will be unauthenticated");
        }

        Ok(())
    }

    /// Profile parser options.
    pub fn parse_options(&self) -> Result<ParseOptions> {
        let layout = self
            .site
            .layout
            .iter()
            .map(|name| SectionKind::from_name(name))
            .collect::<Result<Vec<_>>>()?;

        Ok(ParseOptions::default()
            .with_comment_marker(self.site.comment_marker.clone())
            .with_layout(layout))
    }

    /// Query builder matching these settings.
    #[must_use]
    pub fn query_builder(&self) -> QueryBuilder {
        QueryBuilder::new().with_language_limit(self.api.languages)
    }

    /// Resolve a relative path against the directory holding the settings file.
    #[must_use]
    pub fn resolve(base: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| path.to_path_buf(), |dir| dir.join(path))
        }
    }
}
