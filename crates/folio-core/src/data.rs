//! Decoded API data, shaped to mirror [`Config`](crate::Config).

use serde::{Deserialize, Serialize};

use crate::config::CreationCategory;

/// Everything the renderer needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Data {
    pub user: UserRecord,
    pub projects: Vec<ProjectRecord>,
    pub contributions: Vec<ContributionRecord>,

    /// Literal creations copied from the config. Empty after decoding.
    #[serde(default)]
    pub creations: Vec<CreationCategory>,
}

impl Data {
    /// Attach the config's creation categories.
    #[must_use]
    pub fn with_creations(mut self, creations: &[CreationCategory]) -> Self {
        self.creations.extend_from_slice(creations);
        self
    }
}

/// Profile owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub avatar_url: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub login: String,
    #[serde(default)]
    pub location: Option<String>,
    pub url: String,
}

/// Account that owns a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
}

/// Star count wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stargazers {
    pub total_count: u64,
}

/// A repository language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Language list wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Languages {
    #[serde(default)]
    pub nodes: Vec<Language>,
}

/// Repository shown as a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub name_with_owner: String,
    pub name: String,
    pub owner: Owner,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(default)]
    pub homepage_url: Option<String>,
    pub stargazers: Stargazers,
    #[serde(default)]
    pub languages: Languages,
}

impl ProjectRecord {
    /// Homepage without scheme or trailing slash, for display.
    #[must_use]
    pub fn homepage_display(&self) -> Option<&str> {
        self.homepage_url
            .as_deref()
            .map(|url| url.strip_prefix("https://").unwrap_or(url))
            .map(|url| url.strip_suffix('/').unwrap_or(url))
            .filter(|url| !url.is_empty())
    }
}

/// Resolved pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRecord {
    pub number: u64,
    pub title: String,
    pub url: String,
}

/// Resolved issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub number: u64,
    pub url: String,
}

/// Repository contributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionRecord {
    pub name: String,
    pub owner: Owner,
    pub url: String,
    #[serde(default)]
    pub pull_request: Option<PullRequestRecord>,
    #[serde(default)]
    pub issue: Option<IssueRecord>,
}
