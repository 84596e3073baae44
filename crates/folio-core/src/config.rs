//! Profile text parsing.
//!
//! A profile is a small line-oriented text file made of blank-line separated
//! sections. Sections are either identified by position (the legacy layout,
//! where the section count must match [`ParseOptions::layout`] exactly) or
//! tagged with a header line such as `[projects]` or `[creations keyboards]`.
//!
//! ```text
//! # comment lines are dropped before splitting
//! [identity]
//! octocat
//!
//! [projects]
//! octocat/hello-world
//!
//! [contributions]
//! rust-lang/rust 1234 0
//!
//! [creations keyboards]
//! First Build|#fff kb.png https://example.com/kb
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, Result};

/// Default comment marker.
pub const DEFAULT_COMMENT_MARKER: &str = "#";

/// Parsed profile configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Profile owner.
    pub identity: Identity,

    /// Repositories shown as projects, in display order.
    #[serde(default)]
    pub projects: Vec<ProjectRef>,

    /// Repositories contributed to, in display order.
    #[serde(default)]
    pub contributions: Vec<ContributionRef>,

    /// Creation categories in declaration order.
    #[serde(default)]
    pub creations: Vec<CreationCategory>,
}

/// Handles identifying the profile owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Handle used for the user lookup.
    pub primary: String,

    /// Optional secondary handle.
    #[serde(default)]
    pub secondary: Option<String>,
}

/// Reference to a repository shown as a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub owner: String,
    pub name: String,
}

/// Reference to a contribution; a number of `0` means "not set".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRef {
    pub owner: String,
    pub name: String,
    pub pull_number: u64,
    pub issue_number: u64,
}

impl ContributionRef {
    /// Pull request number, if one is set.
    #[must_use]
    pub fn pull_request(&self) -> Option<u64> {
        (self.pull_number != 0).then_some(self.pull_number)
    }

    /// Issue number, if one is set.
    #[must_use]
    pub fn issue(&self) -> Option<u64> {
        (self.issue_number != 0).then_some(self.issue_number)
    }
}

/// A literal creation entry. Never fetched remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationRef {
    pub title: String,
    pub image_url: String,
    pub background_color: String,
    pub link: String,
}

/// A named list of creations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationCategory {
    pub name: String,
    pub items: Vec<CreationRef>,
}

/// Kind of a top-level section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKind {
    Identity,
    Projects,
    Contributions,
    /// Creations of the named category.
    Creations(String),
}

impl SectionKind {
    /// Name used in error messages and headers.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Identity => "identity",
            Self::Projects => "projects",
            Self::Contributions => "contributions",
            Self::Creations(_) => "creations",
        }
    }

    /// Parse a section name like `projects` or `creations keyboards`.
    pub fn from_name(name: &str) -> Result<Self> {
        let mut words = name.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some("identity"), None, _) => Ok(Self::Identity),
            (Some("projects"), None, _) => Ok(Self::Projects),
            (Some("contributions"), None, _) => Ok(Self::Contributions),
            (Some("creations"), None, _) => Ok(Self::Creations("creations".to_string())),
            (Some("creations"), Some(category), None) => {
                Ok(Self::Creations(category.to_string()))
            }
            _ => Err(CoreError::syntax_at(
                "profile",
                name,
                "unknown section name",
            )),
        }
    }

    /// Parse a header line like `[projects]` or `[creations keyboards]`.
    ///
    /// Returns `Ok(None)` when the line is not a header at all.
    fn from_header(line: &str) -> Result<Option<Self>> {
        let Some(inner) = line
            .trim()
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        else {
            return Ok(None);
        };

        Self::from_name(inner).map(Some)
    }
}

/// A parsed section, before assembly into a [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Identity(Identity),
    Projects(Vec<ProjectRef>),
    Contributions(Vec<ContributionRef>),
    Creations(CreationCategory),
}

/// Parser options.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Lines starting with this marker are dropped.
    pub comment_marker: String,

    /// Expected sections, in order, for profiles without headers.
    pub layout: Vec<SectionKind>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            comment_marker: DEFAULT_COMMENT_MARKER.to_string(),
            layout: vec![
                SectionKind::Identity,
                SectionKind::Projects,
                SectionKind::Contributions,
                SectionKind::Creations("creations".to_string()),
            ],
        }
    }
}

impl ParseOptions {
    /// Set the comment marker.
    #[must_use]
    pub fn with_comment_marker(mut self, marker: impl Into<String>) -> Self {
        self.comment_marker = marker.into();
        self
    }

    /// Set the positional layout.
    #[must_use]
    pub fn with_layout(mut self, layout: Vec<SectionKind>) -> Self {
        self.layout = layout;
        self
    }
}

impl Config {
    /// Parse profile text with default options.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with(text, &ParseOptions::default())
    }

    /// Parse profile text.
    pub fn parse_with(text: &str, options: &ParseOptions) -> Result<Self> {
        let sections = parse_sections(text, options)?;
        Self::from_sections(sections)
    }

    /// Assemble a config from parsed sections.
    pub fn from_sections(sections: Vec<Section>) -> Result<Self> {
        let mut identity = None;
        let mut projects = None;
        let mut contributions = None;
        let mut creations: Vec<CreationCategory> = Vec::new();

        for section in sections {
            match section {
                Section::Identity(value) => set_once(&mut identity, value, "identity")?,
                Section::Projects(value) => set_once(&mut projects, value, "projects")?,
                Section::Contributions(value) => {
                    set_once(&mut contributions, value, "contributions")?;
                }
                Section::Creations(category) => {
                    if creations.iter().any(|c| c.name == category.name) {
                        return Err(CoreError::syntax(
                            "creations",
                            format!("duplicate creation category \"{}\"", category.name),
                        ));
                    }
                    creations.push(category);
                }
            }
        }

        let identity =
            identity.ok_or_else(|| CoreError::syntax("identity", "missing identity section"))?;

        Ok(Self {
            identity,
            projects: projects.unwrap_or_default(),
            contributions: contributions.unwrap_or_default(),
            creations,
        })
    }

    /// Look up a creation category by name.
    #[must_use]
    pub fn creation_category(&self, name: &str) -> Option<&CreationCategory> {
        self.creations.iter().find(|c| c.name == name)
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, section: &str) -> Result<()> {
    if slot.is_some() {
        return Err(CoreError::syntax(section, "section declared more than once"));
    }
    *slot = Some(value);
    Ok(())
}

/// Drop comment lines, including their trailing newline.
fn strip_comments(text: &str, marker: &str) -> String {
    if marker.is_empty() {
        return text.to_string();
    }
    text.split_inclusive('\n')
        .filter(|line| !line.starts_with(marker))
        .collect()
}

/// Split profile text into typed sections.
pub fn parse_sections(text: &str, options: &ParseOptions) -> Result<Vec<Section>> {
    let stripped = strip_comments(text, &options.comment_marker);
    let trimmed = stripped.trim();
    let blocks: Vec<&str> = trimmed.split("\n\n").collect();

    let tagged = match blocks.first().and_then(|b| b.lines().next()) {
        Some(first) => SectionKind::from_header(first)?.is_some(),
        None => false,
    };

    if tagged {
        debug!(blocks = blocks.len(), "parsing tagged profile");
        blocks.into_iter().map(parse_tagged_block).collect()
    } else {
        debug!(blocks = blocks.len(), "parsing positional profile");
        if blocks.len() != options.layout.len() {
            return Err(CoreError::syntax(
                "profile",
                format!(
                    "expected {} sections, found {}",
                    options.layout.len(),
                    blocks.len()
                ),
            ));
        }
        options
            .layout
            .iter()
            .zip(blocks)
            .map(|(kind, body)| parse_section(kind, body))
            .collect()
    }
}

fn parse_tagged_block(block: &str) -> Result<Section> {
    let block = block.trim_start();
    let (header, body) = block.split_once('\n').unwrap_or((block, ""));
    let kind = SectionKind::from_header(header)?.ok_or_else(|| {
        CoreError::syntax_at("profile", header, "expected a section header")
    })?;
    parse_section(&kind, body)
}

fn parse_section(kind: &SectionKind, body: &str) -> Result<Section> {
    debug!(section = kind.label(), "parsing section");
    Ok(match kind {
        SectionKind::Identity => Section::Identity(parse_identity(body)?),
        SectionKind::Projects => Section::Projects(
            content_lines(body)
                .map(parse_project)
                .collect::<Result<_>>()?,
        ),
        SectionKind::Contributions => Section::Contributions(
            content_lines(body)
                .map(parse_contribution)
                .collect::<Result<_>>()?,
        ),
        SectionKind::Creations(name) => Section::Creations(CreationCategory {
            name: name.clone(),
            items: content_lines(body)
                .map(parse_creation)
                .collect::<Result<_>>()?,
        }),
    })
}

fn content_lines(body: &str) -> impl Iterator<Item = &str> {
    body.lines().map(str::trim).filter(|line| !line.is_empty())
}

fn parse_identity(body: &str) -> Result<Identity> {
    let mut lines = content_lines(body);
    let primary = lines
        .next()
        .ok_or_else(|| CoreError::syntax("identity", "missing primary handle"))?;
    let secondary = lines.next();
    if let Some(extra) = lines.next() {
        return Err(CoreError::syntax_at(
            "identity",
            extra,
            "expected at most two lines",
        ));
    }

    Ok(Identity {
        primary: primary.to_string(),
        secondary: secondary.map(str::to_string),
    })
}

fn is_handle(part: &str) -> bool {
    !part.is_empty() && !part.chars().any(char::is_whitespace)
}

fn split_repository<'a>(section: &str, line: &str, token: &'a str) -> Result<(&'a str, &'a str)> {
    let mut parts = token.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(name), None) if is_handle(owner) && is_handle(name) => {
            Ok((owner, name))
        }
        _ => Err(CoreError::syntax_at(
            section,
            line,
            "expected repository as owner/name",
        )),
    }
}

fn parse_project(line: &str) -> Result<ProjectRef> {
    let (owner, name) = split_repository("projects", line, line)?;
    Ok(ProjectRef {
        owner: owner.to_string(),
        name: name.to_string(),
    })
}

fn parse_contribution(line: &str) -> Result<ContributionRef> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [repository, pull, issue] = tokens.as_slice() else {
        return Err(CoreError::syntax_at(
            "contributions",
            line,
            "expected \"owner/name pull issue\"",
        ));
    };

    let (owner, name) = split_repository("contributions", line, *repository)?;
    let number = |token: &str, what: &str| {
        token.parse::<u64>().map_err(|_| {
            CoreError::syntax_at("contributions", line, format!("invalid {what} number"))
        })
    };

    Ok(ContributionRef {
        owner: owner.to_string(),
        name: name.to_string(),
        pull_number: number(*pull, "pull request")?,
        issue_number: number(*issue, "issue")?,
    })
}

fn parse_creation(line: &str) -> Result<CreationRef> {
    let (title, meta) = line
        .split_once('|')
        .ok_or_else(|| CoreError::syntax_at("creations", line, "missing \"|\" separator"))?;

    let tokens: Vec<&str> = meta.split_whitespace().collect();
    let [background_color, image_url, link] = tokens.as_slice() else {
        return Err(CoreError::syntax_at(
            "creations",
            line,
            "expected \"title|color image link\"",
        ));
    };

    Ok(CreationRef {
        title: title.trim().to_string(),
        image_url: (*image_url).to_string(),
        background_color: (*background_color).to_string(),
        link: (*link).to_string(),
    })
}
