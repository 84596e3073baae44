//! Batched GraphQL query synthesis.
//!
//! Every project and contribution becomes one aliased `repository` block.
//! Aliases are positional (`p0`, `p1`, ... and `c0`, `c1`, ...) so the
//! response decoder can find each result again in a flat mapping.

use std::fmt::Write;

use serde::Serialize;

use crate::config::{Config, ContributionRef, ProjectRef};

/// Default number of languages requested per project.
pub const DEFAULT_LANGUAGE_LIMIT: usize = 3;

/// Alias of the project at `index`.
#[must_use]
pub fn project_alias(index: usize) -> String {
    format!("p{index}")
}

/// Alias of the contribution at `index`.
#[must_use]
pub fn contribution_alias(index: usize) -> String {
    format!("c{index}")
}

/// JSON request body.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
}

/// Renders a [`Config`] into query text.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    language_limit: usize,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self {
            language_limit: DEFAULT_LANGUAGE_LIMIT,
        }
    }
}

impl QueryBuilder {
    /// Create a builder with the default language limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many languages are requested per project.
    #[must_use]
    pub fn with_language_limit(mut self, limit: usize) -> Self {
        self.language_limit = limit;
        self
    }

    /// Build the query text.
    #[must_use]
    pub fn query(&self, config: &Config) -> String {
        let mut out = String::new();
        out.push_str("query {\n");
        Self::write_user(&mut out, &config.identity.primary);
        for (index, project) in config.projects.iter().enumerate() {
            self.write_project(&mut out, index, project);
        }
        for (index, contribution) in config.contributions.iter().enumerate() {
            Self::write_contribution(&mut out, index, contribution);
        }
        out.push_str("}\n");
        out
    }

    /// Build the query and wrap it as a `{"query": ...}` JSON body.
    pub fn payload(&self, config: &Config) -> serde_json::Result<Vec<u8>> {
        let query = self.query(config);
        serde_json::to_vec(&GraphQlRequest { query: &query })
    }

    fn write_user(out: &mut String, login: &str) {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "  user(login: {}) {{", string_literal(login));
        for field in [
            "avatarUrl", "email", "bio", "name", "login", "location", "url",
        ] {
            let _ = writeln!(out, "    {field}");
        }
        out.push_str("  }\n");
    }

    fn write_project(&self, out: &mut String, index: usize, project: &ProjectRef) {
        let _ = writeln!(
            out,
            "  {}: repository(owner: {}, name: {}) {{",
            project_alias(index),
            string_literal(&project.owner),
            string_literal(&project.name)
        );
        out.push_str(
            "    nameWithOwner\n    name\n    owner {\n      login\n    }\n    description\n    url\n    homepageUrl\n    stargazers {\n      totalCount\n    }\n",
        );
        let _ = writeln!(
            out,
            "    languages(first: {}, orderBy: {{field: SIZE, direction: DESC}}) {{",
            self.language_limit
        );
        out.push_str("      nodes {\n        name\n        color\n      }\n    }\n  }\n");
    }

    fn write_contribution(out: &mut String, index: usize, contribution: &ContributionRef) {
        let _ = writeln!(
            out,
            "  {}: repository(owner: {}, name: {}) {{",
            contribution_alias(index),
            string_literal(&contribution.owner),
            string_literal(&contribution.name)
        );
        out.push_str("    name\n    owner {\n      login\n    }\n    url\n");
        if let Some(number) = contribution.pull_request() {
            let _ = writeln!(out, "    pullRequest(number: {number}) {{");
            out.push_str("      number\n      title\n      url\n    }\n");
        }
        if let Some(number) = contribution.issue() {
            let _ = writeln!(out, "    issue(number: {number}) {{");
            out.push_str("      number\n      url\n    }\n");
        }
        out.push_str("  }\n");
    }
}

/// Quote a value as a GraphQL string literal.
fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
