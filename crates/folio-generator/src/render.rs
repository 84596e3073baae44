//! Page rendering from decoded data.

use folio_core::{
    ContributionRecord, CreationCategory, CreationRef, Data, ProjectRecord, UserRecord,
    data::Language,
};
use thiserror::Error;
use tracing::debug;

use crate::template::{
    CATEGORY, CONTRIBUTION, CREATION, LANGUAGE, PROJECT, TemplateContext, TemplateError,
    TemplateRegistry,
};

/// Rendering errors.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
}

/// Result type for rendering.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Renders [`Data`] through a template registry.
#[derive(Debug, Clone)]
pub struct Renderer {
    templates: TemplateRegistry,
    entry: String,
}

impl Renderer {
    /// Create a renderer using `entry` as the page template.
    #[must_use]
    pub fn new(templates: TemplateRegistry, entry: impl Into<String>) -> Self {
        Self {
            templates,
            entry: entry.into(),
        }
    }

    /// Render the full page.
    pub fn render(&self, data: &Data) -> Result<String> {
        debug!(
            entry = %self.entry,
            projects = data.projects.len(),
            contributions = data.contributions.len(),
            categories = data.creations.len(),
            "rendering page"
        );

        let mut ctx = user_context(&data.user);

        let projects = data
            .projects
            .iter()
            .map(|p| self.project_context(p))
            .collect::<Result<Vec<_>>>()?;
        ctx.insert_html("projects", self.templates.render_each(PROJECT, &projects)?);

        let contributions: Vec<_> = data.contributions.iter().map(contribution_context).collect();
        ctx.insert_html(
            "contributions",
            self.templates.render_each(CONTRIBUTION, &contributions)?,
        );

        let mut all_creations = String::new();
        for category in &data.creations {
            let html = self.render_category(category)?;
            ctx.insert_html(format!("creations_{}", category.name), html.clone());
            all_creations.push_str(&html);
        }
        ctx.insert_html("creations", all_creations);

        Ok(self.templates.render(&self.entry, &ctx)?)
    }

    fn project_context(&self, project: &ProjectRecord) -> Result<TemplateContext> {
        let languages: Vec<_> = project.languages.nodes.iter().map(language_context).collect();

        let mut ctx = TemplateContext::new()
            .with_var("name_with_owner", &project.name_with_owner)
            .with_var("name", &project.name)
            .with_var("owner", &project.owner.login)
            .with_var("url", &project.url)
            .with_var("stars", project.stargazers.total_count.to_string());
        ctx.insert_opt("description", project.description.as_deref());
        ctx.insert_opt(
            "homepage_url",
            project.homepage_url.as_deref().filter(|url| !url.is_empty()),
        );
        ctx.insert_opt("homepage", project.homepage_display());
        ctx.insert_html("languages", self.templates.render_each(LANGUAGE, &languages)?);
        Ok(ctx)
    }

    fn render_category(&self, category: &CreationCategory) -> Result<String> {
        let items: Vec<_> = category.items.iter().map(creation_context).collect();
        let mut ctx = TemplateContext::new().with_var("name", &category.name);
        ctx.insert_html("items", self.templates.render_each(CREATION, &items)?);
        Ok(self.templates.render(CATEGORY, &ctx)?)
    }
}

fn user_context(user: &UserRecord) -> TemplateContext {
    let mut ctx = TemplateContext::new()
        .with_var("avatar_url", &user.avatar_url)
        .with_var("login", &user.login)
        .with_var("url", &user.url)
        .with_var(
            "display_name",
            user.name.as_deref().filter(|n| !n.is_empty()).unwrap_or(&user.login),
        );
    ctx.insert_opt("name", user.name.as_deref());
    ctx.insert_opt("email", user.email.as_deref().filter(|e| !e.is_empty()));
    ctx.insert_opt("bio", user.bio.as_deref());
    ctx.insert_opt("location", user.location.as_deref());
    ctx
}

fn language_context(language: &Language) -> TemplateContext {
    let mut ctx = TemplateContext::new().with_var("name", &language.name);
    ctx.insert_opt("color", language.color.as_deref());
    ctx
}

fn contribution_context(contribution: &ContributionRecord) -> TemplateContext {
    let mut ctx = TemplateContext::new()
        .with_var("name", &contribution.name)
        .with_var("owner", &contribution.owner.login)
        .with_var("url", &contribution.url);

    if let Some(pull) = &contribution.pull_request {
        ctx.insert("pull_number", pull.number.to_string());
        ctx.insert("pull_title", &pull.title);
        ctx.insert("pull_url", &pull.url);
    }
    if let Some(issue) = &contribution.issue {
        ctx.insert("issue_number", issue.number.to_string());
        ctx.insert("issue_label", format!("#{}", issue.number));
        ctx.insert("issue_url", &issue.url);
    }
    ctx
}

fn creation_context(creation: &CreationRef) -> TemplateContext {
    TemplateContext::new()
        .with_var("title", &creation.title)
        .with_var("image_url", &creation.image_url)
        .with_var("background_color", &creation.background_color)
        .with_var("link", &creation.link)
}

/// Trim every line and drop blank ones.
#[must_use]
pub fn compact(html: &str) -> String {
    html.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
