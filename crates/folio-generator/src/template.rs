//! HTML template system for page generation.
//!
//! Provides a lightweight template system using string interpolation rather than
//! heavy template engines like Tera or Handlebars. Lists are rendered by
//! applying an item template to every element and interpolating the joined
//! fragments.

use std::{collections::HashMap, path::Path};

use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// Template rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Missing required variable.
    #[error("missing required variable \"{variable}\" in template {template}")]
    MissingVariable { template: String, variable: String },

    /// Template not found.
    #[error("template not found: {0}")]
    NotFound(String),

    /// Invalid template syntax.
    #[error("invalid template syntax in {template}: {message}")]
    InvalidSyntax { template: String, message: String },

    /// Template directory could not be read.
    #[error("could not read templates from {path}: {message}")]
    Load { path: String, message: String },
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Escape text for inclusion in HTML.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Template context with variables for interpolation.
///
/// Values added with [`insert`](Self::insert) are escaped; values added with
/// [`insert_html`](Self::insert_html) are trusted fragments.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: HashMap<String, String>,
}

impl TemplateContext {
    /// Create a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a text variable, escaping it.
    pub fn insert(&mut self, key: impl Into<String>, value: impl AsRef<str>) {
        self.variables
            .insert(key.into(), escape_html(value.as_ref()));
    }

    /// Insert a pre-rendered HTML fragment.
    pub fn insert_html(&mut self, key: impl Into<String>, html: impl Into<String>) {
        self.variables.insert(key.into(), html.into());
    }

    /// Insert a text variable only when present.
    pub fn insert_opt(&mut self, key: impl Into<String>, value: Option<impl AsRef<str>>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Create context with an additional text variable.
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl AsRef<str>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Check if a variable exists.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }
}

/// A simple template that supports variable interpolation.
///
/// Variables are specified as `{{ variable_name }}` in the template string;
/// `{{ variable_name? }}` renders as empty when the variable is absent.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    content: String,
}

impl Template {
    /// Create a new template with the given name and content.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Get the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the template with the given context.
    ///
    /// Placeholders are resolved against the template text only, so values
    /// containing `{{` are never expanded.
    pub fn render(&self, context: &TemplateContext) -> Result<String> {
        let mut result = String::with_capacity(self.content.len());
        let mut rest = self.content.as_str();

        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or_else(|| TemplateError::InvalidSyntax {
                template: self.name.clone(),
                message: "unclosed {{ delimiter".to_string(),
            })?;

            let var_name = after[..end].trim();

            // Check for optional variable syntax: {{ variable? }}
            let (var_name, optional) = if let Some(stripped) = var_name.strip_suffix('?') {
                (stripped.trim_end(), true)
            } else {
                (var_name, false)
            };

            match context.get(var_name) {
                Some(value) => result.push_str(value),
                None if optional => {}
                None => {
                    return Err(TemplateError::MissingVariable {
                        template: self.name.clone(),
                        variable: var_name.to_string(),
                    });
                }
            }

            rest = &after[end + 2..];
        }

        result.push_str(rest);
        Ok(result)
    }
}

/// Registry of templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    /// Create a new registry with default templates.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register_defaults();
        registry
    }

    /// Create a registry from a template directory, on top of the defaults.
    ///
    /// Templates are named by their `/`-separated path relative to `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut registry = Self::new();
        registry.load_dir(dir)?;
        Ok(registry)
    }

    /// Register default built-in templates.
    fn register_defaults(&mut self) {
        self.register(Template::new(ENTRY, DEFAULT_ENTRY_TEMPLATE));
        self.register(Template::new(PROJECT, DEFAULT_PROJECT_TEMPLATE));
        self.register(Template::new(LANGUAGE, DEFAULT_LANGUAGE_TEMPLATE));
        self.register(Template::new(CONTRIBUTION, DEFAULT_CONTRIBUTION_TEMPLATE));
        self.register(Template::new(CATEGORY, DEFAULT_CATEGORY_TEMPLATE));
        self.register(Template::new(CREATION, DEFAULT_CREATION_TEMPLATE));
    }

    /// Register every file under `dir`.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        let load_error = |message: String| TemplateError::Load {
            path: dir.display().to_string(),
            message,
        };

        let mut count = 0;
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| load_error(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let name = path
                .strip_prefix(dir)
                .map_err(|e| load_error(e.to_string()))?
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let content = std::fs::read_to_string(path)
                .map_err(|e| load_error(format!("{}: {e}", path.display())))?;

            debug!(template = %name, "registered template");
            self.register(Template::new(name, content));
            count += 1;
        }

        Ok(count)
    }

    /// Register a template.
    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.name.clone(), template);
    }

    /// Get a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Render a named template with the given context.
    pub fn render(&self, name: &str, context: &TemplateContext) -> Result<String> {
        let template = self
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
        template.render(context)
    }

    /// Render a named template once per context and join the results.
    pub fn render_each<'a>(
        &self,
        name: &str,
        contexts: impl IntoIterator<Item = &'a TemplateContext>,
    ) -> Result<String> {
        contexts
            .into_iter()
            .map(|ctx| self.render(name, ctx))
            .collect()
    }
}

/// Name of the built-in entry template.
pub const ENTRY: &str = "entry.html";
/// Item template for projects.
pub const PROJECT: &str = "project.html";
/// Item template for project languages.
pub const LANGUAGE: &str = "language.html";
/// Item template for contributions.
pub const CONTRIBUTION: &str = "contribution.html";
/// Wrapper template for a creation category.
pub const CATEGORY: &str = "category.html";
/// Item template for creations.
pub const CREATION: &str = "creation.html";

/// Default entry template.
pub const DEFAULT_ENTRY_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ display_name }}</title>
    <meta name="description" content="{{ bio? }}">
</head>
<body>
    <header class="profile">
        <img class="avatar" src="{{ avatar_url }}" alt="{{ login }}">
        <h1><a href="{{ url }}">{{ display_name }}</a></h1>
        <p class="bio">{{ bio? }}</p>
        <p class="location">{{ location? }}</p>
        <a class="email" href="mailto:{{ email? }}">{{ email? }}</a>
    </header>
    <main>
        <section class="projects">
            {{ projects }}
        </section>
        <section class="contributions">
            {{ contributions }}
        </section>
        {{ creations }}
    </main>
</body>
</html>
"##;

/// Default project item template.
pub const DEFAULT_PROJECT_TEMPLATE: &str = r#"<article class="project">
    <h2><a href="{{ url }}">{{ name }}</a></h2>
    <p class="description">{{ description? }}</p>
    <a class="homepage" href="{{ homepage_url? }}">{{ homepage? }}</a>
    <span class="stars">{{ stars }}</span>
    <ul class="languages">{{ languages }}</ul>
</article>
"#;

/// Default language item template.
pub const DEFAULT_LANGUAGE_TEMPLATE: &str =
    r#"<li class="language" style="color: {{ color? }}">{{ name }}</li>
"#;

/// Default contribution item template.
pub const DEFAULT_CONTRIBUTION_TEMPLATE: &str = r#"<article class="contribution">
    <h3><a href="{{ url }}">{{ owner }}/{{ name }}</a></h3>
    <a class="pull" href="{{ pull_url? }}">{{ pull_title? }}</a>
    <a class="issue" href="{{ issue_url? }}">{{ issue_label? }}</a>
</article>
"#;

/// Default creation category template.
pub const DEFAULT_CATEGORY_TEMPLATE: &str = r#"<section class="creations {{ name }}">
    {{ items }}
</section>
"#;

/// Default creation item template.
pub const DEFAULT_CREATION_TEMPLATE: &str = r#"<a class="creation" href="{{ link }}" style="background-color: {{ background_color }}">
    <img src="{{ image_url }}" alt="{{ title }}">
    <span>{{ title }}</span>
</a>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_render() {
        let template = Template::new("test", "Hello, {{ name }}!");
        let ctx = TemplateContext::new().with_var("name", "World");

        assert_eq!(template.render(&ctx).unwrap(), "Hello, World!");
    }

    #[test]
    fn test_template_escapes_text() {
        let template = Template::new("test", "<p>{{ bio }}</p>");
        let ctx = TemplateContext::new().with_var("bio", "Rust & <GraphQL>");

        assert_eq!(
            template.render(&ctx).unwrap(),
            "<p>Rust &amp; &lt;GraphQL&gt;</p>"
        );
    }

    #[test]
    fn test_template_html_fragment() {
        let template = Template::new("test", "<ul>{{ items }}</ul>");
        let mut ctx = TemplateContext::new();
        ctx.insert_html("items", "<li>a</li>");

        assert_eq!(template.render(&ctx).unwrap(), "<ul><li>a</li></ul>");
    }

    #[test]
    fn test_values_are_not_expanded() {
        let template = Template::new("test", "{{ a }}{{ b }}");
        let mut ctx = TemplateContext::new();
        ctx.insert_html("a", "{{ b }}");
        ctx.insert_html("b", "x");

        assert_eq!(template.render(&ctx).unwrap(), "{{ b }}x");
    }

    #[test]
    fn test_template_multiple_vars() {
        let template = Template::new("test", "{{ greeting }}, {{ name }}!");
        let ctx = TemplateContext::new()
            .with_var("greeting", "Hi")
            .with_var("name", "Octocat");

        assert_eq!(template.render(&ctx).unwrap(), "Hi, Octocat!");
    }

    #[test]
    fn test_template_missing_var() {
        let template = Template::new("test", "Hello, {{ name }}!");
        let ctx = TemplateContext::new();

        let err = template.render(&ctx).unwrap_err();
        assert!(matches!(
            err,
            TemplateError::MissingVariable { ref variable, .. } if variable == "name"
        ));
    }

    #[test]
    fn test_template_optional_var() {
        let template = Template::new("test", "Hello{{ suffix? }}!");
        let ctx = TemplateContext::new();

        assert_eq!(template.render(&ctx).unwrap(), "Hello!");
    }

    #[test]
    fn test_template_unclosed_delimiter() {
        let template = Template::new("test", "Hello, {{ name");
        let ctx = TemplateContext::new().with_var("name", "World");

        assert!(matches!(
            template.render(&ctx),
            Err(TemplateError::InvalidSyntax { .. })
        ));
    }

    #[test]
    fn test_registry_defaults() {
        let registry = TemplateRegistry::new();

        for name in [ENTRY, PROJECT, LANGUAGE, CONTRIBUTION, CATEGORY, CREATION] {
            assert!(registry.get(name).is_some(), "missing {name}");
        }
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_registry_render_each() {
        let mut registry = TemplateRegistry::default();
        registry.register(Template::new("item", "<li>{{ v }}</li>"));

        let contexts = [
            TemplateContext::new().with_var("v", "1"),
            TemplateContext::new().with_var("v", "2"),
        ];
        assert_eq!(
            registry.render_each("item", &contexts).unwrap(),
            "<li>1</li><li>2</li>"
        );
        assert!(matches!(
            registry.render("missing", &TemplateContext::new()),
            Err(TemplateError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_dir_names_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("partials")).unwrap();
        std::fs::write(dir.path().join("entry.html"), "custom {{ login }}").unwrap();
        std::fs::write(dir.path().join("partials/nav.html"), "<nav></nav>").unwrap();

        let registry = TemplateRegistry::from_dir(dir.path()).unwrap();

        assert!(registry.get("partials/nav.html").is_some());
        let ctx = TemplateContext::new().with_var("login", "octocat");
        assert_eq!(registry.render(ENTRY, &ctx).unwrap(), "custom octocat");
        // Built-ins not overridden by the directory stay available.
        assert!(registry.get(PROJECT).is_some());
    }

    #[test]
    fn test_load_dir_missing() {
        let mut registry = TemplateRegistry::default();
        let err = registry
            .load_dir(Path::new("/nonexistent/templates"))
            .unwrap_err();
        assert!(matches!(err, TemplateError::Load { .. }));
    }
}
