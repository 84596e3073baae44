//! Check command - validate settings, profile and templates without fetching

use std::path::Path;

use color_eyre::eyre::{Result, bail};
use folio_core::{Config, Settings};
use folio_generator::TemplateRegistry;

use crate::pipeline::load_config;

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Parses the profile, builds the query and loads the templates. Nothing is
/// sent over the network.
pub fn run(config_path: &Path, print_query: bool, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking settings, profile and templates");

    let mut result = ValidationResult::default();

    println!("Checking settings...");
    let Some(settings) = check_settings(config_path, &mut result) else {
        return finish(&result, strict);
    };

    println!("\nChecking profile...");
    let profile_path = Settings::resolve(config_path, &settings.site.profile);
    let loaded = match settings.site.profile_url.as_deref() {
        Some(url) => {
            println!("  - Profile is fetched from {url}, skipped");
            result.add_warning(format!("Remote profile {url} is not checked"));
            None
        }
        None => Some(load_config(&settings, &profile_path)),
    };
    let config = match loaded {
        None => None,
        Some(Ok(config)) => {
            println!(
                "  ✓ Profile valid: {} project(s), {} contribution(s), {} creation categor(ies)",
                config.projects.len(),
                config.contributions.len(),
                config.creations.len()
            );
            Some(config)
        }
        Some(Err(e)) => {
            println!("  ✗ Profile invalid: {e:#}");
            result.add_error(format!("Profile error: {e:#}"));
            None
        }
    };

    if let Some(config) = &config {
        check_config_values(config, &mut result);

        let query = settings.query_builder().query(config);
        println!("  ✓ Query built ({} bytes)", query.len());
        if print_query {
            println!();
            println!("{query}");
        }
    }

    println!("\nChecking templates...");
    check_templates(config_path, &settings, &mut result);

    finish(&result, strict)
}

fn check_settings(config_path: &Path, result: &mut ValidationResult) -> Option<Settings> {
    if !config_path.exists() {
        result.add_warning(format!(
            "Settings file {} not found, using defaults and environment",
            config_path.display()
        ));
    }

    match Settings::load_with_env(config_path) {
        Ok(settings) => {
            println!("  ✓ Settings valid");
            if settings.api.token.is_empty() {
                result.add_warning("api.token is empty (set FOLIO__API__TOKEN)");
            }
            Some(settings)
        }
        Err(e) => {
            println!("  ✗ Settings invalid: {e}");
            result.add_error(format!("Settings error: {e}"));
            None
        }
    }
}

fn check_config_values(config: &Config, result: &mut ValidationResult) {
    if config.projects.is_empty() {
        result.add_warning("Profile lists no projects");
    }

    for contribution in &config.contributions {
        if contribution.pull_request().is_none() && contribution.issue().is_none() {
            result.add_warning(format!(
                "Contribution {}/{} has neither a pull request nor an issue",
                contribution.owner, contribution.name
            ));
        }
    }

    for category in &config.creations {
        if category.items.is_empty() {
            result.add_warning(format!("Creation category '{}' is empty", category.name));
        }
    }
}

fn check_templates(config_path: &Path, settings: &Settings, result: &mut ValidationResult) {
    let template_dir = Settings::resolve(config_path, &settings.templates.dir);
    if !template_dir.exists() {
        result.add_error(format!(
            "Template directory {} does not exist",
            template_dir.display()
        ));
        return;
    }

    match TemplateRegistry::from_dir(&template_dir) {
        Ok(registry) => {
            println!("  ✓ Templates loaded from {}", template_dir.display());
            if !template_dir.join(&settings.templates.entry).is_file() {
                result.add_warning(format!(
                    "Entry template {} not found in {}, using built-in default",
                    settings.templates.entry,
                    template_dir.display()
                ));
            }
            if registry.get(&settings.templates.entry).is_none() {
                result.add_error(format!(
                    "Entry template {} is not registered",
                    settings.templates.entry
                ));
            }
        }
        Err(e) => {
            println!("  ✗ Templates invalid: {e}");
            result.add_error(format!("Template error: {e}"));
        }
    }
}

fn finish(result: &ValidationResult, strict: bool) -> Result<()> {
    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const PROFILE: &str = "[identity]\noctocat\n\n[projects]\noctocat/hello-world\n";

    fn write_site(dir: &TempDir, settings: &str) -> std::path::PathBuf {
        let settings_path = dir.path().join("folio.toml");
        fs::write(&settings_path, settings).unwrap();
        fs::write(dir.path().join("profile.txt"), PROFILE).unwrap();
        fs::create_dir_all(dir.path().join("templates")).unwrap();
        fs::write(dir.path().join("templates/entry.html"), "<main>{{ projects }}</main>").unwrap();
        settings_path
    }

    #[test]
    fn test_check_valid_site() {
        let dir = TempDir::new().unwrap();
        let path = write_site(
            &dir,
            "[site]\nprofile = \"profile.txt\"\n\n[api]\ntoken = \"abc\"\n",
        );

        run(&path, true, false).unwrap();
    }

    #[test]
    fn test_check_strict_fails_on_warnings() {
        let dir = TempDir::new().unwrap();
        // no token: warning only
        let path = write_site(&dir, "[site]\nprofile = \"profile.txt\"\n");

        assert!(run(&path, false, false).is_ok());
        let err = run(&path, false, true).unwrap_err();
        assert!(err.to_string().contains("strict mode"));
    }

    #[test]
    fn test_check_reports_invalid_profile() {
        let dir = TempDir::new().unwrap();
        let path = write_site(&dir, "[site]\nprofile = \"profile.txt\"\n");
        fs::write(dir.path().join("profile.txt"), "[projects]\nnot-a-repository\n").unwrap();

        let err = run(&path, false, false).unwrap_err();
        assert!(err.to_string().contains("error(s)"));
    }

    #[test]
    fn test_check_skips_remote_profile() {
        let dir = TempDir::new().unwrap();
        let path = write_site(
            &dir,
            "[site]\nprofile_url = \"https://example.com/profile\"\n\n[api]\ntoken = \"abc\"\n",
        );
        fs::remove_file(dir.path().join("profile.txt")).unwrap();

        assert!(run(&path, false, false).is_ok());
        let err = run(&path, false, true).unwrap_err();
        assert!(err.to_string().contains("strict mode"));
    }

    #[test]
    fn test_check_missing_template_dir() {
        let dir = TempDir::new().unwrap();
        let path = write_site(&dir, "[site]\nprofile = \"profile.txt\"\n");
        fs::remove_dir_all(dir.path().join("templates")).unwrap();

        assert!(run(&path, false, false).is_err());
    }
}
