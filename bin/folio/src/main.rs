//! folio CLI
//!
//! Builds a single portfolio page from a plain-text profile and one batched
//! GitHub GraphQL query.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for folio.
#[derive(Parser)]
#[command(
    name = "folio",
    version,
    about = "Render a portfolio page from a profile and the GitHub API"
)]
struct Cli {
    /// Path to settings file
    #[arg(short, long, default_value = "folio.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Fetch data and render the page once
    Build {
        /// Output file, overriding the settings
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },
    /// Rebuild on profile or template changes
    Watch {
        /// Quiet period before a rebuild, in milliseconds
        #[arg(long)]
        debounce_ms: Option<u64>,
    },
    /// Validate settings, profile and templates without fetching
    Check {
        /// Print the generated GraphQL query
        #[arg(long)]
        print_query: bool,
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    folio::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build { output } => {
            folio::cmd::build::run(&cli.config, output.as_deref()).await?;
        }
        Commands::Watch { debounce_ms } => {
            folio::cmd::watch::run(&cli.config, debounce_ms).await?;
        }
        Commands::Check {
            print_query,
            strict,
        } => {
            folio::cmd::check::run(&cli.config, print_query, strict)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_build_command_parsing() {
        let args = ["folio", "build", "--output", "dist/index.html"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.config, std::path::PathBuf::from("folio.toml"));
        assert_eq!(cli.verbose, 0);

        match cli.command {
            Commands::Build { output } => {
                assert_eq!(output, Some(std::path::PathBuf::from("dist/index.html")));
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_build_without_output() {
        let cli = Cli::parse_from(["folio", "build"]);

        match cli.command {
            Commands::Build { output } => assert!(output.is_none()),
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_watch_command_parsing() {
        let cli = Cli::parse_from(["folio", "watch", "--debounce-ms", "500"]);

        match cli.command {
            Commands::Watch { debounce_ms } => assert_eq!(debounce_ms, Some(500)),
            _ => panic!("Expected Watch command"),
        }
    }

    #[test]
    fn test_cli_check_command_parsing() {
        let cli = Cli::parse_from(["folio", "check", "--print-query", "--strict"]);

        match cli.command {
            Commands::Check {
                print_query,
                strict,
            } => {
                assert!(print_query);
                assert!(strict);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_verbose_and_config() {
        let cli = Cli::parse_from(["folio", "-vv", "--config", "site/folio.toml", "check"]);

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, std::path::PathBuf::from("site/folio.toml"));
    }
}
