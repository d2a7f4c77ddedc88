pub mod options;

use anyhow::{Context, Result};
use clap::Parser;
use options::{Cli, Commands};
use std::path::Path;
use std::sync::Arc;
use storescout::client::HttpServiceClient;
use storescout::config::ScoutConfig;
use storescout::errors::ScoutError;
use storescout::events::LoggingEventSink;
use storescout::export::{search_results_csv, verification_csv, write_csv_file};
use storescout::input::read_rows_from_path;
use storescout::search::{SearchController, SearchState};
use storescout::verify::VerificationRunner;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json);

    let config = cli.apply(ScoutConfig::from_env().context("invalid environment configuration")?);
    let client = HttpServiceClient::new(config.clone()).context("invalid configuration")?;

    match cli.command {
        Commands::Search {
            country,
            city,
            category,
            all,
            output,
        } => run_search(client, &config, (country, city, category), all, &output).await,
        Commands::Verify { input, output } => run_verify(client, &input, &output).await,
    }
}

fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run_search(
    client: HttpServiceClient,
    config: &ScoutConfig,
    (country, city, category): (String, String, String),
    all: bool,
    output: &Path,
) -> Result<()> {
    let controller = Arc::new(
        SearchController::from_config(client, config)
            .with_event_sink(Arc::new(LoggingEventSink::new(Level::DEBUG))),
    );

    let stopper = Arc::clone(&controller);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() && stopper.cancel() {
            warn!("Interrupted, keeping results gathered so far");
        }
    });

    let mut outcome = controller
        .start(country, city, category)
        .await
        .map_err(user_facing)?;
    while all
        && matches!(
            outcome.state,
            SearchState::Completed {
                more_available: true
            }
        )
    {
        outcome = controller.load_more().await.map_err(user_facing)?;
    }

    let results = controller.snapshot();
    let csv_text = search_results_csv(&results)?;
    write_csv_file(output, &csv_text)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(path = %output.display(), rows = results.len(), "Wrote search results");

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    if let Some(error) = outcome.error {
        anyhow::bail!(error);
    }
    Ok(())
}

/// Reduces a library error to the message shown to the user.
fn user_facing(err: ScoutError) -> anyhow::Error {
    anyhow::anyhow!(err.user_message())
}

async fn run_verify(client: HttpServiceClient, input: &Path, output: &Path) -> Result<()> {
    let rows = read_rows_from_path(input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let runner =
        VerificationRunner::new(client).with_event_sink(Arc::new(LoggingEventSink::new(Level::DEBUG)));
    let report = runner.run(&rows).await;

    let csv_text = verification_csv(&report)?;
    write_csv_file(output, &csv_text)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(path = %output.display(), rows = report.len(), "Wrote verification results");

    println!(
        "{}",
        serde_json::json!({
            "rows": rows.len(),
            "verified": report.len(),
            "active": report.active_count(),
            "failed": report.failed_count(),
        })
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from([
            "storescout",
            "search",
            "--country",
            "Germany",
            "--city",
            "Berlin",
            "--category",
            "coffee",
            "--max-pages",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.max_pages, Some(3));
        match cli.command {
            Commands::Search {
                country,
                all,
                output,
                ..
            } => {
                assert_eq!(country, "Germany");
                assert!(!all);
                assert_eq!(output, PathBuf::from("newsletter_search_results.csv"));
            }
            Commands::Verify { .. } => panic!("expected search"),
        }
    }

    #[test]
    fn test_parse_verify() {
        let cli =
            Cli::try_parse_from(["storescout", "verify", "sites.csv", "-o", "out.csv"]).unwrap();
        match cli.command {
            Commands::Verify { input, output } => {
                assert_eq!(input, PathBuf::from("sites.csv"));
                assert_eq!(output, PathBuf::from("out.csv"));
            }
            Commands::Search { .. } => panic!("expected verify"),
        }
    }

    #[test]
    fn test_search_requires_all_fields() {
        assert!(Cli::try_parse_from(["storescout", "search", "--country", "Germany"]).is_err());
    }

    #[test]
    fn test_validation_error_shows_inline_message() {
        let err: ScoutError = storescout::errors::ValidationError::missing(["city"]).into();
        assert_eq!(user_facing(err).to_string(), "Please fill in all fields");
    }

    #[tokio::test]
    async fn test_blank_search_field_reports_inline_message() {
        let config = ScoutConfig::default().with_api_token("token");
        let client = HttpServiceClient::new(config.clone()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("results.csv");

        let err = run_search(
            client,
            &config,
            ("Germany".to_string(), " ".to_string(), "coffee".to_string()),
            false,
            &output,
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "Please fill in all fields");
        assert!(!output.exists());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "storescout",
            "verify",
            "in.csv",
            "--api-token",
            "flag-token",
            "--timeout",
            "4.5",
        ])
        .unwrap();

        let config = cli.apply(ScoutConfig::default().with_api_token("env-token"));
        assert_eq!(config.api_token, "flag-token");
        assert_eq!(config.timeout_seconds, Some(4.5));
        assert_eq!(config.max_pages_per_run, None);
    }
}
