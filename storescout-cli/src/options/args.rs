use crate::options::sub_command::Commands;
use clap::Parser;
use storescout::config::ScoutConfig;

/// Search stores page by page and verify websites for newsletters.
#[derive(Debug, Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Build main sub commands
    #[clap(subcommand)]
    pub command: Commands,
    /// Bearer token for both services.
    #[clap(long, env = "STORESCOUT_API_TOKEN", hide_env_values = true, global = true)]
    pub api_token: Option<String>,
    /// Override the search endpoint.
    #[clap(long, env = "STORESCOUT_SEARCH_ENDPOINT", global = true)]
    pub search_endpoint: Option<String>,
    /// Override the verification endpoint.
    #[clap(long, env = "STORESCOUT_VERIFY_ENDPOINT", global = true)]
    pub verify_endpoint: Option<String>,
    /// Per-request timeout in seconds.
    #[clap(long, env = "STORESCOUT_TIMEOUT_SECONDS", global = true)]
    pub timeout: Option<f64>,
    /// Pages fetched per run before pausing.
    #[clap(long, env = "STORESCOUT_MAX_PAGES", global = true)]
    pub max_pages: Option<u32>,
    /// Log at debug level.
    #[clap(short, long, global = true)]
    pub verbose: bool,
    /// Emit logs as JSON lines.
    #[clap(long, global = true)]
    pub json: bool,
}

impl Cli {
    /// Layers flag values over `base`.
    pub fn apply(&self, base: ScoutConfig) -> ScoutConfig {
        let mut config = base;
        if let Some(token) = &self.api_token {
            config = config.with_api_token(token);
        }
        if let Some(url) = &self.search_endpoint {
            config = config.with_search_endpoint(url);
        }
        if let Some(url) = &self.verify_endpoint {
            config = config.with_verify_endpoint(url);
        }
        if let Some(seconds) = self.timeout {
            config = config.with_timeout(seconds);
        }
        if let Some(pages) = self.max_pages {
            config = config.with_max_pages_per_run(pages);
        }
        config
    }
}
