use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use metaphor::config::{find_config_file, load_config, ClientConfig};
use metaphor::models::{SearchResponse, SearchType};
use metaphor::ui::{self, OutputFormat, Spinner};
use metaphor::{CallContext, Client, RequestOption};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Metaphor - neural web search from the command line
#[derive(Parser, Debug)]
#[command(name = "metaphor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search the web with the Metaphor API", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = Format::Auto)]
    output: Format,

    /// Metaphor API key
    #[arg(long, global = true, env = "METAPHOR_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Override the API root
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Auto => OutputFormat::Auto,
            Format::Table => OutputFormat::Table,
            Format::Json => OutputFormat::Json,
            Format::Plain => OutputFormat::Plain,
        }
    }
}

/// Ranking strategy
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Neural,
    Keyword,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search the web for a query
    #[command(alias = "s")]
    Search {
        /// Search query string
        query: String,

        /// Search mode
        #[arg(long = "type", value_enum)]
        mode: Option<Mode>,

        /// Fetch the extracted contents of every hit
        #[arg(long)]
        contents: bool,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Find pages similar to a URL
    #[command(alias = "sim")]
    Similar {
        /// Page to find neighbours of
        url: String,

        /// Leave out results from the URL's own domain
        #[arg(long)]
        exclude_source_domain: bool,

        /// Fetch the extracted contents of every hit
        #[arg(long)]
        contents: bool,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Fetch extracted contents for result IDs
    #[command(alias = "c")]
    Contents {
        /// Result identifiers
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

/// Filters shared by search and similar
#[derive(Args, Debug)]
struct FilterArgs {
    /// Number of results
    #[arg(long, short = 'n')]
    num_results: Option<u32>,

    /// Let the service rewrite the query
    #[arg(long)]
    autoprompt: bool,

    /// Only include results from this domain (repeatable)
    #[arg(long = "include-domain")]
    include_domains: Vec<String>,

    /// Exclude results from this domain (repeatable)
    #[arg(long = "exclude-domain")]
    exclude_domains: Vec<String>,

    /// Crawled on or after (YYYY-MM-DD)
    #[arg(long)]
    start_crawl_date: Option<String>,

    /// Crawled on or before (YYYY-MM-DD)
    #[arg(long)]
    end_crawl_date: Option<String>,

    /// Published on or after (YYYY-MM-DD)
    #[arg(long)]
    start_published_date: Option<String>,

    /// Published on or before (YYYY-MM-DD)
    #[arg(long)]
    end_published_date: Option<String>,
}

impl FilterArgs {
    fn to_options(&self) -> Vec<RequestOption> {
        let mut options = Vec::new();
        if let Some(n) = self.num_results {
            options.push(RequestOption::NumResults(n));
        }
        if self.autoprompt {
            options.push(RequestOption::Autoprompt(true));
        }
        if !self.include_domains.is_empty() {
            options.push(RequestOption::IncludeDomains(self.include_domains.clone()));
        }
        if !self.exclude_domains.is_empty() {
            options.push(RequestOption::ExcludeDomains(self.exclude_domains.clone()));
        }
        if let Some(date) = &self.start_crawl_date {
            options.push(RequestOption::StartCrawlDate(date.clone()));
        }
        if let Some(date) = &self.end_crawl_date {
            options.push(RequestOption::EndCrawlDate(date.clone()));
        }
        if let Some(date) = &self.start_published_date {
            options.push(RequestOption::StartPublishedDate(date.clone()));
        }
        if let Some(date) = &self.end_published_date {
            options.push(RequestOption::EndPublishedDate(date.clone()));
        }
        options
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("metaphor={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = resolve_config(&cli)?;
    let client = Client::with_config(config)?;
    let format = OutputFormat::from(cli.output);
    let ctx = CallContext::background();

    match cli.command {
        Commands::Search {
            ref query,
            mode,
            contents,
            ref filters,
        } => {
            let mut options = filters.to_options();
            if let Some(mode) = mode {
                options.push(RequestOption::SearchType(match mode {
                    Mode::Neural => SearchType::Neural,
                    Mode::Keyword => SearchType::Keyword,
                }));
            }

            let started = Instant::now();
            let spinner = spinner(&cli, "Searching...");
            let results = client.search_with_context(&ctx, query, &options).await;
            spinner.finish();
            let results = results?;

            if !cli.quiet {
                ui::print_search_header("Search results for", query, results.len(), started.elapsed());
            }
            output_results(&cli, &client, &ctx, &results, contents, format).await?;
        }
        Commands::Similar {
            ref url,
            exclude_source_domain,
            contents,
            ref filters,
        } => {
            let mut options = filters.to_options();
            if exclude_source_domain {
                options.push(RequestOption::ExcludeSourceDomain(true));
            }

            let started = Instant::now();
            let spinner = spinner(&cli, "Finding similar pages...");
            let results = client.find_similar_with_context(&ctx, url, &options).await;
            spinner.finish();
            let results = results?;

            if !cli.quiet {
                ui::print_search_header("Pages similar to", url, results.len(), started.elapsed());
            }
            output_results(&cli, &client, &ctx, &results, contents, format).await?;
        }
        Commands::Contents { ref ids } => {
            let spinner = spinner(&cli, "Fetching contents...");
            let contents = client.get_contents_with_context(&ctx, ids.iter().cloned()).await;
            spinner.finish();

            println!("{}", ui::render_contents(&contents?, format));
        }
    }

    Ok(())
}

/// Merge config file, environment and command-line flags, in increasing priority
fn resolve_config(cli: &Cli) -> Result<ClientConfig> {
    let path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => find_config_file(),
    };
    if let Some(path) = &path {
        tracing::info!("Using config file: {}", path.display());
    }

    let mut config = load_config(path.as_deref()).context("failed to load configuration")?;

    if let Some(api_key) = &cli.api_key {
        config.api_key = api_key.clone();
    }
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }

    Ok(config)
}

fn spinner(cli: &Cli, msg: &str) -> Spinner {
    if cli.quiet || !ui::is_terminal() {
        Spinner::hidden()
    } else {
        Spinner::new(msg)
    }
}

async fn output_results(
    cli: &Cli,
    client: &Client,
    ctx: &CallContext,
    results: &SearchResponse,
    with_contents: bool,
    format: OutputFormat,
) -> Result<()> {
    if !with_contents {
        println!("{}", ui::render_search(results, format));
        return Ok(());
    }

    let spinner = spinner(cli, "Fetching contents...");
    let contents = client.get_contents_with_context(ctx, results.ids()).await;
    spinner.finish();

    println!("{}", ui::render_contents(&contents?, format));
    Ok(())
}
