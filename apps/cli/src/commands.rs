//! CLI command definitions, routing, and tracing setup.

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use jobsift_crawler::{Harvester, ProgressReporter};
use jobsift_shared::{
    AppConfig, CrawlConfig, JobPosting, Seniority, Source, init_config, load_config,
    resolve_db_path,
};
use jobsift_storage::{PostingFilter, Storage};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// jobsift — harvest job boards into a queryable local database.
#[derive(Parser)]
#[command(
    name = "jobsift",
    version,
    about = "Scrape job postings, extract salary/skills/seniority, and query them locally.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Scrape both sources for one keyword/region pair.
    Scrape {
        /// Keyword for the parameterized listing.
        #[arg(short, long, default_value = "Python")]
        keyword: String,

        /// Region for the parameterized listing.
        #[arg(short, long, default_value = "Europe")]
        region: String,
    },

    /// Scrape every keyword/region pair from the configured sweep matrix.
    Sweep,

    /// Remove postings that fell out of the retention window.
    Evict {
        /// Retention window in days (defaults to the configured value).
        #[arg(long)]
        days: Option<u32>,
    },

    /// Query stored postings.
    Search(SearchArgs),

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Filters for the `search` subcommand.
#[derive(clap::Args)]
pub(crate) struct SearchArgs {
    /// Substring match on the title.
    #[arg(long)]
    title: Option<String>,

    /// Substring match on the company.
    #[arg(long)]
    company: Option<String>,

    /// Substring match on the location.
    #[arg(long)]
    location: Option<String>,

    /// Substring match on the description.
    #[arg(long)]
    description: Option<String>,

    /// Exact skill tag (e.g. "Python", "C++").
    #[arg(long)]
    skill: Option<String>,

    /// Seniority tier label (e.g. "Senior", "Mid-Level").
    #[arg(long)]
    seniority: Option<String>,

    /// Source label: "Python.org" or "LinkedIn".
    #[arg(long)]
    source: Option<String>,

    /// Keep postings whose advertised salary floor is at least this much
    /// (annualized).
    #[arg(long)]
    min_salary: Option<i64>,

    /// Maximum number of results.
    #[arg(long, default_value_t = 20)]
    limit: u32,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "jobsift=info",
        1 => "jobsift=debug",
        _ => "jobsift=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Scrape { keyword, region } => cmd_scrape(&keyword, &region).await,
        Command::Sweep => cmd_sweep().await,
        Command::Evict { days } => cmd_evict(days).await,
        Command::Search(args) => cmd_search(args).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

/// Open the postings database at the configured location.
async fn open_storage(config: &AppConfig) -> Result<Storage> {
    let db_path = resolve_db_path(config)?;
    Ok(Storage::open(&db_path).await?)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_scrape(keyword: &str, region: &str) -> Result<()> {
    let config = load_config()?;
    let storage = open_storage(&config).await?;
    let harvester = Harvester::new(CrawlConfig::from(&config))?;

    info!(keyword, region, "scraping sources");

    let reporter = CliProgress::new();
    let report = harvester
        .run_targeted(keyword, region, &storage, &reporter)
        .await?;
    reporter.finish();

    println!();
    println!("  Scrape finished!");
    println!("  Keyword:  {}", report.keyword);
    println!("  Region:   {}", report.region);
    println!("  Stored:   {}", report.stored);
    println!("  Skipped:  {}", report.skipped);
    println!("  Errors:   {}", report.errors.len());
    println!("  Time:     {:.1}s", report.duration.as_secs_f64());
    for (url, error) in &report.errors {
        println!("    {url}: {error}");
    }
    println!();

    Ok(())
}

async fn cmd_sweep() -> Result<()> {
    let config = load_config()?;
    let storage = open_storage(&config).await?;
    let harvester = Harvester::new(CrawlConfig::from(&config))?;
    let total_pairs = config.sweep.keywords.len() * config.sweep.regions.len();

    info!(
        keywords = config.sweep.keywords.len(),
        regions = config.sweep.regions.len(),
        "sweeping keyword/region matrix"
    );

    let reporter = CliProgress::new();
    let report = harvester
        .run_sweep(&config.sweep, &storage, &reporter)
        .await?;
    reporter.finish();

    println!();
    println!("  Sweep finished!");
    println!("  Pairs:    {}/{}", report.completed.len(), total_pairs);
    println!("  Stored:   {}", report.stored);
    println!("  Skipped:  {}", report.skipped);
    println!("  Errors:   {}", report.errors.len());
    println!("  Time:     {:.1}s", report.duration.as_secs_f64());
    for (url, error) in &report.errors {
        println!("    {url}: {error}");
    }
    println!();

    Ok(())
}

async fn cmd_evict(days: Option<u32>) -> Result<()> {
    let config = load_config()?;
    let days = days.unwrap_or(config.retention.days);
    let today = chrono::Utc::now().date_naive();
    let cutoff = today
        .checked_sub_days(chrono::Days::new(u64::from(days)))
        .ok_or_else(|| eyre!("retention window of {days} days underflows the calendar"))?;

    let storage = open_storage(&config).await?;

    info!(days, cutoff = %cutoff, "evicting stale postings");
    let removed = storage.evict_older_than(cutoff).await?;

    println!();
    println!("  Evicted {removed} posting(s) older than {cutoff} ({days} days).");
    println!();

    Ok(())
}

async fn cmd_search(args: SearchArgs) -> Result<()> {
    let config = load_config()?;
    let storage = open_storage(&config).await?;

    let filter = PostingFilter {
        title: args.title,
        company: args.company,
        location: args.location,
        description: args.description,
        skill: args.skill,
        seniority: args.seniority.as_deref().map(str::parse::<Seniority>).transpose()?,
        source: args.source.as_deref().map(str::parse::<Source>).transpose()?,
        min_salary: args.min_salary,
        limit: args.limit,
    };

    let postings = storage.search(&filter).await?;
    if postings.is_empty() {
        println!();
        println!("  No postings matched.");
        println!();
        return Ok(());
    }

    println!();
    println!("  {} posting(s):", postings.len());
    println!();
    for posting in &postings {
        print_posting(posting);
    }

    Ok(())
}

/// Print one posting as an indented block.
fn print_posting(posting: &JobPosting) {
    let date = posting
        .posted_at
        .map(|d| d.to_string())
        .unwrap_or_else(|| "undated".to_string());

    println!("  {date:<10}  {} at {}", posting.title, posting.company);
    println!(
        "              {} [{}, {}]",
        posting.location, posting.source, posting.seniority
    );
    if let (Some(min), Some(max)) = (posting.salary_min, posting.salary_max) {
        let currency = posting.currency.as_deref().unwrap_or("");
        if min == max {
            println!("              salary: {min} {currency}");
        } else {
            println!("              salary: {min}-{max} {currency}");
        }
    }
    if !posting.skills.is_empty() {
        let tags: Vec<&str> = posting.skills.iter().map(String::as_str).collect();
        println!("              skills: {}", tags.join(", "));
    }
    println!("              {}", posting.url);
    println!();
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn posting_stored(&self, title: &str, stored: usize) {
        self.spinner.set_message(format!("Stored [{stored}] {title}"));
    }

    fn pair_done(&self, keyword: &str, region: &str, stored: usize) {
        self.spinner
            .set_message(format!("Finished {keyword} / {region} ({stored} stored)"));
    }
}
