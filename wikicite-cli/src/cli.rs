use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::{info, warn};
use wikicite::output::{
    DEFAULT_CSV_PREFIX, save_csv, write_article_human, write_json, write_summary_human,
};
use wikicite::{
    CitationScanner, DEFAULT_TEMPLATE, FieldMatch, FsSourceConfig, ScanConfig, export_records,
    scan_fs,
};
use wikicite_api::{
    ApiConfig, Credentials, DEFAULT_API_URL, DEFAULT_USER_AGENT, PASSWORD_ENV, USERNAME_ENV,
    WikiClient,
};
use wikicite_cli::input::{DEFAULT_SCAN_LIMIT, read_titles, unique_titles};
use wikicite_cli::pipeline::scan_titles;

use crate::logging;
use crate::menu;

#[derive(Parser)]
#[command(
    name = "wikicite",
    version,
    about = "Find Wikipedia Cite web citations missing required fields"
)]
pub struct Cli {
    /// Verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(flatten)]
    pub api: ApiArgs,

    #[command(flatten)]
    pub scan: ScanArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// MediaWiki connection options.
#[derive(Args)]
pub struct ApiArgs {
    /// MediaWiki api.php endpoint
    #[arg(long, global = true, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// User agent sent with every request
    #[arg(long, global = true, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Articles per API request
    #[arg(long, global = true, default_value_t = 50)]
    pub batch_size: usize,

    /// Upper bound for `scan --limit`
    #[arg(long, global = true, default_value_t = 2000)]
    pub max_articles: usize,

    /// Pause before every API request, in milliseconds
    #[arg(long, global = true, default_value_t = 300)]
    pub request_delay_ms: u64,

    /// Attempts per API request before giving up
    #[arg(long, global = true, default_value_t = 3)]
    pub max_attempts: u32,

    /// Bot user name (from Special:BotPasswords)
    #[arg(long, global = true, env = USERNAME_ENV)]
    pub username: Option<String>,

    /// Bot password
    #[arg(long, global = true, env = PASSWORD_ENV, hide_env_values = true)]
    pub password: Option<String>,

    /// Skip bot login and read anonymously
    #[arg(long, global = true)]
    pub anonymous: bool,
}

/// What counts as a complete citation.
#[derive(Args)]
pub struct ScanArgs {
    /// Citation template to check
    #[arg(long, global = true, default_value = DEFAULT_TEMPLATE)]
    pub template: String,

    /// Required field (repeatable; replaces the default title + url)
    #[arg(long = "field", global = true)]
    pub fields: Vec<String>,

    /// Accept `name=` anywhere in a citation, not only as a top-level field
    #[arg(long, global = true)]
    pub substring_match: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan articles embedding the template and export incomplete ones to CSV
    Scan {
        /// Number of articles to scan (capped at --max-articles)
        #[arg(long, default_value_t = DEFAULT_SCAN_LIMIT)]
        limit: usize,

        /// Directory for the CSV file
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// CSV file name prefix
        #[arg(long, default_value = DEFAULT_CSV_PREFIX)]
        prefix: String,
    },
    /// Analyze specific articles and print the results
    Analyze {
        /// Article titles; read from stdin (one per line) when omitted
        titles: Vec<String>,
    },
    /// Analyze wikitext files on disk (no network)
    Check {
        /// Files or directories (.wiki, .wikitext, .mediawiki, .txt)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Exclude glob (repeatable)
        #[arg(long)]
        exclude: Vec<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,
    },
    /// Interactive menu
    Menu,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

impl ApiArgs {
    fn to_config(&self) -> ApiConfig {
        let mut config = ApiConfig::default();
        config.api_url.clone_from(&self.api_url);
        config.user_agent.clone_from(&self.user_agent);
        config.batch_size = self.batch_size.max(1);
        config.max_articles = self.max_articles;
        config.request_delay = Duration::from_millis(self.request_delay_ms);
        config.retry.max_attempts = self.max_attempts;
        config
    }

    fn credentials(&self) -> Option<Credentials> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(Credentials::new(user.clone(), pass.clone())),
            _ => None,
        }
    }
}

impl ScanArgs {
    fn to_config(&self) -> ScanConfig {
        let mut config = ScanConfig::default();
        config.template_name.clone_from(&self.template);
        if !self.fields.is_empty() {
            config.required_fields.clone_from(&self.fields);
        }
        if self.substring_match {
            config.field_match = FieldMatch::Substring;
        }
        config
    }
}

/// Parse arguments and run the selected command.
///
/// # Errors
///
/// Returns an error if configuration is invalid, login fails, an API request
/// fails after retries, or output cannot be written.
pub async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let scanner = CitationScanner::new(cli.scan.to_config())?;

    match cli.command {
        Commands::Check {
            paths,
            exclude,
            format,
        } => check(paths, exclude, format, &scanner),
        Commands::Scan {
            limit,
            out_dir,
            prefix,
        } => {
            let client = connect(&cli.api).await?;
            scan_template(&client, &scanner, limit, &out_dir, &prefix).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Analyze { titles } => {
            let titles = if titles.is_empty() {
                prompt_titles()?
            } else {
                titles
            };
            let client = connect(&cli.api).await?;
            analyze_titles(&client, &scanner, &titles).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Menu => {
            let client = connect(&cli.api).await?;
            menu::run(&client, &scanner).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Build the API client and log in unless `--anonymous`.
async fn connect(args: &ApiArgs) -> Result<WikiClient> {
    let client = WikiClient::new(args.to_config())?;
    if args.anonymous {
        warn!("Skipping bot login; requests are subject to anonymous rate limits");
        return Ok(client);
    }

    let credentials = args
        .credentials()
        .ok_or(wikicite_api::ApiError::MissingCredentials)?;
    println!("\nAuthenticating bot...");
    client
        .authenticate(&credentials)
        .await
        .context("Login error")?;
    println!("{}\n", "\u{2713} Authentication successful".green());
    Ok(client)
}

/// List articles embedding the template, analyze them, export incomplete ones.
pub async fn scan_template(
    client: &WikiClient,
    scanner: &CitationScanner,
    limit: usize,
    out_dir: &Path,
    prefix: &str,
) -> Result<()> {
    let limit = limit.min(client.config().max_articles);
    let template = &scanner.config().template_name;
    println!("Listing up to {limit} articles using {{{{{template}}}}}...");

    let titles = client.find_articles_using_template(template, limit).await?;
    info!(found = titles.len(), "Articles listed");

    let reports = scan_titles(client, scanner, &titles, client.config().batch_size).await?;
    let mut stdout = io::stdout().lock();
    write_summary_human(&reports, &mut stdout)?;

    match save_csv(&export_records(&reports), out_dir, prefix)? {
        Some(path) => println!(
            "\n{} {}",
            "Results saved to:".green(),
            path.display()
        ),
        None => println!("\n{}", "No incomplete citations found.".green()),
    }
    Ok(())
}

/// Analyze named articles and print each result.
pub async fn analyze_titles(
    client: &WikiClient,
    scanner: &CitationScanner,
    titles: &[String],
) -> Result<()> {
    let titles = unique_titles(titles);
    if titles.is_empty() {
        println!("\nNo articles entered.");
        return Ok(());
    }
    println!("\nAnalyzing {} articles...", titles.len());

    let reports = scan_titles(client, scanner, &titles, client.config().batch_size).await?;
    let mut stdout = io::stdout().lock();
    for report in &reports {
        write_article_human(&report.title, &report.analysis, &mut stdout)?;
    }
    if reports.len() < titles.len() {
        writeln!(
            stdout,
            "{}",
            format!(
                "{} of {} articles were not found.",
                titles.len() - reports.len(),
                titles.len()
            )
            .yellow()
        )?;
    }
    Ok(())
}

/// Prompt for titles on stdin.
pub fn prompt_titles() -> Result<Vec<String>> {
    println!("\nEnter article titles (one per line, blank line to finish):");
    io::stdout().flush()?;
    read_titles(&mut io::stdin().lock())
}

fn check(
    paths: Vec<PathBuf>,
    exclude: Vec<String>,
    format: OutputFormat,
    scanner: &CitationScanner,
) -> Result<ExitCode> {
    let mut fs_config = FsSourceConfig::default();
    fs_config.paths = paths;
    fs_config.exclude = exclude;

    let report = scan_fs(&fs_config, scanner)?;
    let mut stdout = io::stdout().lock();

    match format {
        OutputFormat::Json => write_json(&report.articles, &mut stdout)?,
        OutputFormat::Human => {
            for article in &report.articles {
                write_article_human(&article.title, &article.analysis, &mut stdout)?;
            }
            write_summary_human(&report.articles, &mut stdout)?;
        }
    }
    for scan_err in &report.scan_errors {
        eprintln!("{}", scan_err.to_string().red());
    }

    Ok(if report.ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_attempts_flag_sets_attempt_count() {
        let args = ["wikicite", "--max-attempts", "5", "check", "dump"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.api.to_config().retry.max_attempts, 5);
    }

    #[test]
    fn test_max_retries_flag_is_rejected() {
        let args = ["wikicite", "--max-retries", "5", "check", "dump"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_field_flags_replace_defaults() {
        let cli = Cli::try_parse_from([
            "wikicite", "--field", "title", "--field", "date", "analyze", "Foo",
        ])
        .unwrap();
        assert_eq!(cli.scan.to_config().required_fields, vec!["title", "date"]);
    }
}
