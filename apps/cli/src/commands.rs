//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use standardforge_api::CodacyClient;
use standardforge_core::{ProgressReporter, ProvisionConfig, ProvisionOutcome, provision};
use standardforge_shared::{DEFAULT_LOG_LEVEL, Settings, StandardForgeError};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// StandardForge: org-wide coding standards in one command.
#[derive(Parser)]
#[command(
    name = "standardforge",
    version,
    about = "Provision a coding standard with every tool enabled and minor findings suppressed.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
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
    /// Create a coding standard and configure every available tool.
    Create {
        /// Name for the new coding standard.
        #[arg(long)]
        project_name: String,

        /// Preview the API calls without mutating anything remotely.
        #[arg(long)]
        dry_run: bool,

        /// Custom log file path (defaults to logs/standardforge_<date>.log).
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List the organization's existing coding standards.
    List,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing: a console layer honoring `-v`/`LOG_LEVEL`, plus a
/// file layer that always records debug detail to a dated log file (or the
/// `--output` override).
pub(crate) fn init_tracing(cli: &Cli) -> Result<()> {
    use std::sync::Arc;

    use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*, registry};

    let directives = |level: &str| {
        format!(
            "standardforge_cli={level},standardforge_core={level},\
             standardforge_api={level},standardforge_shared={level}"
        )
    };

    let default_level =
        std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
    let console_directives = match cli.verbose {
        0 => directives(&default_level),
        1 => directives("debug"),
        _ => directives("trace"),
    };
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_directives));

    let log_path = log_file_path(cli);
    if let Some(parent) = log_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StandardForgeError::io(parent, e))?;
        }
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| StandardForgeError::io(&log_path, e))?;

    let console_layer = match cli.log_format {
        LogFormat::Text => fmt::layer()
            .with_target(false)
            .with_filter(console_filter)
            .boxed(),
        LogFormat::Json => fmt::layer().json().with_filter(console_filter).boxed(),
    };

    // The file gets everything regardless of console verbosity.
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(EnvFilter::new(directives("debug")))
        .boxed();

    let layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = vec![console_layer, file_layer];
    registry().with(layers).init();

    tracing::debug!(path = %log_path.display(), "file logging initialized");
    Ok(())
}

/// Resolve the log file path: `--output` if given, else one file per day
/// under `logs/`.
fn log_file_path(cli: &Cli) -> PathBuf {
    if let Command::Create {
        output: Some(path), ..
    } = &cli.command
    {
        return path.clone();
    }

    let date = chrono::Local::now().format("%Y-%m-%d");
    Path::new("logs").join(format!("standardforge_{date}.log"))
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Create {
            project_name,
            dry_run,
            output: _,
        } => cmd_create(&project_name, dry_run).await,
        Command::List => cmd_list().await,
    }
}

async fn cmd_create(project_name: &str, dry_run: bool) -> Result<()> {
    if project_name.trim().is_empty() {
        return Err(eyre!("--project-name must not be empty"));
    }

    // Credentials are validated before any HTTP call.
    let settings = Settings::from_env()?;
    let client = CodacyClient::new(&settings)?;

    info!(
        name = project_name,
        org = %settings.org_name,
        provider = %settings.provider,
        dry_run,
        "provisioning coding standard"
    );

    let config = ProvisionConfig {
        name: project_name.to_string(),
        dry_run,
    };

    let reporter = CliProgress::new();
    let outcome = provision(&client, &config, &reporter).await?;

    println!();
    if dry_run {
        println!("  Dry run complete, no remote changes made.");
    } else {
        println!("  Coding standard provisioned!");
    }
    if let Some(id) = outcome.standard_id {
        println!("  ID:                {id}");
    }
    println!("  Tools enabled:     {}", outcome.tools_enabled);
    println!("  Tools skipped:     {}", outcome.tools_skipped);
    println!("  Patterns disabled: {}", outcome.patterns_disabled);
    println!("  Time:              {:.1}s", outcome.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_list() -> Result<()> {
    let settings = Settings::from_env()?;
    let client = CodacyClient::new(&settings)?;

    info!(org = %settings.org_name, provider = %settings.provider, "listing coding standards");

    let standards = client.list_coding_standards().await?;
    if standards.is_empty() {
        println!(
            "No coding standards found for {}/{}.",
            settings.provider, settings.org_name
        );
        return Ok(());
    }

    println!(
        "Coding standards for {}/{}:",
        settings.provider, settings.org_name
    );
    for standard in standards {
        let mut markers = Vec::new();
        if standard.is_draft {
            markers.push("draft");
        }
        if standard.is_default {
            markers.push("default");
        }
        let suffix = if markers.is_empty() {
            String::new()
        } else {
            format!("  [{}]", markers.join(", "))
        };
        println!("  {:>8}  {}{suffix}", standard.id, standard.name);
    }

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
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn tool_started(&self, name: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Configuring tool [{current}/{total}] {name}"));
    }

    fn done(&self, _outcome: &ProvisionOutcome) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn create_parses_required_and_flags() {
        let cli = Cli::parse_from([
            "standardforge",
            "create",
            "--project-name",
            "org-wide",
            "--dry-run",
        ]);

        match cli.command {
            Command::Create {
                project_name,
                dry_run,
                output,
            } => {
                assert_eq!(project_name, "org-wide");
                assert!(dry_run);
                assert!(output.is_none());
            }
            _ => panic!("expected create subcommand"),
        }
    }

    #[test]
    fn create_requires_project_name() {
        let result = Cli::try_parse_from(["standardforge", "create"]);
        assert!(result.is_err());
    }

    #[test]
    fn output_flag_overrides_log_path() {
        let cli = Cli::parse_from([
            "standardforge",
            "create",
            "--project-name",
            "org-wide",
            "--output",
            "/tmp/custom.log",
        ]);

        let path = log_file_path(&cli);
        assert_eq!(path, PathBuf::from("/tmp/custom.log"));
    }

    #[test]
    fn default_log_path_is_dated() {
        let cli = Cli::parse_from(["standardforge", "list"]);
        let path = log_file_path(&cli);

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("standardforge_"));
        assert!(name.ends_with(".log"));
        assert_eq!(path.parent(), Some(Path::new("logs")));
    }
}
