//! Lottery Checker - command line front end
//!
//! Takes the text lines recognized from a ticket photo, parses them, lets
//! the user correct rows, and checks the result against the official draw.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use lottery_checker::config::{self, AppConfig};
use lottery_checker::draw::HttpDrawSource;
use lottery_checker::{report, storage, BetSlipParser, CheckError, Game, LotteryChecker, ResultBridge};

/// Lottery Checker - verify recognized lottery tickets
#[derive(Parser, Debug)]
#[command(name = "lottery-checker")]
#[command(about = "Parse recognized lottery ticket text and check it against the draw")]
struct Args {
    /// Configuration file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Legacy credentials file: URL, app id and app secret on three lines
    #[arg(long)]
    cert: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse the ticket and print the editable result table
    Parse(SlipArgs),
    /// Parse the ticket, fetch the draw and print hits
    Check {
        #[command(flatten)]
        slip: SlipArgs,

        /// Seconds to wait for the draw service
        #[arg(long)]
        timeout: Option<u64>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args, Debug)]
struct SlipArgs {
    /// Game code (ssq or cjdlt)
    #[arg(short, long)]
    game: Option<String>,

    /// Recognized issue text, e.g. "第2023001期"
    #[arg(short, long)]
    issue: String,

    /// File with one recognized number line per line
    #[arg(long)]
    input: Option<PathBuf>,

    /// Correct a row before checking, e.g. --edit "4=01 02 03 04 05 06 + 07"
    #[arg(long = "edit", value_name = "ROW=TEXT")]
    edits: Vec<String>,

    /// Recognized number lines
    lines: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_or_create_config(args.config.as_deref());

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Parse(slip) => {
            let bridge = build_bridge(&slip, &config)?;
            print!("{}", report::render(&bridge));
        }
        Command::Check { slip, timeout, json } => {
            let bridge = build_bridge(&slip, &config)?;
            let mut remote = match &args.cert {
                Some(path) => config::load_credentials(path, config.remote.timeout_secs)?,
                None => config.remote.clone(),
            };
            if let Some(secs) = timeout {
                remote.timeout_secs = secs;
            }
            if !remote.is_configured() {
                anyhow::bail!("No results API configured; set [remote] in the config file or pass --cert");
            }

            let wait = Duration::from_secs(remote.timeout_secs);
            let source = HttpDrawSource::new(remote)?;
            let mut checker = LotteryChecker::new(Arc::new(source), wait);

            let outcome = checker.check_bridge(&bridge).map_err(report_error)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print!("{}", report::render(&outcome.to_bridge()));
            }
        }
    }

    Ok(())
}

/// Load configuration from the given path, the user config directory, or defaults
fn load_or_create_config(path: Option<&Path>) -> AppConfig {
    let path = match path {
        Some(path) => Some(path.to_path_buf()),
        None => storage::default_config_path().ok(),
    };
    if let Some(config_path) = path {
        if config_path.exists() {
            match config::load_config(&config_path) {
                Ok(config) => return config,
                Err(e) => eprintln!("Ignoring unreadable config {:?}: {}", config_path, e),
            }
        }
    }
    AppConfig::default()
}

/// Parse the ticket lines and apply the requested row edits
fn build_bridge(args: &SlipArgs, config: &AppConfig) -> Result<ResultBridge> {
    let game: Game = match (&args.game, config.general.default_game) {
        (Some(code), _) => code.parse()?,
        (None, Some(game)) => game,
        (None, None) => anyhow::bail!("No game given; pass --game ssq or --game cjdlt"),
    };

    let mut lines = Vec::new();
    if let Some(path) = &args.input {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {:?}", path))?;
        lines.extend(content.lines().filter(|l| !l.trim().is_empty()).map(str::to_string));
    }
    lines.extend(args.lines.iter().cloned());

    let slip = BetSlipParser::new(game)
        .parse_slip(&args.issue, &lines)
        .map_err(report_error)?;
    info!("Recognized {:?} slip for {} issue {}", slip.play_style(), game, slip.issue);

    let mut bridge = ResultBridge::from_slip(slip);
    for edit in &args.edits {
        let Some((row, text)) = edit.split_once('=') else {
            anyhow::bail!("Edit {:?} must look like ROW=TEXT", edit);
        };
        let row: usize = row.trim().parse().with_context(|| format!("Bad row in edit {:?}", edit))?;
        if !bridge.set_cell(row, 0, text) {
            warn!("Edit of row {} was rejected", row);
            eprintln!("Rejected edit for row {}: {:?}", row, text);
        }
    }
    Ok(bridge)
}

fn report_error(err: CheckError) -> anyhow::Error {
    eprintln!("{}", err.user_message());
    err.into()
}
