//! Command-line front end: parse a deletion rule and apply it to a Twitter
//! data export.

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use histweet_core::{load_archive, parse, ParseError, RuleEngine};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "histweet", version, about = "Select tweets for deletion with a rule")]
struct Args {
    /// Deletion rule, e.g. 'age > 3m && likes < 10'
    #[arg(short, long, env = "HISTWEET_RULE")]
    rule: String,

    /// Path to tweet.js from a Twitter data export
    #[arg(short, long, env = "HISTWEET_ARCHIVE")]
    archive: Option<PathBuf>,

    /// Select tweets that do not match the rule
    #[arg(long)]
    invert: bool,

    /// Print the parse tree and exit
    #[arg(long)]
    dump: bool,

    /// Output format for selected tweet ids
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct Report<'a> {
    rule: &'a str,
    invert: bool,
    total: usize,
    selected: Vec<u64>,
}

fn setup_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Point at the offending column of a rule
fn render_parse_error(rule: &str, err: &ParseError) -> String {
    let column = rule
        .get(..err.position())
        .map_or(0, |prefix| prefix.chars().count());
    format!("{}\n  {}\n  {}^", err, rule, " ".repeat(column))
}

fn run(args: &Args) -> anyhow::Result<()> {
    let rule = match parse(&args.rule) {
        Ok(rule) => rule,
        Err(e) => bail!("invalid rule: {}", render_parse_error(&args.rule, &e)),
    };

    debug!(num_nodes = rule.num_nodes(), fields = ?rule.fields(), "rule parsed");

    if args.dump {
        print!("{}", rule);
        return Ok(());
    }

    let Some(path) = &args.archive else {
        bail!("no archive given; pass --archive or set HISTWEET_ARCHIVE");
    };

    let posts = load_archive(path)
        .with_context(|| format!("failed to load archive {}", path.display()))?;

    let engine = RuleEngine::new(rule).inverted(args.invert);
    let selected = engine.matching_ids(&posts);

    match args.format {
        OutputFormat::Text => {
            for id in &selected {
                println!("{}", id);
            }
        }
        OutputFormat::Json => {
            let report = Report {
                rule: &args.rule,
                invert: args.invert,
                total: posts.len(),
                selected,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
