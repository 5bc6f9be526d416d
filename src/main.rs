use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use dotenv::dotenv;
use log::{debug, LevelFilter};
use lint::config::App;
use lint::git::Repo;
use lint::{Patterns, Report, Scanner};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
  /// Base revision to compare against [default: origin/main]
  base: Option<String>,

  /// Head revision, or "." to compare the working tree against BASE [default: HEAD]
  head: Option<String>,

  #[clap(long, value_name = "PATH", help = "Scan a saved diff instead of running git (- reads stdin)")]
  diff_file: Option<PathBuf>,

  #[clap(long, help = "Also require `optional` on message and enum typed fields")]
  enforce_message_fields: bool,

  #[clap(long, value_name = "N", help = "Context lines passed to git diff (at least 10)")]
  context: Option<usize>,

  #[clap(short, long, help = "Enables verbose logging", default_value = "false")]
  verbose: bool
}

fn init_logger(verbose: bool) {
  let mut builder = env_logger::Builder::new();
  builder
    .filter_level(LevelFilter::Warn)
    .parse_default_env()
    .format_target(false)
    .format_timestamp(None);

  if verbose {
    builder.filter_level(LevelFilter::Debug);
  }

  builder.init();
}

fn scan_file(scanner: &Scanner<'_>, path: &Path) -> Result<Report> {
  let violations = if path == Path::new("-") {
    scanner.scan_reader(io::stdin().lock())?
  } else {
    let file = File::open(path).with_context(|| format!("Failed to open diff file {}", path.display()))?;
    scanner.scan_reader(BufReader::new(file))?
  };

  Ok(Report::new(violations))
}

fn run(cli: &Cli) -> Result<Report> {
  let app = App::new()?;
  let patterns = Patterns::new().context("Failed to compile field patterns")?;
  let policy = app.policy(cli.enforce_message_fields);
  debug!("Message fields: {:?}", policy.message_fields());
  let scanner = Scanner::new(&patterns, policy);

  if let Some(path) = &cli.diff_file {
    return scan_file(&scanner, path);
  }

  let range = app.range(cli.base.as_deref(), cli.head.as_deref());
  debug!("Comparing {}", range.spec());

  let repo = Repo::new().context("Git validation error")?;
  repo.validate(&range).context("Git validation error")?;

  let diff = repo
    .diff(&range, &app.diff_options(cli.context))
    .context("Error checking git diff")?;

  Ok(Report::new(scanner.scan(&diff)))
}

fn main() {
  dotenv().ok();

  let cli = Cli::parse();
  init_logger(cli.verbose);

  match run(&cli) {
    Ok(report) => {
      report.print();
      process::exit(report.exit_code());
    },
    Err(err) => {
      eprintln!("{} {err:#}", "error:".red().bold());
      process::exit(1);
    }
  }
}
