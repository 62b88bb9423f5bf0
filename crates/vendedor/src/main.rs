//! Vendedor CLI: runs the Vender browser regression suite
//!
//! ## Usage
//!
//! ```bash
//! vendedor run                       # Run the suite with ./vender.json
//! vendedor run --config qa.json      # Alternate configuration
//! vendedor run --open                # Open the HTML report afterwards
//! vendedor list                      # List scenarios in execution order
//! ```

use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use std::process::ExitCode;
use vender::{scenarios, VenderResult};

/// Vendedor: CLI for Vender, the CRM quoting regression suite
#[derive(Parser, Debug)]
#[command(name = "vendedor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the regression suite against a live browser
    Run(RunArgs),

    /// List the scenarios in execution order
    List,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
struct RunArgs {
    /// Suite configuration document
    #[arg(short, long, default_value = "vender.json", env = "VENDER_CONFIG")]
    config: PathBuf,

    /// Open the HTML report in the platform viewer when the run ends
    #[arg(long)]
    open: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run(args) => match run(&args) {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::FAILURE,
            Err(e) => {
                eprintln!("{} {e}", style("Error:").red().bold());
                ExitCode::FAILURE
            }
        },
        Commands::List => {
            list_scenarios();
            ExitCode::SUCCESS
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn list_scenarios() {
    for (index, scenario) in scenarios().iter().enumerate() {
        println!(
            "{:>2}. {}  {}",
            index + 1,
            style(scenario.name).cyan().bold(),
            style(scenario.description).dim(),
        );
    }
}

/// Run the suite; `Ok(true)` when every scenario passed.
#[cfg(feature = "webdriver")]
fn run(args: &RunArgs) -> VenderResult<bool> {
    use vender::{run_suite, Session, SuiteConfig};

    let config = SuiteConfig::load(&args.config)?;
    let open_when_done = args.open || config.report.open_when_done;
    let session = Session::open(config)?;

    let summary = run_suite(&session);
    let all_passed = summary.all_passed();
    println!(
        "\n{} {} passed, {} failed, {} total",
        if all_passed {
            style("ok").green().bold()
        } else {
            style("FAILED").red().bold()
        },
        summary.passed,
        summary.failed,
        summary.total,
    );

    let report = session.close()?;
    println!("Report: {}", style(report.display()).underlined());
    if open_when_done {
        open_report(&report);
    }
    Ok(all_passed)
}

#[cfg(not(feature = "webdriver"))]
fn run(_args: &RunArgs) -> VenderResult<bool> {
    Err(vender::VenderError::config(
        "browser control not compiled in; rebuild with --features webdriver",
    ))
}

#[cfg(feature = "webdriver")]
fn open_report(path: &std::path::Path) {
    #[cfg(target_os = "macos")]
    let mut command = {
        let mut c = std::process::Command::new("open");
        c.arg(path);
        c
    };
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut c = std::process::Command::new("cmd");
        c.args(["/C", "start", ""]).arg(path);
        c
    };
    #[cfg(all(unix, not(target_os = "macos")))]
    let mut command = {
        let mut c = std::process::Command::new("xdg-open");
        c.arg(path);
        c
    };
    if let Err(e) = command.spawn() {
        tracing::warn!(error = %e, report = %path.display(), "could not open report");
    }
}
