//! CLI entry point for graft

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use graft::{
    DependencyGraph, ExtractConfig, GraftError, RewritePolicy, component_name, extract,
    print_json, print_summary, resolve_versions,
};
use tracing_subscriber::EnvFilter;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "graft")]
#[command(about = "Lift a component and its dependency tree into a self-contained folder")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto", global = true)]
    color: ColorMode,

    /// Log every file decision (same as RUST_LOG=graft=debug)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Copy an entry file and its dependency graph into a new folder
    Extract(ExtractArgs),
    /// Print dependency versions declared in the nearest package.json
    Versions(VersionsArgs),
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// The entry file to extract
    entry: PathBuf,

    /// Dependency graph JSON produced by the analyzer ({"file": ["dep", ...]})
    #[arg(short, long, value_name = "FILE")]
    graph: PathBuf,

    /// Output directory; files land in <OUT>/<entry name>
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    out: PathBuf,

    /// Do not pick up stylesheets and images next to graph files
    #[arg(long = "no-assets")]
    no_assets: bool,

    /// Keep original extensions even for component-style scripts
    #[arg(long = "no-promote")]
    no_promote: bool,

    /// Which relative imports get their extension rewritten
    #[arg(long = "rewrite", value_name = "POLICY", default_value = "promoted-only")]
    rewrite: RewritePolicy,

    /// Skip writing the JSON and Markdown dependency reports
    #[arg(long = "no-reports")]
    no_reports: bool,

    /// Package whose version to look up (can be used multiple times)
    #[arg(short = 'p', long = "package", value_name = "NAME")]
    packages: Vec<String>,

    /// Output the run outcome as JSON
    #[arg(long = "json")]
    json: bool,
}

#[derive(Args, Debug)]
struct VersionsArgs {
    /// Directory to start searching upward from
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    dir: PathBuf,

    /// Package names to look up
    #[arg(default_values_t = ["react".to_string(), "react-dom".to_string()])]
    names: Vec<String>,
}

fn init_logging(verbose: bool, quiet: bool) {
    let default = if verbose {
        "graft=debug"
    } else if quiet {
        "graft=warn"
    } else {
        "graft=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    }
}

fn run_extract(args: &ExtractArgs, use_color: bool) -> Result<(), GraftError> {
    let entry = absolutize(&args.entry);
    let graph = DependencyGraph::from_path(&absolutize(&args.graph))?;
    let destination = absolutize(&args.out).join(component_name(&entry));

    let mut config = ExtractConfig {
        expand_assets: !args.no_assets,
        promote_components: !args.no_promote,
        rewrite_policy: args.rewrite,
        write_reports: !args.no_reports,
        ..Default::default()
    };
    if !args.packages.is_empty() {
        config.requested_packages = args.packages.clone();
    }

    let outcome = extract(&entry, &graph, &destination, &config)?;

    let printed = if args.json {
        print_json(&outcome)
    } else {
        print_summary(&outcome, use_color)
    };
    printed.map_err(GraftError::Io)
}

fn run_versions(args: &VersionsArgs) -> Result<(), GraftError> {
    let versions = resolve_versions(&absolutize(&args.dir), &args.names);
    print_json(&versions).map_err(GraftError::Io)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Command::Extract(args) => run_extract(args, should_use_color(cli.color)),
        Command::Versions(args) => run_versions(args),
    };

    if let Err(e) = result {
        eprintln!("graft: {}", e);
        process::exit(1);
    }
}
