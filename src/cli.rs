use clap::Parser;
use graph_refs::application::dto::OutputFormat;
use std::path::PathBuf;

/// Compute the ordered dependency references of every target in a build graph
#[derive(Parser, Debug)]
#[command(name = "graph-refs")]
#[command(version)]
#[command(
    about = "Compute deterministic, platform-filtered dependency references for build targets",
    long_about = None
)]
pub struct Args {
    /// Graph description file (.json or .toml node/edge list)
    #[arg(short, long, value_name = "FILE")]
    pub graph: PathBuf,

    /// Target to resolve (repeatable; defaults to every target in the graph)
    #[arg(short = 't', long = "target", value_name = "ID")]
    pub targets: Vec<String>,

    /// Output format: json or markdown [default: json]
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Config file (defaults to graph-refs.config.yml next to the graph file)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of targets resolved in parallel
    #[arg(short, long, value_name = "N", value_parser = parse_positive)]
    pub jobs: Option<usize>,

    /// Longest dependency chain accepted below a target (unlimited by default)
    #[arg(long, value_name = "N", value_parser = parse_positive)]
    pub max_depth: Option<usize>,

    /// Share resolved nodes between targets
    #[arg(long)]
    pub share_cache: bool,

    /// Only check that the graph is a valid DAG
    #[arg(long)]
    pub check: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_positive(value: &str) -> Result<usize, String> {
    let parsed: usize = value
        .parse()
        .map_err(|_| format!("'{}' is not a positive integer", value))?;
    if parsed == 0 {
        return Err("value must be at least 1".to_string());
    }
    Ok(parsed)
}
