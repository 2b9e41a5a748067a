mod cli;
mod config;

use clap::Parser;
use cli::Args;
use config::ConfigFile;
use graph_refs::adapters::outbound::console::StderrProgressReporter;
use graph_refs::adapters::outbound::filesystem::FileSystemReader;
use graph_refs::application::dto::{OutputFormat, ResolveRequest, DEFAULT_JOBS};
use graph_refs::application::factories::{FormatterFactory, PresenterFactory, PresenterType};
use graph_refs::application::use_cases::ResolveReferencesUseCase;
use graph_refs::dependency_resolution::domain::NodeId;
use graph_refs::shared::{logging, AppError, ExitCode, Result};
use std::path::Path;
use std::process;

/// Settings after merging the config file under the CLI flags
#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    format: OutputFormat,
    targets: Vec<NodeId>,
    jobs: usize,
    share_cache: bool,
    max_depth: Option<usize>,
    check_only: bool,
}

#[tokio::main]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            process::exit(code.as_i32());
        }
    };

    logging::init(args.verbose);

    if let Err(e) = run(args).await {
        eprintln!("\n❌ An error occurred:\n");
        eprintln!("{}", e);

        // Display error chain
        for cause in e.chain().skip(1) {
            eprintln!("\nCaused by: {}", cause);
        }

        eprintln!();
        process::exit(ExitCode::for_error(&e).as_i32());
    }
}

async fn run(args: Args) -> Result<()> {
    validate_graph_path(&args.graph)?;

    let config = load_config(&args)?;
    let settings = merge_settings(&args, config.unwrap_or_default())?;

    // Create adapters (Dependency Injection)
    let use_case =
        ResolveReferencesUseCase::new(FileSystemReader::new(), StderrProgressReporter::new());

    let request = ResolveRequest::new(args.graph.clone())
        .with_targets(settings.targets.clone())
        .with_jobs(settings.jobs)
        .with_share_cache(settings.share_cache)
        .with_max_depth(settings.max_depth)
        .with_check_only(settings.check_only);

    let response = use_case.execute(request).await?;
    if settings.check_only {
        return Ok(());
    }

    eprintln!("{}", FormatterFactory::progress_message(settings.format));
    let formatted_output = FormatterFactory::create(settings.format).format(&response)?;

    let presenter = PresenterFactory::create(PresenterType::from_output(args.output));
    presenter.present(&formatted_output)?;

    Ok(())
}

/// Explicit `--config` must exist; otherwise look next to the graph file.
fn load_config(args: &Args) -> Result<Option<ConfigFile>> {
    match &args.config {
        Some(path) => config::load_config_from_path(path).map(Some),
        None => config::discover_config(&config::config_dir_for(&args.graph)),
    }
}

fn merge_settings(args: &Args, config: ConfigFile) -> Result<Settings> {
    let raw_targets = if args.targets.is_empty() {
        config.targets.unwrap_or_default()
    } else {
        args.targets.clone()
    };

    let targets = raw_targets
        .into_iter()
        .map(|id| {
            NodeId::parse(id).map_err(|e| AppError::Validation {
                message: format!("Invalid --target value: {}", e),
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Settings {
        format: args.format.or(config.format).unwrap_or_default(),
        targets,
        jobs: args.jobs.or(config.jobs).unwrap_or(DEFAULT_JOBS),
        share_cache: args.share_cache || config.share_cache.unwrap_or(false),
        max_depth: args.max_depth.or(config.max_depth),
        check_only: args.check,
    })
}

fn validate_graph_path(path: &Path) -> Result<()> {
    let invalid = |reason: String| AppError::InvalidGraphPath {
        path: path.to_path_buf(),
        reason,
    };

    // Security check: inspect the path itself, never a symlink target
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(invalid("File does not exist".to_string()).into());
        }
        Err(e) => {
            return Err(invalid(format!("Failed to read path metadata: {}", e)).into());
        }
    };

    if metadata.is_symlink() {
        return Err(invalid(
            "Security: Graph path is a symbolic link. For security reasons, symbolic links are not allowed."
                .to_string(),
        )
        .into());
    }

    if !metadata.is_file() {
        return Err(invalid("Not a regular file".to_string()).into());
    }

    path.canonicalize()
        .map_err(|e| invalid(format!("Failed to canonicalize path: {}", e)))?;

    Ok(())
}
