use anyhow::{Context, Result};
use clap::Parser;

use diffscope::{
    cli::{ApplyArgs, Cli, Command, DiffArgs, OutputFormat},
    config::DiffScopeConfig,
    diff::DiffFormatter,
    DiffEngine, DiffResult,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.setup_logging();

    let config = DiffScopeConfig::load_or_default(cli.config.as_deref())?;
    if let Err(err) = config.validate() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }

    match &cli.command {
        Command::Diff(args) => run_diff(&cli, args, &config)?,
        Command::Apply(args) => run_apply(args, &config)?,
    }

    Ok(())
}

fn run_diff(cli: &Cli, args: &DiffArgs, config: &DiffScopeConfig) -> Result<()> {
    if let Err(err) = args.validate() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }

    let old = read(&args.old)?;
    let new = read(&args.new)?;

    let mut engine = DiffEngine::with_config(config);
    engine.update_settings(&args.settings_update());
    tracing::debug!("Comparing {} and {} as {}", args.old.display(), args.new.display(), args.mode);

    let id = engine.diff(args.mode, &old, &new, args.title.as_deref())?;
    let result = engine
        .get_result(&id)
        .context("Computed result missing from the session")?;

    let formatter = DiffFormatter::new(cli.use_color(config));
    let width = args.width.unwrap_or(config.ui.default_width);

    match args.format {
        OutputFormat::Unified => println!("{}", formatter.format_unified(&result.unified_view)),
        OutputFormat::Split => println!("{}", formatter.format_split(&result.split_view, width)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Stats => print_stats(result),
        OutputFormat::Patch => {
            let name = args.new.display().to_string();
            print!("{}", engine.create_patch(&name, &old, &new, None, None));
        }
    }

    Ok(())
}

fn run_apply(args: &ApplyArgs, config: &DiffScopeConfig) -> Result<()> {
    let source = read(&args.source)?;
    let patch = read(&args.patch)?;

    let engine = DiffEngine::with_config(config);
    match engine.apply_patch(&source, &patch) {
        Some(patched) => {
            print!("{}", patched);
            Ok(())
        }
        None => {
            eprintln!(
                "Error: {} does not apply to {}",
                args.patch.display(),
                args.source.display()
            );
            std::process::exit(1);
        }
    }
}

fn print_stats(result: &DiffResult) {
    println!("{}: {}", result.title, DiffFormatter::format_stats(&result.stats));
}

fn read(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
