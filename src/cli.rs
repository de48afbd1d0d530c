use std::path::PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};
use crate::config::DiffScopeConfig;
use crate::core::SettingsUpdate;
use crate::diff::{DiffAlgorithmType, DiffKind};

#[derive(Parser)]
#[command(name = "diffscope")]
#[command(author = "diffscope Team")]
#[command(version = "0.1.0")]
#[command(about = "Compare texts by character, word, line, sentence, CSS token or JSON")]
#[command(long_about = "diffscope compares two files at a chosen granularity and prints a unified view, an index-aligned split view, statistics, JSON results or a unified-diff patch. It can also apply a patch to a file.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Disable colors in output
    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,

    /// Configuration file
    #[arg(long, global = true, value_name = "FILE", help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare two files
    Diff(DiffArgs),
    /// Apply a unified-diff patch to a file and print the result
    Apply(ApplyArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    #[arg(value_name = "OLD", help = "Original file")]
    pub old: PathBuf,

    #[arg(value_name = "NEW", help = "Modified file")]
    pub new: PathBuf,

    /// Comparison granularity
    #[arg(short, long, default_value = "lines", help = "Diff granularity")]
    pub mode: DiffKind,

    /// Output format
    #[arg(short, long, default_value = "unified", help = "Output format")]
    pub format: OutputFormat,

    #[arg(long, help = "Compare case-insensitively")]
    pub ignore_case: bool,

    #[arg(long, help = "Ignore whitespace differences")]
    pub ignore_whitespace: bool,

    /// Diff context lines
    #[arg(long, help = "Number of context lines in patches")]
    pub context: Option<usize>,

    #[arg(long, help = "Width of the split view")]
    pub width: Option<usize>,

    #[arg(long, help = "Diff algorithm")]
    pub algorithm: Option<DiffAlgorithmType>,

    #[arg(long, help = "Title for the comparison")]
    pub title: Option<String>,
}

#[derive(Args)]
pub struct ApplyArgs {
    #[arg(value_name = "SOURCE", help = "File to patch")]
    pub source: PathBuf,

    #[arg(value_name = "PATCH", help = "Unified-diff patch file")]
    pub patch: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single-column view (default)
    Unified,
    /// Two-column, index-aligned view
    Split,
    /// Full result as JSON
    Json,
    /// Addition and deletion counts
    Stats,
    /// Unified-diff patch
    Patch,
}

impl Cli {
    pub fn setup_logging(&self) {
        let level = if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .init();
    }

    pub fn use_color(&self, config: &DiffScopeConfig) -> bool {
        !self.no_color && config.ui.color
    }
}

impl DiffArgs {
    /// Settings requested on the command line, layered over the config.
    pub fn settings_update(&self) -> SettingsUpdate {
        let mut update = SettingsUpdate::default();
        if self.ignore_case {
            update = update.ignore_case(true);
        }
        if self.ignore_whitespace {
            update = update.ignore_whitespace(true);
        }
        if let Some(context) = self.context {
            update = update.context_lines(context);
        }
        if let Some(algorithm) = self.algorithm {
            update = update.algorithm(algorithm);
        }
        update
    }

    pub fn validate(&self) -> Result<(), String> {
        for path in [&self.old, &self.new] {
            if !path.is_file() {
                return Err(format!("Not a file: {}", path.display()));
            }
        }

        if let Some(width) = self.width {
            if width < 20 {
                return Err("Width must be at least 20".to_string());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_diff_command() {
        let cli = Cli::parse_from([
            "diffscope", "diff", "a.txt", "b.txt", "--mode", "words", "--format", "split", "--ignore-case",
            "--context", "5",
        ]);

        match cli.command {
            Command::Diff(args) => {
                assert_eq!(args.mode, DiffKind::Words);
                assert_eq!(args.format, OutputFormat::Split);
                let update = args.settings_update();
                assert_eq!(update.ignore_case, Some(true));
                assert_eq!(update.ignore_whitespace, None);
                assert_eq!(update.context_lines, Some(5));
            }
            Command::Apply(_) => panic!("Expected diff command"),
        }
    }

    #[test]
    fn test_parse_apply_command() {
        let cli = Cli::parse_from(["diffscope", "--no-color", "apply", "src.txt", "fix.patch"]);

        assert!(cli.no_color);
        assert!(!cli.use_color(&DiffScopeConfig::default()));
        assert!(matches!(cli.command, Command::Apply(_)));
    }

    #[test]
    fn test_validate_missing_files() {
        let cli = Cli::parse_from(["diffscope", "diff", "/nonexistent/a", "/nonexistent/b"]);
        if let Command::Diff(args) = cli.command {
            assert!(args.validate().is_err());
        }
    }
}
