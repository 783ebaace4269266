//! Command-line interface for clipshield.
//!
//! This module provides the CLI structure and output rendering for the
//! `clipshield` binary.

mod commands;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{CheckCommand, ConfigCommand, RunCommand, ScanCommand};
pub use report::{read_input, render_config, render_detections, to_json, MaskedDetection};

/// clipshield - Keep card numbers and national IDs off your clipboard
///
/// Watches the clipboard for payment card numbers, US Social Security
/// Numbers and Canadian Social Insurance Numbers, hides them from clipboard
/// history tools, and clears them after a countdown.
#[derive(Debug, Parser)]
#[command(name = "clipshield")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Watch the clipboard in the foreground
    Run(RunCommand),

    /// Check the clipboard once and clear sensitive data
    Scan(ScanCommand),

    /// Run detection over a piece of text
    Check(CheckCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.verbose, self.quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli_with(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Scan(ScanCommand {
                dry_run: false,
                json: false,
            }),
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "clipshield");
    }

    #[test]
    fn test_verbosity_quiet() {
        assert_eq!(
            cli_with(0, true).verbosity(),
            crate::logging::Verbosity::Quiet
        );
    }

    #[test]
    fn test_verbosity_normal() {
        assert_eq!(
            cli_with(0, false).verbosity(),
            crate::logging::Verbosity::Normal
        );
    }

    #[test]
    fn test_verbosity_verbose() {
        assert_eq!(
            cli_with(1, false).verbosity(),
            crate::logging::Verbosity::Verbose
        );
    }

    #[test]
    fn test_verbosity_trace() {
        assert_eq!(
            cli_with(2, false).verbosity(),
            crate::logging::Verbosity::Trace
        );
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from(["clipshield", "run"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Run(RunCommand {
                no_paste_detection: false
            })
        ));
    }

    #[test]
    fn test_parse_run_without_paste_detection() {
        let cli = Cli::try_parse_from(["clipshield", "run", "--no-paste-detection"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Run(RunCommand {
                no_paste_detection: true
            })
        ));
    }

    #[test]
    fn test_parse_scan_dry_run_json() {
        let cli = Cli::try_parse_from(["clipshield", "scan", "--dry-run", "--json"]).unwrap();
        let Command::Scan(scan) = cli.command else {
            panic!("expected scan");
        };
        assert!(scan.dry_run);
        assert!(scan.json);
    }

    #[test]
    fn test_parse_check_text() {
        let cli = Cli::try_parse_from(["clipshield", "check", "123-45-6789"]).unwrap();
        let Command::Check(check) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(check.text.as_deref(), Some("123-45-6789"));
        assert!(!check.json);
    }

    #[test]
    fn test_parse_check_stdin() {
        let cli = Cli::try_parse_from(["clipshield", "check"]).unwrap();
        let Command::Check(check) = cli.command else {
            panic!("expected check");
        };
        assert!(check.text.is_none());
    }

    #[test]
    fn test_parse_config_show() {
        let cli = Cli::try_parse_from(["clipshield", "config", "show", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Show { json: true })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["clipshield", "-c", "/custom/config.toml", "scan"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose() {
        let cli = Cli::try_parse_from(["clipshield", "-vv", "run"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_with_quiet() {
        let cli = Cli::try_parse_from(["clipshield", "-q", "scan"]).unwrap();
        assert!(cli.quiet);
    }
}
