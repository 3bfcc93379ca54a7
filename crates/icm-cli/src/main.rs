//! # icm CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use icm_api::{AppConfig, LogFormat};
use icm_cli::browse::{run_catalog, run_matrix, run_overlap, run_xref, OutputArgs, XrefArgs};
use icm_cli::gap::{run_gap, GapArgs};
use icm_cli::server::{run_seed, run_serve, ServeArgs};

/// Integrated compliance management: ISO gap analysis and cross-references.
#[derive(Parser, Debug)]
#[command(name = "icm", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server.
    Serve(ServeArgs),

    /// Compute a gap analysis for an organization.
    Gap(GapArgs),

    /// Print the HLS clause × standard cross-reference matrix.
    Matrix(OutputArgs),

    /// Print pairwise overlap between active standards.
    Overlap(OutputArgs),

    /// List cross-references for one clause.
    Xref(XrefArgs),

    /// Print the built-in seed catalog.
    Catalog(OutputArgs),

    /// Write the seed catalog into DATABASE_URL.
    Seed,
}

fn filter(verbose: u8) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

fn init_tracing(verbose: u8, format: LogFormat) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_target(false)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };
    // `serve` logs at info by default.
    let verbose = match cli.command {
        Commands::Serve(_) => cli.verbose.max(1),
        _ => cli.verbose,
    };
    init_tracing(verbose, config.log_format);
    tracing::debug!(?config, "icm CLI starting");

    let result = match &cli.command {
        Commands::Serve(args) => run_serve(args, &config).await,
        Commands::Gap(args) => run_gap(args, &config).await,
        Commands::Matrix(args) => run_matrix(args, &config).await,
        Commands::Overlap(args) => run_overlap(args, &config).await,
        Commands::Xref(args) => run_xref(args, &config).await,
        Commands::Catalog(args) => run_catalog(args),
        Commands::Seed => run_seed(&config).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_gap() {
        let cli = Cli::try_parse_from([
            "icm",
            "gap",
            "--org",
            "acme",
            "--standard",
            "ISO9001",
            "--evidence",
            "evidence.yaml",
            "--json",
        ])
        .unwrap();
        let Commands::Gap(args) = cli.command else {
            panic!("expected gap");
        };
        assert_eq!(args.org, "acme");
        assert_eq!(args.standard.as_deref(), Some("ISO9001"));
        assert!(args.json);
        assert!(!args.opportunities);
    }

    #[test]
    fn cli_gap_requires_org() {
        assert!(Cli::try_parse_from(["icm", "gap"]).is_err());
    }

    #[test]
    fn cli_parse_xref() {
        let cli = Cli::try_parse_from(["icm", "xref", "ISO27001", "8.2", "--json"]).unwrap();
        let Commands::Xref(args) = cli.command else {
            panic!("expected xref");
        };
        assert_eq!(args.standard, "ISO27001");
        assert_eq!(args.clause, "8.2");
        assert!(args.output.json);
    }

    #[test]
    fn cli_parse_serve_with_verbosity() {
        let cli = Cli::try_parse_from(["icm", "-vv", "serve", "--port", "9000"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Serve(ServeArgs { port: Some(9000) })));
    }

    #[test]
    fn cli_parse_bare_subcommands() {
        for name in ["matrix", "overlap", "catalog", "seed"] {
            assert!(Cli::try_parse_from(["icm", name]).is_ok(), "{name}");
        }
        assert!(Cli::try_parse_from(["icm", "unknown"]).is_err());
    }
}
