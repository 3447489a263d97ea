//! bd-spdx-export: Black Duck BOM to SPDX 2.2 JSON exporter

use anyhow::Result;
use bd_spdx_export::{
    cli,
    config::{
        DEFAULT_MAX_CONCURRENT, DEFAULT_TIMEOUT_SECS, EnrichmentConfig, ExportConfig,
        ExportPreset, OutputConfig, ServerConfig, load_or_default,
    },
};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bd-spdx-export")]
#[command(version)]
#[command(about = "Export a Black Duck project version as an SPDX 2.2 JSON document", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Document written
    1  Error occurred
    2  Project or version not found, or server settings missing
    3  Output file could not be written

EXAMPLES:
    # Export using BLACKDUCK_URL / BLACKDUCK_API_TOKEN from the environment
    bd-spdx-export export acme 1.0

    # Include sub-projects, skip copyright and file lookups
    bd-spdx-export export acme 1.0 --recursive --basic -o acme.spdx.json

    # Export offline from a snapshot of the server data
    bd-spdx-export export acme 1.0 --snapshot acme-snapshot.json")]
struct Cli {
    /// Enable debug output, including per-phase timings
    #[arg(short, long, visible_alias = "debug", global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `export` subcommand
#[derive(Parser)]
struct ExportArgs {
    /// Black Duck project name
    project: String,

    /// Black Duck version name
    version: String,

    /// Output SPDX file (default '<project>-<version>.json')
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export sub-projects found in the BOM into the same document
    #[arg(short, long)]
    recursive: bool,

    /// Do not export copyright data
    #[arg(long)]
    no_copyrights: bool,

    /// Do not export package file data
    #[arg(long)]
    no_files: bool,

    /// Do not export review comments as annotations
    #[arg(long)]
    no_comments: bool,

    /// Skip copyright, download location and package file data
    #[arg(short, long)]
    basic: bool,

    /// Do not move an existing output file aside before writing
    #[arg(long)]
    no_backup: bool,

    /// Black Duck server URL
    #[arg(long, env = "BLACKDUCK_URL")]
    blackduck_url: Option<String>,

    /// Black Duck API token
    #[arg(long, env = "BLACKDUCK_API_TOKEN", hide_env_values = true)]
    blackduck_api_token: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(long)]
    blackduck_trust_certs: bool,

    /// Server request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    blackduck_timeout: u64,

    /// Maximum concurrent metadata lookups
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENT)]
    max_concurrent: usize,

    /// Read server data from a JSON snapshot instead of the REST API
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

impl ExportArgs {
    /// Configuration carried by the command line alone.
    fn to_config(&self) -> ExportConfig {
        ExportConfig {
            server: ServerConfig {
                url: self.blackduck_url.clone(),
                api_token: self.blackduck_api_token.clone(),
                trust_certs: self.blackduck_trust_certs,
                timeout_secs: self.blackduck_timeout,
            },
            enrichment: EnrichmentConfig {
                copyrights: !self.no_copyrights,
                files: !self.no_files,
                comments: !self.no_comments,
                download_locations: false,
                max_concurrent: self.max_concurrent,
            },
            output: OutputConfig {
                file: self.output.clone(),
                backup_existing: !self.no_backup,
            },
            recursive: self.recursive,
            snapshot: self.snapshot.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Export a project version as an SPDX 2.2 JSON document
    Export(ExportArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Export(args) => {
            let (mut config, config_path) = load_or_default(cli.config.as_deref());
            if let Some(path) = &config_path {
                tracing::debug!("Using config file {}", path.display());
            }
            config.merge(&args.to_config());
            if args.basic {
                ExportPreset::Basic.apply(&mut config);
            }

            tracing::info!(
                "{} {}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            );
            let exit_code = cli::run_export(&config, &args.project, &args.version)?;
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
            Ok(())
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "bd-spdx-export", &mut io::stdout());
            Ok(())
        }

        Commands::ConfigSchema { output } => {
            let schema = bd_spdx_export::config::generate_json_schema()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn export_args(args: &[&str]) -> ExportArgs {
        let mut argv = vec!["bd-spdx-export", "export", "acme", "1.0"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Export(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_download_location_flag_not_offered() {
        let parsed = Cli::try_parse_from(["bd-spdx-export", "export", "acme", "1.0", "--download-loc"]);
        assert!(parsed.is_err());
        assert!(!export_args(&[]).to_config().enrichment.download_locations);
    }

    #[test]
    fn test_flags_map_to_config() {
        let config = export_args(&["-r", "--no-comments", "--no-backup", "--max-concurrent", "4"])
            .to_config();
        assert!(config.recursive);
        assert!(!config.enrichment.comments);
        assert!(config.enrichment.copyrights);
        assert!(!config.output.backup_existing);
        assert_eq!(config.enrichment.max_concurrent, 4);
    }
}
