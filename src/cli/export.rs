//! Export command handler.

use crate::config::{ExportConfig, Validatable};
use crate::error::ExportError;
use crate::pipeline::{Exporter, default_output_path, exit_code_for, exit_codes, write_document};
use crate::source::{BomServer, SnapshotSource};
use anyhow::Result;
use std::path::Path;

/// Run the export command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
pub fn run_export(config: &ExportConfig, project: &str, version: &str) -> Result<i32> {
    let errors = config.validate();
    if !errors.is_empty() {
        for err in &errors {
            tracing::error!("{}", err);
        }
        let server_missing = errors.iter().any(|e| e.field.starts_with("server."));
        return Ok(if server_missing {
            exit_codes::NOT_FOUND
        } else {
            exit_codes::ERROR
        });
    }

    let output = config
        .output
        .file
        .clone()
        .unwrap_or_else(|| default_output_path(project, version));

    let result = match &config.snapshot {
        Some(path) => SnapshotSource::from_path(path)
            .and_then(|source| export_with(&source, config, project, version, &output)),
        None => export_remote(config, project, version, &output),
    };

    match result {
        Ok(()) => Ok(exit_codes::SUCCESS),
        Err(ExportError::NotFound {
            kind,
            name,
            available,
        }) => {
            tracing::error!("{} '{}' does not exist", kind, name);
            if !available.is_empty() {
                println!("Available projects:");
                for project in available {
                    println!("{project}");
                }
            }
            Ok(exit_codes::NOT_FOUND)
        }
        Err(err) => {
            tracing::error!("{}", err);
            Ok(exit_code_for(&err))
        }
    }
}

#[cfg(feature = "remote")]
fn export_remote(
    config: &ExportConfig,
    project: &str,
    version: &str,
    output: &Path,
) -> crate::Result<()> {
    use crate::source::{HubClient, HubClientConfig};

    let client = HubClient::connect(HubClientConfig::from_server(&config.server)?)?;
    export_with(&client, config, project, version, output)
}

#[cfg(not(feature = "remote"))]
fn export_remote(
    _config: &ExportConfig,
    _project: &str,
    _version: &str,
    _output: &Path,
) -> crate::Result<()> {
    Err(ExportError::config(
        "built without the 'remote' feature; export from a --snapshot file instead",
    ))
}

fn export_with<S: BomServer + ?Sized>(
    server: &S,
    config: &ExportConfig,
    project: &str,
    version: &str,
    output: &Path,
) -> crate::Result<()> {
    if config.enrichment.download_locations {
        tracing::warn!("No download locator available; download locations stay NOASSERTION");
    }
    let outcome = Exporter::new(server, config).export(project, version)?;
    outcome.stats.log_summary();
    tracing::info!(
        "Document has {} packages, {} relationships, {} extracted licenses",
        outcome.document.packages().len(),
        outcome.document.relationships().len(),
        outcome.document.extracted_licenses().len()
    );
    write_document(&outcome.document, output, config.output.backup_existing)
}
