//! Writing the quote document from the command line.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use chrono::NaiveDate;
use devis_pdf::Branding;
use tracing::{error, info};

use crate::state::EstimatorState;

/// Writes the dated quote document into `dir`, creating it if needed.
pub fn save_document(
    state: &EstimatorState,
    branding: &Branding,
    dir: &Path,
    date: NaiveDate,
) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    state
        .document(branding, date)
        .save(dir)
        .context("writing quote document")
}

/// Reports the outcome of [`save_document`] and maps it to the exit status.
///
/// A failure is one log line; the breakdown printed before it stays valid.
pub fn report(result: anyhow::Result<PathBuf>) -> ExitCode {
    match result {
        Ok(path) => {
            info!(path = %path.display(), "quote document ready");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %format!("{err:#}"), "quote document generation failed");
            ExitCode::FAILURE
        }
    }
}
