use std::io::Write;
use std::path::{Path, PathBuf};

use ghreport_output::render_report;
use ghreport_types::{validate_login, InvalidLogin, Report};
use thiserror::Error;
use tracing::debug;

pub const REPORT_EXTENSION: &str = "txt";

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("profile has no login to name the report after")]
    MissingLogin,
    #[error(transparent)]
    InvalidLogin(#[from] InvalidLogin),
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `{login}.txt`, after checking that the login cannot name anything outside
/// the report directory.
pub fn report_file_name(login: &str) -> Result<String, WriteError> {
    let login = validate_login(login)?;
    Ok(format!("{}.{}", login, REPORT_EXTENSION))
}

/// Renders `report` into `dir/{login}.txt`, replacing any existing file.
/// The directory is created if needed. Returns the written path.
pub fn write_report(dir: &Path, report: &Report) -> Result<PathBuf, WriteError> {
    let login = report
        .profile
        .login
        .as_deref()
        .ok_or(WriteError::MissingLogin)?;
    let path = dir.join(report_file_name(login)?);
    write_atomic(&path, render_report(report).as_bytes())?;
    debug!("Wrote report to {}", path.display());
    Ok(path)
}

fn write_atomic(path: &Path, content: &[u8]) -> Result<(), WriteError> {
    let io_err = |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(io_err)?;

    let mut temp_file = tempfile::Builder::new()
        .prefix(".ghreport-")
        .tempfile_in(dir)
        .map_err(io_err)?;
    temp_file.write_all(content).map_err(io_err)?;
    temp_file.flush().map_err(io_err)?;
    temp_file.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
