//! Viewer installation and detection.

use std::io;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::error::{Error, Result};

/// Executable spawned for every viewer session.
pub const VIEWER_BIN: &str = "rerun";

/// Run the configured install command, failing on a non-zero exit.
pub fn install(command: &[String]) -> Result<()> {
    let (program, args) = command.split_first().ok_or_else(|| Error::Install {
        command: String::new(),
        reason: "install command is empty".to_string(),
    })?;

    info!(command = %command.join(" "), "installing viewer");
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|e| Error::Install {
            command: command.join(" "),
            reason: e.to_string(),
        })?;

    if !status.success() {
        return Err(Error::install(command, status));
    }
    Ok(())
}

/// Whether `program` can be started with `--version`.
pub fn is_available(program: &str) -> bool {
    let status = Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(_) => true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => {
            debug!(program, error = %e, "viewer version check failed");
            false
        }
    }
}

/// Fail with [`Error::ViewerMissing`] unless the viewer is on `PATH`.
pub fn ensure_viewer() -> Result<()> {
    if is_available(VIEWER_BIN) {
        Ok(())
    } else {
        Err(Error::ViewerMissing)
    }
}
