use std::path::Path;
use std::process::Command;

use crate::domain::error::DomainError;

/// Printer names known to CUPS, via `lpstat -e`.
pub fn list_printers() -> Result<Vec<String>, DomainError> {
    let output = Command::new("lpstat")
        .arg("-e")
        .output()
        .map_err(|e| DomainError::Print(format!("lpstat failed: {}", e)))?;

    if !output.status.success() {
        return Err(DomainError::Print(format!(
            "lpstat exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// The spooler's default destination, if one is configured.
pub fn default_printer() -> Option<String> {
    let output = Command::new("lpstat").arg("-d").output().ok()?;
    if !output.status.success() {
        return None;
    }

    // "system default destination: NAME"; the no-default message has no colon
    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .lines()
        .find_map(|line| line.rsplit_once(": ").map(|(_, name)| name.trim().to_string()))
        .filter(|name| !name.is_empty())
}

/// Sends a file to the spooler with `lp`, falling back to `lpr`.
pub fn print_file(path: &Path, printer: Option<&str>) -> Result<(), DomainError> {
    match spool(path, printer, "lp", "-d") {
        Ok(()) => Ok(()),
        Err(lp_err) => match spool(path, printer, "lpr", "-P") {
            Ok(()) => Ok(()),
            Err(_) => Err(lp_err),
        },
    }
}

fn spool(
    path: &Path,
    printer: Option<&str>,
    program: &str,
    printer_flag: &str,
) -> Result<(), DomainError> {
    let mut cmd = Command::new(program);
    if let Some(name) = printer {
        cmd.arg(printer_flag).arg(name);
    }
    cmd.arg(path);

    let output = cmd
        .output()
        .map_err(|e| DomainError::Print(format!("{} failed: {}", program, e)))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(DomainError::Print(format!(
            "{} exited with {}: {}",
            program,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )))
    }
}
