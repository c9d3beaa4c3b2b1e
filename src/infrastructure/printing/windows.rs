use std::path::Path;
use std::process::Command;

use crate::domain::error::DomainError;

/// Printer names known to the spooler, via PowerShell.
pub fn list_printers() -> Result<Vec<String>, DomainError> {
    let output = run_powershell("Get-Printer | Select-Object -ExpandProperty Name")?;
    Ok(output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// The system default printer, if one is configured.
pub fn default_printer() -> Option<String> {
    let output = run_powershell(
        "Get-CimInstance Win32_Printer -Filter 'Default=true' | Select-Object -ExpandProperty Name",
    )
    .ok()?;
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// Sends a file to a printer with Out-Printer.
pub fn print_file(path: &Path, printer: Option<&str>) -> Result<(), DomainError> {
    let file = quote(&path.display().to_string());
    let script = match printer {
        Some(name) => format!(
            "Get-Content -LiteralPath {} | Out-Printer -Name {}",
            file,
            quote(name)
        ),
        None => format!("Get-Content -LiteralPath {} | Out-Printer", file),
    };
    run_powershell(&script)?;
    Ok(())
}

fn run_powershell(script: &str) -> Result<String, DomainError> {
    let output = Command::new("powershell")
        .args(["-NoProfile", "-NonInteractive", "-Command", script])
        .output()
        .map_err(|e| DomainError::Print(format!("powershell failed: {}", e)))?;

    if !output.status.success() {
        return Err(DomainError::Print(format!(
            "powershell exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Single-quotes a PowerShell string argument.
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
