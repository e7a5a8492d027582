use std::path::Path;

use crewseat::{ExtractionMode, ParseWarning, Roster, RosterOptions};

/// Open a roster file with user-friendly error messages.
///
/// Returns `Err(1)` with a message printed to stderr if the file is not found,
/// the options are unusable, or the file cannot be read as a PDF.
pub fn open_roster(file: &Path, options: RosterOptions) -> Result<Roster, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }

    Roster::open_file(file, Some(options)).map_err(|e| {
        eprintln!("Error: failed to open roster: {e}");
        1
    })
}

pub fn extraction_mode(flat: bool) -> ExtractionMode {
    if flat {
        ExtractionMode::Flat
    } else {
        ExtractionMode::Positioned
    }
}

/// Log skipped input; visible at the default `warn` level.
pub fn log_warnings(warnings: &[ParseWarning]) {
    for warning in warnings {
        tracing::warn!(
            code = %warning.code,
            page = ?warning.page,
            line = ?warning.line,
            "{}",
            warning.description
        );
    }
}

/// Print a value as pretty JSON.
pub fn print_json(value: &serde_json::Value) -> Result<(), i32> {
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        eprintln!("Error: failed to serialize output: {e}");
        1
    })?;
    println!("{json}");
    Ok(())
}

/// Print a roster error and map it to the exit code.
pub fn fail(e: impl std::fmt::Display) -> i32 {
    eprintln!("Error: {e}");
    1
}
