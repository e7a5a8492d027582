use std::path::Path;

use chrono::NaiveDateTime;
use crewseat::date_label;

use crate::cli::{OutputFormat, TemplateArgs};
use crate::shared::{extraction_mode, fail, log_warnings, open_roster, print_json};

pub fn run(
    file: &Path,
    flat: bool,
    at: Option<NaiveDateTime>,
    format: OutputFormat,
    template: &TemplateArgs,
) -> Result<(), i32> {
    let roster = open_roster(file, template.to_options())?;
    let now = at.unwrap_or_else(|| chrono::Local::now().naive_local());
    let report = roster.message(extraction_mode(flat), now).map_err(fail)?;
    log_warnings(&report.warnings);

    match format {
        OutputFormat::Text => println!("{}", report.value),
        OutputFormat::Json => print_json(&serde_json::json!({
            "date": date_label(now),
            "message": report.value,
            "warnings": report.warnings,
        }))?,
    }
    Ok(())
}
