use std::path::Path;

use crate::cli::TemplateArgs;
use crate::shared::{extraction_mode, fail, log_warnings, open_roster};

/// One line per reconstructed roster line: `<index>\t<text>`.
pub fn run(file: &Path, flat: bool, template: &TemplateArgs) -> Result<(), i32> {
    let roster = open_roster(file, template.to_options())?;
    let report = roster.parse(extraction_mode(flat)).map_err(fail)?;
    log_warnings(&report.warnings);

    for line in &report.value.lines {
        println!("{}\t{}", line.index, line.text);
    }
    Ok(())
}
