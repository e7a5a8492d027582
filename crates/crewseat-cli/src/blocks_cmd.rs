use std::path::Path;

use crate::cli::{OutputFormat, TemplateArgs};
use crate::shared::{extraction_mode, fail, log_warnings, open_roster, print_json};

pub fn run(
    file: &Path,
    flat: bool,
    format: OutputFormat,
    template: &TemplateArgs,
) -> Result<(), i32> {
    let roster = open_roster(file, template.to_options())?;
    let report = roster.parse(extraction_mode(flat)).map_err(fail)?;
    log_warnings(&report.warnings);
    let blocks = &report.value.blocks;

    match format {
        OutputFormat::Text => {
            let text: Vec<String> = blocks.iter().flat_map(|b| b.render_lines()).collect();
            println!("{}", text.join("\n").trim_start_matches('\n'));
        }
        OutputFormat::Json => {
            let blocks: Vec<serde_json::Value> = blocks
                .iter()
                .map(|block| {
                    serde_json::json!({
                        "header": block.header(),
                        "flight_identifier": block.flight_identifier,
                        "separator": block.separator,
                        "entries": block.entries,
                    })
                })
                .collect();
            print_json(&serde_json::Value::Array(blocks))?;
        }
    }
    Ok(())
}
