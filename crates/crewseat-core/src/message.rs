//! Final message text: fixed header, flight blocks, fixed footer.

use chrono::{NaiveDateTime, Timelike};

use crate::blocks::Block;

/// Greeting line opening every message.
pub const GREETING: &str = "DEAR ON DUTY";

/// Footer lines, starting with the blank line that separates them from the blocks.
pub const FOOTER: [&str; 4] = ["", "KIND REGARDS", "OPS CZL TEAM", "BOUTOUT"];

/// From this hour on, the message is dated for the next day.
pub const CUTOFF_HOUR: u32 = 18;

/// Header lines for the given date label.
pub fn header(date_label: &str) -> [String; 2] {
    [
        GREETING.to_string(),
        format!("PLEASE PROCEED WITH RESERVING SEATS FOR S1 AS LISTED BELOW FOR {date_label}"),
    ]
}

/// Compose the final message.
///
/// Header, then each block's rendered lines (every block opens with its own
/// blank line), then the footer, joined with `\n` and trimmed. With no
/// blocks the result is header and footer only.
///
/// ```
/// use crewseat_core::compose;
///
/// let text = compose(&[], "05MAR25");
/// assert!(text.starts_with("DEAR ON DUTY\n"));
/// assert!(text.ends_with("\nBOUTOUT"));
/// ```
pub fn compose(blocks: &[Block], date_label: &str) -> String {
    let mut lines: Vec<String> = header(date_label).into();
    lines.extend(blocks.iter().flat_map(Block::render_lines));
    lines.extend(FOOTER.iter().map(|l| l.to_string()));
    lines.join("\n").trim().to_string()
}

/// Date label for the header: `DDMMMYY` in uppercase, e.g. `05MAR25`.
///
/// At or after 18:00 the label is for the following day.
pub fn date_label(now: NaiveDateTime) -> String {
    let date = now.date();
    let date = if now.hour() >= CUTOFF_HOUR {
        date.succ_opt().unwrap_or(date)
    } else {
        date
    };
    date.format("%d%b%y").to_string().to_uppercase()
}
