use log::warn;

use crate::error::{Result, StatementError};
use crate::schema::CSV_HEADER;

const OPENING_FENCE: &str = "```csv\n";
const CLOSING_FENCE: &str = "```";

/// Reduces a raw model reply to CSV text that starts with [`CSV_HEADER`].
///
/// Strips a leading ```` ```csv ```` fence and a trailing ```` ``` ```` fence, trims
/// whitespace, then checks the header case-insensitively. A reply without the header
/// that still looks column-like (at least three comma-separated fields) gets the header
/// prepended; anything else is [`StatementError::UnexpectedFormat`].
pub fn clean_model_output(raw: &str) -> Result<String> {
    let unfenced = raw.strip_prefix(OPENING_FENCE).unwrap_or(raw);
    let unfenced = unfenced.strip_suffix(CLOSING_FENCE).unwrap_or(unfenced);
    let cleaned = unfenced.trim();

    if cleaned.to_lowercase().starts_with(CSV_HEADER) {
        return Ok(cleaned.to_string());
    }

    warn!("AI response did not start with the expected CSV header.");
    if cleaned.split(',').count() >= 3 {
        return Ok(format!("{}\n{}", CSV_HEADER, cleaned));
    }

    Err(StatementError::UnexpectedFormat)
}
