//! Line and field splitting shared by the aggregator and the table renderer.
//!
//! The model output is line oriented: one header line, then one transaction per line.
//! A line made of well-formed double-quoted fields goes through the `csv` reader, so a
//! quoted description may carry commas. Anything else, including a stray or unclosed
//! quote, splits on every comma and keeps its quote characters.

use csv::ReaderBuilder;

/// Splits a whole CSV document into its header line and data lines.
///
/// Surrounding whitespace of the document is ignored. Returns `None` for empty input.
pub fn split_document(text: &str) -> Option<(&str, Vec<&str>)> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut lines = trimmed.split('\n');
    let header = lines.next()?;
    Some((header, lines.collect()))
}

/// Splits one line into raw (untrimmed) fields.
///
/// A blank line yields a single empty field.
pub fn split_line(line: &str) -> Vec<String> {
    let line = line.trim_end_matches('\r');
    if line.contains('"') && is_well_quoted(line) {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(line.as_bytes());
        if let Some(Ok(record)) = reader.records().next() {
            return record.iter().map(str::to_string).collect();
        }
    }

    line.split(',').map(str::to_string).collect()
}

/// True when every quote in the line opens a field, closes that same field, or is a
/// doubled `""` inside it.
fn is_well_quoted(line: &str) -> bool {
    let mut chars = line.chars().peekable();
    loop {
        if chars.peek() == Some(&'"') {
            chars.next();
            loop {
                match chars.next() {
                    None => return false,
                    Some('"') if chars.peek() == Some(&'"') => {
                        chars.next();
                    }
                    Some('"') => break,
                    Some(_) => {}
                }
            }
            match chars.next() {
                None => return true,
                Some(',') => continue,
                Some(_) => return false,
            }
        }

        loop {
            match chars.next() {
                None => return true,
                Some(',') => break,
                Some('"') => return false,
                Some(_) => {}
            }
        }
    }
}

/// Header names, trimmed, in column order.
pub fn header_names(header: &str) -> Vec<String> {
    split_line(header)
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect()
}
