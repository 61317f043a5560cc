use serde::{Deserialize, Serialize};

use crate::error::{Result, StatementError};

/// The column contract between the model relay and everything downstream of it.
pub const CSV_HEADER: &str = "date,description,amount,category,notes";

pub const CSV_COLUMNS: [&str; 5] = ["date", "description", "amount", "category", "notes"];

/// One statement line as the model reports it.
///
/// Amounts are signed: debits are negative, credits positive. `category` and `notes`
/// may be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub notes: String,
}

/// Where each [`Transaction`] field sits in a particular header.
///
/// Columns are matched by name, case-insensitively, so a reordered header still maps.
/// `description` and `amount` are required; the rest default to empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMap {
    date: Option<usize>,
    description: usize,
    amount: usize,
    category: Option<usize>,
    notes: Option<usize>,
}

impl ColumnMap {
    pub fn locate<S: AsRef<str>>(headers: &[S]) -> Option<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.as_ref().trim().eq_ignore_ascii_case(name))
        };

        Some(Self {
            date: find("date"),
            description: find("description")?,
            amount: find("amount")?,
            category: find("category"),
            notes: find("notes"),
        })
    }

    /// Returns `None` when the row is too short or the amount does not parse.
    pub fn transaction<S: AsRef<str>>(&self, fields: &[S]) -> Option<Transaction> {
        let field = |i: Option<usize>| {
            i.and_then(|i| fields.get(i))
                .map(|f| f.as_ref().trim().to_string())
                .unwrap_or_default()
        };

        Some(Transaction {
            date: field(self.date),
            description: fields.get(self.description)?.as_ref().trim().to_string(),
            amount: parse_amount(fields.get(self.amount)?.as_ref())?,
            category: field(self.category),
            notes: field(self.notes),
        })
    }
}

/// Plain decimal parsing. Currency symbols and thousands separators are not stripped here;
/// anything that is not a finite number yields `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Body of `POST /api/parse`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Base64 without a `data:` prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// A validated parse request: exactly one kind of payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseInput {
    Text(String),
    Document { mime_type: String, data: String },
}

impl ParseInput {
    pub fn kind(&self) -> &'static str {
        match self {
            ParseInput::Text(_) => "text",
            ParseInput::Document { .. } => "document",
        }
    }

    /// Size of the payload as sent, in bytes.
    pub fn payload_len(&self) -> usize {
        match self {
            ParseInput::Text(text) => text.len(),
            ParseInput::Document { data, .. } => data.len(),
        }
    }

    pub fn to_request(&self) -> ParseRequest {
        match self {
            ParseInput::Text(text) => ParseRequest {
                text: Some(text.clone()),
                ..Default::default()
            },
            ParseInput::Document { mime_type, data } => ParseRequest {
                mime_type: Some(mime_type.clone()),
                data: Some(data.clone()),
                ..Default::default()
            },
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl ParseRequest {
    /// A document payload wins over text. Empty strings count as absent.
    pub fn into_input(self) -> Result<ParseInput> {
        let mime_type = non_empty(self.mime_type);
        let data = non_empty(self.data);

        if let (Some(mime_type), Some(data)) = (mime_type, data) {
            #[cfg(feature = "gemini")]
            validate_base64(&data)?;
            return Ok(ParseInput::Document { mime_type, data });
        }

        match non_empty(self.text) {
            Some(text) => Ok(ParseInput::Text(text)),
            None => Err(StatementError::MissingInput),
        }
    }
}

#[cfg(feature = "gemini")]
fn validate_base64(data: &str) -> Result<()> {
    use base64::Engine;

    base64::engine::general_purpose::STANDARD
        .decode(data)
        .map(|_| ())
        .map_err(|e| StatementError::InvalidInput(format!("document data is not valid base64: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_matches_columns() {
        assert_eq!(CSV_COLUMNS.join(","), CSV_HEADER);
    }

    #[test]
    fn test_column_map_standard_header() {
        let columns = ColumnMap::locate(&CSV_COLUMNS[..]).unwrap();

        let tx = columns
            .transaction(&["2024-06-24", " AMAZON ", "-129.00", "Shopping", ""][..])
            .unwrap();
        assert_eq!(tx.description, "AMAZON");
        assert_eq!(tx.amount, -129.0);
        assert_eq!(tx.category, "Shopping");

        assert!(columns
            .transaction(&["2024-06-24", "AMAZON", "₹129", "Shopping", ""][..])
            .is_none());
        assert!(columns.transaction(&["2024-06-24", "AMAZON"][..]).is_none());
    }

    #[test]
    fn test_column_map_follows_header_names() {
        let columns = ColumnMap::locate(&["Amount", "date", " DESCRIPTION "][..]).unwrap();
        let tx = columns.transaction(&["-5.00", "2024-01-01", "Coffee"][..]).unwrap();

        assert_eq!(tx.date, "2024-01-01");
        assert_eq!(tx.description, "Coffee");
        assert_eq!(tx.amount, -5.0);
        assert_eq!(tx.category, "");
        assert_eq!(tx.notes, "");
    }

    #[test]
    fn test_column_map_needs_amount_and_description() {
        assert!(ColumnMap::locate(&["date", "description", "value"][..]).is_none());
        assert!(ColumnMap::locate(&["date", "memo", "amount"][..]).is_none());
    }

    #[test]
    fn test_parse_amount_rejects_non_numbers() {
        assert_eq!(parse_amount(" 5000.00 "), Some(5000.0));
        assert_eq!(parse_amount("-49"), Some(-49.0));
        assert_eq!(parse_amount("1,299.00"), None);
        assert_eq!(parse_amount("$12"), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_request_requires_some_input() {
        let err = ParseRequest::default().into_input().unwrap_err();
        assert!(matches!(err, StatementError::MissingInput));

        let empty_text = ParseRequest {
            text: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(
            empty_text.into_input(),
            Err(StatementError::MissingInput)
        ));

        let half_document = ParseRequest {
            mime_type: Some("application/pdf".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            half_document.into_input(),
            Err(StatementError::MissingInput)
        ));
    }

    #[test]
    fn test_document_takes_precedence_over_text() {
        let request: ParseRequest = serde_json::from_str(
            r#"{"text":"ignored","mimeType":"image/png","data":"aGVsbG8="}"#,
        )
        .unwrap();

        assert_eq!(
            request.into_input().unwrap(),
            ParseInput::Document {
                mime_type: "image/png".to_string(),
                data: "aGVsbG8=".to_string(),
            }
        );
    }

    #[test]
    fn test_text_request() {
        let request: ParseRequest = serde_json::from_str(r#"{"text":"25/06 ZOMATO 549.00"}"#).unwrap();
        let input = request.into_input().unwrap();
        assert_eq!(input.kind(), "text");
        assert_eq!(input.payload_len(), 19);
    }

    #[cfg(feature = "gemini")]
    #[test]
    fn test_document_data_must_be_base64() {
        let request = ParseRequest {
            mime_type: Some("application/pdf".to_string()),
            data: Some("data:application/pdf;base64,JVBERi0=".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            request.into_input(),
            Err(StatementError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_to_request_omits_absent_fields() {
        let json = serde_json::to_string(&ParseInput::Text("abc".to_string()).to_request()).unwrap();
        assert_eq!(json, r#"{"text":"abc"}"#);

        let doc = ParseInput::Document {
            mime_type: "image/webp".to_string(),
            data: "AAAA".to_string(),
        };
        let json = serde_json::to_string(&doc.to_request()).unwrap();
        assert_eq!(json, r#"{"mimeType":"image/webp","data":"AAAA"}"#);
    }
}
