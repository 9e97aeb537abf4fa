use std::collections::HashMap;

use axum::http::HeaderMap;
use bytes::Bytes;
use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};

/// An image part captured from a multipart body.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl FilePart {
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

/// A parsed request body: text fields plus any file parts. JSON and
/// urlencoded bodies never carry files.
#[derive(Debug, Default)]
pub struct ParsedForm {
    pub fields: Map<String, Value>,
    pub files: HashMap<String, FilePart>,
}

impl ParsedForm {
    /// Whether the request supplied `key` as a text field at all.
    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Trimmed text value for `key`, or `None` when the field is absent or
    /// null. JSON numbers and booleans are rendered as text so payload
    /// values behave like their form-encoded counterparts.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn file(&self, key: &str) -> Option<&FilePart> {
        self.files.get(key)
    }
}

/// Parse a request body according to its content type. Multipart bodies may
/// carry file parts; everything else is treated as JSON or a urlencoded
/// form. Unknown content types fall back to a JSON attempt so lenient
/// clients still work.
pub async fn parse_request(headers: &HeaderMap, body: Bytes) -> Result<ParsedForm, String> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if content_type.contains("multipart/form-data") {
        parse_multipart(content_type, body).await
    } else if content_type.contains("application/x-www-form-urlencoded") {
        Ok(parse_urlencoded(&body))
    } else {
        parse_json(&body)
    }
}

fn parse_json(body: &[u8]) -> Result<ParsedForm, String> {
    if body.is_empty() {
        return Ok(ParsedForm::default());
    }
    let value: Value =
        serde_json::from_slice(body).map_err(|e| format!("Invalid JSON body: {e}"))?;
    match value {
        Value::Object(fields) => Ok(ParsedForm {
            fields,
            files: HashMap::new(),
        }),
        _ => Err("Expected a JSON object".to_string()),
    }
}

fn parse_urlencoded(body: &[u8]) -> ParsedForm {
    let mut form = ParsedForm::default();
    for (key, value) in form_urlencoded::parse(body) {
        form.fields
            .insert(key.into_owned(), Value::String(value.into_owned()));
    }
    form
}

async fn parse_multipart(content_type: &str, body: Bytes) -> Result<ParsedForm, String> {
    let boundary = multer::parse_boundary(content_type)
        .map_err(|e| format!("Invalid multipart boundary: {e}"))?;

    let stream = futures_util::stream::once(async move { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut form = ParsedForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Invalid multipart body: {e}"))?
    {
        let name = match field.name() {
            Some(name) => name.to_string(),
            None => continue,
        };

        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                // A file input left empty still produces a part; skip it.
                if file_name.is_empty() {
                    continue;
                }
                let content_type = field
                    .content_type()
                    .map(|m| m.to_string())
                    .unwrap_or_default();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Failed to read uploaded file: {e}"))?;
                form.files.insert(
                    name,
                    FilePart {
                        file_name,
                        content_type,
                        bytes,
                    },
                );
            }
            None => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| format!("Failed to read field {name}: {e}"))?;
                form.fields.insert(name, Value::String(value));
            }
        }
    }

    Ok(form)
}

/// Lenient date parse. Plain dates and RFC 3339 timestamps are accepted;
/// anything else is treated as "no value".
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Lenient integer parse for pet ages.
pub fn parse_age(raw: &str) -> Option<i32> {
    raw.parse::<i32>().ok()
}
