//! `multipart/form-data` body parsing.
//!
//! The parser works on the raw request body as [`Bytes`], so file parts are
//! sliced out without copying and without ever being decoded as text. Only
//! part headers and plain field values go through UTF-8 decoding.

use bytes::Bytes;
use memchr::memmem;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;

const CRLF: &[u8] = b"\r\n";
const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";
const DEFAULT_FILE_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MultipartError {
    #[error("no multipart boundary found")]
    MissingBoundary,
    #[error("malformed multipart part")]
    MalformedPart,
}

/// A file part of a submitted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Parsed form: text fields and file fields keyed by part name.
///
/// A name maps to at most one entry across both kinds; a later part with the
/// same name replaces an earlier one.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl FormData {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }

    pub fn insert_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.files.remove(&name);
        self.fields.insert(name, value.into());
    }

    pub fn insert_file(&mut self, name: impl Into<String>, file: UploadedFile) {
        let name = name.into();
        self.fields.remove(&name);
        self.files.insert(name, file);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.files.is_empty()
    }
}

/// Extract the `boundary` parameter from a `Content-Type` header value.
pub fn boundary_from_content_type(content_type: &str) -> Result<String, MultipartError> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("boundary"))
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|boundary| !boundary.is_empty())
        .ok_or(MultipartError::MissingBoundary)
}

/// Split `body` on `--{boundary}` and collect every named part.
///
/// Parts without a `Content-Disposition` name are skipped, as are file parts
/// with an empty filename (what browsers send for an untouched file input).
pub fn parse(body: &Bytes, boundary: &str) -> Result<FormData, MultipartError> {
    if boundary.is_empty() {
        return Err(MultipartError::MissingBoundary);
    }
    let delimiter = format!("--{}", boundary);
    let mut form = FormData::default();

    // The first segment is the preamble.
    for segment in split_on(body, delimiter.as_bytes()).into_iter().skip(1) {
        // `--{boundary}--` closes the body; anything after is epilogue.
        if segment.starts_with(b"--") {
            break;
        }
        let segment = trim_crlf(segment);
        if let Some((name, value)) = parse_part(segment)? {
            match value {
                PartValue::Field(value) => form.insert_field(name, value),
                PartValue::File(file) => form.insert_file(name, file),
            }
        }
    }

    Ok(form)
}

enum PartValue {
    Field(String),
    File(UploadedFile),
}

fn parse_part(part: Bytes) -> Result<Option<(String, PartValue)>, MultipartError> {
    let Some(header_end) = find(&part, HEADER_TERMINATOR, 0) else {
        if has_content_disposition(&String::from_utf8_lossy(&part)) {
            return Err(MultipartError::MalformedPart);
        }
        return Ok(None);
    };

    let headers = String::from_utf8_lossy(&part[..header_end]);
    let body = part.slice(header_end + HEADER_TERMINATOR.len()..);

    let Some(disposition) = header_value(&headers, "content-disposition") else {
        return Ok(None);
    };
    let params = disposition_params(disposition);
    let Some(name) = params.get("name").filter(|name| !name.is_empty()) else {
        return Ok(None);
    };

    let value = match params.get("filename") {
        Some(file_name) if file_name.is_empty() => return Ok(None),
        Some(file_name) => PartValue::File(UploadedFile {
            file_name: file_name.clone(),
            content_type: header_value(&headers, "content-type")
                .filter(|value| !value.is_empty())
                .unwrap_or(DEFAULT_FILE_CONTENT_TYPE)
                .to_string(),
            data: body,
        }),
        None => PartValue::Field(String::from_utf8_lossy(&body).into_owned()),
    };

    Ok(Some((name.clone(), value)))
}

fn header_value<'a>(headers: &'a str, name: &str) -> Option<&'a str> {
    headers
        .split("\r\n")
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
        .map(|(_, value)| value.trim())
}

fn has_content_disposition(text: &str) -> bool {
    text.to_ascii_lowercase().contains("content-disposition")
}

fn disposition_params(disposition: &str) -> HashMap<String, String> {
    static PARAM: OnceLock<Regex> = OnceLock::new();
    // Anchored on `;` so `filename=` never satisfies a lookup for `name=`.
    let re = PARAM.get_or_init(|| {
        Regex::new(r#";\s*([A-Za-z*-]+)\s*=\s*(?:"([^"]*)"|([^;\s]*))"#).unwrap()
    });

    re.captures_iter(disposition)
        .map(|caps| {
            let key = caps[1].to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            (key, value)
        })
        .fold(HashMap::new(), |mut params, (key, value)| {
            params.entry(key).or_insert(value);
            params
        })
}

/// Split `body` on every occurrence of `delimiter`, returning the pieces in
/// between as zero-copy slices.
fn split_on(body: &Bytes, delimiter: &[u8]) -> Vec<Bytes> {
    let mut segments = Vec::new();
    let mut start = 0;
    while let Some(at) = find(body, delimiter, start) {
        segments.push(body.slice(start..at));
        start = at + delimiter.len();
    }
    segments.push(body.slice(start..));
    segments
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() {
        return None;
    }
    memmem::find(&haystack[from..], needle).map(|offset| from + offset)
}

/// Drop the line break that follows a delimiter and the one that precedes the
/// next delimiter; both belong to the framing, not to the part.
fn trim_crlf(segment: Bytes) -> Bytes {
    let start = if segment.starts_with(CRLF) { CRLF.len() } else { 0 };
    let end = if segment.len() >= start + CRLF.len() && segment.ends_with(CRLF) {
        segment.len() - CRLF.len()
    } else {
        segment.len()
    };
    segment.slice(start..end)
}
