//! `multipart/mixed` batch response parser.
//!
//! A batch response body looks like this:
//!
//! ```text
//! --batch_abc
//! Content-Type: application/http
//! Content-ID: response-6f9c...
//!
//! HTTP/1.1 200 OK
//! Content-Type: application/json; charset=UTF-8
//!
//! {"name": "projects/p/messages/1"}
//!
//! --batch_abc--
//! ```
//!
//! Each part becomes one synthetic [`RawResponse`] in physical order.

use crate::error::ErrorContext;
use crate::response::RawResponse;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::warn;

/// Prefix the provider adds to echoed `Content-ID` values.
pub const RESPONSE_ID_PREFIX: &str = "response-";

const MULTIPART_MIXED: &str = "multipart/mixed";

static STATUS_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^HTTP/\d(?:\.\d)?\s+(\d{3})(?:\s|$)").expect("status line pattern is valid")
});

/// One embedded response of a batch, with its correlation id.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchPart {
    pub content_id: Option<String>,
    pub response: RawResponse,
}

fn parser_error(msg: impl Into<String>, details: Option<String>) -> Error {
    let mut ctx = ErrorContext::new().with_source("multipart_parser");
    if let Some(d) = details {
        ctx = ctx.with_details(d);
    }
    Error::protocol_with_context(msg, ctx)
}

/// Extract the boundary from a `multipart/mixed; boundary=...` content type.
pub fn boundary_from_content_type(content_type: &str) -> Result<String> {
    let mut params = content_type.split(';');
    let mime = params.next().unwrap_or_default().trim();
    if !mime.eq_ignore_ascii_case(MULTIPART_MIXED) {
        return Err(parser_error(
            "Expected a multipart/mixed batch response",
            Some(format!("content-type: {}", content_type)),
        ));
    }

    let boundary = params
        .filter_map(|p| p.split_once('='))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("boundary"))
        .map(|(_, v)| v.trim().trim_matches('"').to_string())
        .filter(|b| !b.is_empty());

    boundary.ok_or_else(|| {
        parser_error(
            "Multipart content type has no boundary parameter",
            Some(format!("content-type: {}", content_type)),
        )
    })
}

/// Does the content type announce a multipart batch body?
pub fn is_multipart(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|m| m.trim().eq_ignore_ascii_case(MULTIPART_MIXED))
        .unwrap_or(false)
}

enum Delimiter {
    Part,
    Close,
}

fn classify_line(line: &str, boundary: &str) -> Option<Delimiter> {
    let rest = line.strip_prefix("--")?.strip_prefix(boundary)?;
    if rest.trim().is_empty() {
        return Some(Delimiter::Part);
    }
    match rest.strip_prefix("--") {
        Some(tail) if tail.trim().is_empty() => Some(Delimiter::Close),
        _ => None,
    }
}

fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .unwrap_or(line)
}

/// Split `text` at the first blank line. CRLF and LF separators are both accepted.
pub(crate) fn split_head(text: &str) -> Option<(&str, &str)> {
    let crlf = text.find("\r\n\r\n").map(|i| (i, 4));
    let lf = text.find("\n\n").map(|i| (i, 2));
    let (at, len) = match (crlf, lf) {
        (Some(a), Some(b)) => {
            if a.0 <= b.0 {
                a
            } else {
                b
            }
        }
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => return None,
    };
    Some((&text[..at], &text[at + len..]))
}

pub(crate) fn header_lines(head: &str) -> impl Iterator<Item = (&str, &str)> {
    head.lines()
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim(), v.trim()))
}

fn normalize_content_id(raw: &str) -> Option<String> {
    let id = raw.trim().trim_start_matches('<').trim_end_matches('>').trim();
    let id = id.strip_prefix(RESPONSE_ID_PREFIX).unwrap_or(id);
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

fn parse_embedded_response(text: &str, index: usize) -> Result<RawResponse> {
    let text = text.trim_start_matches(['\r', '\n']);
    let (head, body) = split_head(text).unwrap_or((text, ""));

    let mut lines = head.lines();
    let status_line = lines.next().unwrap_or_default().trim();
    let status = STATUS_LINE
        .captures(status_line)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u16>().ok())
        .ok_or_else(|| {
            parser_error(
                format!("Part {} has a malformed HTTP status line", index),
                Some(format!("status line: {:?}", status_line)),
            )
        })?;

    let mut headers = HeaderMap::new();
    for (name, value) in lines.filter_map(|l| l.split_once(':')) {
        let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.trim().as_bytes()),
            HeaderValue::from_str(value.trim()),
        ) else {
            continue;
        };
        headers.append(name, value);
    }

    let body = body.trim_end_matches(['\r', '\n']);
    Ok(RawResponse::new(status, headers, body.to_string()))
}

fn parse_part(text: &str, index: usize) -> Result<BatchPart> {
    let (outer_head, inner) = split_head(text).ok_or_else(|| {
        parser_error(
            format!("Part {} has no header/body separator", index),
            None,
        )
    })?;

    let content_id = header_lines(outer_head)
        .find(|(k, _)| k.eq_ignore_ascii_case("content-id"))
        .and_then(|(_, v)| normalize_content_id(v));

    let response = parse_embedded_response(inner, index)?;
    Ok(BatchPart {
        content_id,
        response,
    })
}

/// Split a multipart body into the raw text of its parts.
///
/// The line break preceding each delimiter is removed from the part it ends.
pub(crate) fn split_body(content_type: &str, body: &[u8]) -> Result<Vec<String>> {
    let boundary = boundary_from_content_type(content_type)?;
    let text = std::str::from_utf8(body).map_err(|e| {
        parser_error(
            "Multipart batch body is not valid UTF-8",
            Some(e.to_string()),
        )
    })?;

    let mut raw_parts: Vec<String> = Vec::new();
    let mut current: Option<String> = None;
    let mut closed = false;

    for line in text.split_inclusive('\n') {
        match classify_line(strip_line_ending(line), &boundary) {
            Some(delim) => {
                if let Some(part) = current.take() {
                    raw_parts.push(part);
                }
                match delim {
                    Delimiter::Part => current = Some(String::new()),
                    Delimiter::Close => {
                        closed = true;
                        break;
                    }
                }
            }
            None => {
                // Lines before the first delimiter are preamble.
                if let Some(part) = current.as_mut() {
                    part.push_str(line);
                }
            }
        }
    }

    if !closed {
        warn!(
            boundary = %boundary,
            parts = raw_parts.len() + usize::from(current.is_some()),
            "multipart batch body has no close delimiter"
        );
        if let Some(part) = current.take().filter(|p| !p.trim().is_empty()) {
            raw_parts.push(part);
        }
    }

    if raw_parts.is_empty() {
        return Err(parser_error(
            "Multipart batch body contains no parts",
            Some(format!("boundary: {}", boundary)),
        ));
    }

    Ok(raw_parts
        .into_iter()
        .map(|p| strip_line_ending(&p).to_string())
        .collect())
}

/// Parse a batch response body into its embedded responses, in physical order.
pub fn parse_batch_body(content_type: &str, body: &[u8]) -> Result<Vec<BatchPart>> {
    split_body(content_type, body)?
        .iter()
        .enumerate()
        .map(|(i, p)| parse_part(p, i))
        .collect()
}
