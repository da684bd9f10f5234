//! Urlencoded field decoding for `POST /encrypt`.
//!
//! Values are percent-decoded to raw bytes and never re-interpreted as UTF-8,
//! so the plaintext reaches Cloud KMS exactly as the client sent it.

use axum::http::{header, HeaderMap};
use percent_encoding::percent_decode;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// The `key` and `text` fields of an encrypt request.
///
/// Body fields take precedence over query-string fields, and the first
/// occurrence of a repeated field wins.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct EncryptFields {
    pub key: Option<Vec<u8>>,
    pub text: Option<Vec<u8>>,
}

impl EncryptFields {
    /// Collect fields from a urlencoded body and the request query string.
    ///
    /// A body is read when it is declared urlencoded or has no content type at
    /// all; any other body is ignored and its fields count as absent.
    pub fn parse(headers: &HeaderMap, query: Option<&str>, body: &[u8]) -> Self {
        let mut fields = Self::default();
        if is_urlencoded(headers) {
            fields.fill(body);
        }
        if let Some(query) = query {
            fields.fill(query.as_bytes());
        }
        fields
    }

    fn fill(&mut self, input: &[u8]) {
        for pair in input.split(|&b| b == b'&').filter(|p| !p.is_empty()) {
            let (name, value) = match pair.iter().position(|&b| b == b'=') {
                Some(i) => (&pair[..i], &pair[i + 1..]),
                None => (pair, &[][..]),
            };
            let slot = match decode(name).as_slice() {
                b"key" => &mut self.key,
                b"text" => &mut self.text,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(decode(value));
            }
        }
    }
}

/// `+` is a space; `%XX` is the byte `0xXX`; malformed escapes stay literal.
fn decode(raw: &[u8]) -> Vec<u8> {
    let spaced: Vec<u8> = raw
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect();
    percent_decode(&spaced).collect()
}

fn is_urlencoded(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(header::CONTENT_TYPE) else {
        return true;
    };
    value
        .to_str()
        .ok()
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_URLENCODED))
}
