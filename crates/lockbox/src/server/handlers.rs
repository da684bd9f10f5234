//! Axum request handlers for all service endpoints.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Json,
};
use common::protocol::{ErrorResponse, KeyListResponse};
use common::{EncryptError, ServiceError};
use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::{debug, error};

use super::form::EncryptFields;
use super::state::AppState;
use crate::registry::KeyDescriptor;

const INDEX_HTML: &str = include_str!("../../templates/index.html");

/// `GET /` — the single-page UI.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// `GET /keys` — selectable keys of the configured key ring.
///
/// Renders `<option>` elements by default, or a [`KeyListResponse`] when the
/// client accepts `application/json`.
pub async fn keys(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let keys = match state.registry.list_keys().await {
        Ok(k) => k,
        Err(e) => {
            log_service_error(&e);
            let err = ErrorResponse::new("service_error", "failed to list keys");
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(err)).into_response();
        }
    };

    if accepts_json(&headers) {
        let body = KeyListResponse {
            keys: keys.into_iter().map(Into::into).collect(),
        };
        return (StatusCode::OK, Json(body)).into_response();
    }

    Html(render_options(&keys)).into_response()
}

/// `POST /encrypt` — encrypt the `text` field with the `key` field.
///
/// Fields come from a urlencoded body or the query string. Returns the base64
/// ciphertext as `text/plain`. Absent fields are treated as empty and rejected
/// as missing.
pub async fn encrypt(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    body: Bytes,
) -> Response {
    let fields = EncryptFields::parse(&headers, uri.query(), &body);
    let text = fields.text.unwrap_or_default();
    // Non-UTF-8 keys become U+FFFD here, which validation rejects as a bad format.
    let key_bytes = fields.key.unwrap_or_default();
    let key = String::from_utf8_lossy(&key_bytes);

    match state.orchestrator.encrypt(&key, &text).await {
        Ok(ciphertext) => ciphertext.to_base64().into_response(),
        Err(e) => {
            match &e {
                EncryptError::Rejected(v) => debug!(code = v.code(), "encrypt request rejected"),
                EncryptError::Failed(s) => log_service_error(s),
            }
            let status = StatusCode::from_u16(e.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let err = ErrorResponse::new(e.code(), e.public_message());
            (status, Json(err)).into_response()
        }
    }
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The upstream cause goes to the log only; callers get a generic message.
fn log_service_error(e: &ServiceError) {
    let cause = std::error::Error::source(e)
        .map(ToString::to_string)
        .unwrap_or_default();
    error!(error = %e, %cause, "key management call failed");
}

fn accepts_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

/// Build the `<option>` list for the key dropdown.
fn render_options(keys: &[KeyDescriptor]) -> String {
    if keys.is_empty() {
        return r#"<option value="" disabled selected>No keys available</option>"#.to_owned();
    }

    let mut out = String::from(r#"<option value="" disabled selected>Select key</option>"#);
    for key in keys {
        out.push_str(&format!(
            r#"<option value="{}">{}</option>"#,
            encode_double_quoted_attribute(&key.full_name),
            encode_text(&key.short_name),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::http::HeaderValue;
    use axum_test::TestServer;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use common::protocol::EncryptForm;

    use crate::encrypt::orchestrator::tests::{FakeKms, KEY};
    use crate::encrypt::guard::MAX_PLAINTEXT_BYTES;
    use crate::kms::{KeyManagement, MockKeyManagement};
    use crate::resource::KeyRingPath;
    use crate::server::router;

    const RING: &str = "projects/p1/locations/us/keyRings/ring1";

    fn server(kms: impl KeyManagement + 'static) -> TestServer {
        let state = AppState::new(Arc::new(kms), KeyRingPath::new("p1", "us", "ring1"));
        TestServer::new(router::build(state)).unwrap()
    }

    fn form(key: Option<&str>, text: Option<&str>) -> EncryptForm {
        EncryptForm {
            key: key.map(Into::into),
            text: text.map(Into::into),
        }
    }

    fn two_keys() -> MockKeyManagement {
        let mut kms = MockKeyManagement::new();
        kms.expect_list_crypto_keys().returning(|_, _| {
            Ok(vec![
                format!("{RING}/cryptoKeys/b"),
                format!("{RING}/cryptoKeys/a"),
            ])
        });
        kms
    }

    #[tokio::test]
    async fn keys_render_as_options() {
        let resp = server(two_keys()).get("/keys").await;
        resp.assert_status_ok();
        assert_eq!(
            resp.text(),
            format!(
                concat!(
                    r#"<option value="" disabled selected>Select key</option>"#,
                    r#"<option value="{ring}/cryptoKeys/a">a</option>"#,
                    r#"<option value="{ring}/cryptoKeys/b">b</option>"#,
                ),
                ring = RING
            )
        );
    }

    #[tokio::test]
    async fn keys_as_json_when_requested() {
        let resp = server(two_keys())
            .get("/keys")
            .add_header(header::ACCEPT, HeaderValue::from_static("application/json"))
            .await;
        resp.assert_status_ok();
        let body: KeyListResponse = resp.json();
        let pairs: Vec<(String, String)> = body
            .keys
            .into_iter()
            .map(|k| (k.name, k.short_name))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (format!("{RING}/cryptoKeys/a"), "a".to_owned()),
                (format!("{RING}/cryptoKeys/b"), "b".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn empty_key_ring_renders_placeholder() {
        let mut kms = MockKeyManagement::new();
        kms.expect_list_crypto_keys().returning(|_, _| Ok(vec![]));
        let resp = server(kms).get("/keys").await;
        resp.assert_status_ok();
        assert!(resp.text().contains("No keys available"));
    }

    #[tokio::test]
    async fn listing_failure_is_500_without_details() {
        let mut kms = MockKeyManagement::new();
        kms.expect_list_crypto_keys()
            .returning(|_, _| Err(ServiceError::ListKeys("token expired for sa@p1".into())));
        let resp = server(kms).get("/keys").await;
        resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!resp.text().contains("sa@p1"));
    }

    #[tokio::test]
    async fn encrypt_returns_base64_ciphertext() {
        let resp = server(FakeKms)
            .post("/encrypt")
            .form(&form(Some(KEY), Some("attack at dawn")))
            .await;
        resp.assert_status_ok();
        let ciphertext = STANDARD.decode(resp.text()).unwrap();
        assert_eq!(FakeKms::decrypt(KEY, &ciphertext), b"attack at dawn");
    }

    #[tokio::test]
    async fn empty_text_is_missing_field() {
        let mut kms = MockKeyManagement::new();
        kms.expect_encrypt().never();
        let resp = server(kms)
            .post("/encrypt")
            .form(&form(Some(KEY), Some("")))
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = resp.json();
        assert_eq!(body.code, "missing_field");
    }

    #[tokio::test]
    async fn absent_fields_are_missing() {
        let mut kms = MockKeyManagement::new();
        kms.expect_encrypt().never();
        let server = server(kms);

        for f in [form(None, Some("hi")), form(Some(KEY), None), form(None, None)] {
            let resp = server.post("/encrypt").form(&f).await;
            resp.assert_status(StatusCode::BAD_REQUEST);
            let body: ErrorResponse = resp.json();
            assert_eq!(body.code, "missing_field");
        }
    }

    #[tokio::test]
    async fn validation_failures_are_400() {
        let mut kms = MockKeyManagement::new();
        kms.expect_encrypt().never();
        let server = server(kms);

        let too_long = format!("{RING}/cryptoKeys/{}", "k".repeat(64));
        let too_big = "a".repeat(MAX_PLAINTEXT_BYTES);
        let cases = [
            (
                "projects/p2/locations/us/keyRings/ring1/cryptoKeys/my-key",
                "hi",
                "invalid_format",
            ),
            (too_long.as_str(), "hi", "name_too_long"),
            (KEY, too_big.as_str(), "payload_too_large"),
        ];
        for (key, text, code) in cases {
            let resp = server.post("/encrypt").form(&form(Some(key), Some(text))).await;
            resp.assert_status(StatusCode::BAD_REQUEST);
            let body: ErrorResponse = resp.json();
            assert_eq!(body.code, code);
        }
    }

    #[tokio::test]
    async fn largest_plaintext_is_accepted() {
        let text = "a".repeat(MAX_PLAINTEXT_BYTES - 1);
        let resp = server(FakeKms)
            .post("/encrypt")
            .form(&form(Some(KEY), Some(&text)))
            .await;
        resp.assert_status_ok();
    }

    #[tokio::test]
    async fn kms_failure_is_500_without_details() {
        let mut kms = MockKeyManagement::new();
        kms.expect_encrypt()
            .times(1)
            .returning(|_, _| Err(ServiceError::Encrypt("CryptoKey my-key is disabled".into())));
        let resp = server(kms)
            .post("/encrypt")
            .form(&form(Some(KEY), Some("hi")))
            .await;
        resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorResponse = resp.json();
        assert_eq!(body.code, "service_error");
        assert_eq!(body.message, "encryption failed");
    }

    #[tokio::test]
    async fn non_utf8_plaintext_is_forwarded_unchanged() {
        let mut kms = MockKeyManagement::new();
        kms.expect_encrypt()
            .withf(|key, plaintext| key.as_str() == KEY && plaintext == &[0xff, 0xfe])
            .times(1)
            .returning(|_, _| Ok(vec![0x01, 0x02]));
        let body = format!("key={}&text=%FF%FE", KEY.replace('/', "%2F"));
        let resp = server(kms)
            .post("/encrypt")
            .bytes(body.into())
            .content_type("application/x-www-form-urlencoded")
            .await;
        resp.assert_status_ok();
        assert_eq!(resp.text(), "AQI=");
    }

    #[tokio::test]
    async fn binary_plaintext_round_trips() {
        let body = format!("key={KEY}&text=%00%80%FFok");
        let resp = server(FakeKms)
            .post("/encrypt")
            .bytes(body.into())
            .content_type("application/x-www-form-urlencoded")
            .await;
        resp.assert_status_ok();
        let ciphertext = STANDARD.decode(resp.text()).unwrap();
        assert_eq!(FakeKms::decrypt(KEY, &ciphertext), b"\x00\x80\xffok");
    }

    #[tokio::test]
    async fn empty_body_without_content_type_is_missing_field() {
        let mut kms = MockKeyManagement::new();
        kms.expect_encrypt().never();
        let resp = server(kms).post("/encrypt").await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = resp.json();
        assert_eq!(body.code, "missing_field");
    }

    #[tokio::test]
    async fn repeated_fields_use_first_value() {
        let resp = server(FakeKms)
            .post("/encrypt")
            .bytes(format!("key={KEY}&key=other&text=hi&text=bye").into())
            .content_type("application/x-www-form-urlencoded")
            .await;
        resp.assert_status_ok();
        let ciphertext = STANDARD.decode(resp.text()).unwrap();
        assert_eq!(FakeKms::decrypt(KEY, &ciphertext), b"hi");

        let mut kms = MockKeyManagement::new();
        kms.expect_encrypt().never();
        let resp = server(kms)
            .post("/encrypt")
            .bytes(format!("key={KEY}&text=&text=hi").into())
            .content_type("application/x-www-form-urlencoded")
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = resp.json();
        assert_eq!(body.code, "missing_field");
    }

    #[tokio::test]
    async fn fields_may_come_from_query_string() {
        let resp = server(FakeKms)
            .post(&format!("/encrypt?key={KEY}&text=from+query"))
            .await;
        resp.assert_status_ok();
        let ciphertext = STANDARD.decode(resp.text()).unwrap();
        assert_eq!(FakeKms::decrypt(KEY, &ciphertext), b"from query");
    }

    #[tokio::test]
    async fn non_utf8_key_is_invalid_format() {
        let mut kms = MockKeyManagement::new();
        kms.expect_encrypt().never();
        let resp = server(kms)
            .post("/encrypt")
            .bytes(format!("key={KEY}%FF&text=hi").into())
            .content_type("application/x-www-form-urlencoded")
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = resp.json();
        assert_eq!(body.code, "invalid_format");
    }

    #[test]
    fn options_escape_markup() {
        let keys = [KeyDescriptor {
            full_name: r#"x"><script>"#.into(),
            short_name: "<b>&".into(),
        }];
        let html = render_options(&keys);
        assert!(html.contains(r#"value="x&quot;&gt;&lt;script&gt;""#));
        assert!(html.contains(">&lt;b&gt;&amp;</option>"));
    }

    #[test]
    fn accepts_json_only_when_listed() {
        let mut headers = HeaderMap::new();
        assert!(!accepts_json(&headers));
        headers.insert(header::ACCEPT, HeaderValue::from_static("text/html"));
        assert!(!accepts_json(&headers));
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/plain"),
        );
        assert!(accepts_json(&headers));
    }
}
