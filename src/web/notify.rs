//! One-shot user notifications
//!
//! Rendered pages show their notifications directly. A redirect hands its
//! notifications to the next page through the `qwiki_flash` cookie, which that
//! page reads and clears.

use axum::http::{header, HeaderMap, HeaderValue};
use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "qwiki_flash";

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

impl Level {
    /// CSS class for the notification box
    pub fn css_class(&self) -> &'static str {
        match self {
            Level::Success => "alert-success",
            Level::Error => "alert-danger",
        }
    }
}

/// A user-facing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

/// `Set-Cookie` value carrying notifications to the next page
pub fn flash_cookie(notifications: &[Notification]) -> Option<HeaderValue> {
    if notifications.is_empty() {
        return None;
    }
    let json = serde_json::to_string(notifications).ok()?;
    let value = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        FLASH_COOKIE,
        utf8_percent_encode(&json, NON_ALPHANUMERIC)
    );
    HeaderValue::from_str(&value).ok()
}

/// `Set-Cookie` value removing the flash cookie
pub fn clear_flash_cookie() -> HeaderValue {
    HeaderValue::from_static("qwiki_flash=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Notifications left by the previous response.
///
/// `None` when the request carries no flash cookie; a malformed cookie yields
/// an empty list so it still gets cleared.
pub fn take_flash(headers: &HeaderMap) -> Option<Vec<Notification>> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == FLASH_COOKIE)
        .map(|(_, value)| {
            let json = percent_decode_str(value).decode_utf8_lossy();
            serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!("Discarding malformed flash cookie: {}", e);
                Vec::new()
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie_headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_flash_survives_cookie_header() {
        let sent = vec![
            Notification::success(r#"New page "C++; Java" created successfully"#),
            Notification::error("second"),
        ];
        let set_cookie = flash_cookie(&sent).unwrap();
        let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();

        let headers = cookie_headers(&format!("theme=dark; {}", pair));
        assert_eq!(take_flash(&headers), Some(sent));
    }

    #[test]
    fn test_no_notifications_no_cookie() {
        assert!(flash_cookie(&[]).is_none());
        assert!(take_flash(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_malformed_flash_is_ignored() {
        let headers = cookie_headers("qwiki_flash=%7Bnot-json");
        assert_eq!(take_flash(&headers), Some(Vec::new()));
    }
}
