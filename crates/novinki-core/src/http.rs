//! HTTP-shaped event envelope used by cloud function triggers.
//!
//! Events arrive as camelCase JSON (`httpMethod`, `queryStringParameters`,
//! ...) and the function answers with `statusCode` / `headers` / `body`.
//! Every response carries CORS headers, including errors.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// An incoming trigger event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpEvent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub http_method: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub query_string_parameters: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_base64_encoded: bool,
}

/// The subset of methods the function distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Options,
    Get,
    Post,
    Other(String),
}

impl HttpEvent {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            http_method: method.into(),
            ..Default::default()
        }
    }

    pub fn method(&self) -> Method {
        match self.http_method.to_ascii_uppercase().as_str() {
            "OPTIONS" => Method::Options,
            // Some triggers omit the method for plain invocations.
            "GET" | "" => Method::Get,
            "POST" => Method::Post,
            other => Method::Other(other.to_string()),
        }
    }
}

/// The function's reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Static CORS policy applied to every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cors {
    pub allow_origin: String,
    pub allow_headers: String,
    pub max_age: u32,
}

impl Default for Cors {
    fn default() -> Self {
        Self {
            allow_origin: "*".into(),
            allow_headers: "Content-Type".into(),
            max_age: 86400,
        }
    }
}

impl Cors {
    /// Answer to an `OPTIONS` preflight. Empty body, no upstream call.
    pub fn preflight(&self) -> HttpResponse {
        let headers = BTreeMap::from([
            ("Access-Control-Allow-Origin".to_string(), self.allow_origin.clone()),
            ("Access-Control-Allow-Methods".to_string(), ALLOWED_METHODS.to_string()),
            ("Access-Control-Allow-Headers".to_string(), self.allow_headers.clone()),
            ("Access-Control-Max-Age".to_string(), self.max_age.to_string()),
        ]);
        HttpResponse {
            status_code: 200,
            headers,
            body: String::new(),
            is_base64_encoded: false,
        }
    }

    /// A JSON response with the origin header attached.
    pub fn json(&self, status_code: u16, body: String) -> HttpResponse {
        let headers = BTreeMap::from([
            ("Access-Control-Allow-Origin".to_string(), self.allow_origin.clone()),
            ("Content-Type".to_string(), "application/json".to_string()),
        ]);
        HttpResponse {
            status_code,
            headers,
            body,
            is_base64_encoded: false,
        }
    }

    pub fn method_not_allowed(&self, method: &str) -> HttpResponse {
        let body = serde_json::json!({ "error": format!("method {method} not allowed") });
        let mut resp = self.json(405, body.to_string());
        resp.headers
            .insert("Allow".to_string(), ALLOWED_METHODS.to_string());
        resp
    }

    /// Minimal error shape for failures that escape the handler.
    pub fn internal_error(&self, message: &str) -> HttpResponse {
        let body = serde_json::json!({ "error": message });
        self.json(500, body.to_string())
    }
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_event() {
        let json = r#"{
            "httpMethod": "GET",
            "headers": {"Origin": "https://example.org"},
            "queryStringParameters": null,
            "body": "",
            "isBase64Encoded": false
        }"#;
        let event: HttpEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.method(), Method::Get);
        assert_eq!(event.headers["Origin"], "https://example.org");
        assert!(event.query_string_parameters.is_empty());
    }

    #[test]
    fn test_empty_event_is_get() {
        let event: HttpEvent = serde_json::from_str("{}").unwrap();
        assert_eq!(event.method(), Method::Get);
    }

    #[test]
    fn test_method_is_case_insensitive() {
        assert_eq!(HttpEvent::new("options").method(), Method::Options);
        assert_eq!(HttpEvent::new("Post").method(), Method::Post);
        assert_eq!(
            HttpEvent::new("DELETE").method(),
            Method::Other("DELETE".into())
        );
    }

    #[test]
    fn test_preflight_headers() {
        let resp = Cors::default().preflight();
        assert_eq!(resp.status_code, 200);
        assert!(resp.body.is_empty());
        assert_eq!(resp.header("access-control-allow-origin"), Some("*"));
        assert_eq!(
            resp.header("Access-Control-Allow-Methods"),
            Some("GET, POST, OPTIONS")
        );
        assert_eq!(resp.header("Access-Control-Allow-Headers"), Some("Content-Type"));
        assert_eq!(resp.header("Access-Control-Max-Age"), Some("86400"));
    }

    #[test]
    fn test_json_response_shape() {
        let resp = Cors::default().json(200, r#"{"items":[]}"#.into());
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["headers"]["Content-Type"], "application/json");
        assert_eq!(value["headers"]["Access-Control-Allow-Origin"], "*");
        assert_eq!(value["body"], r#"{"items":[]}"#);
        assert_eq!(value["isBase64Encoded"], false);
    }

    #[test]
    fn test_method_not_allowed() {
        let resp = Cors::default().method_not_allowed("DELETE");
        assert_eq!(resp.status_code, 405);
        assert_eq!(resp.header("Allow"), Some(ALLOWED_METHODS));
        assert_eq!(resp.header("Access-Control-Allow-Origin"), Some("*"));
    }
}
