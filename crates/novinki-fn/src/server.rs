//! Local HTTP listener for the function.
//!
//! Every request, whatever its path, is turned into an [`HttpEvent`] and
//! answered by [`Handler::respond`], so the function behaves exactly as it
//! does behind a cloud trigger.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;

use novinki_core::http::{HttpEvent, HttpResponse};

use crate::handler::Handler;

pub fn router(handler: Arc<Handler>) -> Router {
    Router::new().fallback(invoke).with_state(handler)
}

/// Bind `host:port` and serve until the process stops.
pub async fn serve(handler: Arc<Handler>, host: &str, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(handler)).await
}

async fn invoke(
    State(handler): State<Arc<Handler>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let event = to_event(&method, &uri, &headers, body);
    let resp = handler.respond(&event).await;
    tracing::debug!(%method, path = uri.path(), status = resp.status_code, "served");
    into_response(resp)
}

fn to_event(method: &Method, uri: &Uri, headers: &HeaderMap, body: String) -> HttpEvent {
    let headers: BTreeMap<String, String> = headers
        .iter()
        .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
        .collect();
    let query: BTreeMap<String, String> = uri
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();

    HttpEvent {
        http_method: method.as_str().to_string(),
        headers,
        query_string_parameters: query,
        body: (!body.is_empty()).then_some(body),
        is_base64_encoded: false,
    }
}

fn into_response(resp: HttpResponse) -> Response {
    let status = StatusCode::from_u16(resp.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut out = (status, resp.body).into_response();
    let headers = out.headers_mut();
    for (name, value) in resp.headers {
        match (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "dropping invalid response header"),
        }
    }
    out
}
