use crate::core::{Application, BodyMap, HttpRequest, HttpResponse};
use crate::utils::error::{EdgeError, Result};
use bytes::Bytes;
use futures::FutureExt;
use http::header::{self, HeaderMap, HeaderValue};
use http::{Method, Request, Response, StatusCode};
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Translates native `http` requests into neutral ones, runs the application
/// core and translates the result back.
///
/// [`RequestBridge::handle`] is the only place where failures become an HTTP
/// response: decode, application and encode errors (and panics) all end up as
/// a 500 with a JSON body.
pub struct RequestBridge<A: Application> {
    app: A,
}

impl<A: Application> RequestBridge<A> {
    pub fn new(app: A) -> Self {
        Self { app }
    }

    pub async fn handle(&self, request: Request<Bytes>) -> Response<Bytes> {
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        match AssertUnwindSafe(self.try_handle(request)).catch_unwind().await {
            Ok(Ok(response)) => {
                tracing::debug!("{} {} -> {}", method, path, response.status());
                response
            }
            Ok(Err(e)) => {
                tracing::error!("❌ {} {} failed: {}", method, path, e);
                internal_error_response(&e.to_string())
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::error!("❌ {} {} panicked: {}", method, path, message);
                internal_error_response(&message)
            }
        }
    }

    async fn try_handle(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        let request = decode_request(request)?;
        let response = self.app.handle_request(request).await?;
        encode_response(response)
    }
}

pub fn decode_request(request: Request<Bytes>) -> Result<HttpRequest> {
    let (parts, body) = request.into_parts();

    let query = parts.uri.query().map(parse_query).unwrap_or_default();

    // 只有 POST 會解析 body
    let body = if parts.method == Method::POST {
        decode_body(&parts.headers, &body)?
    } else {
        BodyMap::new()
    };

    Ok(HttpRequest {
        method: parts.method.as_str().to_string(),
        path: parts.uri.path().to_string(),
        body,
        query,
    })
}

fn parse_query(query: &str) -> HashMap<String, String> {
    // collect 依序插入，重複的 key 以最後一個為準
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

fn decode_body(headers: &HeaderMap, body: &Bytes) -> Result<BodyMap> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.contains(JSON_CONTENT_TYPE) {
        return match serde_json::from_slice::<serde_json::Value>(body)? {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(EdgeError::decode(format!(
                "expected a JSON object body, got {}",
                json_kind(&other)
            ))),
        };
    }

    if content_type.contains(FORM_CONTENT_TYPE) {
        return Ok(url::form_urlencoded::parse(body)
            .into_owned()
            .map(|(key, value)| (key, serde_json::Value::String(value)))
            .collect());
    }

    // 其他 content type 一律視為空 body
    if !body.is_empty() {
        tracing::debug!(
            "Ignoring {} byte body with content type '{}'",
            body.len(),
            content_type
        );
    }
    Ok(BodyMap::new())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

pub fn encode_response(response: HttpResponse) -> Result<Response<Bytes>> {
    let mut builder = Response::builder().status(response.status);
    for (name, value) in &response.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    Ok(builder.body(Bytes::from(response.body))?)
}

/// The fixed 500 shape returned for every failure.
pub fn internal_error_response(message: &str) -> Response<Bytes> {
    let message = if message.trim().is_empty() {
        "Unknown error"
    } else {
        message
    };
    let body = serde_json::json!({
        "error": "Internal Server Error",
        "message": message,
    });

    let mut response = Response::new(Bytes::from(body.to_string()));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(JSON_CONTENT_TYPE),
    );
    response
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::new()
    }
}
