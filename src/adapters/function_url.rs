//! Lambda function URL event format (payload version 2.0).

use crate::core::bridge::internal_error_response;
use crate::core::worker::{fetch, Env};
use crate::utils::error::{EdgeError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use http::{header, Request, Response};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionUrlRequest {
    #[serde(default)]
    pub raw_path: String,
    #[serde(default)]
    pub raw_query_string: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// 請求的 cookie 不在 `headers` 裡，而是另外放在這個陣列
    #[serde(default)]
    pub cookies: Vec<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
    pub request_context: RequestContext,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestContext {
    pub http: HttpContext,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpContext {
    pub method: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionUrlResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cookies: Vec<String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl FunctionUrlRequest {
    pub fn into_http(self) -> Result<Request<Bytes>> {
        let body = match self.body {
            Some(body) if self.is_base64_encoded => Bytes::from(
                STANDARD
                    .decode(body)
                    .map_err(|e| EdgeError::decode(format!("invalid base64 body: {}", e)))?,
            ),
            Some(body) => Bytes::from(body),
            None => Bytes::new(),
        };

        let path = if self.raw_path.is_empty() {
            "/"
        } else {
            self.raw_path.as_str()
        };
        let uri = if self.raw_query_string.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, self.raw_query_string)
        };

        let mut builder = Request::builder()
            .method(self.request_context.http.method.as_str())
            .uri(uri);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !self.cookies.is_empty() {
            builder = builder.header(header::COOKIE, self.cookies.join("; "));
        }

        Ok(builder.body(body)?)
    }
}

impl From<Response<Bytes>> for FunctionUrlResponse {
    fn from(response: Response<Bytes>) -> Self {
        let (parts, body) = response.into_parts();

        let mut headers: HashMap<String, String> = HashMap::new();
        let mut cookies = Vec::new();
        for (name, value) in &parts.headers {
            let Ok(value) = value.to_str() else {
                continue;
            };
            // Set-Cookie 不能用逗號合併，必須走 cookies 陣列
            if *name == header::SET_COOKIE {
                cookies.push(value.to_string());
                continue;
            }
            headers
                .entry(name.as_str().to_string())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }

        // 非 UTF-8 的 body 以 base64 傳回
        let (body, is_base64_encoded) = match String::from_utf8(body.to_vec()) {
            Ok(text) => (text, false),
            Err(_) => (STANDARD.encode(&body), true),
        };

        Self {
            status_code: parts.status.as_u16(),
            headers,
            cookies,
            body,
            is_base64_encoded,
        }
    }
}

/// Converts the event, runs it through [`fetch`] and converts back. Event
/// conversion failures get the same 500 shape as everything else.
pub async fn handle_event(event: FunctionUrlRequest, env: &Env) -> FunctionUrlResponse {
    let response = match event.into_http() {
        Ok(request) => fetch(request, env).await,
        Err(e) => {
            tracing::error!("❌ Invalid function URL event: {}", e);
            internal_error_response(&e.to_string())
        }
    };
    FunctionUrlResponse::from(response)
}
