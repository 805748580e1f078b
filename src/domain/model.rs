use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use std::collections::HashMap;

/// 請求 body 的扁平 key→value 映射
pub type BodyMap = serde_json::Map<String, serde_json::Value>;

/// 序列化一律經過 `date_string()`，不走 serde，確保日期固定為毫秒精度
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredData {
    pub tag: String,
    pub value: String,
    pub date: DateTime<Utc>,
}

impl StoredData {
    /// 以目前時間建立一筆資料，精度截到毫秒以便與持久化後的 ISO-8601 字串一致
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
            date: Utc::now().trunc_subsecs(3),
        }
    }

    /// 從資料列欄位重建；`date` 必須是 ISO-8601 / RFC 3339 字串
    pub fn from_row(tag: String, value: String, date: &str) -> Result<Self, chrono::ParseError> {
        let date = DateTime::parse_from_rfc3339(date)?.with_timezone(&Utc);
        Ok(Self { tag, value, date })
    }

    /// 持久化用的日期格式，例如 `2024-05-01T08:30:00.123Z`
    pub fn date_string(&self) -> String {
        self.date.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Platform-neutral inbound request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub body: BodyMap,
    pub query: HashMap<String, String>,
}

impl HttpRequest {
    /// Looks a field up in the body first, then in the query string.
    pub fn param(&self, key: &str) -> Option<String> {
        match self.body.get(key) {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Null) | None => self.query.get(key).cloned(),
            Some(other) => Some(other.to_string()),
        }
    }
}

/// Platform-neutral outbound response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            status,
            headers,
            body: body.to_string(),
        }
    }
}
