use crate::core::{Application, HttpRequest, HttpResponse, StoragePort, StoredData};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::json;

/// TinyWebDB protocol on top of any [`StoragePort`].
pub struct TinyWebDb<S: StoragePort> {
    storage: S,
}

impl<S: StoragePort> TinyWebDb<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    async fn store_a_value(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let Some(tag) = required_tag(request) else {
            return Ok(missing_tag());
        };
        let value = request.param("value").unwrap_or_default();

        let data = self.storage.set(&tag, &value).await?;
        tracing::info!("📝 Stored tag '{}'", data.tag);
        Ok(HttpResponse::json(
            200,
            &json!(["STORED", data.tag, data.value]),
        ))
    }

    async fn get_value(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let Some(tag) = required_tag(request) else {
            return Ok(missing_tag());
        };

        // 找不到 tag 時回傳空字串，符合 TinyWebDB 客戶端的預期
        let value = self
            .storage
            .get(&tag)
            .await?
            .map(|data| data.value)
            .unwrap_or_default();
        Ok(HttpResponse::json(200, &json!(["VALUE", tag, value])))
    }

    async fn delete_entry(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let Some(tag) = required_tag(request) else {
            return Ok(missing_tag());
        };

        let deleted = self.storage.delete(&tag).await?;
        Ok(HttpResponse::json(200, &json!(["DELETED", tag, deleted])))
    }

    async fn list_entries(&self) -> Result<HttpResponse> {
        let entries: Vec<serde_json::Value> = self
            .storage
            .list()
            .await?
            .iter()
            .map(entry_json)
            .collect();
        Ok(HttpResponse::json(200, &serde_json::Value::Array(entries)))
    }
}

#[async_trait]
impl<S: StoragePort> Application for TinyWebDb<S> {
    async fn handle_request(&self, request: HttpRequest) -> Result<HttpResponse> {
        let path = request.path.trim_end_matches('/');

        match (request.method.as_str(), path) {
            ("POST", "/storeavalue") => self.store_a_value(&request).await,
            ("GET" | "POST", "/getvalue") => self.get_value(&request).await,
            ("POST", "/deleteentry") => self.delete_entry(&request).await,
            ("GET", "" | "/list") => self.list_entries().await,
            _ => Ok(HttpResponse::json(404, &json!({ "error": "Not Found" }))),
        }
    }
}

fn required_tag(request: &HttpRequest) -> Option<String> {
    request.param("tag").filter(|tag| !tag.is_empty())
}

fn missing_tag() -> HttpResponse {
    HttpResponse::json(400, &json!({ "error": "Missing tag" }))
}

fn entry_json(data: &StoredData) -> serde_json::Value {
    json!({
        "tag": data.tag,
        "value": data.value,
        "date": data.date_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BodyMap;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        rows: Arc<Mutex<BTreeMap<String, StoredData>>>,
    }

    impl StoragePort for MockStorage {
        async fn get(&self, tag: &str) -> Result<Option<StoredData>> {
            Ok(self.rows.lock().await.get(tag).cloned())
        }

        async fn set(&self, tag: &str, value: &str) -> Result<StoredData> {
            let data = StoredData::new(tag, value);
            self.rows.lock().await.insert(tag.to_string(), data.clone());
            Ok(data)
        }

        async fn delete(&self, tag: &str) -> Result<bool> {
            Ok(self.rows.lock().await.remove(tag).is_some())
        }

        async fn list(&self) -> Result<Vec<StoredData>> {
            Ok(self.rows.lock().await.values().cloned().collect())
        }
    }

    fn request(method: &str, path: &str, body: serde_json::Value) -> HttpRequest {
        let body: BodyMap = match body {
            serde_json::Value::Object(map) => map,
            _ => BodyMap::new(),
        };
        HttpRequest {
            method: method.to_string(),
            path: path.to_string(),
            body,
            query: HashMap::new(),
        }
    }

    fn body(response: &HttpResponse) -> serde_json::Value {
        serde_json::from_str(&response.body).unwrap()
    }

    #[tokio::test]
    async fn test_store_then_get() {
        let app = TinyWebDb::new(MockStorage::default());

        let stored = app
            .handle_request(request(
                "POST",
                "/storeavalue",
                json!({ "tag": "score", "value": "42" }),
            ))
            .await
            .unwrap();
        assert_eq!(stored.status, 200);
        assert_eq!(body(&stored), json!(["STORED", "score", "42"]));
        assert_eq!(stored.headers["Content-Type"], "application/json");

        let fetched = app
            .handle_request(request("POST", "/getvalue", json!({ "tag": "score" })))
            .await
            .unwrap();
        assert_eq!(body(&fetched), json!(["VALUE", "score", "42"]));
    }

    #[tokio::test]
    async fn test_get_missing_tag_returns_empty_value() {
        let app = TinyWebDb::new(MockStorage::default());
        let mut req = request("GET", "/getvalue", json!({}));
        req.query.insert("tag".to_string(), "unknown".to_string());

        let response = app.handle_request(req).await.unwrap();
        assert_eq!(body(&response), json!(["VALUE", "unknown", ""]));
    }

    #[tokio::test]
    async fn test_delete_entry() {
        let storage = MockStorage::default();
        storage.set("gone", "soon").await.unwrap();
        let app = TinyWebDb::new(storage);

        let first = app
            .handle_request(request("POST", "/deleteentry", json!({ "tag": "gone" })))
            .await
            .unwrap();
        assert_eq!(body(&first), json!(["DELETED", "gone", true]));

        let second = app
            .handle_request(request("POST", "/deleteentry", json!({ "tag": "gone" })))
            .await
            .unwrap();
        assert_eq!(body(&second), json!(["DELETED", "gone", false]));
    }

    #[tokio::test]
    async fn test_list_in_tag_order() {
        let storage = MockStorage::default();
        for tag in ["b", "a", "c"] {
            storage.set(tag, "v").await.unwrap();
        }
        let app = TinyWebDb::new(storage);

        let response = app
            .handle_request(request("GET", "/", json!({})))
            .await
            .unwrap();
        let tags: Vec<String> = body(&response)
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["tag"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(tags, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_missing_tag_and_unknown_route() {
        let app = TinyWebDb::new(MockStorage::default());

        let response = app
            .handle_request(request("POST", "/storeavalue", json!({ "value": "x" })))
            .await
            .unwrap();
        assert_eq!(response.status, 400);

        let response = app
            .handle_request(request("DELETE", "/storeavalue", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_non_string_value_stored_as_json_text() {
        let app = TinyWebDb::new(MockStorage::default());
        let response = app
            .handle_request(request(
                "POST",
                "/storeavalue",
                json!({ "tag": "list", "value": [1, 2] }),
            ))
            .await
            .unwrap();
        assert_eq!(body(&response), json!(["STORED", "list", "[1,2]"]));
    }
}
