use crate::adapters::sqlite::SqlStorage;
use crate::app::TinyWebDb;
use crate::core::bridge::RequestBridge;
use bytes::Bytes;
use http::{Request, Response};
use sqlx::SqlitePool;

/// Bindings supplied by the hosting environment.
#[derive(Debug, Clone)]
pub struct Env {
    pub db: SqlitePool,
}

/// Per-request entry point: nothing is shared between invocations except the
/// database handle.
pub async fn fetch(request: Request<Bytes>, env: &Env) -> Response<Bytes> {
    let storage = SqlStorage::new(env.db.clone());
    let app = TinyWebDb::new(storage);
    RequestBridge::new(app).handle(request).await
}
