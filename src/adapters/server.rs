use crate::core::bridge::internal_error_response;
use crate::core::worker::{fetch, Env};
use crate::utils::error::Result;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::response::Response;
use axum::Router;
use tokio::net::TcpListener;

#[derive(Clone)]
struct ServerState {
    env: Env,
    max_body_bytes: usize,
}

/// Every path and method goes to the same handler; routing belongs to the
/// application core. Bodies larger than `max_body_bytes` get the 500 error shape.
pub fn router(env: Env, max_body_bytes: usize) -> Router {
    Router::new().fallback(handle).with_state(ServerState {
        env,
        max_body_bytes,
    })
}

async fn handle(State(state): State<ServerState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();

    let response = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => fetch(http::Request::from_parts(parts, bytes), &state.env).await,
        Err(e) => {
            tracing::error!("❌ Failed to read request body: {}", e);
            internal_error_response(&e.to_string())
        }
    };

    response.map(Body::from)
}

pub async fn serve(listener: TcpListener, env: Env, max_body_bytes: usize) -> Result<()> {
    axum::serve(listener, router(env, max_body_bytes))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for ctrl-c: {}", e);
        // 無法監聽訊號時就一直執行下去
        std::future::pending::<()>().await;
    }
    tracing::info!("🛑 Shutting down");
}
