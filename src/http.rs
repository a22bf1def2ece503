//! HTTP surface: the JSON API and the embedded chart pages.
//!
//! Every API response is JSON with status 200, including queries for
//! users absent from the log (those yield an empty list). Only a failed
//! dataset refresh surfaces as an error, mapped to a 500 below.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use common::UserId;

use crate::state::AppState;

/// Wrapper turning a pipeline error into a JSON 500.
pub struct ApiError(common::Error);

impl From<common::Error> for ApiError {
    fn from(err: common::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("request failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/presence_weekday") }))
        .route("/presence_weekday", get(presence_weekday_page))
        .route("/mean_time_weekday", get(mean_time_weekday_page))
        .route("/presence_start_end", get(presence_start_end_page))
        .route("/api/v1/users", get(api_users_v1))
        .route("/api/v2/users", get(api_users_v2))
        .route(
            "/api/v1/mean_time_weekday/{user_id}",
            get(api_mean_time_weekday),
        )
        .route(
            "/api/v1/presence_weekday/{user_id}",
            get(api_presence_weekday),
        )
        .route(
            "/api/v1/presence_start_end/{user_id}",
            get(api_presence_start_end),
        )
        .with_state(state)
}

/// Bind and serve until SIGINT/SIGTERM.
pub async fn serve(state: Arc<AppState>, host: &str, port: u16) -> common::Result<()> {
    let address = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on http://{}", address);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    // A failed handler install is logged and parks its arm; only a
    // delivered signal may resolve this future.
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install terminate signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}

// ── API Handlers ──────────────────────────────────────────────────────

async fn api_users_v1(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(state.service.users().await?))
}

async fn api_users_v2(State(state): State<Arc<AppState>>) -> Json<Vec<Value>> {
    let rows = state
        .directory
        .listing(state.collation)
        .into_iter()
        .map(|(id, entry)| {
            json!({ "user_id": id, "name": entry.name, "avatar_url": entry.avatar_url })
        })
        .collect();
    Json(rows)
}

async fn api_mean_time_weekday(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(state.service.mean_time_weekday(user_id).await?))
}

async fn api_presence_weekday(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(state.service.presence_weekday(user_id).await?))
}

async fn api_presence_start_end(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(state.service.presence_start_end(user_id).await?))
}

// ── Pages ─────────────────────────────────────────────────────────────

async fn presence_weekday_page() -> Html<&'static str> {
    Html(include_str!("../templates/presence_weekday.html"))
}

async fn mean_time_weekday_page() -> Html<&'static str> {
    Html(include_str!("../templates/mean_time_weekday.html"))
}

async fn presence_start_end_page() -> Html<&'static str> {
    Html(include_str!("../templates/presence_start_end.html"))
}
