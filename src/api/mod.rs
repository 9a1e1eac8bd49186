//! HTTP surface: the kiosk check-in endpoint plus the admin back office.
//! The UIs poll these endpoints; everything here is request/response only.

pub mod admin;
pub mod kiosk;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use crate::core::engine::CheckinOutcome;
use crate::errors::AppResult;
use crate::state::AppState;

/// Check-in result envelope, shared by the kiosk and the admin manual
/// toggle. `message` carries the failure text when `success` is false.
#[derive(Debug, Serialize)]
pub struct CheckinResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckinResponse {
    pub fn granted(outcome: &CheckinOutcome) -> Self {
        Self {
            success: true,
            name: Some(outcome.name.clone()),
            table_number: Some(outcome.table_number),
            time: Some(outcome.time.format("%Y-%m-%d %H:%M:%S").to_string()),
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            name: None,
            table_number: None,
            time: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/checkin", post(kiosk::checkin))
        .route("/admin/checkin/{employee_id}", post(admin::manual_checkin))
        .route("/admin/checkout/{employee_id}", delete(admin::checkout))
        .route("/admin/history", get(admin::history))
        .route(
            "/admin/users",
            get(admin::list_users)
                .post(admin::create_user)
                .delete(admin::delete_all_users),
        )
        .route("/admin/tables", get(admin::tables))
        .route("/admin/clear-history", delete(admin::clear_history))
        .route("/admin/import", post(admin::import_roster))
        .route("/admin/export", get(admin::export))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(state: Arc<AppState>) -> AppResult<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let address = format!("{}:{}", state.config.bind_address, state.config.port);
    let app = router(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Check-in station running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
