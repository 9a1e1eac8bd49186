//! Admin back-office handlers. Unlike the kiosk surface these use real
//! status codes: 404 for unknown badges, 400 for bad input or a wrong
//! confirmation phrase.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::api::{CheckinResponse, SearchParams};
use crate::core::{engine, purge, reports, roster};
use crate::errors::{AppError, AppResult};
use crate::export::{self, ExportFormat, ExportKind};
use crate::models::checkin::Source;
use crate::models::report::{HistoryEntry, TableGroup};
use crate::models::roster::RosterRow;
use crate::models::user::User;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub success: bool,
    pub message: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted: usize,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    pub imported: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Confirmation {
    pub confirm: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    #[serde(default)]
    pub kind: ExportKind,
    #[serde(default)]
    pub format: ExportFormat,
}

/// Manual check-in: the same engine contract as the kiosk, recorded with
/// an admin source for the audit trail.
pub async fn manual_checkin(
    State(state): State<Arc<AppState>>,
    Path(employee_id): Path<String>,
) -> AppResult<Json<CheckinResponse>> {
    let outcome = engine::check_in(&state, &employee_id, Source::Admin).await?;
    Ok(Json(CheckinResponse::granted(&outcome)))
}

pub async fn checkout(
    State(state): State<Arc<AppState>>,
    Path(employee_id): Path<String>,
) -> AppResult<Json<CheckoutResponse>> {
    let outcome = engine::check_out(&state, &employee_id).await?;
    let message = if outcome.was_checked_in {
        format!("{} checked out", outcome.name)
    } else {
        format!("{} was not checked in", outcome.name)
    };
    Ok(Json(CheckoutResponse {
        success: true,
        message,
    }))
}

pub async fn history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    Ok(Json(
        reports::history(&state, params.search.as_deref()).await?,
    ))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<User>>> {
    Ok(Json(
        reports::users(&state, params.search.as_deref()).await?,
    ))
}

pub async fn tables(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<TableGroup>>> {
    Ok(Json(
        reports::tables(&state, params.search.as_deref()).await?,
    ))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(row): Json<RosterRow>,
) -> AppResult<Json<CreateUserResponse>> {
    let user = roster::create_user(&state, &row).await?;
    Ok(Json(CreateUserResponse {
        success: true,
        message: format!("saved user {}", user.employee_id),
        user,
    }))
}

pub async fn delete_all_users(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Confirmation>,
) -> AppResult<Json<DeleteResponse>> {
    let deleted = purge::delete_all_users(&state, &body.confirm).await?;
    Ok(Json(DeleteResponse {
        success: true,
        deleted,
        message: format!("deleted {deleted} users"),
    }))
}

pub async fn clear_history(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Confirmation>,
) -> AppResult<Json<DeleteResponse>> {
    let deleted = purge::clear_history(&state, &body.confirm).await?;
    Ok(Json(DeleteResponse {
        success: true,
        deleted,
        message: format!("deleted {deleted} history rows"),
    }))
}

/// Bulk roster upload: multipart with a `file` field holding a CSV.
pub async fn import_roster(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> AppResult<Json<ImportResponse>> {
    let mut payload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        if let Some(name) = field.file_name() {
            if !name.to_lowercase().ends_with(".csv") {
                return Err(AppError::InvalidInput(
                    "please upload a .csv roster file".to_string(),
                ));
            }
        }
        payload = Some(
            field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(e.to_string()))?,
        );
        break;
    }

    let bytes = payload.ok_or_else(|| AppError::InvalidInput("no file uploaded".to_string()))?;
    let report = roster::import(&state, &bytes).await?;

    Ok(Json(ImportResponse {
        success: true,
        imported: report.imported,
        errors: report.errors,
    }))
}

/// Roster or history download in CSV or XLSX, served as an attachment.
pub async fn export(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExportParams>,
) -> AppResult<Response> {
    let bytes = match params.kind {
        ExportKind::Roster => {
            export::roster_bytes(params.format, &roster::export_rows(&state).await?)?
        }
        ExportKind::History => {
            export::history_bytes(params.format, &reports::history(&state, None).await?)?
        }
    };

    let filename = export::filename(params.kind, params.format);

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                params.format.content_type().to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={filename}"),
            ),
        ],
        bytes,
    )
        .into_response())
}
