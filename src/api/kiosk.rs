use std::sync::Arc;

use axum::{Form, Json, extract::State};
use serde::Deserialize;
use tracing::error;

use crate::api::CheckinResponse;
use crate::core::engine;
use crate::errors::AppError;
use crate::models::checkin::Source;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BadgeForm {
    pub badge_id: String,
}

/// Kiosk self-service check-in.
///
/// Always answers 200 with the result envelope: the kiosk screen renders
/// `message` and must not branch on status codes. Unknown badges get one
/// uniform "not recognized" text; the kiosk never reveals whether an id
/// was malformed or simply absent.
pub async fn checkin(
    State(state): State<Arc<AppState>>,
    Form(form): Form<BadgeForm>,
) -> Json<CheckinResponse> {
    match engine::check_in(&state, &form.badge_id, Source::Kiosk).await {
        Ok(outcome) => Json(CheckinResponse::granted(&outcome)),
        Err(AppError::UnknownBadge) => Json(CheckinResponse::rejected(
            "Badge not recognized. Please see the check-in attendant.",
        )),
        Err(AppError::InvalidInput(msg)) => Json(CheckinResponse::rejected(msg)),
        Err(e) => {
            error!("kiosk check-in failed: {e}");
            Json(CheckinResponse::rejected("Check-in failed. Please try again."))
        }
    }
}
