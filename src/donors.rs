use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::json;
use tracing::{error, instrument};

use crate::state::AppState;
use crate::users::Donor;

pub fn router() -> Router<AppState> {
    Router::new().route("/donorlist", get(donor_list))
}

/// Public listing of every donor's donation-relevant fields; no auth.
#[instrument(skip(state))]
async fn donor_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<Donor>>, (StatusCode, Json<serde_json::Value>)> {
    match state.users.list_donors().await {
        Ok(donors) => Ok(Json(donors)),
        Err(e) => {
            error!(error = %e, "list_donors failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch donors" })),
            ))
        }
    }
}
