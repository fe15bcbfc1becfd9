use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::json;
use tracing::{error, info, instrument, warn};

use crate::{auth::extractors::AuthSession, pages::redirect_notice, state::AppState};

use super::dto::{ProfileData, UpdateProfileForm};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/home", get(home_page))
        .route("/profile", get(profile_page))
        .route("/profile-data", get(profile_data))
        .route("/updateProfile", post(update_profile))
}

#[instrument(skip(state, session))]
async fn home_page(State(state): State<AppState>, session: Option<AuthSession>) -> Response {
    protected_page(&state, session, "home.html").await
}

#[instrument(skip(state, session))]
async fn profile_page(State(state): State<AppState>, session: Option<AuthSession>) -> Response {
    protected_page(&state, session, "profile.html").await
}

async fn protected_page(
    state: &AppState,
    session: Option<AuthSession>,
    template: &str,
) -> Response {
    if session.is_none() {
        return Html(redirect_notice(
            "You are not logged in. Redirecting to login page...",
            "/",
        ))
        .into_response();
    }
    match state.pages.render(template, None).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(error = %e, template, "template render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong 🚨").into_response()
        }
    }
}

/// JSON view of the signed-in donor, fetched by `profile.html`.
#[instrument(skip(state, session))]
async fn profile_data(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<ProfileData>, (StatusCode, Json<serde_json::Value>)> {
    match state.users.find_by_email(&session.user.email).await {
        Ok(Some(user)) => Ok(Json(ProfileData::from(user))),
        Ok(None) => {
            warn!(email = %session.user.email, "session references a missing record");
            Err((
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "User not found" })),
            ))
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Something went wrong" })),
            ))
        }
    }
}

#[instrument(skip(state, session, form))]
async fn update_profile(
    State(state): State<AppState>,
    session: Option<AuthSession>,
    Form(form): Form<UpdateProfileForm>,
) -> Response {
    let Some(session) = session else {
        return "You are not logged in ❌".into_response();
    };

    let mut user = match state.users.find_by_email(&session.user.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!(email = %session.user.email, "session references a missing record");
            return "User not found ❌".into_response();
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return "Something went wrong 🚨".into_response();
        }
    };

    // Blood group stays as registered; the form cannot carry it.
    user.username = form.username;
    user.mobile = form.mobile;
    user.hometown = form.hometown;
    user.last_donation = form.last_donation;

    if let Err(e) = state.users.update(&user).await {
        error!(error = %e, "update user failed");
        return "Something went wrong 🚨".into_response();
    }

    state
        .sessions
        .update_username(&session.token, &user.username)
        .await;

    info!(email = %user.email, "profile updated");
    Redirect::to("/profile").into_response()
}
