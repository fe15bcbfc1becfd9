use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        extractors::AuthSession,
        password::{hash_password, verify_password},
        session::{SessionUser, SESSION_COOKIE},
    },
    error::StoreError,
    pages::Flash,
    state::AppState,
    users::NewUser,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(login_page))
        .route("/register", get(register_page).post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
}

/// Registration form as submitted by `register.html`.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "bloodGroup")]
    pub blood_group: String,
    pub district: String,
    #[serde(rename = "contactNumber")]
    pub contact_number: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[instrument(skip(state))]
async fn login_page(State(state): State<AppState>) -> Response {
    render_page(&state, "login.html", None).await
}

#[instrument(skip(state))]
async fn register_page(State(state): State<AppState>) -> Response {
    render_page(&state, "register.html", None).await
}

#[instrument(skip(state, form))]
async fn register(State(state): State<AppState>, Form(mut form): Form<RegisterForm>) -> Response {
    form.email = form.email.trim().to_lowercase();

    // Advisory pre-check; the store constraint catches the losing racer.
    match state.users.find_by_email(&form.email).await {
        Ok(Some(_)) => {
            warn!(email = %form.email, "registration with existing email");
            return flash_page(&state, "register.html", Flash::error("Email already exists ❌"))
                .await;
        }
        Ok(None) => {}
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return flash_page(&state, "register.html", Flash::error("Internal Server Error 🚨"))
                .await;
        }
    }

    let password_hash = match hash_password(&form.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, "hash_password failed");
            return flash_page(&state, "register.html", Flash::error("Internal Server Error 🚨"))
                .await;
        }
    };

    let user = NewUser {
        email: form.email,
        password_hash,
        username: form.username,
        mobile: form.contact_number,
        blood_group: form.blood_group,
        hometown: form.district,
    };

    match state.users.insert(user).await {
        Ok(created) => {
            info!(email = %created.email, "donor registered");
            flash_page(
                &state,
                "login.html",
                Flash::success("Registration Successful ✅ Please login"),
            )
            .await
        }
        Err(StoreError::DuplicateEmail) => {
            warn!("lost the check-then-insert race");
            flash_page(&state, "register.html", Flash::error("Email already exists ❌")).await
        }
        Err(e) => {
            error!(error = %e, "insert user failed");
            flash_page(&state, "register.html", Flash::error("Internal Server Error 🚨")).await
        }
    }
}

#[instrument(skip(state, form))]
async fn login(State(state): State<AppState>, Form(mut form): Form<LoginForm>) -> Response {
    form.email = form.email.trim().to_lowercase();

    let user = match state.users.find_by_email(&form.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!(email = %form.email, "login with unknown email");
            return flash_page(&state, "login.html", Flash::error("User not found ❌")).await;
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return flash_page(&state, "login.html", Flash::error("Something went wrong 🚨")).await;
        }
    };

    match verify_password(&form.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            warn!(email = %form.email, "wrong password");
            return flash_page(&state, "login.html", Flash::error("Wrong password ❌")).await;
        }
        Err(e) => {
            error!(error = %e, "verify_password failed");
            return flash_page(&state, "login.html", Flash::error("Something went wrong 🚨")).await;
        }
    }

    let token = state
        .sessions
        .create(SessionUser {
            email: user.email.clone(),
            username: user.username.clone(),
        })
        .await;

    info!(email = %user.email, "donor logged in");
    (
        [(header::SET_COOKIE, session_cookie(&token))],
        Redirect::to("/home"),
    )
        .into_response()
}

#[instrument(skip(state, session))]
async fn logout(State(state): State<AppState>, session: Option<AuthSession>) -> Response {
    if let Some(session) = session {
        state.sessions.destroy(&session.token).await;
        info!(email = %session.user.email, "donor logged out");
    }
    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Redirect::to("/"),
    )
        .into_response()
}

async fn render_page(state: &AppState, template: &str, flash: Option<&Flash>) -> Response {
    match state.pages.render(template, flash).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(error = %e, template, "template render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong 🚨").into_response()
        }
    }
}

async fn flash_page(state: &AppState, template: &str, flash: Flash) -> Response {
    render_page(state, template, Some(&flash)).await
}

fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
