use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::{
        dto::{
            LoginRequest, LoginResponse, LogoutResponse, ProfileResponse, PublicUser,
            SignupRequest, SignupResponse,
        },
        extractors::AuthUser,
    },
    error::{AppError, AppResult},
    extract::AppJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", put(logout))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/userProfile", get(user_profile))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<SignupResponse>)> {
    let id = state
        .auth
        .signup(payload)
        .await
        .map_err(AppError::into_signup_error)?;
    Ok((StatusCode::CREATED, Json(SignupResponse { success: true, id })))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<(StatusCode, Json<LoginResponse>)> {
    let token = state.auth.login(&payload.email, &payload.password).await?;
    Ok((StatusCode::CREATED, Json(LoginResponse { success: true, token })))
}

#[instrument(skip_all)]
pub async fn user_profile(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> AppResult<Json<ProfileResponse>> {
    let user = state.auth.profile(&principal).await?;
    Ok(Json(ProfileResponse {
        success: true,
        data: PublicUser {
            id: user.id,
            email: user.email,
            name: user.name,
            address: user.address,
        },
    }))
}

/// Always 200; failures are reported in the body.
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    auth: Result<AuthUser, AppError>,
) -> Json<LogoutResponse> {
    let outcome = match auth {
        Ok(AuthUser(principal)) => state.auth.logout(&principal).await,
        Err(e) => Err(e),
    };
    match outcome {
        Ok(()) => Json(LogoutResponse {
            success: true,
            msg: "Logged out".into(),
        }),
        Err(e) => {
            warn!(error = %e, "logout failed");
            Json(LogoutResponse {
                success: false,
                msg: "Error".into(),
            })
        }
    }
}
