use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{
    ApiError, AppState, CredentialsRequest, LoginResponse, SessionResponse, SetupResponse,
};
use crate::services::AuthError;

/// Malformed bodies are treated like empty ones so the caller gets the
/// missing-field message instead of a parser error.
fn credentials(payload: Result<Json<CredentialsRequest>, JsonRejection>) -> CredentialsRequest {
    match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::debug!("Unreadable credentials body: {rejection}");
            CredentialsRequest::default()
        }
    }
}

fn outcome<T>(result: &Result<T, AuthError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(AuthError::Validation(_)) => "invalid_request",
        Err(AuthError::IncorrectUsername) => "incorrect_username",
        Err(AuthError::IncorrectPassword) => "incorrect_password",
        Err(AuthError::Unauthenticated) => "unauthenticated",
        Err(AuthError::AdminExists) => "admin_exists",
        Err(AuthError::Internal(_)) => "error",
    }
}

/// POST /auth/login
/// Authenticate with username and password, returns a bearer token on success
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let payload = credentials(payload);

    let result = state.auth.login(&payload.username, &payload.password).await;
    metrics::counter!("auth_login_total", "outcome" => outcome(&result)).increment(1);

    let login = result.inspect_err(|e| {
        if !matches!(e, AuthError::Internal(_)) {
            tracing::info!("Login rejected: {e}");
        }
    })?;

    Ok(Json(LoginResponse {
        success: true,
        token: login.token,
        user: login.user,
    }))
}

/// GET /auth/me
/// Report whether the bearer token names an existing user.
///
/// Every failure, including store errors, answers 401 `{authenticated:false}`.
pub async fn session(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let result = state.auth.resolve(authorization).await;
    metrics::counter!("auth_session_check_total", "outcome" => outcome(&result)).increment(1);

    match result {
        Ok(user) => {
            tracing::Span::current().record("user_id", &user.id);
            (StatusCode::OK, Json(SessionResponse::authenticated(user))).into_response()
        }
        Err(e) => {
            if let AuthError::Internal(msg) = &e {
                tracing::error!("Session check failed: {msg}");
            }
            (StatusCode::UNAUTHORIZED, Json(SessionResponse::anonymous())).into_response()
        }
    }
}

/// POST /auth/setup
/// Create the administrator account. Only succeeds while no admin exists.
pub async fn setup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SetupResponse>), ApiError> {
    let payload = credentials(payload);

    let result = state
        .auth
        .create_admin(&payload.username, &payload.password)
        .await;
    metrics::counter!("auth_setup_total", "outcome" => outcome(&result)).increment(1);

    let admin = result?;

    Ok((
        StatusCode::CREATED,
        Json(SetupResponse {
            success: true,
            message: "Admin created successfully".to_string(),
            user: admin,
        }),
    ))
}

/// Fallback for any verb an auth route does not serve.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
