use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};

use super::error::AppError;
use super::middleware::{GuardState, with_cookies};
use crate::actions::{LoginAction, LogoutAction};
use crate::api::LoginRequest;
use crate::session::SessionState;

/// Signs in and redirects to the remembered page, or to
/// [`after_login_path`](crate::GuardConfig::after_login_path).
pub async fn login(
    State(state): State<GuardState>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let guard = &state.guard;
    let session = guard.session_provider(state.connector.connect(&headers), SessionState::new());

    LoginAction::new(session).execute(&request.into()).await?;

    let store = state.redirect_store(&headers);
    let memory = guard.redirect_memory(store.clone(), &guard.config().cookie.name);
    let to = memory
        .consume()
        .await
        .unwrap_or_else(|| guard.config().after_login_path.clone());

    Ok(with_cookies(Redirect::to(&to).into_response(), &store))
}

pub async fn logout(State(state): State<GuardState>, headers: HeaderMap) -> Response {
    let guard = &state.guard;
    let session = guard.session_provider(state.connector.connect(&headers), SessionState::new());
    let store = state.redirect_store(&headers);
    let memory = guard.redirect_memory(store.clone(), &guard.config().cookie.name);

    let to = LogoutAction::new(session, memory, guard.config())
        .execute()
        .await;

    with_cookies(Redirect::to(&to).into_response(), &store)
}
