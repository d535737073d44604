use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::{COOKIE, REFERER, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, Method, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use super::error::AppError;
use crate::config::CookieConfig;
use crate::guard::{Guard, GuardOutcome, Navigation, RouteTable};
use crate::redirect::CookieRedirectStore;
use crate::session::{BackendClient, SessionState};
use crate::user::UserRecord;
use crate::GuardError;

/// Builds the backend client for one request, typically by forwarding the
/// caller's session cookie or bearer token.
pub trait BackendConnector: Send + Sync {
    fn connect(&self, headers: &HeaderMap) -> Arc<dyn BackendClient>;
}

impl<F> BackendConnector for F
where
    F: Fn(&HeaderMap) -> Arc<dyn BackendClient> + Send + Sync,
{
    fn connect(&self, headers: &HeaderMap) -> Arc<dyn BackendClient> {
        self(headers)
    }
}

/// Shared state of [`guard_middleware`] and the auth handlers.
#[derive(Clone)]
pub struct GuardState {
    pub guard: Guard,
    pub routes: Arc<RouteTable>,
    pub connector: Arc<dyn BackendConnector>,
}

impl GuardState {
    /// Fails when the guard's cookie settings cannot sign redirect cookies
    /// safely (missing or short `secret_key`).
    pub fn new(
        guard: Guard,
        routes: RouteTable,
        connector: impl BackendConnector + 'static,
    ) -> Result<Self, GuardError> {
        guard.config().cookie.validate()?;
        Ok(Self {
            guard,
            routes: Arc::new(routes),
            connector: Arc::new(connector),
        })
    }

    pub(crate) fn redirect_store(&self, headers: &HeaderMap) -> Arc<CookieRedirectStore> {
        Arc::new(redirect_store(&self.guard.config().cookie, headers))
    }
}

/// The user the guard saw for this request. `None` on pages it let through
/// without a session check.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<UserRecord>);

impl CurrentUser {
    pub fn user(&self) -> Option<&UserRecord> {
        self.0.as_ref()
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<CurrentUser>().cloned().unwrap_or_default())
    }
}

/// Runs the [`Guard`] in front of every request.
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/dashboard", get(dashboard))
///     .layer(axum::middleware::from_fn_with_state(state.clone(), guard_middleware))
///     .with_state(state);
/// ```
pub async fn guard_middleware(
    State(state): State<GuardState>,
    mut request: Request,
    next: Next,
) -> Response {
    let target = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_owned(), |pq| pq.as_str().to_owned());
    let previous = referer_path(request.headers()).unwrap_or_else(|| target.clone());
    let replayable = matches!(*request.method(), Method::GET | Method::HEAD);

    let guard = &state.guard;
    let store = state.redirect_store(request.headers());
    let memory = guard.redirect_memory(store.clone(), &guard.config().cookie.name);
    let session = guard.session_provider(state.connector.connect(request.headers()), SessionState::new());

    let mut navigation = Navigation::new(target, previous);
    if !replayable {
        navigation = navigation.not_rememberable();
    }
    let requirement = state.routes.lookup(navigation.target_path());
    let outcome = guard.check(&session, &memory, &navigation, requirement).await;

    let response = match outcome {
        GuardOutcome::Allow => {
            request
                .extensions_mut()
                .insert(CurrentUser(session.state().user()));
            next.run(request).await
        }
        GuardOutcome::Redirect { to, .. } => Redirect::to(&to).into_response(),
    };

    with_cookies(response, &store)
}

/// Appends the store's pending cookie writes to `response`.
pub(crate) fn with_cookies(mut response: Response, store: &CookieRedirectStore) -> Response {
    let lines = match store.set_cookie_headers() {
        Ok(lines) => lines,
        Err(e) => return AppError(e).into_response(),
    };
    for line in lines {
        match HeaderValue::from_str(&line) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => log::error!(
                target: "waypost::redirect",
                "msg=\"invalid set-cookie header\" error=\"{e}\""
            ),
        }
    }
    response
}

fn redirect_store(config: &CookieConfig, headers: &HeaderMap) -> CookieRedirectStore {
    let cookies = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ");
    let header = (!cookies.is_empty()).then_some(cookies.as_str());
    CookieRedirectStore::from_cookie_header(config.clone(), header)
}

/// Path and query of the `Referer` header, which may be an absolute URL.
pub fn referer_path(headers: &HeaderMap) -> Option<String> {
    let uri: Uri = headers.get(REFERER)?.to_str().ok()?.parse().ok()?;
    let path = uri.path();
    if !path.starts_with('/') {
        return None;
    }
    Some(match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_owned(),
    })
}
