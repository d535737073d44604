//! Minimal server with the guard in front of every route.
//!
//! Run with: `cargo run --example axum_guard_server --features "axum_support mocks"`
//!
//! Then try `curl -i localhost:3000/dashboard`, log in with
//! `curl -i -X POST localhost:3000/auth/login -H 'content-type: application/json' \
//!   -d '{"email":"admin@example.com","password":"admin"}'`
//! and request `/admin/stats` again.

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderMap;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use waypost::api::axum::{CurrentUser, GuardState, guard_middleware, login, logout};
use waypost::events::listeners::LoggingListener;
use waypost::{
    AuthRequirement, BackendClient, Guard, GuardConfig, MockBackendClient, PermissionsConfig,
    RouteRequirement, RouteTable, UserRecord, register_event_listeners,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    register_event_listeners(|registry| {
        registry.listen(LoggingListener::new());
    });

    let config = GuardConfig {
        permissions: PermissionsConfig {
            enabled: true,
            ..Default::default()
        },
        ..GuardConfig::development()
    }
    .with_role_transform(|raw, _user| Ok(raw.as_str().map(str::to_lowercase).into()));
    config.validate()?;

    let routes = RouteTable::new()
        .route("/", RouteRequirement::public())
        .route("/auth/login", RouteRequirement::guest_only())
        .route("/dashboard", RouteRequirement::authenticated())
        .route(
            "/admin/*",
            AuthRequirement::new().allow_roles(["admin"]).into(),
        );

    // A single shared backend session stands in for per-user CMS sessions.
    let backend = MockBackendClient::new();
    backend.add_account(
        "admin@example.com",
        "admin",
        UserRecord::new("1", "admin@example.com").with_field("role", "ADMIN"),
    );
    let connector = move |_: &HeaderMap| -> Arc<dyn BackendClient> { Arc::new(backend.clone()) };

    let state = GuardState::new(Guard::new(config), routes, connector)?;
    let app = Router::new()
        .route("/", get(|| async { "home" }))
        .route("/dashboard", get(whoami))
        .route("/admin/stats", get(|| async { "42 visitors" }))
        .route("/auth/login", get(|| async { "log in" }).post(login))
        .route("/auth/logout", post(logout))
        .layer(from_fn_with_state(state.clone(), guard_middleware))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    println!("listening on http://127.0.0.1:3000");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn whoami(current: CurrentUser) -> String {
    match current.user() {
        Some(user) => format!("signed in as {}", user.email),
        None => "anonymous".to_owned(),
    }
}
