//! Marketplace server library - exposes the modules and the router for the tests

pub mod core;
pub mod dtos;
pub mod entities;
pub mod media;
pub mod repositories;
pub mod services;

pub use crate::core::{AppError, AppState, auth, config};
pub use services::root;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header},
    middleware,
    routing::{delete, get, patch, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Builds the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE]);

    Router::new()
        .route("/", get(root))
        .nest("/auth", configure_auth_routes())
        .nest("/users", configure_user_routes(state.clone()))
        .nest("/advertisements", configure_advertisement_routes(state.clone()))
        .nest("/conversations", configure_conversation_routes(state.clone()))
        .nest("/messages", configure_message_routes(state.clone()))
        .nest("/images", configure_image_routes(state.clone()))
        .nest("/admin", configure_admin_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn configure_auth_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/login", post(login_user))
        .route("/register", post(register_user))
}

fn configure_user_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    let public_routes = Router::new().route("/{user_id}", get(get_user_by_id));

    let self_routes = Router::new()
        .route("/me", get(get_me).patch(update_me))
        .layer(middleware::from_fn_with_state(state, authentication_middleware));

    public_routes.merge(self_routes)
}

/// Reads are public, writes need a token
fn configure_advertisement_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    let public_routes = Router::new()
        .route("/", get(list_advertisements))
        .route("/{advertisement_id}", get(get_advertisement));

    let owner_routes = Router::new()
        .route("/", post(create_advertisement))
        .route(
            "/{advertisement_id}",
            patch(update_advertisement).delete(delete_advertisement),
        )
        .layer(middleware::from_fn_with_state(state, authentication_middleware));

    public_routes.merge(owner_routes)
}

fn configure_conversation_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/", get(list_conversations))
        .route("/unread", get(unread_total))
        .route("/{conversation_id}/messages", get(get_conversation_messages))
        .route("/{conversation_id}/read", post(mark_conversation_read))
        .layer(middleware::from_fn_with_state(state, authentication_middleware))
}

fn configure_message_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/", post(send_message))
        .layer(middleware::from_fn_with_state(state, authentication_middleware))
}

fn configure_image_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    let upload = Router::new()
        .route("/", post(upload_image))
        .layer(DefaultBodyLimit::max(media::MAX_IMAGE_BYTES))
        .layer(middleware::from_fn_with_state(state, authentication_middleware));

    Router::new().route("/{name}", get(get_image)).merge(upload)
}

fn configure_admin_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/users", get(list_users))
        .route("/users/{user_id}/ban", post(ban_user))
        .route("/users/{user_id}/unban", post(unban_user))
        .route("/users/{user_id}/role", patch(change_role))
        .route("/advertisements/{advertisement_id}", delete(delete_listing))
        .route(
            "/advertisements/{advertisement_id}/vip",
            post(set_vip).delete(unset_vip),
        )
        .route("/logs", get(list_logs))
        .layer(middleware::from_fn_with_state(state, authentication_middleware))
}
