pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::employees::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/employees",
            get(handlers::handle_list).post(handlers::handle_create),
        )
        .route("/employees/create", get(handlers::handle_create_form))
        .route(
            "/employees/:id",
            get(handlers::handle_show)
                .post(handlers::handle_update)
                .put(handlers::handle_update)
                .delete(handlers::handle_delete),
        )
        .route("/employees/:id/edit", get(handlers::handle_edit_form))
        .route("/employees/:id/delete", post(handlers::handle_delete))
        .route("/employees/:id/download", get(handlers::handle_download))
        .route(
            "/employees/:id/remove-file",
            post(handlers::handle_remove_file),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
