pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::entries::handlers as entries;
use crate::export::handlers as export;
use crate::related::handlers as related;
use crate::resume::handlers as resume;
use crate::state::AppState;
use crate::uploads::handlers as uploads;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health::health_handler))
        // Entries
        .route(
            "/api/v1/entries",
            get(entries::handle_list_entries).post(entries::handle_create_entry),
        )
        .route(
            "/api/v1/entries/:id",
            get(entries::handle_get_entry)
                .put(entries::handle_replace_entry)
                .delete(entries::handle_delete_entry),
        )
        .route("/api/v1/search", get(entries::handle_search))
        .route("/api/v1/categories", get(entries::handle_categories))
        // Export & resume view
        .route("/api/v1/export", get(export::handle_export))
        .route("/api/v1/resume", get(resume::handle_resume))
        // Uploads
        .route(
            "/api/v1/uploads",
            post(uploads::handle_upload).layer(DefaultBodyLimit::max(uploads::MAX_UPLOAD_BYTES)),
        )
        // AI
        .route(
            "/api/v1/ai/enhance-resume",
            post(resume::handle_enhance_resume),
        )
        .route("/api/v1/ai/find-related", post(related::handle_find_related))
        .with_state(state)
}
