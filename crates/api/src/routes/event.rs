use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::ApiState;
use crate::handlers::event;

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/events", post(event::create_event))
        .route(
            "/api/events/:id",
            get(event::get_event)
                .put(event::update_event)
                .delete(event::delete_event),
        )
}
