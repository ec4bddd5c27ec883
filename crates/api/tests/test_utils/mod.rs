#![allow(dead_code)]

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, header::AUTHORIZATION};
use axum_test::TestServer;
use eventsched_api::{ApiState, router};
use eventsched_core::{
    instrumentation::{InstrumentedEventRepository, InstrumentedSchedulingService},
    service::EventService,
};
use eventsched_db::MemoryEventRepository;
use serde_json::{Value, json};

pub const ACTOR: &str = "actor-1";

/// Server backed by the real service over in-memory storage. The
/// repository handle is kept so tests can look at the stored rows.
pub struct TestContext {
    pub server: TestServer,
    pub repository: Arc<MemoryEventRepository>,
}

impl TestContext {
    pub fn new() -> Self {
        let repository = Arc::new(MemoryEventRepository::new());
        let service = EventService::new(InstrumentedEventRepository::new(repository.clone()));
        let state = Arc::new(ApiState::new(Arc::new(InstrumentedSchedulingService::new(
            service,
        ))));

        let server = TestServer::new(router(state)).expect("test server");
        Self { server, repository }
    }
}

pub fn actor_header(actor: &str) -> (HeaderName, HeaderValue) {
    (AUTHORIZATION, HeaderValue::from_str(actor).expect("header value"))
}

pub fn standup_payload() -> Value {
    json!({
        "title": "Standup",
        "description": "daily sync",
        "timezone": "Asia/Jakarta",
        "schedules": [
            {
                "start_time": "2022-01-01T09:00:00+07:00",
                "end_time": "2022-01-01T09:30:00+07:00",
                "recurring_type": "DAILY"
            },
            {
                "start_time": "2022-01-03T13:00:00+07:00",
                "end_time": "2022-01-03T14:15:00+07:00",
                "is_full_day": true,
                "recurring_type": "WEEK"
            }
        ],
        "attendees": ["user-1", "user-2"]
    })
}

/// Creates the standup event and returns its id.
pub async fn create_standup(ctx: &TestContext) -> String {
    let (name, value) = actor_header(ACTOR);
    let response = ctx
        .server
        .post("/api/events")
        .add_header(name, value)
        .json(&standup_payload())
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    response.json::<Value>()["id"]
        .as_str()
        .expect("id in response")
        .to_string()
}
