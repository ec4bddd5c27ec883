use axum::http::StatusCode;
use eventsched_api::dto::EventResponse;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::test_utils::{ACTOR, TestContext, actor_header, create_standup, standup_payload};

#[test_log::test(tokio::test)]
async fn test_create_and_get_event() {
    let ctx = TestContext::new();
    let id = create_standup(&ctx).await;

    let response = ctx.server.get(&format!("/api/events/{id}")).await;
    response.assert_status(StatusCode::OK);

    let event: EventResponse = response.json();
    assert_eq!(event.id, id);
    assert_eq!(event.title, "Standup");
    assert_eq!(event.created_by, ACTOR);
    assert_eq!(event.updated_at, "1970-01-01T00:00:00Z");
    assert_eq!(event.schedules.len(), 2);
    assert_eq!(event.schedules[0].start_time, "2022-01-01T09:00:00+07:00");
    assert_eq!(event.schedules[0].end_time, "2022-01-01T09:30:00+07:00");
    assert_eq!(event.schedules[0].recurring_interval, 86400);
    assert_eq!(event.schedules[1].duration_in_minutes, 75);
    assert_eq!(event.schedules[1].recurring_interval, 604800);
    assert_eq!(event.invitations.len(), 2);

    assert_eq!(ctx.repository.row_counts().await, (1, 2, 2));
}

#[tokio::test]
async fn test_create_without_actor_is_rejected() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/events")
        .json(&standup_payload())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(ctx.repository.row_counts().await, (0, 0, 0));
}

#[tokio::test]
async fn test_create_with_unknown_timezone_is_rejected() {
    let ctx = TestContext::new();
    let mut payload = standup_payload();
    payload["timezone"] = json!("Mars/Olympus_Mons");
    let (name, value) = actor_header(ACTOR);

    let response = ctx
        .server
        .post("/api/events")
        .add_header(name, value)
        .json(&payload)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Mars/Olympus_Mons"));
}

#[tokio::test]
async fn test_create_without_schedules_is_rejected() {
    let ctx = TestContext::new();
    let mut payload = standup_payload();
    payload["schedules"] = json!([]);
    let (name, value) = actor_header(ACTOR);

    let response = ctx
        .server
        .post("/api/events")
        .add_header(name, value)
        .json(&payload)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_with_malformed_timestamp_is_rejected() {
    let ctx = TestContext::new();
    let mut payload = standup_payload();
    payload["schedules"][0]["start_time"] = json!("tomorrow morning");
    let (name, value) = actor_header(ACTOR);

    let response = ctx
        .server
        .post("/api/events")
        .add_header(name, value)
        .json(&payload)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_missing_event() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/api/events/does-not-exist").await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn test_update_event_reconciles_children() {
    let ctx = TestContext::new();
    let id = create_standup(&ctx).await;
    let before: EventResponse = ctx.server.get(&format!("/api/events/{id}")).await.json();

    let payload = json!({
        "title": "Retro",
        "description": "weekly retro",
        "timezone": "Europe/London",
        "schedules": [
            {
                "id": before.schedules[0].id,
                "start_time": "2022-01-07T16:00:00+00:00",
                "end_time": "2022-01-07T17:00:00+00:00",
                "recurring_type": "WEEK"
            }
        ],
        "attendees": ["user-2", "user-3"]
    });
    let (name, value) = actor_header(ACTOR);

    let response = ctx
        .server
        .put(&format!("/api/events/{id}"))
        .add_header(name, value)
        .json(&payload)
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    let after: EventResponse = ctx.server.get(&format!("/api/events/{id}")).await.json();
    assert_eq!(after.title, "Retro");
    assert_eq!(after.timezone, "Europe/London");
    assert_eq!(after.created_by, ACTOR);
    assert_ne!(after.updated_at, "1970-01-01T00:00:00Z");
    assert_eq!(after.schedules.len(), 1);
    assert_eq!(after.schedules[0].id, before.schedules[0].id);
    assert_eq!(after.schedules[0].start_time, "2022-01-07T16:00:00+00:00");
    assert_eq!(after.schedules[0].recurring_interval, 604800);

    let kept = before
        .invitations
        .iter()
        .find(|i| i.user_id == "user-2")
        .unwrap();
    let users: Vec<&str> = after.invitations.iter().map(|i| i.user_id.as_str()).collect();
    assert_eq!(users.len(), 2);
    assert!(users.contains(&"user-2"));
    assert!(users.contains(&"user-3"));
    assert!(after.invitations.iter().any(|i| i.id == kept.id));

    assert_eq!(ctx.repository.child_rows_of(&id).await, (1, 2));
}

#[tokio::test]
async fn test_update_missing_event() {
    let ctx = TestContext::new();
    let (name, value) = actor_header(ACTOR);

    let response = ctx
        .server
        .put("/api/events/does-not-exist")
        .add_header(name, value)
        .json(&standup_payload())
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_without_actor_leaves_event_untouched() {
    let ctx = TestContext::new();
    let id = create_standup(&ctx).await;
    let mut payload = standup_payload();
    payload["title"] = json!("Renamed");

    let response = ctx
        .server
        .put(&format!("/api/events/{id}"))
        .json(&payload)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let event: EventResponse = ctx.server.get(&format!("/api/events/{id}")).await.json();
    assert_eq!(event.title, "Standup");
}

#[test_log::test(tokio::test)]
async fn test_delete_event() {
    let ctx = TestContext::new();
    let id = create_standup(&ctx).await;
    let (name, value) = actor_header(ACTOR);

    let response = ctx
        .server
        .delete(&format!("/api/events/{id}"))
        .add_header(name, value)
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    ctx.server
        .get(&format!("/api/events/{id}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    assert_eq!(ctx.repository.row_counts().await, (0, 0, 0));
}

#[tokio::test]
async fn test_delete_missing_event() {
    let ctx = TestContext::new();
    let (name, value) = actor_header(ACTOR);

    let response = ctx
        .server
        .delete("/api/events/does-not-exist")
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_without_actor_is_rejected() {
    let ctx = TestContext::new();
    let id = create_standup(&ctx).await;

    let response = ctx.server.delete(&format!("/api/events/{id}")).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(ctx.repository.row_counts().await, (1, 2, 2));
}

#[tokio::test]
async fn test_update_with_schedule_of_other_event_is_rejected() {
    let ctx = TestContext::new();
    let first = create_standup(&ctx).await;
    let second = create_standup(&ctx).await;
    let other: EventResponse = ctx.server.get(&format!("/api/events/{second}")).await.json();

    let mut payload = standup_payload();
    payload["schedules"] = json!([
        {
            "id": other.schedules[0].id,
            "start_time": "2022-01-07T16:00:00+07:00",
            "end_time": "2022-01-07T17:00:00+07:00"
        }
    ]);
    let (name, value) = actor_header(ACTOR);

    let response = ctx
        .server
        .put(&format!("/api/events/{first}"))
        .add_header(name, value)
        .json(&payload)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let event: EventResponse = ctx.server.get(&format!("/api/events/{first}")).await.json();
    assert_eq!(event.schedules.len(), 2);
    assert_eq!(ctx.repository.child_rows_of(&first).await, (2, 2));
    assert_eq!(ctx.repository.child_rows_of(&second).await, (2, 2));
}

#[tokio::test]
async fn test_create_with_schedule_id_is_rejected() {
    let ctx = TestContext::new();
    let existing = create_standup(&ctx).await;
    let stored: EventResponse = ctx.server.get(&format!("/api/events/{existing}")).await.json();

    let mut payload = standup_payload();
    payload["schedules"][0]["id"] = json!(stored.schedules[0].id);
    let (name, value) = actor_header(ACTOR);

    let response = ctx
        .server
        .post("/api/events")
        .add_header(name, value)
        .json(&payload)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(ctx.repository.row_counts().await, (1, 2, 2));
}
