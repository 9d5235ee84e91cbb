//! End-to-end API tests
//!
//! Each test spawns the real router on an ephemeral port with an in-memory
//! database and a pinned clock, then drives it over HTTP like the web client
//! would.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::{json, Value};

use greenthumb::{api, AppState, Config, Database, FixedClock};

struct TestApp {
    base: String,
    client: reqwest::Client,
    clock: Arc<FixedClock>,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    fn set_today(&self, y: i32, m: u32, d: u32) {
        self.clock.set(date(y, m, d));
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn spawn_app(today: NaiveDate) -> TestApp {
    let db = Database::open_in_memory().unwrap();
    let clock = Arc::new(FixedClock::new(today));
    let state = AppState::new(db, clock.clone(), &Config::default());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, api::router(state)).await.unwrap();
    });

    TestApp {
        base: format!("http://{addr}"),
        client: reqwest::Client::new(),
        clock,
    }
}

/// Register an account and return a bearer token for it.
async fn register_and_login(app: &TestApp, email: &str) -> String {
    let res = app
        .client
        .post(app.url("/api/register"))
        .json(&json!({ "email": email, "password": "hunter22" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 201);

    let res = app
        .client
        .post(app.url("/api/login"))
        .json(&json!({ "email": email, "password": "hunter22" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);

    let body: Value = res.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

async fn create_plant(app: &TestApp, token: &str, name: &str) -> i64 {
    let res = app
        .client
        .post(app.url("/api/plants"))
        .bearer_auth(token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 201);
    let body: Value = res.json().await.unwrap();
    body["plant_id"].as_i64().unwrap()
}

async fn create_reminder(app: &TestApp, token: &str, body: Value) -> (u16, Value) {
    let res = app
        .client
        .post(app.url("/api/reminders"))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = res.status().as_u16();
    (status, res.json().await.unwrap())
}

async fn due_tasks(app: &TestApp, token: &str) -> Vec<Value> {
    let res = app
        .client
        .get(app.url("/api/reminders/due"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    res.json::<Vec<Value>>().await.unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = spawn_app(date(2024, 1, 1)).await;
    let res = app.client.get(app.url("/api/health")).send().await.unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_protected_routes_fail_closed() {
    let app = spawn_app(date(2024, 1, 1)).await;

    // No token at all.
    let res = app.client.get(app.url("/api/plants")).send().await.unwrap();
    assert_eq!(res.status().as_u16(), 401);

    // Garbage token.
    let res = app
        .client
        .get(app.url("/api/plants"))
        .bearer_auth("not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 403);
}

#[tokio::test]
async fn test_register_login_and_list_plants() {
    let app = spawn_app(date(2024, 1, 1)).await;
    let token = register_and_login(&app, "gardener@example.com").await;

    let res = app
        .client
        .get(app.url("/api/plants"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(res.json::<Vec<Value>>().await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = spawn_app(date(2024, 1, 1)).await;
    register_and_login(&app, "gardener@example.com").await;

    let res = app
        .client
        .post(app.url("/api/register"))
        .json(&json!({ "email": "gardener@example.com", "password": "hunter22" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 409);
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app = spawn_app(date(2024, 1, 1)).await;
    register_and_login(&app, "gardener@example.com").await;

    let res = app
        .client
        .post(app.url("/api/login"))
        .json(&json!({ "email": "gardener@example.com", "password": "wrong-pass" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 401);
}

#[tokio::test]
async fn test_reminder_lifecycle_scenario() {
    // The full journey: create on Jan 1, come due on Jan 8, complete, and
    // disappear from the feed until Jan 15.
    let app = spawn_app(date(2024, 1, 1)).await;
    let token = register_and_login(&app, "gardener@example.com").await;
    let plant_id = create_plant(&app, &token, "Monstera Deliciosa").await;

    let (status, body) = create_reminder(
        &app,
        &token,
        json!({
            "plant_id": plant_id,
            "type": "water",
            "frequency_days": 7,
            "last_completed": "2024-01-01",
        }),
    )
    .await;
    assert_eq!(status, 201);
    let reminder_id = body["reminder_id"].as_i64().unwrap();

    // Nothing due yet on creation day.
    assert_eq!(due_tasks(&app, &token).await.len(), 0);

    // On the due date the reminder appears, classified as due today.
    app.set_today(2024, 1, 8);
    let due = due_tasks(&app, &token).await;
    assert_eq!(due.len(), 1);
    assert_eq!(due[0]["reminder_id"].as_i64().unwrap(), reminder_id);
    assert_eq!(due[0]["type"], "water");
    assert_eq!(due[0]["next_due"], "2024-01-08");
    assert_eq!(due[0]["plant_name"], "Monstera Deliciosa");
    assert_eq!(due[0]["status"], "due_today");

    // Completing rolls the schedule to Jan 15 and clears the feed.
    let res = app
        .client
        .post(app.url(&format!("/api/reminders/{reminder_id}/complete")))
        .bearer_auth(&token)
        .json(&json!({ "completion_date": "2024-01-08" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["reminder"]["next_due"], "2024-01-15");

    assert_eq!(due_tasks(&app, &token).await.len(), 0);

    // Back again once the clock reaches the new due date.
    app.set_today(2024, 1, 15);
    let due = due_tasks(&app, &token).await;
    assert_eq!(due.len(), 1);
    assert_eq!(due[0]["status"], "due_today");

    // And overdue after it passes.
    app.set_today(2024, 1, 20);
    assert_eq!(due_tasks(&app, &token).await[0]["status"], "overdue");
}

#[tokio::test]
async fn test_due_feed_orders_most_overdue_first() {
    let app = spawn_app(date(2024, 1, 10)).await;
    let token = register_and_login(&app, "gardener@example.com").await;
    let monstera = create_plant(&app, &token, "Monstera").await;
    let ficus = create_plant(&app, &token, "Ficus").await;

    // next_due 2024-01-05
    create_reminder(
        &app,
        &token,
        json!({ "plant_id": monstera, "type": "water", "frequency_days": 7,
                "last_completed": "2023-12-29" }),
    )
    .await;
    // next_due 2024-01-01 — more overdue, sorts first
    create_reminder(
        &app,
        &token,
        json!({ "plant_id": ficus, "type": "feed", "frequency_days": 30,
                "last_completed": "2023-12-02" }),
    )
    .await;

    let due = due_tasks(&app, &token).await;
    assert_eq!(due.len(), 2);
    assert_eq!(due[0]["plant_name"], "Ficus");
    assert_eq!(due[0]["next_due"], "2024-01-01");
    assert_eq!(due[0]["status"], "overdue");
    assert_eq!(due[1]["plant_name"], "Monstera");
}

#[tokio::test]
async fn test_invalid_frequency_is_rejected_and_persists_nothing() {
    let app = spawn_app(date(2024, 1, 1)).await;
    let token = register_and_login(&app, "gardener@example.com").await;
    let plant_id = create_plant(&app, &token, "Monstera").await;

    for bad in [0, -7] {
        let (status, _) = create_reminder(
            &app,
            &token,
            json!({ "plant_id": plant_id, "type": "water", "frequency_days": bad }),
        )
        .await;
        assert_eq!(status, 400);
    }

    let res = app
        .client
        .get(app.url(&format!("/api/plants/{plant_id}/reminders")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.json::<Vec<Value>>().await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_complete_without_body_defaults_to_today() {
    let app = spawn_app(date(2024, 1, 8)).await;
    let token = register_and_login(&app, "gardener@example.com").await;
    let plant_id = create_plant(&app, &token, "Monstera").await;

    let (_, body) = create_reminder(
        &app,
        &token,
        json!({ "plant_id": plant_id, "type": "water", "frequency_days": 7,
                "last_completed": "2024-01-01" }),
    )
    .await;
    let reminder_id = body["reminder_id"].as_i64().unwrap();

    let res = app
        .client
        .post(app.url(&format!("/api/reminders/{reminder_id}/complete")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["reminder"]["last_completed"], "2024-01-08");
    assert_eq!(body["reminder"]["next_due"], "2024-01-15");
}

#[tokio::test]
async fn test_plant_reminders_ordered_and_classified() {
    let app = spawn_app(date(2024, 1, 10)).await;
    let token = register_and_login(&app, "gardener@example.com").await;
    let plant_id = create_plant(&app, &token, "Monstera").await;

    for (task, last, freq) in [
        ("water", "2024-01-03", 7),  // due today
        ("feed", "2023-12-02", 30),  // overdue
        ("mist", "2024-01-09", 2),   // scheduled
    ] {
        create_reminder(
            &app,
            &token,
            json!({ "plant_id": plant_id, "type": task, "frequency_days": freq,
                    "last_completed": last }),
        )
        .await;
    }

    let res = app
        .client
        .get(app.url(&format!("/api/plants/{plant_id}/reminders")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let reminders: Vec<Value> = res.json().await.unwrap();
    let summary: Vec<(&str, &str)> = reminders
        .iter()
        .map(|r| (r["type"].as_str().unwrap(), r["status"].as_str().unwrap()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("feed", "overdue"),
            ("water", "due_today"),
            ("mist", "scheduled"),
        ]
    );
}

#[tokio::test]
async fn test_foreign_plants_and_reminders_are_invisible() {
    let app = spawn_app(date(2024, 1, 1)).await;
    let alice = register_and_login(&app, "alice@example.com").await;
    let bob = register_and_login(&app, "bob@example.com").await;
    let plant_id = create_plant(&app, &alice, "Monstera").await;
    let (_, body) = create_reminder(
        &app,
        &alice,
        json!({ "plant_id": plant_id, "type": "water", "frequency_days": 7 }),
    )
    .await;
    let reminder_id = body["reminder_id"].as_i64().unwrap();

    // Bob cannot see, attach to, complete, or delete Alice's records.
    let res = app
        .client
        .get(app.url(&format!("/api/plants/{plant_id}/reminders")))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 404);

    let (status, _) = create_reminder(
        &app,
        &bob,
        json!({ "plant_id": plant_id, "type": "water", "frequency_days": 7 }),
    )
    .await;
    assert_eq!(status, 404);

    let res = app
        .client
        .post(app.url(&format!("/api/reminders/{reminder_id}/complete")))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 404);

    let res = app
        .client
        .delete(app.url(&format!("/api/reminders/{reminder_id}")))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 404);
}

#[tokio::test]
async fn test_plant_deletion_cascades() {
    let app = spawn_app(date(2024, 1, 10)).await;
    let token = register_and_login(&app, "gardener@example.com").await;
    let plant_id = create_plant(&app, &token, "Monstera").await;
    create_reminder(
        &app,
        &token,
        json!({ "plant_id": plant_id, "type": "water", "frequency_days": 7,
                "last_completed": "2024-01-01" }),
    )
    .await;
    app.client
        .post(app.url(&format!("/api/plants/{plant_id}/photos")))
        .bearer_auth(&token)
        .json(&json!({ "image_url": "https://img/1.jpg" }))
        .send()
        .await
        .unwrap();

    // The reminder is in the due feed before deletion.
    assert_eq!(due_tasks(&app, &token).await.len(), 1);

    let res = app
        .client
        .delete(app.url(&format!("/api/plants/{plant_id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);

    // Listing the plant's reminders now fails, and the feed is empty.
    let res = app
        .client
        .get(app.url(&format!("/api/plants/{plant_id}/reminders")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 404);
    assert_eq!(due_tasks(&app, &token).await.len(), 0);
}

#[tokio::test]
async fn test_patch_plant_updates_only_sent_fields() {
    let app = spawn_app(date(2024, 1, 1)).await;
    let token = register_and_login(&app, "gardener@example.com").await;

    let res = app
        .client
        .post(app.url("/api/plants"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Ficus", "notes": "by the window" }))
        .send()
        .await
        .unwrap();
    let plant_id = res.json::<Value>().await.unwrap()["plant_id"].as_i64().unwrap();

    let res = app
        .client
        .patch(app.url(&format!("/api/plants/{plant_id}")))
        .bearer_auth(&token)
        .json(&json!({ "notes": "moved to the kitchen" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);

    let res = app
        .client
        .get(app.url(&format!("/api/plants/{plant_id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let plant: Value = res.json().await.unwrap();
    assert_eq!(plant["name"], "Ficus");
    assert_eq!(plant["notes"], "moved to the kitchen");
}

#[tokio::test]
async fn test_photo_log_round_trip() {
    let app = spawn_app(date(2024, 2, 29)).await;
    let token = register_and_login(&app, "gardener@example.com").await;
    let plant_id = create_plant(&app, &token, "Monstera").await;

    let res = app
        .client
        .post(app.url(&format!("/api/plants/{plant_id}/photos")))
        .bearer_auth(&token)
        .json(&json!({ "image_url": "https://img/leaf.jpg", "notes": "new leaf!" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 201);

    let res = app
        .client
        .get(app.url(&format!("/api/plants/{plant_id}/photos")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let photos: Vec<Value> = res.json().await.unwrap();
    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0]["image_url"], "https://img/leaf.jpg");
    assert_eq!(photos[0]["date_taken"], "2024-02-29");
    assert_eq!(photos[0]["notes"], "new leaf!");
}
