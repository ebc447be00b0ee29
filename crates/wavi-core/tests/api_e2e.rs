//! E2E tests for the REST gateway and auth service.
//!
//! Every test runs against a local mockito server; no real backend or OS
//! keyring is touched. Bodiless requests still declare a JSON content type.
//!
//! Coverage:
//! | Call               | success | status error | decode error | no token |
//! |--------------------|---------|--------------|--------------|----------|
//! | fetch_today        | x       | x            | x            | x        |
//! | log_success        | x       | x            |              |          |
//! | log_failure        | x       |              |              |          |
//! | create/update      | x       |              |              |          |
//! | delete_habit       | x       |              |              |          |
//! | fetch_logs/reports | x       |              |              |          |
//! | analyze_message    | x (200) | x (400)      |              |          |
//! | login              | x       | x (401)      | x (no data)  |          |
//! | check_email        | x       |              |              |          |

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use mockito::Matcher;
use serde_json::json;
use wavi_core::api::{LogQuery, ReportQuery};
use wavi_core::{
    ApiClient, ApiError, AuthError, AuthService, ChatOutcome, ChatSession, DaysOfWeek,
    HabitDraft, HabitGateway, MemoryTokenStore, RemoteGateway, ReportKind, TokenStore,
};

const TOKEN: &str = "test-token";

// ============================================================================
// Helpers
// ============================================================================

fn client(server: &mockito::Server, tokens: MemoryTokenStore) -> ApiClient {
    ApiClient::new(&server.url(), Duration::from_secs(5), Arc::new(tokens)).unwrap()
}

fn gateway(server: &mockito::Server) -> RemoteGateway {
    RemoteGateway::new(client(server, MemoryTokenStore::with_token(TOKEN)))
}

fn habit_json(id: u64, days: &[u8], start: &str, end: &str) -> serde_json::Value {
    json!({
        "id": id, "name": format!("habit {id}"), "status": "ACTIVE",
        "dayOfWeek": days, "icon": "⭐", "startTime": start, "endTime": end
    })
}

fn draft() -> HabitDraft {
    HabitDraft {
        name: "Stretch".into(),
        days_of_week: DaysOfWeek::new([1, 3]).unwrap(),
        icon: "🧘".into(),
        start_time: "07:00:00".into(),
        end_time: "07:15:00".into(),
    }
}

// ============================================================================
// Gateway
// ============================================================================

#[tokio::test]
async fn fetch_today_sends_bearer_and_decodes_snapshot() {
    let mut server = mockito::Server::new_async().await;
    let body = json!({
        "status": 200, "message": "ok",
        "data": {
            "nickname": "bin", "profileImage": 2,
            "habits": [habit_json(1, &[1, 3, 5], "09:30:00", "10:00:00")]
        }
    });
    let m = server
        .mock("GET", "/api/v1/main")
        .match_header("authorization", "Bearer test-token")
        .match_header("accept", "application/json")
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let snap = gateway(&server).fetch_today().await.unwrap();
    assert_eq!(snap.nickname, "bin");
    assert_eq!(snap.profile_image, 2);
    assert_eq!(snap.habits[0].days_of_week, DaysOfWeek::new([1, 3, 5]).unwrap());
    m.assert_async().await;
}

#[tokio::test]
async fn fetch_today_maps_status_and_decode_errors() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/api/v1/main")
        .with_status(500)
        .with_body(r#"{"status":500,"message":"db down"}"#)
        .create_async()
        .await;
    match gateway(&server).fetch_today().await {
        Err(ApiError::Status { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message.as_deref(), Some("db down"));
        }
        other => panic!("unexpected {other:?}"),
    }

    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/api/v1/main")
        .with_status(200)
        .with_body(r#"{"status":200,"data":{"nickname":"bin"}}"#)
        .create_async()
        .await;
    assert!(matches!(
        gateway(&server).fetch_today().await,
        Err(ApiError::Decode(_))
    ));
}

#[tokio::test]
async fn unauthorized_status_is_distinct() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/api/v1/log/success/4")
        .with_status(401)
        .create_async()
        .await;
    let err = gateway(&server).log_success(4).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { .. }));
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn missing_token_fails_without_request() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("GET", "/api/v1/main")
        .expect(0)
        .create_async()
        .await;
    let gw = RemoteGateway::new(client(&server, MemoryTokenStore::new()));
    assert!(matches!(gw.fetch_today().await, Err(ApiError::NotAuthenticated)));
    m.assert_async().await;
}

#[tokio::test]
async fn log_success_and_failure_hit_per_habit_routes() {
    let mut server = mockito::Server::new_async().await;
    let success = server
        .mock("POST", "/api/v1/log/success/7")
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_body(r#"{"status":200,"message":"logged"}"#)
        .create_async()
        .await;
    let failure = server
        .mock("POST", "/api/v1/log/failure/7")
        .match_body(Matcher::Json(json!({
            "failureReasonIds": [3, 5], "customReason": "rain"
        })))
        .with_status(200)
        .with_body(r#"{"status":200,"message":"logged"}"#)
        .create_async()
        .await;

    let gw = gateway(&server);
    gw.log_success(7).await.unwrap();
    gw.log_failure(7, vec![3, 5], Some("rain".into())).await.unwrap();
    success.assert_async().await;
    failure.assert_async().await;
}

#[tokio::test]
async fn create_and_update_return_echoed_habit_when_present() {
    let mut server = mockito::Server::new_async().await;
    let create = server
        .mock("POST", "/api/v1/habit")
        .match_body(Matcher::PartialJson(json!({
            "name": "Stretch", "dayOfWeek": [1, 3], "startTime": "07:00:00"
        })))
        .with_status(201)
        .with_body(json!({"status": 201, "data": habit_json(11, &[1, 3], "07:00:00", "07:15:00")}).to_string())
        .create_async()
        .await;
    let update = server
        .mock("PATCH", "/api/v1/habit/11")
        .with_status(200)
        .with_body(r#"{"status":200,"message":"updated"}"#)
        .create_async()
        .await;

    let gw = gateway(&server);
    assert_eq!(gw.create_habit(&draft()).await.unwrap().map(|h| h.id), Some(11));
    assert!(gw.update_habit(11, &draft()).await.unwrap().is_none());
    create.assert_async().await;
    update.assert_async().await;
}

#[tokio::test]
async fn delete_habit_uses_delete_method() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("DELETE", "/api/v1/habit/11")
        .match_header("content-type", "application/json")
        .with_status(204)
        .create_async()
        .await;
    gateway(&server).delete_habit(11).await.unwrap();
    m.assert_async().await;
}

#[tokio::test]
async fn fetch_logs_and_reports_pass_filters() {
    let mut server = mockito::Server::new_async().await;
    let logs = server
        .mock("GET", "/api/v1/log")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("startDate".into(), "2025-10-15".into()),
            Matcher::UrlEncoded("endDate".into(), "2025-10-15".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({"status": 200, "data": [
                {"id": 1, "habitId": 1, "name": "Read", "date": "2025-10-15", "completed": true}
            ]})
            .to_string(),
        )
        .create_async()
        .await;
    let reports = server
        .mock("GET", "/api/v1/report")
        .match_query(Matcher::UrlEncoded("type".into(), "WEEKLY".into()))
        .with_status(200)
        .with_body(r#"{"status":200,"data":[]}"#)
        .create_async()
        .await;

    let gw = gateway(&server);
    let date = NaiveDate::from_ymd_opt(2025, 10, 15).unwrap();
    let fetched = gw.fetch_logs(LogQuery::on(date)).await.unwrap();
    assert!(fetched[0].completed);

    let (start, end) = ReportKind::Weekly.range(date);
    let query = ReportQuery {
        kind: Some(ReportKind::Weekly),
        start_date: Some(start),
        end_date: Some(end),
    };
    assert!(gw.fetch_reports(query).await.unwrap().is_empty());
    logs.assert_async().await;
    reports.assert_async().await;
}

#[tokio::test]
async fn chat_decodes_follow_up_and_draft() {
    let mut server = mockito::Server::new_async().await;
    let follow_up = server
        .mock("POST", "/api/v1/habit/chat")
        .match_body(Matcher::PartialJson(json!({"currentPrompt": "I want to read"})))
        .with_status(400)
        .with_body(r#"{"status":400,"data":"What time of day?"}"#)
        .create_async()
        .await;

    let gw = gateway(&server);
    let mut chat = ChatSession::new();
    let out = chat.send(&gw, "I want to read").await.unwrap();
    assert_eq!(out, ChatOutcome::FollowUp("What time of day?".into()));
    follow_up.assert_async().await;

    let _draft = server
        .mock("POST", "/api/v1/habit/chat")
        .match_body(Matcher::PartialJson(json!({
            "currentPrompt": "at nine",
            "history": ["User: I want to read", "AI: What time of day?", "User: at nine"]
        })))
        .with_status(200)
        .with_body(
            json!({"status": 200, "data": {
                "name": "Read", "icon": "📚", "startTime": "21:00:00",
                "endTime": "21:30:00", "dayOfWeek": [1, 2, 3, 4, 5]
            }})
            .to_string(),
        )
        .create_async()
        .await;
    match chat.send(&gw, "at nine").await.unwrap() {
        ChatOutcome::DraftReady(d) => assert_eq!(d.name, "Read"),
        other => panic!("unexpected {other:?}"),
    }
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn login_strips_bearer_prefix_and_stores_token() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("POST", "/api/v1/user/login")
        .match_body(Matcher::Json(json!({"email": "a@b.c", "password": "pw"})))
        .with_status(200)
        .with_body(r#"{"status":200,"message":"ok","data":"Bearer abc.def"}"#)
        .create_async()
        .await;

    let tokens = MemoryTokenStore::new();
    let auth = AuthService::new(client(&server, tokens.clone()));
    auth.login("a@b.c", "pw").await.unwrap();
    assert_eq!(tokens.load_access_token().unwrap().as_deref(), Some("abc.def"));
    assert!(auth.is_logged_in().unwrap());
    m.assert_async().await;

    auth.logout().unwrap();
    assert!(!auth.is_logged_in().unwrap());
}

#[tokio::test]
async fn login_failures() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/api/v1/user/login")
        .with_status(401)
        .create_async()
        .await;
    let auth = AuthService::new(client(&server, MemoryTokenStore::new()));
    assert!(matches!(
        auth.login("a@b.c", "bad").await,
        Err(AuthError::InvalidCredentials)
    ));
    assert!(matches!(auth.login("", "pw").await, Err(AuthError::Validation(_))));

    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/api/v1/user/login")
        .with_status(200)
        .with_body(r#"{"status":200,"message":"ok"}"#)
        .create_async()
        .await;
    let auth = AuthService::new(client(&server, MemoryTokenStore::new()));
    assert!(matches!(
        auth.login("a@b.c", "pw").await,
        Err(AuthError::NoLoginData)
    ));
}

#[tokio::test]
async fn check_email_reads_bare_response_without_token() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("POST", "/api/v1/user/check-email")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(r#"{"available":false,"message":"taken"}"#)
        .create_async()
        .await;
    let auth = AuthService::new(client(&server, MemoryTokenStore::new()));
    assert!(!auth.check_email("a@b.c").await.unwrap());
    m.assert_async().await;
}
