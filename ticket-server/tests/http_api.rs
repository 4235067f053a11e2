use axum::body::Body;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shared::models::{Ticket, TicketStats, TicketStatus};
use std::time::Duration;
use ticket_server::{Config, HttpService, ServerState};

async fn service() -> HttpService {
    let state = ServerState::initialize(&Config::in_memory()).await.unwrap();
    HttpService::new(state)
}

async fn call(service: &HttpService, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = service.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(service: &HttpService, title: &str, email: &str) -> Ticket {
    let (status, body) = call(
        service,
        Method::POST,
        "/tickets",
        Some(json!({ "title": title, "description": format!("{title} details"), "requesterEmail": email })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    // Distinct createdAt for ordering assertions
    tokio::time::sleep(Duration::from_millis(2)).await;
    serde_json::from_value(body).unwrap()
}

#[tokio::test]
async fn test_create_and_resolve_scenario() {
    let service = service().await;
    let ticket = create(&service, "Login fails", "a@b.com").await;
    assert_eq!(ticket.status, TicketStatus::Open);
    assert_eq!(ticket.priority.as_str(), "medium");

    let (status, body) = call(
        &service,
        Method::PATCH,
        &format!("/tickets/{}", ticket.id),
        Some(json!({ "status": "resolved" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["resolvedAt"].is_i64());
    assert_eq!(body["history"].as_array().unwrap().len(), 2);
    assert_eq!(body["history"][1]["action"], "status_changed");
    assert_eq!(body["history"][1]["oldValue"], "open");
    assert_eq!(body["history"][1]["newValue"], "resolved");
    assert_eq!(body["history"][1]["changedBy"], "admin");

    let (status, fetched) = call(&service, Method::GET, &format!("/tickets/{}", ticket.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn test_create_validation_errors_name_the_field() {
    let service = service().await;

    let (status, body) = call(
        &service,
        Method::POST,
        "/tickets",
        Some(json!({ "title": "t", "description": "d", "requesterEmail": "not-an-email" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "requesterEmail");
    assert!(body["code"].is_u64());

    let (status, body) = call(
        &service,
        Method::POST,
        "/tickets",
        Some(json!({ "title": "  ", "description": "d", "requesterEmail": "a@b.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "title");

    // Unknown priority is rejected by deserialization
    let (status, _) = call(
        &service,
        Method::POST,
        "/tickets",
        Some(json!({ "title": "t", "description": "d", "requesterEmail": "a@b.com", "priority": "critical" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Malformed body
    let request = Request::builder()
        .method(Method::POST)
        .uri("/tickets")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = service.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (_, list) = call(&service, Method::GET, "/tickets", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_list_filters_and_ordering() {
    let service = service().await;
    let first = create(&service, "Printer jammed", "a@b.com").await;
    let second = create(&service, "VPN drops", "c@d.com").await;
    let third = create(&service, "Email bounce", "a@b.com").await;

    call(
        &service,
        Method::PATCH,
        &format!("/tickets/{}", second.id),
        Some(json!({ "status": "in_progress", "assignedTo": "ana" })),
    )
    .await;

    let (_, all) = call(&service, Method::GET, "/tickets", None).await;
    let ids: Vec<&str> = all.as_array().unwrap().iter().map(|t| t["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec![third.id.as_str(), second.id.as_str(), first.id.as_str()]);

    let (_, open) = call(&service, Method::GET, "/tickets?status=open", None).await;
    assert_eq!(open.as_array().unwrap().len(), 2);

    let (_, assigned) = call(&service, Method::GET, "/tickets?assignedTo=ana", None).await;
    assert_eq!(assigned[0]["id"], second.id.as_str());

    let (_, searched) = call(&service, Method::GET, "/tickets?search=PRINTER", None).await;
    assert_eq!(searched.as_array().unwrap().len(), 1);
    assert_eq!(searched[0]["id"], first.id.as_str());

    let (_, combined) = call(
        &service,
        Method::GET,
        "/tickets?requesterEmail=a%40b.com&search=bounce",
        None,
    )
    .await;
    assert_eq!(combined.as_array().unwrap().len(), 1);
    assert_eq!(combined[0]["id"], third.id.as_str());

    let (_, blank) = call(&service, Method::GET, "/tickets?search=%20%20", None).await;
    assert_eq!(blank.as_array().unwrap().len(), 3);

    let (status, _) = call(&service, Method::GET, "/tickets?status=done", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, mine) = call(&service, Method::GET, "/tickets/by-email/a@b.com", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = mine.as_array().unwrap().iter().map(|t| t["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec![third.id.as_str(), first.id.as_str()]);

    let (_, nobody) = call(&service, Method::GET, "/tickets/by-email/nobody@b.com", None).await;
    assert_eq!(nobody, json!([]));
}

#[tokio::test]
async fn test_blank_equality_filters_are_ignored() {
    let service = service().await;
    let first = create(&service, "Printer jammed", "a@b.com").await;
    let second = create(&service, "VPN drops", "c@d.com").await;
    call(
        &service,
        Method::PATCH,
        &format!("/tickets/{}", second.id),
        Some(json!({ "assignedTo": "ana" })),
    )
    .await;

    for uri in [
        "/tickets?assignedTo=",
        "/tickets?requesterEmail=",
        "/tickets?assignedTo=&requesterEmail=",
        "/tickets?assignedTo=%20&requesterEmail=%20%20&search=",
    ] {
        let (status, body) = call(&service, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body.as_array().unwrap().len(), 2, "{uri}");
    }

    // Blank predicates drop out; the others still apply
    let (_, open) = call(&service, Method::GET, "/tickets?assignedTo=&status=open", None).await;
    let ids: Vec<&str> = open.as_array().unwrap().iter().map(|t| t["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);

    let (_, padded) = call(&service, Method::GET, "/tickets?assignedTo=%20ana%20", None).await;
    assert_eq!(padded.as_array().unwrap().len(), 1);
    assert_eq!(padded[0]["id"], second.id.as_str());
}

#[tokio::test]
async fn test_stats_scenario() {
    let service = service().await;
    let mut ids = Vec::new();
    for i in 0..5 {
        ids.push(create(&service, &format!("Ticket {i}"), "a@b.com").await.id);
    }
    for id in &ids[..2] {
        call(
            &service,
            Method::PATCH,
            &format!("/tickets/{id}"),
            Some(json!({ "status": "resolved" })),
        )
        .await;
    }

    let (status, body) = call(&service, Method::GET, "/tickets/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["byStatus"], json!({ "open": 3, "resolved": 2 }));
    assert_eq!(body["byPriority"], json!({ "medium": 5 }));
    assert_eq!(body["total"], 5);

    let stats: TicketStats = serde_json::from_value(body).unwrap();
    assert_eq!(stats.total, 5);
}

#[tokio::test]
async fn test_patch_rules() {
    let service = service().await;
    let ticket = create(&service, "Login fails", "a@b.com").await;
    let uri = format!("/tickets/{}", ticket.id);

    // Priority only: one entry, no lifecycle timestamps
    let (_, body) = call(&service, Method::PATCH, &uri, Some(json!({ "priority": "urgent" }))).await;
    assert_eq!(body["history"].as_array().unwrap().len(), 2);
    assert_eq!(body["history"][1]["action"], "priority_changed");
    assert!(body.get("resolvedAt").is_none());
    assert!(body.get("closedAt").is_none());

    // Same values again: nothing changes
    let (status, same) = call(
        &service,
        Method::PATCH,
        &uri,
        Some(json!({ "priority": "urgent", "status": "open" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(same, body);

    // First assignment records "unassigned" as the old value
    let (_, body) = call(&service, Method::PATCH, &uri, Some(json!({ "assignedTo": "João Silva" }))).await;
    assert_eq!(body["assignedTo"], "João Silva");
    assert_eq!(body["history"][2]["action"], "assigned");
    assert_eq!(body["history"][2]["oldValue"], "unassigned");

    let (status, err) = call(&service, Method::PATCH, &uri, Some(json!({ "assignedTo": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["details"]["field"], "assignedTo");

    let (status, _) = call(&service, Method::PATCH, &uri, Some(json!({ "status": "archived" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &service,
        Method::PATCH,
        "/tickets/missing",
        Some(json!({ "status": "closed" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_then_get() {
    let service = service().await;
    let ticket = create(&service, "Login fails", "a@b.com").await;
    let uri = format!("/tickets/{}", ticket.id);

    let (status, body) = call(&service, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = call(&service, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);

    let (status, _) = call(&service, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_and_request_id() {
    let service = service().await;

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = service.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["observers"], 0);

    let (status, body) = call(&service, Method::GET, "/health/detailed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["database"]["status"], "ok");
}
