use course_weightings::api::{ApiClient, ApiError};
use course_weightings::session::Session;
use course_weightings::settings::Api;
use course_weightings::weightings::{CriterionPayload, ItemKind, WeightingBackend};
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiClient {
    let api = Api {
        base_url: server.uri(),
        auth_scheme: "Bearer".to_string(),
        timeout_secs: Some(5),
    };
    ApiClient::new(&api, &Session::new("tok-123").with_course(7)).unwrap()
}

#[tokio::test]
async fn resolves_template_then_fetches_criteria() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/courses/7/"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7, "name": "Physics 1A", "evaluation_template": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/evaluation-templates/3"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3,
            "name": "Standard",
            "criteria": [
                {"id": 1, "name": "Exams", "weight": "60.00"},
                {"id": 2, "name": "Homework", "weight": 40}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let criteria = client(&server).fetch_criteria(7).await.unwrap();
    assert_eq!(criteria.len(), 2);
    assert_eq!(criteria[0].name, "Exams");
    assert_eq!(criteria[0].weight, dec!(60));
    assert_eq!(criteria[1].weight, dec!(40));
}

#[tokio::test]
async fn lists_items_filtered_by_course() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/course-sub-criteria/"))
        .and(query_param("course", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 10, "name": "Midterm", "percentage": "12.00", "parent_criterion": 1, "course": 7}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/course-special-criteria/"))
        .and(query_param("course", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client(&server);
    let sub = client.list_items(ItemKind::Sub, 7).await.unwrap();
    let special = client.list_items(ItemKind::Special, 7).await.unwrap();

    assert_eq!(sub.len(), 1);
    assert_eq!(sub[0].percentage, dec!(12));
    assert!(special.is_empty());
}

#[tokio::test]
async fn create_posts_full_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/course-sub-criteria/"))
        .and(body_json(json!({
            "name": "Final", "percentage": "8", "course": 7, "parent_criterion": 1
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 11, "name": "Final", "percentage": "8.00", "parent_criterion": 1, "course": 7
        })))
        .expect(1)
        .mount(&server)
        .await;

    let payload = CriterionPayload {
        name: "Final".into(),
        percentage: dec!(8),
        course: 7,
        parent_criterion: 1,
    };
    let saved = client(&server)
        .create_item(ItemKind::Sub, &payload)
        .await
        .unwrap();
    assert_eq!(saved.id, 11);
}

#[tokio::test]
async fn update_puts_to_item_path() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/course-special-criteria/4/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4, "name": "Olympiad", "percentage": "3", "parent_criterion": 2, "course": 7
        })))
        .expect(1)
        .mount(&server)
        .await;

    let payload = CriterionPayload {
        name: "Olympiad".into(),
        percentage: dec!(3),
        course: 7,
        parent_criterion: 2,
    };
    let saved = client(&server)
        .update_item(ItemKind::Special, 4, &payload)
        .await
        .unwrap();
    assert_eq!(saved.percentage, dec!(3));
}

#[tokio::test]
async fn delete_accepts_empty_no_content() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/course-sub-criteria/10/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .delete_item(ItemKind::Sub, 10)
        .await
        .unwrap();
}

#[tokio::test]
async fn surfaces_non_field_errors_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/course-special-criteria/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "non_field_errors": ["A special criterion with this name already exists."]
        })))
        .mount(&server)
        .await;

    let payload = CriterionPayload {
        name: "Olympiad".into(),
        percentage: dec!(3),
        course: 7,
        parent_criterion: 2,
    };
    let err = client(&server)
        .create_item(ItemKind::Special, &payload)
        .await
        .unwrap_err();

    match err {
        ApiError::Status {
            method,
            status,
            message,
            ..
        } => {
            assert_eq!(method, "POST");
            assert_eq!(status, 400);
            assert_eq!(
                message.as_deref(),
                Some("A special criterion with this name already exists.")
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn surfaces_detail_on_auth_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/courses/7/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Invalid token."
        })))
        .mount(&server)
        .await;

    let err = client(&server).fetch_criteria(7).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.backend_message(), Some("Invalid token."));
}

#[tokio::test]
async fn malformed_body_is_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/course-sub-criteria/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client(&server)
        .list_items(ItemKind::Sub, 7)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Http(_)));
    assert_eq!(err.backend_message(), None);
}
