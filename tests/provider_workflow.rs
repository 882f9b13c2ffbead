mod common;

use actix_web::{http::StatusCode, test, App};
use base64::{engine::general_purpose, Engine as _};
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use servicemart_be::routes;

fn registration(category: Uuid) -> Value {
    let id_proof = general_purpose::STANDARD.encode(b"\xff\xd8\xff fake jpeg");
    json!({
        "name": "Asha Plumbing",
        "phone": "+91 98765 43210",
        "address": "12 MG Road",
        "city": "Pune",
        "service_category": category,
        "experience": "3-5 years",
        "price_range": "Moderate",
        "about": "Leak repairs and fittings",
        "status": "approved",
        "id_proof": {
            "image_data": format!("data:image/jpeg;base64,{}", id_proof),
            "file_name": "aadhaar.jpg",
            "content_type": "image/jpeg"
        }
    })
}

async fn mount_category(server: &MockServer, category: Uuid) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/service_categories"))
        .and(query_param("id", format!("eq.{}", category)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::category_row(category, "Plumbing", "plumbing")
        ])))
        .mount(server)
        .await;
}

#[actix_web::test]
async fn approving_pending_provider_writes_new_status() {
    let server = MockServer::start().await;
    let (id, owner, cat) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

    Mock::given(method("GET"))
        .and(path("/rest/v1/service_providers"))
        .and(query_param("id", format!("eq.{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::provider_row(id, owner, cat, "pending")
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/service_providers"))
        .and(query_param("id", format!("eq.{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::provider_row(id, owner, cat, "approved")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().app_data(common::state(&server)).configure(routes::configure)).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/providers/{}/approve", id))
        .insert_header(common::bearer(&common::admin_token(Uuid::new_v4())))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "approved");
    assert_eq!(body["data"]["actions"], json!(["suspend"]));

    let requests = server.received_requests().await.unwrap();
    let patch = requests
        .iter()
        .find(|r| r.method.to_string() == "PATCH")
        .expect("status patch");
    let sent: Value = serde_json::from_slice(&patch.body).unwrap();
    assert_eq!(sent["status"], "approved");
}

#[actix_web::test]
async fn undefined_transition_is_refused_without_writing() {
    let server = MockServer::start().await;
    let (id, cat) = (Uuid::new_v4(), Uuid::new_v4());

    Mock::given(method("GET"))
        .and(path("/rest/v1/service_providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::provider_row(id, Uuid::new_v4(), cat, "rejected")
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/service_providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().app_data(common::state(&server)).configure(routes::configure)).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/providers/{}/suspend", id))
        .insert_header(common::bearer(&common::admin_token(Uuid::new_v4())))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn unknown_action_and_missing_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/service_providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let app = test::init_service(App::new().app_data(common::state(&server)).configure(routes::configure)).await;
    let token = common::admin_token(Uuid::new_v4());

    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/providers/{}/delete", Uuid::new_v4()))
        .insert_header(common::bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/providers/{}/approve", Uuid::new_v4()))
        .insert_header(common::bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn registration_is_stored_as_pending_after_upload() {
    let server = MockServer::start().await;
    let (user, cat) = (Uuid::new_v4(), Uuid::new_v4());
    mount_category(&server, cat).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/service_providers"))
        .and(query_param("user_id", format!("eq.{}", user)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/storage/v1/object/provider-documents/.+\.jpg$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Key": "ok"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/service_providers"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            common::provider_row(Uuid::new_v4(), user, cat, "pending")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().app_data(common::state(&server)).configure(routes::configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/providers")
        .insert_header(common::bearer(&common::user_token(user)))
        .set_json(registration(cat))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let requests = server.received_requests().await.unwrap();
    let insert = requests
        .iter()
        .find(|r| r.method.to_string() == "POST" && r.url.path() == "/rest/v1/service_providers")
        .expect("insert");
    let sent: Value = serde_json::from_slice(&insert.body).unwrap();
    assert_eq!(sent["status"], "pending");
    assert_eq!(sent["user_id"], user.to_string());
    assert!(sent["id_proof_url"]
        .as_str()
        .unwrap()
        .contains("/storage/v1/object/public/provider-documents/"));
}

#[actix_web::test]
async fn second_registration_is_a_conflict() {
    let server = MockServer::start().await;
    let (user, cat) = (Uuid::new_v4(), Uuid::new_v4());
    mount_category(&server, cat).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/service_providers"))
        .and(query_param("user_id", format!("eq.{}", user)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": Uuid::new_v4()}])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().app_data(common::state(&server)).configure(routes::configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/providers")
        .insert_header(common::bearer(&common::user_token(user)))
        .set_json(registration(cat))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn failed_upload_leaves_no_row() {
    let server = MockServer::start().await;
    let (user, cat) = (Uuid::new_v4(), Uuid::new_v4());
    mount_category(&server, cat).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/service_providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/storage/v1/object/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("bucket missing"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/service_providers"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().app_data(common::state(&server)).configure(routes::configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/providers")
        .insert_header(common::bearer(&common::user_token(user)))
        .set_json(registration(cat))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
}

#[actix_web::test]
async fn incomplete_registration_is_rejected_before_any_call() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().app_data(common::state(&server)).configure(routes::configure)).await;

    let mut body = registration(Uuid::new_v4());
    body["phone"] = json!("   ");
    body.as_object_mut().unwrap().remove("id_proof");

    let req = test::TestRequest::post()
        .uri("/api/providers")
        .insert_header(common::bearer(&common::user_token(Uuid::new_v4())))
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("phone"));
    assert!(message.contains("id_proof"));
}

#[actix_web::test]
async fn wizard_step_reports_missing_fields() {
    let server = MockServer::start().await;
    let app = test::init_service(App::new().app_data(common::state(&server)).configure(routes::configure)).await;
    let token = common::user_token(Uuid::new_v4());

    let req = test::TestRequest::post()
        .uri("/api/providers/steps/1")
        .insert_header(common::bearer(&token))
        .set_json(json!({"name": "Asha", "address": "12 MG Road", "city": "Pune"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["complete"], false);
    assert_eq!(body["data"]["missing"], json!(["phone"]));
    assert_eq!(body["data"]["next_step"], Value::Null);

    let req = test::TestRequest::post()
        .uri("/api/providers/steps/1")
        .insert_header(common::bearer(&token))
        .set_json(json!({"name": "Asha", "phone": "1", "address": "12 MG Road", "city": "Pune"}))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["next_step"], 2);

    let req = test::TestRequest::post()
        .uri("/api/providers/steps/7")
        .insert_header(common::bearer(&token))
        .set_json(json!({}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn public_detail_hides_unapproved_providers() {
    let server = MockServer::start().await;
    let (id, cat) = (Uuid::new_v4(), Uuid::new_v4());

    Mock::given(method("GET"))
        .and(path("/rest/v1/service_providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::provider_row(id, Uuid::new_v4(), cat, "pending")
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().app_data(common::state(&server)).configure(routes::configure)).await;

    let req = test::TestRequest::get().uri(&format!("/api/providers/{}", id)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn review_rating_must_be_in_range() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().app_data(common::state(&server)).configure(routes::configure)).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/providers/{}/reviews", Uuid::new_v4()))
        .insert_header(common::bearer(&common::user_token(Uuid::new_v4())))
        .set_json(json!({"rating": 6, "comment": "great"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn unknown_route_is_json_404() {
    let server = MockServer::start().await;
    let app = test::init_service(App::new().app_data(common::state(&server)).configure(routes::configure)).await;

    let req = test::TestRequest::get().uri("/nothing/here").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "error");
}

fn with_profile_image(mut body: Value) -> Value {
    let photo = general_purpose::STANDARD.encode(b"\x89PNG fake photo");
    body["profile_image"] = json!({
        "image_data": photo,
        "file_name": "me.png",
        "content_type": "image/png"
    });
    body
}

#[actix_web::test]
async fn registration_uploads_both_images() {
    let server = MockServer::start().await;
    let (user, cat) = (Uuid::new_v4(), Uuid::new_v4());
    mount_category(&server, cat).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/service_providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/storage/v1/object/profile-images/.+\.png$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Key": "ok"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/storage/v1/object/provider-documents/.+\.jpg$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Key": "ok"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/service_providers"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            common::provider_row(Uuid::new_v4(), user, cat, "pending")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().app_data(common::state(&server)).configure(routes::configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/providers")
        .insert_header(common::bearer(&common::user_token(user)))
        .set_json(with_profile_image(registration(cat)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let requests = server.received_requests().await.unwrap();
    let insert = requests
        .iter()
        .find(|r| r.method.to_string() == "POST" && r.url.path() == "/rest/v1/service_providers")
        .expect("insert");
    let sent: Value = serde_json::from_slice(&insert.body).unwrap();
    let profile_url = sent["profile_image_url"].as_str().unwrap();
    assert!(profile_url.contains("/storage/v1/object/public/profile-images/"));
    assert!(profile_url.contains(&user.to_string()));
}

#[actix_web::test]
async fn failed_profile_upload_aborts_registration() {
    let server = MockServer::start().await;
    let (user, cat) = (Uuid::new_v4(), Uuid::new_v4());
    mount_category(&server, cat).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/service_providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/storage/v1/object/profile-images/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("quota exceeded"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/storage/v1/object/provider-documents/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/service_providers"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().app_data(common::state(&server)).configure(routes::configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/providers")
        .insert_header(common::bearer(&common::user_token(user)))
        .set_json(with_profile_image(registration(cat)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_GATEWAY);
}

#[actix_web::test]
async fn reactivate_restores_suspended_and_rejected_providers() {
    for from in ["suspended", "rejected"] {
        let server = MockServer::start().await;
        let (id, owner, cat) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        Mock::given(method("GET"))
            .and(path("/rest/v1/service_providers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                common::provider_row(id, owner, cat, from)
            ])))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/service_providers"))
            .and(query_param("id", format!("eq.{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                common::provider_row(id, owner, cat, "approved")
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let app = test::init_service(App::new().app_data(common::state(&server)).configure(routes::configure)).await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/admin/providers/{}/reactivate", id))
            .insert_header(common::bearer(&common::admin_token(Uuid::new_v4())))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "reactivate from {}", from);

        let requests = server.received_requests().await.unwrap();
        let patch = requests
            .iter()
            .find(|r| r.method.to_string() == "PATCH")
            .expect("status patch");
        let sent: Value = serde_json::from_slice(&patch.body).unwrap();
        assert_eq!(sent["status"], "approved");
    }
}
