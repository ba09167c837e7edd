mod common;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use school_attendance::routes;
use school_attendance::utils::jwt::REFRESH_TOKEN_COOKIE;

// 每个测试使用不同的来源 IP，避免共享限流计数
macro_rules! auth_app {
    ($storage:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($storage.clone()))
                .configure(routes::configure_auth_routes)
                .configure(routes::configure_students_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_register_then_login_case_insensitive() {
    let storage = common::memory_storage().await;
    let app = auth_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .insert_header(("X-Forwarded-For", "10.0.0.1"))
        .set_json(json!({"username": "  NewTeacher ", "password": "secret1", "role": "instructor"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(
        resp.response()
            .cookies()
            .any(|c| c.name() == REFRESH_TOKEN_COOKIE)
    );
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["user"]["username"], "newteacher");
    assert_eq!(body["data"]["user"]["role"], "instructor");
    assert!(body["data"]["user"].get("password_hash").is_none());

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .insert_header(("X-Forwarded-For", "10.0.0.1"))
        .set_json(json!({"username": "NEWTEACHER", "password": "secret1"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["data"]["access_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["user"]["username"], "newteacher");
}

#[actix_web::test]
async fn test_register_validation_messages() {
    let storage = common::seeded_storage().await;
    let app = auth_app!(storage);

    let cases = [
        (
            json!({"username": "ab", "password": "secret1"}),
            "Username must be at least 3 characters long",
        ),
        (
            json!({"username": "a b", "password": "123"}),
            "Password must be at least 6 characters long",
        ),
        (
            json!({"username": "a b", "password": "secret1"}),
            "Username cannot contain spaces",
        ),
        (
            json!({"username": "jdoe", "password": "secret1"}),
            "Username already exists. Please choose a different one.",
        ),
        (
            json!({"username": "newbie", "password": "secret1", "role": "admin"}),
            "Invalid role selected",
        ),
    ];

    // 注册限流按 IP 计数，每个用例使用独立地址
    for (i, (payload, message)) in cases.into_iter().enumerate() {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .insert_header(("X-Forwarded-For", format!("10.0.2.{i}")))
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_client_error());
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], message);
    }
}

#[actix_web::test]
async fn test_login_failures() {
    let storage = common::memory_storage().await;
    let app = auth_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .insert_header(("X-Forwarded-For", "10.0.0.3"))
        .set_json(json!({"username": "  ", "password": "x"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Please provide both username and password");

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .insert_header(("X-Forwarded-For", "10.0.0.3"))
        .set_json(json!({"username": "nobody", "password": "secret1"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "No account found with this username");
}

#[actix_web::test]
async fn test_login_rate_limited_per_ip() {
    let storage = common::memory_storage().await;
    let app = auth_app!(storage);

    let mut statuses = Vec::new();
    for _ in 0..6 {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .insert_header(("X-Forwarded-For", "10.0.0.4"))
            .set_json(json!({"username": "nobody", "password": "secret1"}))
            .to_request();
        statuses.push(test::call_service(&app, req).await.status());
    }

    assert!(statuses[..5].iter().all(|s| *s == StatusCode::UNAUTHORIZED));
    assert_eq!(statuses[5], StatusCode::TOO_MANY_REQUESTS);
}

#[actix_web::test]
async fn test_missing_student_redirects_to_list() {
    let storage = common::seeded_storage().await;
    let app = auth_app!(storage);

    let id = common::user_id(&storage, "ann").await;
    let token =
        school_attendance::utils::jwt::JwtUtils::generate_access_token(id, "student").unwrap();

    let req = test::TestRequest::get()
        .uri("/api/v1/students/404")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/api/v1/students"
    );

    let req = test::TestRequest::get()
        .uri("/api/v1/students/3")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["name"], "Cid");
}
