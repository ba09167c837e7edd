mod common;

use std::sync::Arc;

use actix_web::http::{Method, StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use school_attendance::routes;
use school_attendance::storage::Storage;
use school_attendance::utils::jwt::JwtUtils;

async fn bearer(storage: &Arc<dyn Storage>, username: &str, role: &str) -> String {
    let id = common::user_id(storage, username).await;
    let token = JwtUtils::generate_access_token(id, role).unwrap();
    format!("Bearer {token}")
}

macro_rules! attendance_app {
    ($storage:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($storage.clone()))
                .configure(routes::configure_attendance_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_requires_authentication() {
    let storage = common::seeded_storage().await;
    let app = attendance_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance/classes/1/stats")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_student_cannot_take_but_can_view() {
    let storage = common::seeded_storage().await;
    let auth = bearer(&storage, "ann", "student").await;
    let app = attendance_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance/classes/1/take")
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance/classes/1/stats")
        .insert_header((header::AUTHORIZATION, auth))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["totalDays"], 0);
    assert_eq!(body["data"]["stats"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"]["stats"][0]["attendanceRate"], "0");
}

#[actix_web::test]
async fn test_instructor_limited_to_own_class() {
    let storage = common::seeded_storage().await;
    let auth = bearer(&storage, "mwong", "instructor").await;
    let app = attendance_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance/classes/1/take")
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance/classes/2/take?date=2024-01-10")
        .insert_header((header::AUTHORIZATION, auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_instructor_without_profile_is_denied() {
    let storage = common::seeded_storage().await;
    let auth = bearer(&storage, "ghost", "instructor").await;
    let app = attendance_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance/classes/1/take")
        .insert_header((header::AUTHORIZATION, auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_unknown_class_redirects_to_index() {
    let storage = common::seeded_storage().await;
    let auth = bearer(&storage, "boss", "admin").await;
    let app = attendance_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance/classes/999/history")
        .insert_header((header::AUTHORIZATION, auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/api/v1/attendance"
    );
}

#[actix_web::test]
async fn test_take_save_and_reload() {
    let storage = common::seeded_storage().await;
    let auth = bearer(&storage, "jdoe", "instructor").await;
    let app = attendance_app!(storage);

    // 模板：名单顺序，全员缺勤
    let req = test::TestRequest::get()
        .uri("/api/v1/attendance/classes/1/take?date=2024-01-10")
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["isExisting"], false);
    assert_eq!(body["data"]["date"], "2024-01-10");
    let records = body["data"]["attendance"]["records"].as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["student"]["id"], 3);
    assert!(records.iter().all(|r| r["status"] == "absent"));

    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/classes/1/take")
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .set_json(json!({
            "date": "2024-01-10",
            "records": {
                "1": {"status": "present"},
                "2": {"status": "late", "notes": "bus"},
                "99": {"status": "present"}
            }
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let saved = body["data"]["records"].as_array().unwrap();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0]["student"]["id"], 1);
    assert_eq!(saved[1]["notes"], "bus");

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance/classes/1/take?date=2024-01-10")
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["isExisting"], true);
    assert_eq!(body["data"]["attendance"]["records"][0]["status"], "present");

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance/classes/1/history?page=abc")
        .insert_header((header::AUTHORIZATION, auth))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["currentPage"], 1);
    assert_eq!(body["data"]["totalPages"], 1);
    assert_eq!(body["data"]["hasNext"], false);
    assert_eq!(
        body["data"]["attendanceHistory"].as_array().unwrap().len(),
        1
    );
}

#[actix_web::test]
async fn test_save_with_bad_date_redirects_to_take_view() {
    let storage = common::seeded_storage().await;
    let auth = bearer(&storage, "boss", "admin").await;
    let app = attendance_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/classes/1/take")
        .insert_header((header::AUTHORIZATION, auth))
        .set_json(json!({"date": "10/01/2024", "records": {}}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/api/v1/attendance/classes/1/take"
    );
}

#[actix_web::test]
async fn test_index_marks_manageable_classes() {
    let storage = common::seeded_storage().await;
    let auth = bearer(&storage, "jdoe", "instructor").await;
    let app = attendance_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance")
        .insert_header((header::AUTHORIZATION, auth))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let classes = body["data"]["classes"].as_array().unwrap();
    assert_eq!(classes.len(), 2);
    for class in classes {
        let own = class["id"] == 1;
        assert_eq!(class["canManage"], own);
    }
}

#[actix_web::test]
async fn test_failed_save_keeps_previous_record() {
    let storage = common::seeded_storage().await;
    let auth = bearer(&storage, "jdoe", "instructor").await;
    let app = attendance_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/classes/1/take")
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .set_json(json!({
            "date": "2024-01-10",
            "records": {
                "3": {"status": "present"},
                "1": {"status": "late", "notes": "bus"},
                "2": {"status": "excused"}
            }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // 日期非法：不写入，重定向回点名页
    let req = test::TestRequest::post()
        .uri("/api/v1/attendance/classes/1/take")
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .set_json(json!({
            "date": "2024-13-45",
            "records": {
                "3": {"status": "absent"},
                "1": {"status": "absent"},
                "2": {"status": "absent"}
            }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance/classes/1/take?date=2024-01-10")
        .insert_header((header::AUTHORIZATION, auth))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["isExisting"], true);
    let records = body["data"]["attendance"]["records"].as_array().unwrap();
    let statuses: Vec<&str> = records
        .iter()
        .map(|r| r["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["present", "late", "excused"]);
    assert_eq!(records[1]["notes"], "bus");
}

#[actix_web::test]
async fn test_repeated_save_keeps_one_record() {
    let storage = common::seeded_storage().await;
    let auth = bearer(&storage, "boss", "admin").await;
    let app = attendance_app!(storage);

    let body = json!({
        "date": "2024-01-10",
        "records": {"1": {"status": "present"}, "2": {"status": "absent"}}
    });
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/v1/attendance/classes/1/take")
            .insert_header((header::AUTHORIZATION, auth.clone()))
            .set_json(body.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance/classes/1/history")
        .insert_header((header::AUTHORIZATION, auth))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["totalPages"], 1);
    let history = body["data"]["attendanceHistory"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["records"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_history_page_far_past_end_is_empty() {
    let storage = common::seeded_storage().await;
    let auth = bearer(&storage, "boss", "admin").await;
    let app = attendance_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance/classes/1/history?page=9223372036854775807")
        .insert_header((header::AUTHORIZATION, auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["currentPage"], i64::MAX);
    assert_eq!(body["data"]["hasNext"], false);
    assert_eq!(body["data"]["hasPrev"], true);
    assert!(
        body["data"]["attendanceHistory"]
            .as_array()
            .unwrap()
            .is_empty()
    );
}

#[actix_web::test]
async fn test_preflight_skips_authentication() {
    let storage = common::seeded_storage().await;
    let app = attendance_app!(storage);

    let req = test::TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/api/v1/attendance/classes/1/stats")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
