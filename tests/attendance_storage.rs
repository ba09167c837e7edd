mod common;

use chrono::NaiveDate;
use school_attendance::models::attendance::entities::{AttendanceEntry, AttendanceStatus};
use school_attendance::models::classes::requests::ClassListQuery;
use school_attendance::models::instructors::requests::InstructorListQuery;
use school_attendance::models::students::requests::StudentListQuery;
use school_attendance::models::seed::SeedData;
use school_attendance::services::attendance::history::{HISTORY_PAGE_SIZE, page_meta};
use school_attendance::services::attendance::save::build_entries;
use school_attendance::services::attendance::stats::compute_stats;
use school_attendance::services::attendance::take::build_template;
use school_attendance::models::attendance::requests::AttendanceInput;
use std::collections::HashMap;

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn entry(student_id: i64, status: AttendanceStatus) -> AttendanceEntry {
    AttendanceEntry {
        student_id,
        status,
        notes: String::new(),
    }
}

#[tokio::test]
async fn test_class_detail_keeps_roster_order() {
    let storage = common::seeded_storage().await;

    let class = storage.get_class_detail(1).await.unwrap().unwrap();
    assert_eq!(class.class.name, "CS-101");
    assert_eq!(class.instructor.as_ref().map(|i| i.id), Some(1));
    let ids: Vec<i64> = class.students.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);

    assert!(storage.get_class_detail(999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_instructor_linked_by_username() {
    let storage = common::seeded_storage().await;

    let jdoe = common::user_id(&storage, "JDoe").await;
    let profile = storage.get_instructor_by_user_id(jdoe).await.unwrap();
    assert_eq!(profile.map(|i| i.id), Some(1));

    let ghost = common::user_id(&storage, "ghost").await;
    assert!(storage.get_instructor_by_user_id(ghost).await.unwrap().is_none());
}

#[tokio::test]
async fn test_seed_rejects_unknown_student_and_rolls_back() {
    let storage = common::memory_storage().await;
    let data: SeedData = serde_json::from_str(
        r#"{
            "instructors": [{"id": 1, "name": "J. Doe"}],
            "students": [{"id": 1, "name": "Ann"}],
            "classes": [{"id": 1, "name": "CS-101", "instructor_id": 1, "student_ids": [1, 42]}]
        }"#,
    )
    .unwrap();

    assert!(storage.import_seed(data).await.is_err());
    assert_eq!(storage.count_students().await.unwrap(), 0);
}

#[tokio::test]
async fn test_upsert_is_idempotent_and_unique_per_day() {
    let storage = common::seeded_storage().await;

    let first = storage
        .upsert_attendance(1, date(10), vec![entry(1, AttendanceStatus::Present)])
        .await
        .unwrap();
    let second = storage
        .upsert_attendance(1, date(10), vec![entry(1, AttendanceStatus::Present)])
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.records, second.records);
    assert_eq!(first.created_at, second.created_at);

    // 替换而不是合并
    let replaced = storage
        .upsert_attendance(
            1,
            date(10),
            vec![entry(2, AttendanceStatus::Late), entry(3, AttendanceStatus::Excused)],
        )
        .await
        .unwrap();
    assert_eq!(replaced.id, first.id);
    assert_eq!(replaced.records.len(), 2);
    assert!(replaced.records.iter().all(|e| e.student_id != 1));

    let all = storage.list_attendance_for_class(1).await.unwrap();
    assert_eq!(all.len(), 1);

    // 其他日期与其他班级互不影响
    storage.upsert_attendance(1, date(11), vec![]).await.unwrap();
    storage.upsert_attendance(2, date(10), vec![]).await.unwrap();
    assert_eq!(storage.list_attendance_for_class(1).await.unwrap().len(), 2);
    assert_eq!(storage.list_attendance_for_class(2).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_history_pagination_over_25_records() {
    let storage = common::seeded_storage().await;
    for d in 1..=25 {
        storage
            .upsert_attendance(1, date(d), vec![entry(1, AttendanceStatus::Present)])
            .await
            .unwrap();
    }

    let page1 = storage
        .list_attendance_page(1, 1, HISTORY_PAGE_SIZE)
        .await
        .unwrap();
    assert_eq!(page1.total, 25);
    assert_eq!(page1.total_pages, 3);
    assert_eq!(page1.items.len(), 10);
    // 最新日期在前
    assert_eq!(page1.items[0].date, date(25));
    assert_eq!(page1.items[9].date, date(16));
    let meta = page_meta(1, page1.total_pages);
    assert!(meta.has_next);
    assert!(!meta.has_prev);

    let page2 = storage
        .list_attendance_page(1, 2, HISTORY_PAGE_SIZE)
        .await
        .unwrap();
    assert_eq!(page2.items.len(), 10);
    let meta = page_meta(2, page2.total_pages);
    assert!(meta.has_next);
    assert!(meta.has_prev);

    let page3 = storage
        .list_attendance_page(1, 3, HISTORY_PAGE_SIZE)
        .await
        .unwrap();
    assert_eq!(page3.items.len(), 5);
    assert_eq!(page3.items[4].date, date(1));
    let meta = page_meta(3, page3.total_pages);
    assert!(!meta.has_next);
    assert!(meta.has_prev);

    let beyond = storage
        .list_attendance_page(1, 4, HISTORY_PAGE_SIZE)
        .await
        .unwrap();
    assert!(beyond.items.is_empty());
}

#[tokio::test]
async fn test_cs101_take_save_scenario() {
    let storage = common::memory_storage().await;
    let data: SeedData = serde_json::from_str(
        r#"{
            "instructors": [{"id": 1, "name": "J. Doe"}],
            "students": [{"id": 1, "name": "S1"}, {"id": 2, "name": "S2"}],
            "classes": [{"id": 1, "name": "CS-101", "instructor_id": 1, "student_ids": [1, 2]}]
        }"#,
    )
    .unwrap();
    storage.import_seed(data).await.unwrap();
    let class = storage.get_class_detail(1).await.unwrap().unwrap();

    // 尚无记录：模板为全员缺勤
    assert!(storage.get_attendance(1, date(10)).await.unwrap().is_none());
    let template = build_template(&class, date(10));
    assert_eq!(template.id, None);
    assert_eq!(template.records.len(), 2);
    assert!(
        template
            .records
            .iter()
            .all(|r| r.status == AttendanceStatus::Absent && r.notes.is_empty())
    );

    // 只提交 S1
    let mut submitted = HashMap::new();
    submitted.insert(
        "1".to_string(),
        AttendanceInput {
            status: Some("present".to_string()),
            notes: None,
        },
    );

    let saved = storage
        .upsert_attendance(1, date(10), build_entries(&class, &submitted))
        .await
        .unwrap();
    assert_eq!(saved.records, vec![entry(1, AttendanceStatus::Present)]);

    let again = storage
        .upsert_attendance(1, date(10), build_entries(&class, &submitted))
        .await
        .unwrap();
    assert_eq!(again.id, saved.id);
    assert_eq!(again.records, saved.records);

    // S1 一天出勤，S2 没有任何记录
    let history = storage.list_attendance_for_class(1).await.unwrap();
    let stats = compute_stats(&class.students, &history);
    assert_eq!(stats[0].total, 1);
    assert_eq!(stats[0].present, 1);
    assert_eq!(stats[0].attendance_rate, "100.0");
    assert_eq!(stats[1].total, 0);
    assert_eq!(stats[1].attendance_rate, "0");
}

#[tokio::test]
async fn test_class_list_filters_and_searches() {
    let storage = common::seeded_storage().await;

    let all = storage
        .list_classes_with_pagination(ClassListQuery::default())
        .await
        .unwrap();
    assert_eq!(all.pagination.total, 2);

    let mine = storage
        .list_classes_with_pagination(ClassListQuery {
            instructor_id: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(mine.items.len(), 1);
    assert_eq!(mine.items[0].name, "MA-201");

    let found = storage
        .list_classes_with_pagination(ClassListQuery {
            search: Some("CS".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.items.len(), 1);
    assert_eq!(found.items[0].id, 1);
}

#[tokio::test]
async fn test_far_out_of_range_pages_are_empty() {
    let storage = common::seeded_storage().await;
    storage
        .upsert_attendance(1, date(10), vec![entry(1, AttendanceStatus::Present)])
        .await
        .unwrap();

    let page = storage
        .list_attendance_page(1, i64::MAX, HISTORY_PAGE_SIZE)
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 1);
    assert_eq!(page.total_pages, 1);

    let classes = storage
        .list_classes_with_pagination(ClassListQuery {
            page: Some(i64::MAX),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(classes.items.is_empty());
    assert_eq!(classes.pagination.total, 2);

    let students = storage
        .list_students_with_pagination(StudentListQuery {
            page: Some(i64::MAX),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(students.items.is_empty());

    let instructors = storage
        .list_instructors_with_pagination(InstructorListQuery {
            page: Some(i64::MAX),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(instructors.items.is_empty());
}
