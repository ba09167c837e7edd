//! 集成测试共用的内存数据库与种子数据

#![allow(dead_code)]

use std::sync::Arc;

use school_attendance::models::seed::SeedData;
use school_attendance::storage::Storage;
use school_attendance::storage::sea_orm_storage::SeaOrmStorage;
use sea_orm::{ConnectOptions, Database};

/// 两位教师（各有账号）、一位未关联账号的教师、四名学生、两个班级
///
/// CS-101 的名单顺序为 [3, 1, 2]
pub const SEED_JSON: &str = r#"{
    "users": [
        {"username": "jdoe", "password": "not-a-hash", "role": "instructor"},
        {"username": "mwong", "password": "not-a-hash", "role": "instructor"},
        {"username": "ghost", "password": "not-a-hash", "role": "instructor"},
        {"username": "ann", "password": "not-a-hash", "role": "student"},
        {"username": "boss", "password": "not-a-hash", "role": "admin"}
    ],
    "instructors": [
        {"id": 1, "name": "J. Doe", "contact": "555-0101", "username": "jdoe"},
        {"id": 2, "name": "M. Wong", "contact": "555-0102", "username": "mwong"},
        {"id": 3, "name": "Unlinked"}
    ],
    "students": [
        {"id": 1, "name": "Ann"},
        {"id": 2, "name": "Ben"},
        {"id": 3, "name": "Cid"},
        {"id": 4, "name": "Dee"}
    ],
    "classes": [
        {"id": 1, "name": "CS-101", "subject": "Computing", "instructor_id": 1, "student_ids": [3, 1, 2]},
        {"id": 2, "name": "MA-201", "instructor_id": 2, "student_ids": [4]}
    ]
}"#;

/// 迁移后的空内存数据库
pub async fn memory_storage() -> Arc<dyn Storage> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1);

    let db = Database::connect(opt)
        .await
        .expect("failed to open in-memory sqlite");
    let storage = SeaOrmStorage::with_connection(db)
        .await
        .expect("failed to migrate in-memory sqlite");
    Arc::new(storage)
}

/// 导入了 [`SEED_JSON`] 的内存数据库
pub async fn seeded_storage() -> Arc<dyn Storage> {
    let storage = memory_storage().await;
    let data: SeedData = serde_json::from_str(SEED_JSON).expect("seed json is valid");
    storage.import_seed(data).await.expect("seed import");
    storage
}

/// 按用户名查出用户 ID
pub async fn user_id(storage: &Arc<dyn Storage>, username: &str) -> i64 {
    storage
        .get_user_by_username(username)
        .await
        .expect("user lookup")
        .unwrap_or_else(|| panic!("user {username} missing"))
        .id
}
