//! 初始数据文件格式
//!
//! ```json
//! {
//!   "users": [{"username": "jdoe", "password": "secret1", "role": "instructor"}],
//!   "instructors": [{"id": 1, "name": "J. Doe", "username": "jdoe"}],
//!   "students": [{"id": 1, "name": "Ann"}],
//!   "classes": [{"id": 1, "name": "CS-101", "instructor_id": 1, "student_ids": [1]}]
//! }
//! ```

use crate::models::users::entities::UserRole;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub instructors: Vec<SeedInstructor>,
    #[serde(default)]
    pub students: Vec<SeedStudent>,
    #[serde(default)]
    pub classes: Vec<SeedClass>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub username: String,
    // 明文密码，导入时哈希
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedInstructor {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub image: String,
    // 关联的用户名
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedStudent {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub parent_contact: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedClass {
    pub id: i64,
    pub name: String,
    pub subject: Option<String>,
    pub schedule: Option<String>,
    pub room: Option<String>,
    pub capacity: Option<i32>,
    pub description: Option<String>,
    pub instructor_id: i64,
    #[serde(default)]
    pub student_ids: Vec<i64>,
}
