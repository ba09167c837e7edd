use crate::models::instructors::entities::Instructor;
use crate::models::students::entities::Student;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct Class {
    // 班级ID
    pub id: i64,
    // 班级名称
    pub name: String,
    pub subject: Option<String>,
    // 上课时间描述，如 "Mon/Wed 10:00"
    pub schedule: Option<String>,
    pub room: Option<String>,
    pub capacity: Option<i32>,
    pub description: Option<String>,
    // 任课教师ID
    pub instructor_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 完整解析后的班级：包含任课教师与按名单顺序排列的学生
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct ClassDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub class: Class,
    pub instructor: Option<Instructor>,
    pub students: Vec<Student>,
}

impl ClassDetail {
    pub fn id(&self) -> i64 {
        self.class.id
    }

    pub fn has_student(&self, student_id: i64) -> bool {
        self.students.iter().any(|s| s.id == student_id)
    }
}
