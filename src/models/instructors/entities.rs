use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "instructor.ts")]
pub struct Instructor {
    pub id: i64,
    pub name: String,
    pub contact: String,
    pub address: String,
    pub image: String,
    // 关联的登录账号，可为空
    pub user_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
