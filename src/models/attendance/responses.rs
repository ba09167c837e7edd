use super::entities::AttendanceStatus;
use crate::models::classes::entities::{Class, ClassDetail};
use crate::models::instructors::entities::Instructor;
use crate::models::students::entities::Student;
use chrono::NaiveDate;
use serde::Serialize;
use ts_rs::TS;

// 解析为完整学生信息的考勤条目
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct ResolvedEntry {
    pub student: Student,
    pub status: AttendanceStatus,
    pub notes: String,
}

/// 用于展示的考勤记录，`id` 为空表示尚未保存的模板
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceView {
    pub id: Option<i64>,
    pub class: i64,
    pub date: NaiveDate,
    pub records: Vec<ResolvedEntry>,
}

#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "attendance.ts")]
pub struct TakeAttendanceResponse {
    pub class_item: ClassDetail,
    pub attendance: AttendanceView,
    pub date: String,
    pub is_existing: bool,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "attendance.ts")]
pub struct StudentAttendanceStats {
    pub student: Student,
    pub total: i64,
    pub present: i64,
    pub late: i64,
    pub excused: i64,
    pub absent: i64,
    // 一位小数的百分比字符串，无记录时为 "0"
    pub attendance_rate: String,
}

#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceStatsResponse {
    pub class_item: ClassDetail,
    pub stats: Vec<StudentAttendanceStats>,
    pub total_days: i64,
}

#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceHistoryResponse {
    pub class_item: ClassDetail,
    pub attendance_history: Vec<AttendanceView>,
    pub current_page: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

// 考勤首页中的班级条目
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceIndexItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub class: Class,
    pub instructor: Option<Instructor>,
    pub student_count: i64,
    pub can_manage: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceIndexResponse {
    pub classes: Vec<AttendanceIndexItem>,
}
