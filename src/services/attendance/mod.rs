//! 考勤业务
//!
//! 每个操作都在自身边界内处理失败：记录日志后降级为重定向或空数据，
//! 不会让错误向上传播。

pub mod access;
pub mod history;
pub mod index;
pub mod save;
pub mod stats;
pub mod take;

pub use super::redirect_response;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use crate::models::attendance::entities::AttendanceRecord;
use crate::models::attendance::requests::{
    HistoryQuery, SaveAttendanceRequest, TakeAttendanceQuery,
};
use crate::models::attendance::responses::{AttendanceView, ResolvedEntry};
use crate::models::classes::entities::ClassDetail;
use crate::models::students::entities::Student;
use crate::storage::Storage;

pub const ATTENDANCE_INDEX_PATH: &str = "/api/v1/attendance";

pub fn take_path(class_id: i64) -> String {
    format!("{ATTENDANCE_INDEX_PATH}/classes/{class_id}/take")
}

// 学生查找表：先用班级名单，再补查已不在名单中的学生
pub(crate) async fn student_lookup(
    storage: &Arc<dyn Storage>,
    class: &ClassDetail,
    records: &[AttendanceRecord],
) -> HashMap<i64, Student> {
    let mut lookup: HashMap<i64, Student> = class
        .students
        .iter()
        .map(|s| (s.id, s.clone()))
        .collect();

    let missing: Vec<i64> = records
        .iter()
        .flat_map(|r| r.records.iter().map(|e| e.student_id))
        .filter(|id| !lookup.contains_key(id))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    if !missing.is_empty() {
        match storage.get_students_by_ids(&missing).await {
            Ok(students) => lookup.extend(students.into_iter().map(|s| (s.id, s))),
            Err(e) => warn!("Failed to resolve students {:?}: {}", missing, e),
        }
    }

    lookup
}

/// 把持久化记录转换为展示形式，无法解析的学生条目被跳过
pub(crate) fn to_view(record: &AttendanceRecord, lookup: &HashMap<i64, Student>) -> AttendanceView {
    AttendanceView {
        id: Some(record.id),
        class: record.class_id,
        date: record.date,
        records: record
            .records
            .iter()
            .filter_map(|entry| {
                lookup.get(&entry.student_id).map(|student| ResolvedEntry {
                    student: student.clone(),
                    status: entry.status,
                    notes: entry.notes.clone(),
                })
            })
            .collect(),
    }
}

pub struct AttendanceService {
    storage: Option<Arc<dyn Storage>>,
}

impl AttendanceService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 考勤首页：全部班级及当前用户能否管理
    pub async fn index(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        index::attendance_index(self, request).await
    }

    // 点名页面：已保存的记录或全员缺勤的模板
    pub async fn take(
        &self,
        request: &HttpRequest,
        query: TakeAttendanceQuery,
    ) -> ActixResult<HttpResponse> {
        take::take_attendance(self, request, query).await
    }

    // 保存考勤
    pub async fn save(
        &self,
        request: &HttpRequest,
        body: SaveAttendanceRequest,
    ) -> ActixResult<HttpResponse> {
        save::save_attendance(self, request, body).await
    }

    pub async fn history(
        &self,
        request: &HttpRequest,
        query: HistoryQuery,
    ) -> ActixResult<HttpResponse> {
        history::attendance_history(self, request, query).await
    }

    pub async fn stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        stats::attendance_stats(self, request).await
    }
}
