use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::{ATTENDANCE_INDEX_PATH, AttendanceService, redirect_response};
use crate::middlewares::RequireAttendanceAccess;
use crate::models::attendance::entities::{AttendanceRecord, AttendanceStatus};
use crate::models::attendance::responses::{AttendanceStatsResponse, StudentAttendanceStats};
use crate::models::students::entities::Student;
use crate::models::{ApiResponse, ErrorCode};

/// 出勤率字符串：保留一位小数（四舍五入远离零），无记录时为 "0"
pub fn format_rate(attended: i64, total: i64) -> String {
    if total == 0 {
        return "0".to_string();
    }
    let rate = attended as f64 / total as f64 * 100.0;
    format!("{:.1}", (rate * 10.0).round() / 10.0)
}

/// 为名单中每个学生统计其在全部记录中的出勤情况
///
/// 每次调用都完整扫描一遍：O(记录数 × 名单人数)。
pub fn compute_stats(
    roster: &[Student],
    records: &[AttendanceRecord],
) -> Vec<StudentAttendanceStats> {
    roster
        .iter()
        .map(|student| {
            let (mut present, mut late, mut excused, mut absent) = (0, 0, 0, 0);
            let mut attended = 0;
            for entry in records
                .iter()
                .flat_map(|r| r.records.iter())
                .filter(|e| e.student_id == student.id)
            {
                if entry.status.is_attended() {
                    attended += 1;
                }
                match entry.status {
                    AttendanceStatus::Present => present += 1,
                    AttendanceStatus::Late => late += 1,
                    AttendanceStatus::Excused => excused += 1,
                    AttendanceStatus::Absent => absent += 1,
                }
            }
            let total = present + late + excused + absent;

            StudentAttendanceStats {
                student: student.clone(),
                total,
                present,
                late,
                excused,
                absent,
                attendance_rate: format_rate(attended, total),
            }
        })
        .collect()
}

pub async fn attendance_stats(
    service: &AttendanceService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(class) = RequireAttendanceAccess::extract_class(request) else {
        return Ok(redirect_response(
            ATTENDANCE_INDEX_PATH,
            ErrorCode::ClassNotFound,
            "Class not found",
        ));
    };

    let records = service
        .get_storage(request)
        .list_attendance_for_class(class.id())
        .await
        .unwrap_or_else(|e| {
            error!(
                "Failed to load attendance records for class {}: {}",
                class.id(),
                e
            );
            Vec::new()
        });

    let stats = compute_stats(&class.students, &records);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AttendanceStatsResponse {
            class_item: class,
            stats,
            total_days: records.len() as i64,
        },
        "Attendance statistics retrieved successfully",
    )))
}
