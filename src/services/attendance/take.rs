use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;
use tracing::{error, warn};

use super::{ATTENDANCE_INDEX_PATH, AttendanceService, redirect_response, student_lookup, to_view};
use crate::middlewares::RequireAttendanceAccess;
use crate::models::attendance::entities::AttendanceStatus;
use crate::models::attendance::requests::TakeAttendanceQuery;
use crate::models::attendance::responses::{
    AttendanceView, ResolvedEntry, TakeAttendanceResponse,
};
use crate::models::classes::entities::ClassDetail;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::dates::{format_date, parse_attendance_date, today};

/// 未保存的点名模板：名单中每个学生一条，默认缺勤、备注为空
pub fn build_template(class: &ClassDetail, date: NaiveDate) -> AttendanceView {
    AttendanceView {
        id: None,
        class: class.id(),
        date,
        records: class
            .students
            .iter()
            .map(|student| ResolvedEntry {
                student: student.clone(),
                status: AttendanceStatus::Absent,
                notes: String::new(),
            })
            .collect(),
    }
}

// 查询参数中的日期，缺失或非法时使用今天
fn requested_date(query: &TakeAttendanceQuery) -> NaiveDate {
    match query.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => parse_attendance_date(raw).unwrap_or_else(|e| {
            warn!("Falling back to today for malformed date '{}': {}", raw, e);
            today()
        }),
        None => today(),
    }
}

pub async fn take_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    query: TakeAttendanceQuery,
) -> ActixResult<HttpResponse> {
    let Some(class) = RequireAttendanceAccess::extract_class(request) else {
        return Ok(redirect_response(
            ATTENDANCE_INDEX_PATH,
            ErrorCode::ClassNotFound,
            "Class not found",
        ));
    };

    let date = requested_date(&query);
    let storage = service.get_storage(request);

    let existing = match storage.get_attendance(class.id(), date).await {
        Ok(record) => record,
        Err(e) => {
            error!(
                "Failed to load attendance for class {} on {}: {}",
                class.id(),
                date,
                e
            );
            return Ok(redirect_response(
                ATTENDANCE_INDEX_PATH,
                ErrorCode::InternalServerError,
                "Failed to load attendance",
            ));
        }
    };

    let (attendance, is_existing) = match existing {
        Some(record) => {
            let lookup = student_lookup(&storage, &class, std::slice::from_ref(&record)).await;
            (to_view(&record, &lookup), true)
        }
        None => (build_template(&class, date), false),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TakeAttendanceResponse {
            class_item: class,
            attendance,
            date: format_date(date),
            is_existing,
        },
        "Attendance retrieved successfully",
    )))
}
