use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use super::{
    ATTENDANCE_INDEX_PATH, AttendanceService, redirect_response, student_lookup, take_path,
    to_view,
};
use crate::middlewares::RequireAttendanceAccess;
use crate::models::attendance::entities::{AttendanceEntry, AttendanceStatus};
use crate::models::attendance::requests::{AttendanceInput, SaveAttendanceRequest};
use crate::models::classes::entities::ClassDetail;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::dates::parse_attendance_date;

/// 根据提交内容构建完整的考勤条目列表
///
/// 只保留提交了的学生（未提交的名单成员不会出现在结果中），
/// 结果按名单顺序排列。非数字键或不在名单中的学生被忽略。
pub fn build_entries(
    class: &ClassDetail,
    submitted: &HashMap<String, AttendanceInput>,
) -> Vec<AttendanceEntry> {
    let mut by_student: HashMap<i64, &AttendanceInput> = HashMap::with_capacity(submitted.len());
    for (key, input) in submitted {
        match key.trim().parse::<i64>() {
            Ok(student_id) if class.has_student(student_id) => {
                by_student.insert(student_id, input);
            }
            _ => warn!(
                "Ignoring attendance entry '{}' not on the roster of class {}",
                key,
                class.id()
            ),
        }
    }

    class
        .students
        .iter()
        .filter_map(|student| {
            by_student.get(&student.id).map(|input| AttendanceEntry {
                student_id: student.id,
                status: AttendanceStatus::from_input(input.status.as_deref()),
                notes: input.notes.clone().unwrap_or_default(),
            })
        })
        .collect()
}

pub async fn save_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    body: SaveAttendanceRequest,
) -> ActixResult<HttpResponse> {
    let Some(class) = RequireAttendanceAccess::extract_class(request) else {
        return Ok(redirect_response(
            ATTENDANCE_INDEX_PATH,
            ErrorCode::ClassNotFound,
            "Class not found",
        ));
    };
    let back = take_path(class.id());

    let date = match body.date.as_deref().map(parse_attendance_date) {
        Some(Ok(date)) => date,
        Some(Err(e)) => {
            warn!("Rejected attendance save for class {}: {}", class.id(), e);
            return Ok(redirect_response(
                &back,
                ErrorCode::AttendanceDateInvalid,
                "Invalid attendance date",
            ));
        }
        None => {
            return Ok(redirect_response(
                &back,
                ErrorCode::AttendanceDateInvalid,
                "Attendance date is required",
            ));
        }
    };

    let entries = build_entries(&class, &body.records);
    let storage = service.get_storage(request);

    match storage.upsert_attendance(class.id(), date, entries).await {
        Ok(record) => {
            info!(
                "Saved attendance for class {} on {} ({} entries)",
                class.id(),
                date,
                record.records.len()
            );
            let lookup = student_lookup(&storage, &class, std::slice::from_ref(&record)).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                to_view(&record, &lookup),
                "Attendance saved successfully",
            )))
        }
        Err(e) => {
            error!(
                "Failed to save attendance for class {} on {}: {}",
                class.id(),
                date,
                e
            );
            Ok(redirect_response(
                &back,
                ErrorCode::AttendanceSaveFailed,
                "Failed to save attendance",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classes::entities::Class;
    use crate::models::students::entities::Student;
    use chrono::Utc;

    fn student(id: i64) -> Student {
        Student {
            id,
            name: format!("S{id}"),
            parent_contact: String::new(),
            address: String::new(),
            image: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn cs101() -> ClassDetail {
        ClassDetail {
            class: Class {
                id: 1,
                name: "CS-101".into(),
                subject: None,
                schedule: None,
                room: None,
                capacity: None,
                description: None,
                instructor_id: 1,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            instructor: None,
            students: vec![student(1), student(2)],
        }
    }

    fn input(status: Option<&str>, notes: Option<&str>) -> AttendanceInput {
        AttendanceInput {
            status: status.map(str::to_string),
            notes: notes.map(str::to_string),
        }
    }

    #[test]
    fn test_unsubmitted_students_are_dropped() {
        let submitted = HashMap::from([("1".to_string(), input(Some("present"), None))]);
        let entries = build_entries(&cs101(), &submitted);
        assert_eq!(
            entries,
            vec![AttendanceEntry {
                student_id: 1,
                status: AttendanceStatus::Present,
                notes: String::new(),
            }]
        );
    }

    #[test]
    fn test_defaults_and_roster_order() {
        let submitted = HashMap::from([
            ("2".to_string(), input(None, Some("left early"))),
            ("1".to_string(), input(Some("weird"), None)),
        ]);
        let entries = build_entries(&cs101(), &submitted);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].student_id, 1);
        assert_eq!(entries[0].status, AttendanceStatus::Absent);
        assert_eq!(entries[1].student_id, 2);
        assert_eq!(entries[1].status, AttendanceStatus::Absent);
        assert_eq!(entries[1].notes, "left early");
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let submitted = HashMap::from([
            ("abc".to_string(), input(Some("present"), None)),
            ("99".to_string(), input(Some("present"), None)),
            ("2".to_string(), input(Some("excused"), None)),
        ]);
        let entries = build_entries(&cs101(), &submitted);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].student_id, 2);
        assert_eq!(entries[0].status, AttendanceStatus::Excused);
    }
}
