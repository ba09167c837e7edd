use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::{ATTENDANCE_INDEX_PATH, AttendanceService, redirect_response, student_lookup, to_view};
use crate::middlewares::RequireAttendanceAccess;
use crate::models::attendance::entities::AttendancePage;
use crate::models::attendance::requests::HistoryQuery;
use crate::models::attendance::responses::AttendanceHistoryResponse;
use crate::models::{ApiResponse, ErrorCode};

/// 历史记录固定每页 10 条
pub const HISTORY_PAGE_SIZE: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    pub current_page: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

pub fn page_meta(page: i64, total_pages: i64) -> PageMeta {
    let current_page = page.max(1);
    PageMeta {
        current_page,
        total_pages,
        has_next: current_page < total_pages,
        has_prev: current_page > 1,
    }
}

pub async fn attendance_history(
    service: &AttendanceService,
    request: &HttpRequest,
    query: HistoryQuery,
) -> ActixResult<HttpResponse> {
    let Some(class) = RequireAttendanceAccess::extract_class(request) else {
        return Ok(redirect_response(
            ATTENDANCE_INDEX_PATH,
            ErrorCode::ClassNotFound,
            "Class not found",
        ));
    };

    let page = query.page();
    let storage = service.get_storage(request);

    let result = storage
        .list_attendance_page(class.id(), page, HISTORY_PAGE_SIZE)
        .await
        .unwrap_or_else(|e| {
            error!(
                "Failed to load attendance history for class {}: {}",
                class.id(),
                e
            );
            AttendancePage::default()
        });

    let lookup = student_lookup(&storage, &class, &result.items).await;
    let meta = page_meta(page, result.total_pages);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AttendanceHistoryResponse {
            class_item: class,
            attendance_history: result.items.iter().map(|r| to_view(r, &lookup)).collect(),
            current_page: meta.current_page,
            total_pages: meta.total_pages,
            has_next: meta.has_next,
            has_prev: meta.has_prev,
        },
        "Attendance history retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_flags_for_25_records() {
        // 25 条记录，每页 10 条，共 3 页
        assert_eq!(
            page_meta(1, 3),
            PageMeta {
                current_page: 1,
                total_pages: 3,
                has_next: true,
                has_prev: false
            }
        );
        let last = page_meta(3, 3);
        assert!(!last.has_next);
        assert!(last.has_prev);
    }

    #[test]
    fn test_page_past_end_and_empty_history() {
        let past = page_meta(7, 3);
        assert_eq!(past.current_page, 7);
        assert!(!past.has_next);
        assert!(past.has_prev);

        let empty = page_meta(1, 0);
        assert!(!empty.has_next);
        assert!(!empty.has_prev);
    }

    #[test]
    fn test_page_clamped_to_one() {
        assert_eq!(page_meta(0, 2).current_page, 1);
        assert_eq!(page_meta(-5, 2).current_page, 1);
    }
}
