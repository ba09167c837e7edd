pub mod attendance;
pub mod auth;
pub mod classes;
pub mod common;
pub mod instructors;
pub mod seed;
pub mod students;
pub mod users;

pub use common::{ApiResponse, ErrorCode, PaginationInfo, PaginationQuery};

/// 程序启动时间，用于统计启动耗时
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
