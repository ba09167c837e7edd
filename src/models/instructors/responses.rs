use super::entities::Instructor;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "instructor.ts")]
pub struct InstructorListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<Instructor>,
}
