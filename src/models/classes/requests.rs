use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 班级查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct ClassQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    // 按教师筛选，无法解析时忽略
    pub instructor_id: Option<String>,
}

impl ClassQueryParams {
    pub fn into_list_query(self) -> ClassListQuery {
        ClassListQuery {
            page: Some(self.pagination.page),
            size: Some(self.pagination.size),
            instructor_id: self
                .instructor_id
                .as_deref()
                .and_then(|s| s.trim().parse().ok()),
            search: self.search,
        }
    }
}

// 班级列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ClassListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub instructor_id: Option<i64>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instructor_filter_parsing() {
        let params: ClassQueryParams =
            serde_json::from_str(r#"{"page":"2","instructor_id":"7"}"#).unwrap();
        let query = params.into_list_query();
        assert_eq!(query.page, Some(2));
        assert_eq!(query.instructor_id, Some(7));

        let params: ClassQueryParams = serde_json::from_str(r#"{"instructor_id":"x"}"#).unwrap();
        assert_eq!(params.into_list_query().instructor_id, None);
    }
}
