use serde::Deserialize;
use std::collections::HashMap;
use ts_rs::TS;

// 点名页面查询参数
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct TakeAttendanceQuery {
    pub date: Option<String>,
}

// 单个学生的提交内容，字段均可省略
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceInput {
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// 保存考勤请求
///
/// `records` 以学生ID（字符串）为键。
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct SaveAttendanceRequest {
    pub date: Option<String>,
    #[serde(default)]
    pub records: HashMap<String, AttendanceInput>,
}

// 历史记录查询参数，page 非法时按第 1 页处理
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct HistoryQuery {
    pub page: Option<String>,
}

impl HistoryQuery {
    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1)
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_page_is_clamped() {
        let q = |p: Option<&str>| HistoryQuery {
            page: p.map(str::to_string),
        };
        assert_eq!(q(None).page(), 1);
        assert_eq!(q(Some("3")).page(), 3);
        assert_eq!(q(Some("0")).page(), 1);
        assert_eq!(q(Some("-4")).page(), 1);
        assert_eq!(q(Some("abc")).page(), 1);
    }

    #[test]
    fn test_save_request_accepts_partial_inputs() {
        let req: SaveAttendanceRequest = serde_json::from_str(
            r#"{"date":"2024-01-10","records":{"1":{"status":"present"},"2":{}}}"#,
        )
        .unwrap();
        assert_eq!(req.date.as_deref(), Some("2024-01-10"));
        assert_eq!(req.records.len(), 2);
        assert!(req.records["2"].status.is_none());
    }
}
