use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 考勤状态
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "attendance.ts")]
pub enum AttendanceStatus {
    Present,
    #[default]
    Absent,
    Late,
    Excused,
}

impl AttendanceStatus {
    pub const PRESENT: &'static str = "present";
    pub const ABSENT: &'static str = "absent";
    pub const LATE: &'static str = "late";
    pub const EXCUSED: &'static str = "excused";

    /// 宽松解析表单提交的状态：缺失或无法识别时视为缺勤
    pub fn from_input(input: Option<&str>) -> Self {
        input
            .and_then(|s| s.trim().to_ascii_lowercase().parse().ok())
            .unwrap_or_default()
    }

    /// 是否计入出勤（到课或迟到）
    pub fn is_attended(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AttendanceStatus::Present => Self::PRESENT,
            AttendanceStatus::Absent => Self::ABSENT,
            AttendanceStatus::Late => Self::LATE,
            AttendanceStatus::Excused => Self::EXCUSED,
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::PRESENT => Ok(AttendanceStatus::Present),
            Self::ABSENT => Ok(AttendanceStatus::Absent),
            Self::LATE => Ok(AttendanceStatus::Late),
            Self::EXCUSED => Ok(AttendanceStatus::Excused),
            _ => Err(format!("Invalid attendance status: {s}")),
        }
    }
}

/// 单个学生的考勤条目（持久化形式）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceEntry {
    pub student_id: i64,
    #[serde(default)]
    pub status: AttendanceStatus,
    #[serde(default)]
    pub notes: String,
}

/// 某班级某天的考勤记录，(class_id, date) 唯一
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceRecord {
    pub id: i64,
    pub class_id: i64,
    pub date: NaiveDate,
    pub records: Vec<AttendanceEntry>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 存储层返回的一页考勤记录
#[derive(Debug, Clone, Default)]
pub struct AttendancePage {
    pub items: Vec<AttendanceRecord>,
    pub total: i64,
    pub total_pages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_input_is_permissive() {
        assert_eq!(
            AttendanceStatus::from_input(Some("present")),
            AttendanceStatus::Present
        );
        assert_eq!(
            AttendanceStatus::from_input(Some(" LATE ")),
            AttendanceStatus::Late
        );
        assert_eq!(
            AttendanceStatus::from_input(Some("sick")),
            AttendanceStatus::Absent
        );
        assert_eq!(AttendanceStatus::from_input(None), AttendanceStatus::Absent);
    }

    #[test]
    fn test_entry_defaults_when_fields_missing() {
        let entry: AttendanceEntry = serde_json::from_str(r#"{"student_id":7}"#).unwrap();
        assert_eq!(entry.student_id, 7);
        assert_eq!(entry.status, AttendanceStatus::Absent);
        assert!(entry.notes.is_empty());
    }

    #[test]
    fn test_attended_counts_present_and_late() {
        assert!(AttendanceStatus::Present.is_attended());
        assert!(AttendanceStatus::Late.is_attended());
        assert!(!AttendanceStatus::Excused.is_attended());
        assert!(!AttendanceStatus::Absent.is_attended());
    }
}
