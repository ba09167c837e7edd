use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

// 分页查询参数
//
// 查询字符串中的页码可能是非法值（如 `?page=abc`），此时按默认值处理，不拒绝请求。
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "pagination.ts")]
pub struct PaginationQuery {
    #[serde(default = "default_page", deserialize_with = "lenient_i64")]
    pub page: i64,
    #[serde(default = "default_size", deserialize_with = "lenient_i64")]
    pub size: i64,
}

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationInfo {
    pub fn empty(page: i64, page_size: i64) -> Self {
        Self {
            page,
            page_size,
            total: 0,
            total_pages: 0,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Int(i64),
    Str(String),
}

// 宽松的整数反序列化：接受数字或数字字符串，无法解析时返回 0（随后被钳制为 1）
fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(v) => v,
        IntOrString::Str(s) => s.trim().parse().unwrap_or(0),
    })
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    10
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self { page: 1, size: 10 }
    }
}
