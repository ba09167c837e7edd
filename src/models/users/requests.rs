use crate::models::users::entities::UserRole;

// 创建用户请求（用于存储层，password 为已哈希的密码）
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub role: UserRole,
}
