use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::RegisterRequest,
    users::{entities::UserRole, requests::CreateUserRequest},
};
use crate::utils::password::hash_password;
use crate::utils::validate::{
    validate_credentials_present, validate_password, validate_username_length,
    validate_username_spaces,
};

use super::AuthService;
use super::login::issue_session;

/// 解析自助注册的角色，空值为 student
pub(crate) fn requested_role(role: Option<&str>) -> Result<UserRole, &'static str> {
    let role = match role.map(str::trim).filter(|r| !r.is_empty()) {
        None => return Ok(UserRole::Student),
        Some(r) => r
            .to_lowercase()
            .parse::<UserRole>()
            .map_err(|_| "Invalid role selected")?,
    };

    if role.is_self_registrable() {
        Ok(role)
    } else {
        Err("Invalid role selected")
    }
}

// 依次校验：必填、用户名长度、密码长度、用户名空格
fn check_credentials(username: &str, password: &str) -> Result<(), (ErrorCode, &'static str)> {
    validate_credentials_present(username, password).map_err(|m| (ErrorCode::BadRequest, m))?;
    validate_username_length(username).map_err(|m| (ErrorCode::UserNameInvalid, m))?;
    validate_password(password).map_err(|m| (ErrorCode::UserPasswordInvalid, m))?;
    validate_username_spaces(username).map_err(|m| (ErrorCode::UserNameInvalid, m))?;
    Ok(())
}

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let username = register_request.username.trim().to_lowercase();
    let password = register_request.password.trim();

    if let Err((code, msg)) = check_credentials(&username, password) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg)));
    }

    let role = match requested_role(register_request.role.as_deref()) {
        Ok(role) => role,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::UserRoleInvalid, msg)));
        }
    };

    // 1. 检查用户名是否已存在
    match storage.get_user_by_username(&username).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserNameAlreadyExists,
                "Username already exists. Please choose a different one.",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    format!("Register failed: {e}"),
                )),
            );
        }
    }

    // 2. 哈希密码
    let password_hash = match hash_password(password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    format!("Register failed: {e}"),
                )),
            );
        }
    };

    // 3. 创建用户并登录
    match storage
        .create_user(CreateUserRequest {
            username,
            password: password_hash,
            role,
        })
        .await
    {
        Ok(user) => {
            tracing::info!("Registered {} as {}", user.username, user.role);
            Ok(issue_session(
                service.get_config(),
                user,
                false,
                "Registration successful",
                HttpResponse::Created(),
            ))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("Register failed: {e}"),
            )),
        ),
    }
}
