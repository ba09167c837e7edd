use serde::{Deserialize, Serialize};

// 业务错误码
//
// - 0: 成功
// - 1xxx: 通用错误
// - 2xxx: 认证与用户
// - 3xxx: 班级、学生、教师
// - 4xxx: 考勤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    AuthFailed = 2000,
    RegisterFailed = 2001,
    UserNameInvalid = 2002,
    UserPasswordInvalid = 2003,
    UserNameAlreadyExists = 2004,
    UserRoleInvalid = 2005,
    UserNotFound = 2006,

    ClassNotFound = 3000,
    StudentNotFound = 3100,
    InstructorNotFound = 3200,

    AttendancePermissionDenied = 4000,
    AttendanceDateInvalid = 4001,
    AttendanceSaveFailed = 4002,
}
