//! 考勤访问控制判定
//!
//! 纯函数：只根据已解析好的身份、班级和关联教师作出决定，不做任何 I/O。

use crate::models::classes::entities::Class;
use crate::models::instructors::entities::Instructor;
use crate::models::users::entities::{Principal, UserRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceAction {
    /// 查看历史与统计
    View,
    /// 点名与保存
    Modify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Unauthenticated,
    NoInstructorProfile,
    NotYourClass,
    ReadOnlyRole,
}

impl DenyReason {
    pub fn message(&self) -> &'static str {
        match self {
            DenyReason::Unauthenticated => "authentication required",
            DenyReason::NoInstructorProfile => "no instructor profile linked",
            DenyReason::NotYourClass => "not your class",
            DenyReason::ReadOnlyRole => "your role cannot modify attendance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(DenyReason),
    NotFound,
}

/// 判定 `principal` 能否对 `class` 执行 `action`
///
/// `linked_instructor` 是教师账号关联的教师档案，其他角色传 `None`。
pub fn decide(
    principal: Option<&Principal>,
    action: AttendanceAction,
    class: Option<&Class>,
    linked_instructor: Option<&Instructor>,
) -> AccessDecision {
    let Some(principal) = principal else {
        return AccessDecision::Deny(DenyReason::Unauthenticated);
    };

    // 没有教师档案的教师账号不能管理任何班级
    if action == AttendanceAction::Modify
        && principal.role == UserRole::Instructor
        && linked_instructor.is_none()
    {
        return AccessDecision::Deny(DenyReason::NoInstructorProfile);
    }

    let Some(class) = class else {
        return AccessDecision::NotFound;
    };

    match (action, principal.role) {
        (AttendanceAction::View, _) | (AttendanceAction::Modify, UserRole::Admin) => {
            AccessDecision::Allow
        }
        (AttendanceAction::Modify, UserRole::Instructor) => match linked_instructor {
            Some(instructor) if instructor.id == class.instructor_id => AccessDecision::Allow,
            Some(_) => AccessDecision::Deny(DenyReason::NotYourClass),
            None => AccessDecision::Deny(DenyReason::NoInstructorProfile),
        },
        (AttendanceAction::Modify, UserRole::Student) => {
            AccessDecision::Deny(DenyReason::ReadOnlyRole)
        }
    }
}

/// 考勤首页的 canManage 标记
pub fn can_manage(
    principal: &Principal,
    class: &Class,
    linked_instructor: Option<&Instructor>,
) -> bool {
    decide(
        Some(principal),
        AttendanceAction::Modify,
        Some(class),
        linked_instructor,
    ) == AccessDecision::Allow
}
