use std::sync::Arc;

use chrono::NaiveDate;

use crate::models::{
    attendance::entities::{AttendanceEntry, AttendancePage, AttendanceRecord},
    classes::{
        entities::{Class, ClassDetail},
        requests::ClassListQuery,
        responses::ClassListResponse,
    },
    instructors::{
        entities::Instructor, requests::InstructorListQuery, responses::InstructorListResponse,
    },
    seed::SeedData,
    students::{entities::Student, requests::StudentListQuery, responses::StudentListResponse},
    users::{entities::User, requests::CreateUserRequest},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（用户名统一转为小写）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息，大小写不敏感
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 用户总数
    async fn count_users(&self) -> Result<u64>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;

    /// 教师方法
    async fn get_instructor_by_id(&self, id: i64) -> Result<Option<Instructor>>;
    // 通过关联账号获取教师档案
    async fn get_instructor_by_user_id(&self, user_id: i64) -> Result<Option<Instructor>>;
    async fn list_instructors_with_pagination(
        &self,
        query: InstructorListQuery,
    ) -> Result<InstructorListResponse>;

    /// 学生方法
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    // 批量获取学生，结果顺序不保证
    async fn get_students_by_ids(&self, ids: &[i64]) -> Result<Vec<Student>>;
    async fn count_students(&self) -> Result<u64>;
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;

    /// 班级方法
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    // 获取班级及其教师、按名单顺序排列的学生
    async fn get_class_detail(&self, class_id: i64) -> Result<Option<ClassDetail>>;
    // 列出全部班级（含教师与学生），按名称排序
    async fn list_class_details(&self) -> Result<Vec<ClassDetail>>;
    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse>;

    /// 考勤方法
    async fn get_attendance(
        &self,
        class_id: i64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>>;
    // 按 (class_id, date) 原子地插入或整体替换记录
    async fn upsert_attendance(
        &self,
        class_id: i64,
        date: NaiveDate,
        records: Vec<AttendanceEntry>,
    ) -> Result<AttendanceRecord>;
    // 按日期倒序分页，page 从 1 开始
    async fn list_attendance_page(
        &self,
        class_id: i64,
        page: i64,
        size: i64,
    ) -> Result<AttendancePage>;
    async fn list_attendance_for_class(&self, class_id: i64) -> Result<Vec<AttendanceRecord>>;

    /// 初始数据导入（密码须已哈希），在单个事务中完成
    async fn import_seed(&self, data: SeedData) -> Result<()>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
